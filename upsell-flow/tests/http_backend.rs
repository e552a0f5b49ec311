//! `HttpOfferBackend` against a local wiremock server, plus the whole
//! eligibility → pricing → accept sequence running over HTTP.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use upsell_flow::eligibility::{InitialPurchase, PurchaseLineItem, PurchasedProduct};
use upsell_flow::{
    should_render, AcceptOutcome, CheckoutPlatform, ExtensionStorage, FlowState, HttpOfferBackend, InputData,
    OfferBackend, PlatformError, PostPurchaseFlow, SignOutcome,
};
use upsell_shared::{CalculatedPurchase, Change};

fn offers_json() -> serde_json::Value {
    json!({
        "offers": [{
            "id": 1,
            "title": "One time offer",
            "productTitle": "Mystery Coffee Bag",
            "productImageURL": "https://cdn.example.com/image.png",
            "productDescription": ["Surprise yourself!"],
            "originalPrice": "10.00",
            "discountedPrice": "10.00",
            "changes": [{
                "type": "add_variant",
                "variantID": 50772069974184u64,
                "quantity": 1,
                "discount": {"value": 50, "valueType": "percentage", "title": "(Save 50%)"}
            }]
        }]
    })
}

fn input() -> InputData {
    InputData {
        token: "session-token".to_string(),
        initial_purchase: InitialPurchase {
            reference_id: "ref-1".to_string(),
            line_items: vec![PurchaseLineItem {
                product: PurchasedProduct { title: "Pour Over Kit".to_string() },
                quantity: None,
            }],
        },
    }
}

fn backend(server: &MockServer) -> HttpOfferBackend {
    let config = upsell_store::Config::from_toml(&format!(
        r#"
        [server]
        port = 0

        [auth]
        api_key = "key"
        api_secret = "secret"

        [backend]
        app_url = "{}/"
        timeout_seconds = 5
        "#,
        server.uri()
    ))
    .expect("test config");
    HttpOfferBackend::from_config(&config.backend).expect("failed to build test backend")
}

#[derive(Default)]
struct RecordingPlatform {
    calculated: Mutex<Vec<Vec<Change>>>,
    applied: Mutex<Vec<String>>,
    done_calls: Mutex<usize>,
}

#[async_trait]
impl CheckoutPlatform for RecordingPlatform {
    async fn calculate_changeset(&self, changes: &[Change]) -> Result<CalculatedPurchase, PlatformError> {
        self.calculated.lock().unwrap().push(changes.to_vec());
        Ok(serde_json::from_value(json!({
            "updatedLineItems": [{
                "priceSet": {"presentmentMoney": {"amount": "10.00"}},
                "totalPriceSet": {"presentmentMoney": {"amount": "5.00"}}
            }],
            "totalOutstandingSet": {"presentmentMoney": {"amount": "5.00"}}
        }))
        .unwrap())
    }

    async fn apply_changeset(&self, token: &str) -> Result<(), PlatformError> {
        self.applied.lock().unwrap().push(token.to_string());
        Ok(())
    }

    async fn done(&self) {
        *self.done_calls.lock().unwrap() += 1;
    }
}

// ---------------------------------------------------------------------------
// fetch_offers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_offers_sends_bearer_and_reference_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/offer"))
        .and(header("authorization", "Bearer session-token"))
        .and(body_json(json!({"referenceId": "ref-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(offers_json()))
        .expect(1)
        .mount(&server)
        .await;

    let offers = backend(&server).fetch_offers("session-token", "ref-1").await.unwrap();

    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].changes[0].variant_id, 50772069974184);
}

#[tokio::test]
async fn fetch_offers_surfaces_http_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/offer"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "unauthorized"})))
        .mount(&server)
        .await;

    let result = backend(&server).fetch_offers("bad", "ref-1").await;
    assert!(
        matches!(result, Err(upsell_flow::BackendError::Status { status: 401, .. })),
        "expected 401, got: {result:?}"
    );
}

#[tokio::test]
async fn should_render_false_when_server_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/offer"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut storage = ExtensionStorage::default();
    let decision = should_render(&backend(&server), &input(), &mut storage).await;

    assert!(!decision.render);
    assert!(storage.initial_data().is_none());
}

#[tokio::test]
async fn should_render_false_on_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/offer"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let mut storage = ExtensionStorage::default();
    let decision = should_render(&backend(&server), &input(), &mut storage).await;
    assert!(!decision.render);
}

#[tokio::test]
async fn should_render_false_when_no_offers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/offer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"offers": []})))
        .expect(1)
        .mount(&server)
        .await;

    let mut storage = ExtensionStorage::default();
    let decision = should_render(&backend(&server), &input(), &mut storage).await;

    assert!(!decision.render);
    assert!(storage.initial_data().is_none());
}

// ---------------------------------------------------------------------------
// sign_changeset
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sign_changeset_sends_offer_id_only() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/sign-changeset"))
        .and(header("authorization", "Bearer session-token"))
        .and(body_json(json!({"referenceId": "ref-1", "changes": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "signed.jwt.value"})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = backend(&server).sign_changeset("session-token", "ref-1", 1).await;
    assert_eq!(outcome, SignOutcome::Signed("signed.jwt.value".to_string()));
}

#[tokio::test]
async fn sign_changeset_failure_is_reported_not_swallowed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/sign-changeset"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Offer not found: 9"})))
        .mount(&server)
        .await;

    let outcome = backend(&server).sign_changeset("session-token", "ref-1", 9).await;
    assert!(matches!(outcome, SignOutcome::Failed(ref reason) if reason.contains("404")));
}

// ---------------------------------------------------------------------------
// End to end over HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn accept_flow_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/offer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(offers_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/sign-changeset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "signed.jwt.value"})))
        .expect(1)
        .mount(&server)
        .await;

    let http = Arc::new(backend(&server));
    let platform = Arc::new(RecordingPlatform::default());

    let mut storage = ExtensionStorage::default();
    assert!(should_render(http.as_ref(), &input(), &mut storage).await.render);

    let mut flow = PostPurchaseFlow::mount(&storage, input(), platform.clone(), http).unwrap();
    flow.calculate().await.unwrap();
    assert_eq!(flow.view().unwrap().total, "$5.00");

    assert_eq!(flow.accept().await.unwrap(), AcceptOutcome::Applied);
    assert_eq!(flow.state(), FlowState::Applied);

    let expected_changes = storage.initial_data().unwrap().offers[0].changes.clone();
    assert_eq!(*platform.calculated.lock().unwrap(), vec![expected_changes]);
    assert_eq!(*platform.applied.lock().unwrap(), vec!["signed.jwt.value".to_string()]);
    assert_eq!(*platform.done_calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn accept_flow_blocks_apply_when_signing_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/offer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(offers_json()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/sign-changeset"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let http = Arc::new(backend(&server));
    let platform = Arc::new(RecordingPlatform::default());

    let mut storage = ExtensionStorage::default();
    should_render(http.as_ref(), &input(), &mut storage).await;

    let mut flow = PostPurchaseFlow::mount(&storage, input(), platform.clone(), http).unwrap();
    flow.calculate().await.unwrap();

    assert!(matches!(flow.accept().await.unwrap(), AcceptOutcome::Retryable(_)));
    assert!(platform.applied.lock().unwrap().is_empty());
    assert_eq!(*platform.done_calls.lock().unwrap(), 0);

    flow.decline().await.unwrap();
    assert_eq!(*platform.done_calls.lock().unwrap(), 1);
}
