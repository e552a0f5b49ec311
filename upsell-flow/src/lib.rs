pub mod backend;
pub mod countdown;
pub mod eligibility;
pub mod flow;
pub mod http;
pub mod platform;

pub use backend::{BackendError, OfferBackend, SignOutcome};
pub use countdown::{Countdown, CountdownHandle};
pub use eligibility::{should_render, ExtensionStorage, InputData, OfferPayload, ShouldRender};
pub use flow::{AcceptOutcome, FlowError, FlowSession, FlowState, OfferView, PostPurchaseFlow};
pub use http::HttpOfferBackend;
pub use platform::{CheckoutPlatform, PlatformError};
