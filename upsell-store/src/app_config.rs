use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use upsell_shared::Secret;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    pub backend: BackendConfig,
    #[serde(default)]
    pub countdown: CountdownConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// App credentials issued by the platform. The secret signs changesets and
/// verifies checkout session tokens.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub api_key: String,
    pub api_secret: Secret,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// JSON array of offers replacing the built-in table
    pub seed_path: Option<PathBuf>,
}

/// Where the checkout-side flow reaches the app server
#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub app_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CountdownConfig {
    #[serde(default = "default_countdown")]
    pub seconds: u32,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self { seconds: default_countdown() }
    }
}

fn default_timeout() -> u64 { 10 }

fn default_countdown() -> u32 { 300 }

impl Config {
    /// Load from `./config` plus `UPSELL_<SECTION>__<KEY>` environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    pub fn load_from(dir: &str) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name(&format!("{}/default", dir)))
            .add_source(config::File::with_name(&format!("{}/{}", dir, run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name(&format!("{}/local", dir)).required(false))
            // e.g. UPSELL_AUTH__API_SECRET=...
            .add_source(
                config::Environment::with_prefix("UPSELL")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Config = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Build from a TOML document, no files or environment involved
    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        let s = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;

        let config: Config = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.auth.api_secret.is_empty() {
            return Err(config::ConfigError::Message("auth.api_secret must not be empty".into()));
        }
        if self.auth.api_key.is_empty() {
            return Err(config::ConfigError::Message("auth.api_key must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [server]
        port = 8080

        [auth]
        api_key = "key"
        api_secret = "secret"

        [backend]
        app_url = "https://upsell.example.com"
    "#;

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_toml(MINIMAL).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.backend.timeout_seconds, 10);
        assert_eq!(config.countdown.seconds, 300);
        assert!(config.catalog.seed_path.is_none());
        assert_eq!(config.auth.api_secret.expose(), "secret");
    }

    #[test]
    fn test_empty_secret_rejected() {
        let source = MINIMAL.replace("api_secret = \"secret\"", "api_secret = \"\"");
        assert!(Config::from_toml(&source).is_err());
    }

    #[test]
    fn test_load_from_env_overrides_file() {
        let dir = env::temp_dir().join(format!("upsell-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("default.toml"),
            MINIMAL.replace("api_secret = \"secret\"", "api_secret = \"from-file\""),
        )
        .unwrap();
        let dir_str = dir.to_str().unwrap();

        let config = Config::load_from(dir_str).unwrap();
        assert_eq!(config.auth.api_secret.expose(), "from-file");

        env::set_var("UPSELL_AUTH__API_SECRET", "from-env");
        let result = Config::load_from(dir_str);
        env::remove_var("UPSELL_AUTH__API_SECRET");
        std::fs::remove_dir_all(&dir).ok();

        let config = result.unwrap();
        assert_eq!(config.auth.api_secret.expose(), "from-env");
        assert_eq!(config.auth.api_key, "key");
    }

    #[test]
    fn test_secret_not_in_debug_output() {
        let config = Config::from_toml(MINIMAL).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("\"secret\""));
        assert!(rendered.contains("********"));
    }
}
