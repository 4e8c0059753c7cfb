//! Server configuration loaded from the environment.

use apiauth::AuthConfig;

/// Configuration for the demo server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (e.g. `"0.0.0.0:8080"`).
    pub listen: String,
    /// Log level filter string (e.g. `"info"`, `"debug"`).
    pub log_level: String,
    /// The single access id accepted by this server.
    pub access_id: String,
    /// The secret shared with `access_id`.
    pub secret_key: String,
    /// Freshness window for incoming requests.
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: String::from("0.0.0.0:8080"),
            log_level: String::from("info"),
            access_id: String::from("myclientid"),
            secret_key: String::from("mysecretkey"),
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `APIAUTH_LISTEN` | `0.0.0.0:8080` |
    /// | `LOG_LEVEL` | `info` |
    /// | `APIAUTH_ACCESS_ID` | `myclientid` |
    /// | `APIAUTH_SECRET_KEY` | `mysecretkey` |
    /// | `APIAUTH_MAX_CLOCK_SKEW` | `30` |
    /// | `APIAUTH_MAX_REQUEST_AGE` | `900` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self {
            auth: AuthConfig::from_env(),
            ..Self::default()
        };

        if let Ok(v) = std::env::var("APIAUTH_LISTEN") {
            config.listen = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Ok(v) = std::env::var("APIAUTH_ACCESS_ID") {
            config.access_id = v;
        }
        if let Ok(v) = std::env::var("APIAUTH_SECRET_KEY") {
            config.secret_key = v;
        }

        config
    }
}
