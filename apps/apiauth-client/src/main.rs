//! apiauth demo client.
//!
//! Signs a `GET` and a `POST` request with the `APIAuth` scheme, sends them to
//! the demo server, and logs the responses.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `APIAUTH_ENDPOINT` | `http://localhost:8080` | Server base URL |
//! | `APIAUTH_ACCESS_ID` | `myclientid` | Access id to sign as |
//! | `APIAUTH_SECRET_KEY` | `mysecretkey` | Shared secret |
//! | `LOG_LEVEL` | `info` | Log level filter |

use anyhow::{Context, Result};
use bytes::Bytes;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Client configuration loaded from the environment.
#[derive(Debug, Clone)]
struct ClientConfig {
    endpoint: String,
    access_id: String,
    secret_key: String,
    log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from("http://localhost:8080"),
            access_id: String::from("myclientid"),
            secret_key: String::from("mysecretkey"),
            log_level: String::from("info"),
        }
    }
}

impl ClientConfig {
    fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("APIAUTH_ENDPOINT") {
            config.endpoint = v.trim_end_matches('/').to_owned();
        }
        if let Ok(v) = std::env::var("APIAUTH_ACCESS_ID") {
            config.access_id = v;
        }
        if let Ok(v) = std::env::var("APIAUTH_SECRET_KEY") {
            config.secret_key = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    Ok(())
}

/// Sign `request` and send it, returning the status and response body.
async fn send_signed(
    client: &reqwest::Client,
    config: &ClientConfig,
    mut request: http::Request<Bytes>,
) -> Result<(reqwest::StatusCode, String)> {
    apiauth::sign(&mut request, &config.access_id, &config.secret_key)
        .context("failed to sign request")?;

    let request = reqwest::Request::try_from(request).context("failed to build request")?;
    let response = client
        .execute(request)
        .await
        .context("failed to send request")?;

    let status = response.status();
    let body = response.text().await.context("failed to read response")?;
    Ok((status, body))
}

async fn get_call(client: &reqwest::Client, config: &ClientConfig) -> Result<()> {
    let request = http::Request::builder()
        .method("GET")
        .uri(format!("{}/api/v1/lists.json", config.endpoint))
        .body(Bytes::new())?;

    let (status, body) = send_signed(client, config, request).await?;
    info!(%status, body, "GET response");
    Ok(())
}

async fn post_call(client: &reqwest::Client, config: &ClientConfig) -> Result<()> {
    let payload = serde_json::json!({ "currency": "INR", "amount": "1" });
    let request = http::Request::builder()
        .method("POST")
        .uri(format!("{}/api/v1/lists/create.json", config.endpoint))
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Bytes::from(serde_json::to_vec(&payload)?))?;

    let (status, body) = send_signed(client, config, request).await?;
    info!(%status, body, "POST response");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClientConfig::from_env();
    init_tracing(&config.log_level)?;

    info!(endpoint = %config.endpoint, access_id = %config.access_id, "starting apiauth client");

    let client = reqwest::Client::new();
    get_call(&client, &config).await?;
    post_call(&client, &config).await?;

    Ok(())
}
