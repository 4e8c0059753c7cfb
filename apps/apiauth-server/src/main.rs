//! apiauth demo server.
//!
//! Accepts HTTP requests signed with the `APIAuth` scheme and answers
//! `Authorized: <access id>` or `401 Unauthorized`.
//!
//! # Usage
//!
//! ```text
//! APIAUTH_LISTEN=0.0.0.0:8080 APIAUTH_SECRET_KEY=mysecretkey apiauth-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `APIAUTH_LISTEN` | `0.0.0.0:8080` | Bind address |
//! | `APIAUTH_ACCESS_ID` | `myclientid` | Accepted access id |
//! | `APIAUTH_SECRET_KEY` | `mysecretkey` | Secret for the access id |
//! | `APIAUTH_MAX_CLOCK_SKEW` | `30` | Tolerated clock skew, seconds |
//! | `APIAUTH_MAX_REQUEST_AGE` | `900` | Maximum request age, seconds |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod config;
mod handler;
mod service;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use apiauth::{StaticSecretResolver, Verifier};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::service::AuthService;

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Build the service from configuration.
fn build_service(config: &ServerConfig) -> AuthService {
    let resolver = StaticSecretResolver::new(vec![(
        config.access_id.clone(),
        config.secret_key.clone(),
    )]);
    AuthService::new(Verifier::new(config.auth.clone()), resolver)
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve(listener: TcpListener, service: AuthService) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env();

    init_tracing(&config.log_level)?;

    info!(
        listen = %config.listen,
        access_id = %config.access_id,
        max_clock_skew_secs = config.auth.max_clock_skew_secs,
        max_request_age_secs = config.auth.max_request_age_secs,
        version = VERSION,
        "starting apiauth server",
    );

    let service = build_service(&config);

    let addr: SocketAddr = config
        .listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    serve(listener, service).await
}
