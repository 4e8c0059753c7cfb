//! The hyper service wrapping [`handle`].
//!
//! Incoming bodies are collected in full before authentication, since the
//! checksum covers the whole payload.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use apiauth::{StaticSecretResolver, Verifier};
use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::Service;
use tracing::{debug, error};

use crate::handler::{handle, text_response};

/// Shared state for every connection.
#[derive(Debug)]
struct State {
    verifier: Verifier,
    resolver: StaticSecretResolver,
}

/// A hyper service that authenticates every request.
#[derive(Debug, Clone)]
pub struct AuthService {
    state: Arc<State>,
}

impl AuthService {
    /// Create a new service.
    #[must_use]
    pub fn new(verifier: Verifier, resolver: StaticSecretResolver) -> Self {
        Self {
            state: Arc::new(State { verifier, resolver }),
        }
    }
}

impl Service<http::Request<Incoming>> for AuthService {
    type Response = http::Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let state = Arc::clone(&self.state);

        Box::pin(async move {
            debug!(method = %req.method(), uri = %req.uri(), "processing request");

            let (parts, incoming) = req.into_parts();
            let body = match collect_body(incoming).await {
                Ok(body) => body,
                Err(err) => {
                    error!(error = %err, "failed to collect request body");
                    return Ok(text_response(
                        StatusCode::BAD_REQUEST,
                        "Failed to read request body",
                    ));
                }
            };

            let request = http::Request::from_parts(parts, body);
            Ok(handle(request, &state.verifier, &state.resolver))
        })
    }
}

/// Collect the full body from a hyper `Incoming` stream into `Bytes`.
async fn collect_body(incoming: Incoming) -> Result<Bytes, hyper::Error> {
    let collected = incoming.collect().await?;
    Ok(collected.to_bytes())
}
