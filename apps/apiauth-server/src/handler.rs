//! Request handling for the demo server.
//!
//! Every request except the health check must be signed. All authentication
//! failures produce the same `401 Unauthorized` response, whatever stage
//! rejected the request; the reason is only logged.

use apiauth::{Clock, StaticSecretResolver, Verifier};
use bytes::Bytes;
use http::{Method, StatusCode};
use http_body_util::Full;
use tracing::{info, warn};

/// Path answered without authentication.
pub const HEALTH_PATH: &str = "/health";

/// Authenticate a fully buffered request and build the response.
pub fn handle<C: Clock>(
    mut request: http::Request<Bytes>,
    verifier: &Verifier<C>,
    resolver: &StaticSecretResolver,
) -> http::Response<Full<Bytes>> {
    if request.method() == Method::GET && request.uri().path() == HEALTH_PATH {
        return text_response(StatusCode::OK, r#"{"status":"running"}"#);
    }

    match verifier.authenticate(&mut request, resolver) {
        Ok(identity) => {
            info!(
                identity = %identity,
                method = %request.method(),
                path = request.uri().path(),
                body_len = request.body().len(),
                "authorized request"
            );
            text_response(StatusCode::OK, format!("Authorized: {identity}"))
        }
        Err(err) => {
            warn!(
                error = %err,
                method = %request.method(),
                path = request.uri().path(),
                "authentication failed"
            );
            text_response(StatusCode::UNAUTHORIZED, "Unauthorized")
        }
    }
}

/// Build a plain-text response.
pub fn text_response(status: StatusCode, body: impl Into<Bytes>) -> http::Response<Full<Bytes>> {
    let mut response = http::Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
