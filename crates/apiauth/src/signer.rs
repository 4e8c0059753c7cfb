//! Client-side request signing.
//!
//! Signing mutates the request in a fixed order, because the later steps read
//! what the earlier ones wrote:
//!
//! 1. `Content-Md5` is set from the body (`POST`/`PUT` only).
//! 2. `Date` is set to the signing time.
//! 3. The canonical string is built and `Authorization` is set to
//!    `APIAuth <identity>:Base64(HMAC-SHA1(secret, canonical))`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use http::HeaderValue;
use http::header::{AUTHORIZATION, DATE};
use sha1::Sha1;
use tracing::debug;

use crate::CONTENT_MD5;
use crate::body::SignableBody;
use crate::canonical::canonical_string;
use crate::checksum::{carries_checksum, request_checksum};
use crate::clock::format_http_date;
use crate::error::AuthError;
use crate::header::format_authorization;

type HmacSha1 = Hmac<Sha1>;

/// Compute the signature: Base64(HMAC-SHA1(secret, canonical)).
///
/// # Examples
///
/// ```
/// use apiauth::compute_signature;
///
/// let sig = compute_signature("secret", "GET,,,/,Mon, 02 Jan 2006 15:04:05 GMT");
/// assert_eq!(sig.len(), 28);
/// ```
#[must_use]
pub fn compute_signature(secret_key: &str, canonical: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(secret_key.as_bytes()).expect("HMAC can accept any key length");
    mac.update(canonical.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Sign a request with the current time.
///
/// `identity` must not contain a space or `:`. Such an identity is signed
/// without complaint, but the resulting `Authorization` header never parses
/// on the verifying side and always fails with
/// [`AuthError::MalformedAuthHeader`].
///
/// # Errors
///
/// Returns [`AuthError::BodyRead`] if the body cannot be read, or
/// [`AuthError::InvalidHeaderValue`] if `identity` cannot appear in a header.
pub fn sign<B: SignableBody>(
    request: &mut http::Request<B>,
    identity: &str,
    secret_key: &str,
) -> Result<(), AuthError> {
    sign_at(request, identity, secret_key, Utc::now())
}

/// Sign a request as of `now`.
///
/// The body is read to compute the checksum and remains readable afterwards.
/// On error the request headers are left untouched.
///
/// # Errors
///
/// Same as [`sign`].
pub fn sign_at<B: SignableBody>(
    request: &mut http::Request<B>,
    identity: &str,
    secret_key: &str,
    now: DateTime<Utc>,
) -> Result<(), AuthError> {
    // The signature is base64, so the identity decides whether the header is valid.
    HeaderValue::from_str(&format_authorization(identity, ""))?;

    let checksum = if carries_checksum(request.method()) {
        Some(HeaderValue::from_str(&request_checksum(request)?)?)
    } else {
        None
    };
    let date = HeaderValue::from_str(&format_http_date(now))?;

    let headers = request.headers_mut();
    match checksum {
        Some(checksum) => headers.insert(CONTENT_MD5, checksum),
        None => headers.remove(CONTENT_MD5),
    };
    headers.insert(DATE, date);

    let canonical = canonical_string(request);
    debug!(identity, canonical, "Built canonical string for signing");

    let signature = compute_signature(secret_key, &canonical);
    let authorization = HeaderValue::from_str(&format_authorization(identity, &signature))?;
    request.headers_mut().insert(AUTHORIZATION, authorization);

    debug!(identity, method = %request.method(), "Signed request");
    Ok(())
}
