//! `Content-Md5` computation.
//!
//! Only body-bearing methods (`POST` and `PUT`) carry a checksum. For every
//! other method the checksum is the empty string, on both the signing and the
//! verifying side, so those requests compare two empty values.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use digest::Digest;
use http::Method;

use crate::body::SignableBody;
use crate::error::AuthError;

/// Whether requests with this method get a body checksum.
#[must_use]
pub fn carries_checksum(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT
}

/// Compute the base64-encoded MD5 digest of `data`.
///
/// # Examples
///
/// ```
/// use apiauth::checksum::content_md5;
///
/// assert_eq!(content_md5(b""), "1B2M2Y8AsgTpgAmY7PhCfg==");
/// ```
#[must_use]
pub fn content_md5(data: &[u8]) -> String {
    BASE64.encode(md5::Md5::digest(data))
}

/// Compute the checksum the request should carry.
///
/// Returns an empty string for methods other than `POST` and `PUT` without
/// touching the body. For body-bearing methods the body is read through
/// [`SignableBody::payload`], which leaves it readable afterwards.
///
/// # Errors
///
/// Returns [`AuthError::BodyRead`] if the body cannot be read.
pub fn request_checksum<B: SignableBody>(
    request: &mut http::Request<B>,
) -> Result<String, AuthError> {
    if !carries_checksum(request.method()) {
        return Ok(String::new());
    }
    let payload = request.body_mut().payload()?;
    Ok(content_md5(&payload))
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[test]
    fn test_should_only_checksum_post_and_put() {
        assert!(carries_checksum(&Method::POST));
        assert!(carries_checksum(&Method::PUT));
        assert!(!carries_checksum(&Method::GET));
        assert!(!carries_checksum(&Method::DELETE));
        assert!(!carries_checksum(&Method::PATCH));
        assert!(!carries_checksum(&Method::HEAD));
    }

    #[test]
    fn test_should_compute_known_md5_digests() {
        assert_eq!(content_md5(b"hello"), "XUFAKrxLKna5cZ2REBfFkg==");
        assert_eq!(content_md5(br#"{"a":1}"#), content_md5(br#"{"a":1}"#));
        assert_ne!(content_md5(br#"{"a":1}"#), content_md5(br#"{"a":2}"#));
    }

    #[test]
    fn test_should_return_empty_checksum_for_get_even_with_body() {
        let mut request = http::Request::builder()
            .method("GET")
            .uri("/api/v1/lists.json")
            .body(Bytes::from_static(b"ignored"))
            .unwrap();

        assert_eq!(request_checksum(&mut request).unwrap(), "");
    }

    #[test]
    fn test_should_checksum_post_body_and_keep_it() {
        let mut request = http::Request::builder()
            .method("POST")
            .uri("/api/v1/lists/create.json")
            .body(Bytes::from_static(b"hello"))
            .unwrap();

        assert_eq!(
            request_checksum(&mut request).unwrap(),
            "XUFAKrxLKna5cZ2REBfFkg=="
        );
        assert_eq!(request.body(), &Bytes::from_static(b"hello"));
    }

    #[test]
    fn test_should_checksum_empty_put_body() {
        let mut request = http::Request::builder()
            .method("PUT")
            .uri("/items/1")
            .body(())
            .unwrap();

        assert_eq!(
            request_checksum(&mut request).unwrap(),
            "1B2M2Y8AsgTpgAmY7PhCfg=="
        );
    }
}
