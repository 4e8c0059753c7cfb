//! `Authorization` header formatting and parsing.
//!
//! The header has the format:
//!
//! ```text
//! APIAuth <identity>:<signature>
//! ```
//!
//! Parsing is purely structural: the value must split on `' '` into exactly two
//! tokens, and the second must split on `':'` into exactly two tokens. Any other
//! shape is [`AuthError::MalformedAuthHeader`]. The scheme token itself is not
//! compared; a request carrying another scheme simply fails signature checks.

use crate::AUTH_SCHEME;
use crate::error::AuthError;

/// Borrowed components of an `Authorization` header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedAuthorization<'a> {
    /// The scheme token (normally `APIAuth`).
    pub scheme: &'a str,
    /// The claimed identity (access id).
    pub identity: &'a str,
    /// The claimed base64 signature.
    pub signature: &'a str,
}

/// Format an `Authorization` header value.
///
/// # Examples
///
/// ```
/// use apiauth::header::format_authorization;
///
/// assert_eq!(format_authorization("client", "c2ln"), "APIAuth client:c2ln");
/// ```
#[must_use]
pub fn format_authorization(identity: &str, signature: &str) -> String {
    format!("{AUTH_SCHEME} {identity}:{signature}")
}

/// Parse an `Authorization` header value.
///
/// # Errors
///
/// Returns [`AuthError::MalformedAuthHeader`] if the value does not have
/// exactly two space-separated tokens, the second holding exactly two
/// colon-separated tokens.
pub fn parse_authorization(value: &str) -> Result<ParsedAuthorization<'_>, AuthError> {
    let (scheme, credentials) = split_exactly_two(value, ' ')?;
    let (identity, signature) = split_exactly_two(credentials, ':')?;
    Ok(ParsedAuthorization {
        scheme,
        identity,
        signature,
    })
}

/// Parse the `Authorization` header of a request.
///
/// A missing or non-UTF-8 header is [`AuthError::MalformedAuthHeader`].
pub fn authorization_from_headers(
    headers: &http::HeaderMap,
) -> Result<ParsedAuthorization<'_>, AuthError> {
    let value = headers
        .get(http::header::AUTHORIZATION)
        .ok_or(AuthError::MalformedAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedAuthHeader)?;
    parse_authorization(value)
}

fn split_exactly_two(value: &str, separator: char) -> Result<(&str, &str), AuthError> {
    let mut tokens = value.split(separator);
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(first), Some(second), None) => Ok((first, second)),
        _ => Err(AuthError::MalformedAuthHeader),
    }
}
