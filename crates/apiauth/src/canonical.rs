//! Canonical string construction.
//!
//! The canonical string is what actually gets signed:
//!
//! ```text
//! HTTP-Verb + "," +
//! Content-Type + "," +
//! Content-Md5 + "," +
//! Request-Target + "," +
//! Date
//! ```
//!
//! Missing headers contribute an empty field. Field values are not escaped, so a
//! comma inside a value shifts field boundaries without raising an error. This
//! matches the wire format existing clients already sign, and is kept as-is.

use std::borrow::Cow;

use http::header::{CONTENT_TYPE, DATE};

use crate::CONTENT_MD5;

/// Separator between canonical string fields.
const DELIMITER: char = ',';

/// Build the canonical string from its five components.
///
/// # Examples
///
/// ```
/// use apiauth::canonical::build_canonical_string;
///
/// let canonical = build_canonical_string(
///     "GET",
///     "",
///     "",
///     "/api/v1/lists.json",
///     "Mon, 02 Jan 2006 15:04:05 GMT",
/// );
/// assert_eq!(canonical, "GET,,,/api/v1/lists.json,Mon, 02 Jan 2006 15:04:05 GMT");
/// ```
#[must_use]
pub fn build_canonical_string(
    method: &str,
    content_type: &str,
    content_md5: &str,
    request_target: &str,
    date: &str,
) -> String {
    let mut canonical = String::with_capacity(
        method.len()
            + content_type.len()
            + content_md5.len()
            + request_target.len()
            + date.len()
            + 4,
    );
    for (i, field) in [method, content_type, content_md5, request_target, date]
        .into_iter()
        .enumerate()
    {
        if i > 0 {
            canonical.push(DELIMITER);
        }
        canonical.push_str(field);
    }
    canonical
}

/// Build the canonical string for a request.
///
/// This is a pure function of the request's method, `Content-Type`,
/// `Content-Md5`, request target, and `Date`.
#[must_use]
pub fn canonical_string<B>(request: &http::Request<B>) -> String {
    build_canonical_string(
        request.method().as_str(),
        &header_value(request.headers(), CONTENT_TYPE.as_str()),
        &header_value(request.headers(), CONTENT_MD5),
        &request_target(request.uri()),
        &header_value(request.headers(), DATE.as_str()),
    )
}

/// The request target as transmitted on the request line: path plus query.
///
/// An empty path is sent as `/`.
#[must_use]
pub fn request_target(uri: &http::Uri) -> String {
    let path = match uri.path() {
        "" => "/",
        path => path,
    };
    match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_owned(),
    }
}

/// Extract the first value of a header, or an empty string if it is absent.
pub(crate) fn header_value<'a>(headers: &'a http::HeaderMap, name: &str) -> Cow<'a, str> {
    headers
        .get(name)
        .map_or(Cow::Borrowed(""), |v| String::from_utf8_lossy(v.as_bytes()))
}
