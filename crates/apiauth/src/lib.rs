//! Shared-secret HMAC-SHA1 request authentication for HTTP APIs.
//!
//! A client signs a request by computing a canonical string over its
//! security-relevant fields and attaching an HMAC-SHA1 signature keyed by a
//! secret shared with the server. The server re-derives the canonical string,
//! checks the request is fresh and its body intact, resolves the secret for the
//! claimed identity, and compares signatures.
//!
//! # Overview
//!
//! The signer writes three headers:
//!
//! ```text
//! Content-Md5:   base64(MD5(body))            (POST and PUT only)
//! Date:          Mon, 02 Jan 2006 15:04:05 GMT
//! Authorization: APIAuth <identity>:base64(HMAC-SHA1(secret, canonical))
//! ```
//!
//! where the canonical string is
//!
//! ```text
//! method,content-type,content-md5,request-target,date
//! ```
//!
//! # Usage
//!
//! ```rust
//! use apiauth::{StaticSecretResolver, authenticate, sign};
//! use bytes::Bytes;
//!
//! let mut request = http::Request::builder()
//!     .method("POST")
//!     .uri("http://localhost:8080/api/v1/lists/create.json")
//!     .header("content-type", "application/json")
//!     .body(Bytes::from_static(br#"{"currency":"INR","amount":"1"}"#))
//!     .unwrap();
//!
//! sign(&mut request, "myclientid", "mysecretkey").unwrap();
//!
//! let resolver = StaticSecretResolver::new(vec![(
//!     "myclientid".to_owned(),
//!     "mysecretkey".to_owned(),
//! )]);
//! let identity = authenticate(&mut request, &resolver).unwrap();
//! assert_eq!(identity, "myclientid");
//! ```
//!
//! # Modules
//!
//! - [`body`] - Request bodies that can be read for hashing and read again
//! - [`canonical`] - Canonical string construction
//! - [`checksum`] - `Content-Md5` computation
//! - [`clock`] - HTTP date handling and the time source used for freshness
//! - [`config`] - Verification window configuration
//! - [`error`] - Authentication error types
//! - [`header`] - `Authorization` header formatting and parsing
//! - [`resolver`] - Identity to secret resolution strategies
//! - [`signer`] - Client-side request signing
//! - [`verifier`] - Server-side request verification

pub mod body;
pub mod canonical;
pub mod checksum;
pub mod clock;
pub mod config;
pub mod error;
pub mod header;
pub mod resolver;
pub mod signer;
pub mod verifier;

pub use body::{BufferedBody, SignableBody};
pub use canonical::canonical_string;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AuthConfig;
pub use error::{AuthError, BoxError};
pub use resolver::{Resolution, SecretKey, SecretResolver, StaticSecretResolver};
pub use signer::{compute_signature, sign, sign_at};
pub use verifier::{Verifier, authenticate};

/// Scheme token that prefixes every `Authorization` header value.
pub const AUTH_SCHEME: &str = "APIAuth";

/// Header carrying the base64 MD5 of the request body.
pub const CONTENT_MD5: &str = "content-md5";
