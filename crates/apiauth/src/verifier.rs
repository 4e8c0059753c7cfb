//! Server-side request verification.
//!
//! [`Verifier::authenticate`] runs a fixed pipeline. Each stage either passes
//! the request on or ends verification with an error; nothing is retried and
//! no stage is revisited.
//!
//! 1. Freshness: the `Date` header must parse and lie within the window of
//!    [`AuthConfig`].
//! 2. Header parsing: `Authorization` must be `SCHEME identity:signature`.
//! 3. Content integrity: the recomputed body checksum must equal `Content-Md5`.
//! 4. Identity resolution: the injected [`SecretResolver`] supplies the secret.
//! 5. Signature comparison: the recomputed signature must equal the claimed one
//!    (constant-time comparison).
//!
//! On success the resolver's result is returned unchanged.

use chrono::{DateTime, Utc};
use http::header::DATE;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::CONTENT_MD5;
use crate::body::SignableBody;
use crate::canonical::{canonical_string, header_value};
use crate::checksum::request_checksum;
use crate::clock::{Clock, SystemClock, parse_http_date};
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::header::authorization_from_headers;
use crate::resolver::SecretResolver;
use crate::signer::compute_signature;

/// Verifies signed requests against a freshness window and a time source.
///
/// # Examples
///
/// ```
/// use apiauth::{AuthConfig, StaticSecretResolver, Verifier, sign};
///
/// let mut request = http::Request::builder()
///     .method("GET")
///     .uri("/api/v1/lists.json")
///     .body(())
///     .unwrap();
/// sign(&mut request, "client", "secret").unwrap();
///
/// let verifier = Verifier::new(AuthConfig::default());
/// let resolver = StaticSecretResolver::new(vec![("client".to_owned(), "secret".to_owned())]);
/// assert_eq!(verifier.authenticate(&mut request, &resolver).unwrap(), "client");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Verifier<C = SystemClock> {
    config: AuthConfig,
    clock: C,
}

impl Verifier<SystemClock> {
    /// Create a verifier that reads the wall clock.
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> Verifier<C> {
    /// Create a verifier reading time from `clock`.
    pub fn with_clock(config: AuthConfig, clock: C) -> Self {
        Self { config, clock }
    }

    /// The freshness window in use.
    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Authenticate a signed request.
    ///
    /// The body is read for the checksum check and stays readable for the
    /// handler that runs afterwards.
    ///
    /// # Errors
    ///
    /// - [`AuthError::RequestExpired`] if `Date` is missing, unparsable, or stale
    /// - [`AuthError::MalformedAuthHeader`] if `Authorization` has the wrong shape
    /// - [`AuthError::BodyRead`] if the body cannot be read
    /// - [`AuthError::ChecksumMismatch`] if the body does not match `Content-Md5`
    /// - [`AuthError::Resolver`] carrying the resolver's own error
    /// - [`AuthError::SignatureMismatch`] if the signature does not match
    pub fn authenticate<B, R>(
        &self,
        request: &mut http::Request<B>,
        resolver: &R,
    ) -> Result<R::Output, AuthError>
    where
        B: SignableBody,
        R: SecretResolver<B> + ?Sized,
    {
        let date = header_value(request.headers(), DATE.as_str());
        check_freshness(&date, self.clock.now(), &self.config)?;

        let (identity, claimed_signature) = {
            let parsed = authorization_from_headers(request.headers()).inspect_err(|_| {
                debug!("Rejected request with malformed Authorization header");
            })?;
            (parsed.identity.to_owned(), parsed.signature.to_owned())
        };

        debug!(identity = %identity, method = %request.method(), "Verifying request signature");

        let computed_md5 = request_checksum(request)?;
        if computed_md5.as_bytes() != header_value(request.headers(), CONTENT_MD5).as_bytes() {
            debug!(identity = %identity, "Content-Md5 mismatch");
            return Err(AuthError::ChecksumMismatch);
        }

        let resolution = resolver
            .resolve(&identity, request)
            .map_err(AuthError::resolver)
            .inspect_err(|err| {
                debug!(identity = %identity, error = %err, "Identity resolution failed");
            })?;

        let canonical = canonical_string(request);
        debug!(canonical, "Built canonical string for verification");

        let expected_signature = compute_signature(resolution.secret_key.expose(), &canonical);

        if claimed_signature
            .as_bytes()
            .ct_eq(expected_signature.as_bytes())
            .into()
        {
            debug!(identity = %identity, "Signature verification succeeded");
            Ok(resolution.result)
        } else {
            debug!(identity = %identity, "Signature mismatch");
            Err(AuthError::SignatureMismatch)
        }
    }
}

/// Authenticate a signed request with the default window and the wall clock.
///
/// # Errors
///
/// See [`Verifier::authenticate`].
pub fn authenticate<B, R>(
    request: &mut http::Request<B>,
    resolver: &R,
) -> Result<R::Output, AuthError>
where
    B: SignableBody,
    R: SecretResolver<B> + ?Sized,
{
    Verifier::new(AuthConfig::default()).authenticate(request, resolver)
}

/// Check that a `Date` header value lies within the freshness window at `now`.
///
/// # Errors
///
/// Returns [`AuthError::RequestExpired`] if the value does not parse or falls
/// outside the window.
pub fn check_freshness(
    date: &str,
    now: DateTime<Utc>,
    config: &AuthConfig,
) -> Result<(), AuthError> {
    let Some(sent_at) = parse_http_date(date) else {
        debug!(date, "Unparsable Date header");
        return Err(AuthError::RequestExpired);
    };

    let elapsed = now.signed_duration_since(sent_at);
    if config.is_fresh(elapsed) {
        Ok(())
    } else {
        debug!(
            date,
            elapsed_secs = elapsed.num_seconds(),
            "Request outside freshness window"
        );
        Err(AuthError::RequestExpired)
    }
}
