//! Identity to secret resolution.
//!
//! The verifier never stores secrets. For every request it asks a
//! [`SecretResolver`] supplied by the hosting service for the secret belonging
//! to the claimed identity. The resolver may also hand back an
//! application-defined result (an account record, a tenant id, ...), which is
//! returned unchanged when authentication succeeds.
//!
//! Any `Fn(&str, &http::Request<B>) -> Result<Resolution<T>, E>` closure is a
//! resolver. [`StaticSecretResolver`] covers fixed in-memory credentials.

use std::collections::HashMap;
use std::fmt;

use crate::error::BoxError;

/// An opaque shared secret. Its `Debug` output never shows the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
    /// Wrap a secret value.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The secret value, for keying the HMAC.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

impl From<String> for SecretKey {
    fn from(secret: String) -> Self {
        Self(secret)
    }
}

impl From<&str> for SecretKey {
    fn from(secret: &str) -> Self {
        Self(secret.to_owned())
    }
}

/// What a resolver returns for a known identity.
#[derive(Debug, Clone)]
pub struct Resolution<T> {
    /// The secret shared with the client.
    pub secret_key: SecretKey,
    /// Application-defined payload returned on successful authentication.
    pub result: T,
}

impl<T> Resolution<T> {
    /// Pair a secret with an application result.
    pub fn new(secret_key: impl Into<SecretKey>, result: T) -> Self {
        Self {
            secret_key: secret_key.into(),
            result,
        }
    }
}

/// Strategy for looking up the secret of a claimed identity.
///
/// Implementations may consult a database, a configuration file, or any other
/// store, and may inspect the request (for example to scope keys per route).
/// Errors are passed through the verifier untouched.
pub trait SecretResolver<B> {
    /// Application result returned when authentication succeeds.
    type Output;
    /// Resolver-defined failure.
    type Error: Into<BoxError>;

    /// Resolve the secret for `identity`.
    fn resolve(
        &self,
        identity: &str,
        request: &http::Request<B>,
    ) -> Result<Resolution<Self::Output>, Self::Error>;
}

impl<B, F, T, E> SecretResolver<B> for F
where
    F: Fn(&str, &http::Request<B>) -> Result<Resolution<T>, E>,
    E: Into<BoxError>,
{
    type Output = T;
    type Error = E;

    fn resolve(&self, identity: &str, request: &http::Request<B>) -> Result<Resolution<T>, E> {
        self(identity, request)
    }
}

/// The identity is not known to a [`StaticSecretResolver`].
#[derive(Debug, thiserror::Error)]
#[error("unknown access id: {0}")]
pub struct UnknownIdentity(pub String);

/// A simple in-memory resolver backed by a `HashMap`.
///
/// Resolves to the identity itself as the application result.
///
/// # Examples
///
/// ```
/// use apiauth::resolver::{SecretResolver, StaticSecretResolver};
///
/// let resolver = StaticSecretResolver::new(vec![
///     ("myclientid".to_owned(), "mysecretkey".to_owned()),
/// ]);
///
/// let request = http::Request::new(());
/// let resolution = resolver.resolve("myclientid", &request).unwrap();
/// assert_eq!(resolution.secret_key.expose(), "mysecretkey");
/// assert_eq!(resolution.result, "myclientid");
/// ```
#[derive(Clone, Default)]
pub struct StaticSecretResolver {
    secrets: HashMap<String, SecretKey>,
}

impl StaticSecretResolver {
    /// Create a resolver from `(identity, secret)` pairs.
    pub fn new(secrets: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            secrets: secrets
                .into_iter()
                .map(|(identity, secret)| (identity, SecretKey::from(secret)))
                .collect(),
        }
    }

    /// Number of configured identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// Whether no identities are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl fmt::Debug for StaticSecretResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticSecretResolver")
            .field("identities", &self.secrets.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<B> SecretResolver<B> for StaticSecretResolver {
    type Output = String;
    type Error = UnknownIdentity;

    fn resolve(
        &self,
        identity: &str,
        _request: &http::Request<B>,
    ) -> Result<Resolution<String>, UnknownIdentity> {
        self.secrets
            .get(identity)
            .map(|secret| Resolution::new(secret.clone(), identity.to_owned()))
            .ok_or_else(|| UnknownIdentity(identity.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;

    #[test]
    fn test_should_return_secret_key_for_known_identity() {
        let resolver =
            StaticSecretResolver::new(vec![("client".to_owned(), "secret".to_owned())]);
        let request = http::Request::new(());

        let resolution = resolver.resolve("client", &request).unwrap();
        assert_eq!(resolution.secret_key, SecretKey::from("secret"));
        assert_eq!(resolution.result, "client");
        assert_eq!(resolver.len(), 1);
    }

    #[test]
    fn test_should_return_error_for_unknown_identity() {
        let resolver = StaticSecretResolver::default();
        let request = http::Request::new(());

        let err = resolver.resolve("ghost", &request).unwrap_err();
        assert_eq!(err.0, "ghost");
        assert!(resolver.is_empty());
    }

    #[test]
    fn test_should_use_closure_as_resolver() {
        let resolver = |identity: &str, request: &http::Request<()>| {
            Ok::<_, Infallible>(Resolution::new(
                "secret_key",
                format!("{identity} {}", request.uri().path()),
            ))
        };
        let request = http::Request::builder().uri("/orders").body(()).unwrap();

        let resolution = resolver.resolve("client", &request).unwrap();
        assert_eq!(resolution.secret_key.expose(), "secret_key");
        assert_eq!(resolution.result, "client /orders");
    }

    #[test]
    fn test_should_redact_secret_in_debug_output() {
        let resolver =
            StaticSecretResolver::new(vec![("client".to_owned(), "hunter2".to_owned())]);
        let rendered = format!("{resolver:?} {:?}", SecretKey::from("hunter2"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("client"));
    }
}
