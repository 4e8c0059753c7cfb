//! Error types for request signing and verification.
//!
//! Every failure of the verification pipeline is represented by [`AuthError`].
//! Each stage is terminal: the first failing check decides the error, and no
//! partial authentication is ever returned.
//!
//! HTTP callers are expected to map all of these to one generic unauthorized
//! response so the failing stage is not revealed to the client.

/// Boxed error type used to carry resolver failures through unchanged.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while signing or authenticating a request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The `Date` header is missing, unparsable, or outside the allowed window.
    #[error("Request too old")]
    RequestExpired,

    /// The `Authorization` header is missing or not of the form `SCHEME id:sig`.
    #[error("Malformed Auth Header")]
    MalformedAuthHeader,

    /// The recomputed body checksum differs from the `Content-Md5` header.
    #[error("MD5 mismatch occurred")]
    ChecksumMismatch,

    /// The recomputed signature differs from the one claimed by the client.
    ///
    /// A wrong secret and a tampered request are indistinguishable here.
    #[error("Signature Mismatch occurred")]
    SignatureMismatch,

    /// The request body could not be read for checksum computation.
    #[error("failed to read request body: {0}")]
    BodyRead(#[from] std::io::Error),

    /// A value the signer must write is not a legal header value (for example
    /// an identity containing a newline).
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    /// The identity resolver failed; the resolver's own error is kept as-is.
    #[error(transparent)]
    Resolver(BoxError),
}

impl AuthError {
    /// Wrap a resolver failure without altering it.
    pub fn resolver(err: impl Into<BoxError>) -> Self {
        Self::Resolver(err.into())
    }

    /// Downcast a passed-through resolver error to its concrete type.
    ///
    /// Returns `None` for every other variant, or when the resolver error is
    /// of a different type.
    #[must_use]
    pub fn resolver_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Resolver(err) => err.downcast_ref::<E>(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("unknown access id: {0}")]
    struct UnknownAccessId(String);

    #[test]
    fn test_should_pass_resolver_error_through_unchanged() {
        let err = AuthError::resolver(UnknownAccessId("ghost".to_owned()));

        assert_eq!(err.to_string(), "unknown access id: ghost");
        let inner = err.resolver_error::<UnknownAccessId>().unwrap();
        assert_eq!(inner.0, "ghost");
    }

    #[test]
    fn test_should_not_downcast_non_resolver_errors() {
        let err = AuthError::SignatureMismatch;
        assert!(err.resolver_error::<UnknownAccessId>().is_none());
    }

    #[test]
    fn test_should_wrap_io_error_as_body_read() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        let err: AuthError = io.into();
        assert!(matches!(err, AuthError::BodyRead(_)));
    }
}
