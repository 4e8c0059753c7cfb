//! Verification window configuration.
//!
//! Provides [`AuthConfig`], which bounds how old (or how far in the future) a
//! request's `Date` may be. The defaults reproduce the protocol's fixed window:
//! up to 900 seconds old, with 30 seconds of clock skew tolerated on both edges.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Default tolerance for out-of-sync clocks, in seconds.
pub const DEFAULT_MAX_CLOCK_SKEW_SECS: u64 = 30;

/// Default maximum request age, in seconds.
pub const DEFAULT_MAX_REQUEST_AGE_SECS: u64 = 900;

/// Freshness window used by the verifier.
///
/// A request is accepted when `-skew <= now - date <= max_age + skew`.
///
/// # Examples
///
/// ```
/// use apiauth::config::AuthConfig;
///
/// let config = AuthConfig::default();
/// assert_eq!(config.max_clock_skew_secs, 30);
/// assert_eq!(config.max_request_age_secs, 900);
///
/// let strict = AuthConfig::builder().max_request_age_secs(60).build();
/// assert_eq!(strict.max_clock_skew_secs, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// Clock skew tolerated in either direction, in seconds.
    #[builder(default = DEFAULT_MAX_CLOCK_SKEW_SECS)]
    pub max_clock_skew_secs: u64,

    /// Maximum age of a request before it is considered replayed, in seconds.
    #[builder(default = DEFAULT_MAX_REQUEST_AGE_SECS)]
    pub max_request_age_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            max_clock_skew_secs: DEFAULT_MAX_CLOCK_SKEW_SECS,
            max_request_age_secs: DEFAULT_MAX_REQUEST_AGE_SECS,
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `APIAUTH_MAX_CLOCK_SKEW` | `30` |
    /// | `APIAUTH_MAX_REQUEST_AGE` | `900` |
    ///
    /// Values that do not parse as whole seconds are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("APIAUTH_MAX_CLOCK_SKEW") {
            if let Ok(n) = v.parse::<u64>() {
                config.max_clock_skew_secs = n;
            }
        }
        if let Ok(v) = std::env::var("APIAUTH_MAX_REQUEST_AGE") {
            if let Ok(n) = v.parse::<u64>() {
                config.max_request_age_secs = n;
            }
        }

        config
    }

    /// Whether a request whose `Date` lies `elapsed` in the past is fresh.
    ///
    /// A negative `elapsed` means the `Date` lies in the future.
    #[must_use]
    pub fn is_fresh(&self, elapsed: TimeDelta) -> bool {
        let skew = secs(self.max_clock_skew_secs);
        let max_age = secs(self.max_request_age_secs);
        let upper = max_age.checked_add(&skew).unwrap_or(TimeDelta::MAX);
        elapsed >= -skew && elapsed <= upper
    }
}

fn secs(value: u64) -> TimeDelta {
    TimeDelta::try_seconds(i64::try_from(value).unwrap_or(i64::MAX)).unwrap_or(TimeDelta::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.max_clock_skew_secs, 30);
        assert_eq!(config.max_request_age_secs, 900);
        assert_eq!(config, AuthConfig::builder().build());
    }

    #[test]
    fn test_should_accept_window_edges() {
        let config = AuthConfig::default();
        assert!(config.is_fresh(TimeDelta::zero()));
        assert!(config.is_fresh(TimeDelta::seconds(930)));
        assert!(config.is_fresh(TimeDelta::seconds(-30)));
    }

    #[test]
    fn test_should_reject_outside_window() {
        let config = AuthConfig::default();
        assert!(!config.is_fresh(TimeDelta::seconds(930) + TimeDelta::milliseconds(1)));
        assert!(!config.is_fresh(TimeDelta::seconds(-30) - TimeDelta::milliseconds(1)));
        assert!(!config.is_fresh(TimeDelta::days(365)));
    }

    #[test]
    fn test_should_honor_custom_window() {
        let config = AuthConfig::builder()
            .max_clock_skew_secs(0)
            .max_request_age_secs(10)
            .build();
        assert!(config.is_fresh(TimeDelta::seconds(10)));
        assert!(!config.is_fresh(TimeDelta::seconds(11)));
        assert!(!config.is_fresh(TimeDelta::seconds(-1)));
    }

    #[test]
    fn test_should_saturate_huge_window() {
        let config = AuthConfig::builder()
            .max_clock_skew_secs(u64::MAX)
            .max_request_age_secs(0)
            .build();
        assert!(config.is_fresh(TimeDelta::days(10_000)));
    }

    #[test]
    fn test_should_deserialize_camel_case() {
        let config: AuthConfig =
            serde_json::from_str(r#"{"maxClockSkewSecs":5,"maxRequestAgeSecs":60}"#).unwrap();
        assert_eq!(config.max_clock_skew_secs, 5);
        assert_eq!(config.max_request_age_secs, 60);
    }
}
