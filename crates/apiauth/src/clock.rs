//! HTTP dates and the time source used for freshness checks.
//!
//! The `Date` header is always written in RFC 1123 form in GMT:
//!
//! ```text
//! Mon, 02 Jan 2006 15:04:05 GMT
//! ```
//!
//! Time is read through the [`Clock`] trait so verification can be pinned to a
//! known instant in tests.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};

/// RFC 1123 layout with the zone written literally.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Same layout with the `UTC` zone name, accepted when parsing.
const HTTP_DATE_FORMAT_UTC: &str = "%a, %d %b %Y %H:%M:%S UTC";

/// Length of a fixed-width RFC 1123 date, e.g. `Mon, 02 Jan 2006 15:04:05 GMT`.
const HTTP_DATE_LEN: usize = 29;

/// A source of the current time.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a single instant.
///
/// # Examples
///
/// ```
/// use apiauth::clock::{Clock, FixedClock, parse_http_date};
///
/// let instant = parse_http_date("Mon, 02 Jan 2006 15:04:05 GMT").unwrap();
/// let clock = FixedClock::new(instant);
/// assert_eq!(clock.now(), instant);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Create a clock that always reports `instant`.
    #[must_use]
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Format an instant as an HTTP `Date` header value.
///
/// Sub-second precision is dropped.
///
/// # Examples
///
/// ```
/// use apiauth::clock::{format_http_date, parse_http_date};
///
/// let instant = parse_http_date("Mon, 02 Jan 2006 15:04:05 GMT").unwrap();
/// assert_eq!(format_http_date(instant), "Mon, 02 Jan 2006 15:04:05 GMT");
/// ```
#[must_use]
pub fn format_http_date(instant: DateTime<Utc>) -> String {
    instant.trunc_subsecs(0).format(HTTP_DATE_FORMAT).to_string()
}

/// Parse an HTTP `Date` header value.
///
/// Returns `None` when the value is not in RFC 1123 form with a `GMT` (or
/// `UTC`) zone. Every field is fixed width: two-digit day and time fields,
/// three-letter weekday and month.
#[must_use]
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    // chrono accepts unpadded numbers, full names and extra spaces; the wire
    // form does not, so the value must re-format to itself.
    if value.len() != HTTP_DATE_LEN {
        return None;
    }
    let parsed = NaiveDateTime::parse_from_str(value, HTTP_DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, HTTP_DATE_FORMAT_UTC))
        .ok()?
        .and_utc();
    let zone_start = HTTP_DATE_LEN - 3;
    (format_http_date(parsed).get(..zone_start) == value.get(..zone_start)).then_some(parsed)
}
