//! Time related utils.

use chrono::Utc;

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into http date: `Sun, 06 Nov 1994 08:49:37 GMT`
///
/// ## Note
///
/// HTTP date is slightly different from RFC2822.
///
/// - Timezone is fixed to GMT.
/// - Day must be 2 digit.
pub fn format_http_date(t: DateTime) -> String {
    t.format("%a, %d %b %Y %T GMT").to_string()
}

/// Parse time from http date like `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn parse_http_date(s: &str) -> crate::Result<DateTime> {
    chrono::DateTime::parse_from_rfc2822(s)
        .map(|v| v.with_timezone(&Utc))
        .map_err(|e| crate::Error::unexpected(format!("invalid http date: {s}")).with_source(e))
}
