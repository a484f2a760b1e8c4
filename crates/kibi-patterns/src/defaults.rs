//! Default name for each interval

use kibi_core::Interval;

/// Name offered when no interval applies
pub const DEFAULT_PLACEHOLDER: &str = "logstash-*";

/// Canonical template for `interval`; `None` yields the plain wildcard.
pub fn pattern_default(interval: Option<Interval>) -> &'static str {
    match interval {
        Some(Interval::Hours) => "[logstash-]YYYY.MM.DD.HH",
        Some(Interval::Days) => "[logstash-]YYYY.MM.DD",
        Some(Interval::Weeks) => "[logstash-]GGGG.WW",
        Some(Interval::Months) => "[logstash-]YYYY.MM",
        Some(Interval::Years) => "[logstash-]YYYY",
        None => DEFAULT_PLACEHOLDER,
    }
}

/// Whether `name` is still the untouched default for `interval`
pub fn is_pattern_default(name: &str, interval: Option<Interval>) -> bool {
    name == pattern_default(interval)
}
