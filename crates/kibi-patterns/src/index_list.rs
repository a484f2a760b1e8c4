//! Sample index names around a point in time

use chrono::{DateTime, Utc};
use kibi_core::Interval;

use crate::{IntervalTemplate, PatternError, PatternResult};

/// Names `template` produces for every `interval` step from `now + from` to
/// `now + to`, both bounds floored to their partition and included.
pub fn to_index_list(
    template: &IntervalTemplate,
    interval: Interval,
    from: i64,
    to: i64,
    now: DateTime<Utc>,
) -> PatternResult<Vec<String>> {
    let bound = |steps: i64| {
        interval
            .offset(now, steps)
            .map(|dt| interval.start_of(dt))
            .ok_or(PatternError::OutOfRange(steps))
    };
    let mut current = bound(from)?;
    let end = bound(to)?;

    let mut names = Vec::new();
    while current <= end {
        names.push(template.format(current));
        current = interval
            .offset(current, 1)
            .ok_or(PatternError::OutOfRange(1))?;
    }

    tracing::trace!(
        template = %template.source(),
        interval = %interval,
        count = names.len(),
        "generated index list"
    );
    Ok(names)
}
