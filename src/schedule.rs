//! Due-date projection from assignee ETAs.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::Serializer;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Projects a due instant `eta_days` after `now`, at millisecond precision.
/// Sub-millisecond remainders are dropped.
///
/// Returns `None` when there is no ETA, or when the ETA is not finite or
/// lands outside the representable date range.
pub fn project_due(now: DateTime<Utc>, eta_days: Option<f64>) -> Option<DateTime<Utc>> {
    let days = eta_days?;
    if !days.is_finite() {
        return None;
    }
    let millis = (days * MILLIS_PER_DAY).trunc();
    if millis.abs() >= i64::MAX as f64 {
        return None;
    }
    let delta = TimeDelta::try_milliseconds(millis as i64)?;
    now.checked_add_signed(delta)
}

/// ISO-8601 UTC instant with milliseconds and a `Z` suffix.
pub fn format_instant(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn serialize_instant<S: Serializer>(
    at: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match at {
        Some(at) => serializer.serialize_str(&format_instant(at)),
        None => serializer.serialize_none(),
    }
}
