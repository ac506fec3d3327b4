//! Value conversion at the framework boundary.
//!
//! Date widgets report epoch milliseconds in the embedder's local time,
//! while the model stores an absolute instant pinned to midnight UTC of
//! the same calendar date. Conversion happens on the outbound path only;
//! inbound values are written to the scope untouched.

use serde_json::Value;
use time::{OffsetDateTime, UtcOffset};

use crate::descriptor::ValueKind;

/// Supplies the embedder's UTC offset for a given instant.
///
/// Injected rather than read from the environment so the calendar-date
/// arithmetic is reproducible under test.
pub trait OffsetSource {
    /// UTC offset in effect at `unix_millis`.
    fn offset_at(&self, unix_millis: i64) -> UtcOffset;
}

/// A fixed offset, for embedders whose zone never changes mid-session.
impl OffsetSource for UtcOffset {
    fn offset_at(&self, _unix_millis: i64) -> UtcOffset {
        *self
    }
}

/// Normalizes a local-time instant to midnight UTC of the calendar date it
/// falls on in the embedder's zone.
///
/// Returns `None` when the input is outside the representable range; the
/// caller forwards such values unconverted.
#[must_use]
pub fn local_date_to_utc_midnight(unix_millis: i64, offsets: &dyn OffsetSource) -> Option<i64> {
    let nanos = i128::from(unix_millis) * 1_000_000;
    let instant = OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()?;
    let local_date = instant.to_offset(offsets.offset_at(unix_millis)).date();
    let midnight = local_date.midnight().assume_utc();
    Some(midnight.unix_timestamp() * 1000)
}

/// Applies outbound conversion for one value leaving the widget framework.
///
/// Only numeric values of [`ValueKind::Date`] are rewritten; everything
/// else passes through unchanged, including non-numeric date slots.
#[must_use]
pub fn outbound(kind: ValueKind, value: Value, offsets: &dyn OffsetSource) -> Value {
    if kind != ValueKind::Date {
        return value;
    }
    let Some(millis) = as_millis(&value) else {
        return value;
    };
    match local_date_to_utc_midnight(millis, offsets) {
        Some(utc_millis) => Value::from(utc_millis),
        None => value,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn as_millis(value: &Value) -> Option<i64> {
    if let Some(int) = value.as_i64() {
        Some(int)
    } else {
        value.as_f64().map(|float| float as i64)
    }
}
