use serde_json::Value;

use super::scalar::as_rational;
use crate::error::{ErrorKind, Pointer, TimelineError};
use crate::model::Rational;

/// Parse the v3 `timebase` field, a string of the form `"p/q"`.
///
/// Numeric timebases are a type error even when they look right (`30`,
/// `29.97`): the string form exists so that no float rounding is involved.
/// Any `p/q` that [`Rational`] can hold is accepted, `0/1` included, so a
/// timebase built in memory always parses back.
pub fn parse_timebase(value: &Value, at: &Pointer) -> Result<Rational, TimelineError> {
    if let Value::Number(n) = value {
        return Err(TimelineError::new(
            ErrorKind::Type,
            at,
            format!("timebase must be a string like \"30/1\", found the number {n}"),
        ));
    }
    as_rational(value, at)
}
