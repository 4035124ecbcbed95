//! Normalizes JSON scalars into the semantic types of the model.
//!
//! Every function takes the location of the value so that a failure points
//! at the exact field.

use serde_json::{Map, Value};

use crate::error::{Pointer, TimelineError};
use crate::model::scalar::{RationalError, is_unit_float};
use crate::model::{Color, MAX_SAFE_INTEGER, Rational, SpeedRange};

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn as_str<'v>(value: &'v Value, at: &Pointer) -> Result<&'v str, TimelineError> {
    value
        .as_str()
        .ok_or_else(|| TimelineError::type_mismatch(at, "a string", json_type(value)))
}

pub fn as_array<'v>(value: &'v Value, at: &Pointer) -> Result<&'v [Value], TimelineError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| TimelineError::type_mismatch(at, "an array", json_type(value)))
}

pub fn as_object<'v>(
    value: &'v Value,
    at: &Pointer,
) -> Result<&'v Map<String, Value>, TimelineError> {
    value
        .as_object()
        .ok_or_else(|| TimelineError::type_mismatch(at, "an object", json_type(value)))
}

pub fn as_float(value: &Value, at: &Pointer) -> Result<f64, TimelineError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| TimelineError::domain(at, format!("{n} is not representable as f64"))),
        other => Err(TimelineError::type_mismatch(at, "a number", json_type(other))),
    }
}

/// A whole number within the safe-integer range, sign not yet checked.
fn as_whole(value: &Value, at: &Pointer) -> Result<i64, TimelineError> {
    let Value::Number(n) = value else {
        return Err(TimelineError::type_mismatch(at, "a number", json_type(value)));
    };
    let out_of_range =
        || TimelineError::domain(at, format!("{n} is outside the safe integer range ±(2^53 - 1)"));

    if let Some(i) = n.as_i64() {
        return if i.unsigned_abs() <= MAX_SAFE_INTEGER {
            Ok(i)
        } else {
            Err(out_of_range())
        };
    }
    if n.is_u64() {
        return Err(out_of_range());
    }
    let f = n.as_f64().unwrap_or(f64::NAN);
    if !f.is_finite() || f.fract() != 0.0 {
        return Err(TimelineError::domain(at, format!("{n} has a fractional part")));
    }
    if f.abs() > MAX_SAFE_INTEGER as f64 {
        return Err(out_of_range());
    }
    Ok(f as i64)
}

pub fn as_natural(value: &Value, at: &Pointer) -> Result<u64, TimelineError> {
    let whole = as_whole(value, at)?;
    u64::try_from(whole).map_err(|_| {
        TimelineError::domain(at, format!("{whole} is negative, expected a natural number"))
    })
}

pub fn as_integer(value: &Value, at: &Pointer) -> Result<i64, TimelineError> {
    as_whole(value, at)
}

/// A natural number that must also be non-zero.
pub fn as_positive(value: &Value, at: &Pointer) -> Result<u64, TimelineError> {
    match as_natural(value, at)? {
        0 => Err(TimelineError::domain(at, "must be greater than zero")),
        n => Ok(n),
    }
}

pub fn as_unit_float(value: &Value, at: &Pointer) -> Result<f64, TimelineError> {
    let f = as_float(value, at)?;
    if is_unit_float(f) {
        Ok(f)
    } else {
        Err(TimelineError::domain(at, format!("{f} is outside [0, 1]")))
    }
}

pub fn as_bounded_speed(
    value: &Value,
    at: &Pointer,
    range: SpeedRange,
) -> Result<f64, TimelineError> {
    let f = as_float(value, at)?;
    if range.contains(f) {
        Ok(f)
    } else {
        Err(TimelineError::domain(
            at,
            format!("speed {f} is outside {}", range.describe()),
        ))
    }
}

pub fn as_color(value: &Value, at: &Pointer) -> Result<Color, TimelineError> {
    let s = as_str(value, at)?;
    s.parse()
        .map_err(|e| TimelineError::domain(at, format!("invalid color {s:?}: {e}")))
}

pub fn as_rational(value: &Value, at: &Pointer) -> Result<Rational, TimelineError> {
    let s = as_str(value, at)?;
    s.parse().map_err(|e| match e {
        RationalError::ZeroDenominator => {
            TimelineError::invariant(at, format!("{s:?} has a zero denominator"))
        }
        other => TimelineError::domain(at, format!("invalid rational {s:?}: {other}")),
    })
}
