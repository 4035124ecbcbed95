use serde_json::{Map, Value};
use tracing::debug;

use super::scalar::{as_bounded_speed, as_color, as_integer, as_natural, as_str, as_unit_float};
use crate::error::{Pointer, TimelineError};
use crate::model::{Color, SpeedRange};
use crate::options::ParseOptions;

/// Typed, located access to the members of one JSON object.
pub(crate) struct Fields<'v> {
    map: &'v Map<String, Value>,
    at: Pointer,
}

impl<'v> Fields<'v> {
    pub(crate) fn new(map: &'v Map<String, Value>, at: &Pointer) -> Self {
        Self {
            map,
            at: at.clone(),
        }
    }

    pub(crate) fn location(&self, key: &str) -> Pointer {
        self.at.child(key)
    }

    pub(crate) fn required(&self, key: &str) -> Result<(&'v Value, Pointer), TimelineError> {
        let at = self.location(key);
        match self.map.get(key) {
            Some(value) => Ok((value, at)),
            None => Err(TimelineError::missing_field(&at)),
        }
    }

    pub(crate) fn optional(&self, key: &str) -> Option<(&'v Value, Pointer)> {
        self.map.get(key).map(|value| (value, self.location(key)))
    }

    pub(crate) fn string(&self, key: &str) -> Result<String, TimelineError> {
        let (value, at) = self.required(key)?;
        as_str(value, &at).map(str::to_string)
    }

    pub(crate) fn natural(&self, key: &str) -> Result<u64, TimelineError> {
        let (value, at) = self.required(key)?;
        as_natural(value, &at)
    }

    pub(crate) fn integer(&self, key: &str) -> Result<i64, TimelineError> {
        let (value, at) = self.required(key)?;
        as_integer(value, &at)
    }

    pub(crate) fn unit_float(&self, key: &str) -> Result<f64, TimelineError> {
        let (value, at) = self.required(key)?;
        as_unit_float(value, &at)
    }

    pub(crate) fn speed(&self, key: &str, range: SpeedRange) -> Result<f64, TimelineError> {
        let (value, at) = self.required(key)?;
        as_bounded_speed(value, &at, range)
    }

    pub(crate) fn color(&self, key: &str) -> Result<Color, TimelineError> {
        let (value, at) = self.required(key)?;
        as_color(value, &at)
    }

    /// Fail on the first key outside `allowed` in strict mode; skip it in lax mode.
    pub(crate) fn reject_unknown(
        &self,
        allowed: &[&str],
        opts: &ParseOptions,
    ) -> Result<(), TimelineError> {
        for key in self.map.keys() {
            if allowed.contains(&key.as_str()) {
                continue;
            }
            let at = self.location(key);
            if opts.is_strict() {
                return Err(TimelineError::unknown_field(&at));
            }
            debug!(location = %at, "ignoring unknown field");
        }
        Ok(())
    }
}
