use serde::{Deserialize, Serialize};

/// How unknown keys are treated where the format does not fix the answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Unknown v3 top-level keys and unknown clip fields are `UNKNOWN_FIELD`.
    #[default]
    Strict,
    /// Unknown keys are skipped.
    Lax,
}

/// Whether items inside one v3 layer may overlap in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    #[default]
    Permit,
    /// An item may not start before the previous item in its layer ends.
    Reject,
}

/// Knobs shared by the parser and the validator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub strictness: Strictness,
    pub overlap: OverlapPolicy,
}

impl ParseOptions {
    pub fn lax() -> Self {
        Self {
            strictness: Strictness::Lax,
            ..Self::default()
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strictness == Strictness::Strict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_strict_and_permissive_on_overlap() {
        let opts = ParseOptions::default();
        assert!(opts.is_strict());
        assert_eq!(opts.overlap, OverlapPolicy::Permit);
    }

    #[test]
    fn deserializes_partial_config() {
        let opts: ParseOptions = serde_json::from_str(r#"{"overlap":"reject"}"#).unwrap();
        assert_eq!(opts.strictness, Strictness::Strict);
        assert_eq!(opts.overlap, OverlapPolicy::Reject);
    }
}
