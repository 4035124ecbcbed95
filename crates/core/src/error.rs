use std::fmt;

use serde::ser::{SerializeStruct, Serializer};
use thiserror::Error;

/// Flat error taxonomy shared by the parser and the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input is not well-formed JSON.
    Syntax,
    /// Top-level `version` absent.
    MissingVersion,
    /// `version` present but not `"1"` or `"3"`.
    UnsupportedVersion,
    MissingField,
    /// Field not in the schema (strict mode only).
    UnknownField,
    /// JSON type does not match the schema.
    Type,
    /// Value outside its allowed domain.
    Domain,
    /// Clip `name` is not a variant of the expected union.
    UnknownVariant,
    /// Cross-field rule violated.
    Invariant,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::Syntax => "SYNTAX",
            Self::MissingVersion => "MISSING_VERSION",
            Self::UnsupportedVersion => "UNSUPPORTED_VERSION",
            Self::MissingField => "MISSING_FIELD",
            Self::UnknownField => "UNKNOWN_FIELD",
            Self::Type => "TYPE",
            Self::Domain => "DOMAIN",
            Self::UnknownVariant => "UNKNOWN_VARIANT",
            Self::Invariant => "INVARIANT",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// RFC 6901 JSON pointer locating a value inside a timeline document.
///
/// The root pointer is the empty string. Chunk tuple elements are addressed
/// by role (`/chunks/1/start`) rather than by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pointer(String);

impl Pointer {
    pub fn root() -> Self {
        Self(String::new())
    }

    /// A new pointer one level below `self`.
    pub fn child(&self, segment: impl fmt::Display) -> Self {
        let segment = segment.to_string();
        let mut path = String::with_capacity(self.0.len() + segment.len() + 1);
        path.push_str(&self.0);
        path.push('/');
        for c in segment.chars() {
            match c {
                '~' => path.push_str("~0"),
                '/' => path.push_str("~1"),
                c => path.push(c),
            }
        }
        Self(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// The single error value returned by every fallible core operation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {location}: {message}")]
pub struct TimelineError {
    pub kind: ErrorKind,
    pub location: Pointer,
    pub message: String,
}

impl TimelineError {
    pub fn new(kind: ErrorKind, location: &Pointer, message: impl Into<String>) -> Self {
        Self {
            kind,
            location: location.clone(),
            message: message.into(),
        }
    }

    pub fn missing_field(location: &Pointer) -> Self {
        Self::new(ErrorKind::MissingField, location, "required field is absent")
    }

    pub fn unknown_field(location: &Pointer) -> Self {
        Self::new(ErrorKind::UnknownField, location, "field is not part of the schema")
    }

    pub fn type_mismatch(location: &Pointer, expected: &str, found: &str) -> Self {
        Self::new(
            ErrorKind::Type,
            location,
            format!("expected {expected}, found {found}"),
        )
    }

    pub fn domain(location: &Pointer, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Domain, location, message)
    }

    pub fn invariant(location: &Pointer, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Invariant, location, message)
    }
}

impl serde::Serialize for TimelineError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("TimelineError", 3)?;
        state.serialize_field("code", self.kind.code())?;
        state.serialize_field("location", self.location.as_str())?;
        state.serialize_field("message", &self.message)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_escapes_reserved_characters() {
        let p = Pointer::root().child("a/b").child("c~d").child(3);
        assert_eq!(p.as_str(), "/a~1b/c~0d/3");
    }

    #[test]
    fn root_pointer_displays_as_marker() {
        let err = TimelineError::new(ErrorKind::Syntax, &Pointer::root(), "eof");
        assert_eq!(err.to_string(), "SYNTAX at <root>: eof");
        assert_eq!(err.location.as_str(), "");
    }

    #[test]
    fn serializes_with_code() {
        let err = TimelineError::invariant(&Pointer::root().child("chunks").child(1), "gap");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INVARIANT");
        assert_eq!(json["location"], "/chunks/1");
        assert_eq!(json["message"], "gap");
    }
}
