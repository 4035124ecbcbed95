pub mod clip;
pub(crate) mod fields;
pub mod scalar;
pub mod timebase;
pub mod v1;
pub mod v3;

use serde_json::{Map, Value};
use tracing::debug;

use self::scalar::{as_object, json_type};
use crate::error::{ErrorKind, Pointer, TimelineError};
use crate::model::{Timeline, TimelineV1, TimelineV3, Version};
use crate::options::ParseOptions;

/// Tokenize the whole document; anything serde_json rejects is `SYNTAX`.
fn read_document(bytes: &[u8]) -> Result<Value, TimelineError> {
    serde_json::from_slice(bytes)
        .map_err(|e| TimelineError::new(ErrorKind::Syntax, &Pointer::root(), e.to_string()))
}

/// Read the `version` tag that selects the schema.
///
/// Only the strings `"1"` and `"3"` are accepted; a numeric `3` is
/// present-but-unsupported, not a type error.
fn read_version(doc: &Map<String, Value>) -> Result<Version, TimelineError> {
    let at = Pointer::root().child("version");
    let Some(value) = doc.get("version") else {
        return Err(TimelineError::new(
            ErrorKind::MissingVersion,
            &at,
            "document has no \"version\" field",
        ));
    };
    match value {
        Value::String(tag) => Version::from_tag(tag).ok_or_else(|| {
            TimelineError::new(
                ErrorKind::UnsupportedVersion,
                &at,
                format!("unsupported version {tag:?}, expected \"1\" or \"3\""),
            )
        }),
        other => Err(TimelineError::new(
            ErrorKind::UnsupportedVersion,
            &at,
            format!(
                "version must be the string \"1\" or \"3\", found {}",
                json_type(other)
            ),
        )),
    }
}

fn expect_version(doc: &Map<String, Value>, expected: Version) -> Result<(), TimelineError> {
    let found = read_version(doc)?;
    if found == expected {
        Ok(())
    } else {
        Err(TimelineError::new(
            ErrorKind::UnsupportedVersion,
            &Pointer::root().child("version"),
            format!("expected version \"{expected}\", found \"{found}\""),
        ))
    }
}

/// Parse a document of either version, dispatching on its `version` tag.
pub fn parse_with(bytes: &[u8], opts: &ParseOptions) -> Result<Timeline, TimelineError> {
    let doc = read_document(bytes)?;
    let map = as_object(&doc, &Pointer::root())?;
    let version = read_version(map)?;
    debug!(%version, bytes = bytes.len(), "parsing timeline");
    match version {
        Version::V1 => v1::from_map(map).map(Timeline::V1),
        Version::V3 => v3::from_map(map, opts).map(Timeline::V3),
    }
}

/// [`parse_with`] using the default (strict) options.
pub fn parse(bytes: &[u8]) -> Result<Timeline, TimelineError> {
    parse_with(bytes, &ParseOptions::default())
}

/// Parse a document that must be v1.
///
/// Strictness has no effect on v1, so there is no `_with` variant.
pub fn parse_v1(bytes: &[u8]) -> Result<TimelineV1, TimelineError> {
    let doc = read_document(bytes)?;
    let map = as_object(&doc, &Pointer::root())?;
    expect_version(map, Version::V1)?;
    v1::from_map(map)
}

/// Parse a document that must be v3.
pub fn parse_v3_with(bytes: &[u8], opts: &ParseOptions) -> Result<TimelineV3, TimelineError> {
    let doc = read_document(bytes)?;
    let map = as_object(&doc, &Pointer::root())?;
    expect_version(map, Version::V3)?;
    v3::from_map(map, opts)
}

pub fn parse_v3(bytes: &[u8]) -> Result<TimelineV3, TimelineError> {
    parse_v3_with(bytes, &ParseOptions::default())
}
