use serde_json::{Map, Value};
use tracing::debug;

use super::clip::parse_chunk;
use super::fields::Fields;
use super::scalar::as_array;
use crate::error::{Pointer, TimelineError};
use crate::model::TimelineV1;
use crate::options::ParseOptions;
use crate::validate::validate_v1;

const V1_KEYS: &[&str] = &["version", "source", "chunks"];

/// Build a v1 timeline from a top-level object whose version is already known.
///
/// The v1 format is frozen and explicitly tolerates extra top-level keys, so
/// they are skipped regardless of strictness.
pub(crate) fn from_map(map: &Map<String, Value>) -> Result<TimelineV1, TimelineError> {
    let fields = Fields::new(map, &Pointer::root());
    fields.reject_unknown(V1_KEYS, &ParseOptions::lax())?;

    let source = fields.string("source")?;
    let (chunks, chunks_at) = fields.required("chunks")?;
    let chunks = as_array(chunks, &chunks_at)?
        .iter()
        .enumerate()
        .map(|(i, chunk)| parse_chunk(chunk, &chunks_at.child(i)))
        .collect::<Result<Vec<_>, _>>()?;

    let timeline = TimelineV1 { source, chunks };
    validate_v1(&timeline)?;
    debug!(chunks = timeline.chunks.len(), "parsed v1 timeline");
    Ok(timeline)
}
