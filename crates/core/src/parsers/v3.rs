use serde_json::{Map, Value};
use tracing::debug;

use super::clip::{parse_audio_item, parse_video_item};
use super::fields::Fields;
use super::scalar::{as_array, as_positive, json_type};
use super::timebase::parse_timebase;
use crate::error::{Pointer, TimelineError};
use crate::model::{Resolution, TimelineV3};
use crate::options::ParseOptions;
use crate::validate::validate_v3;

const V3_KEYS: &[&str] = &[
    "version",
    "resolution",
    "timebase",
    "samplerate",
    "background",
    "v",
    "a",
];

fn parse_resolution(value: &Value, at: &Pointer) -> Result<Resolution, TimelineError> {
    let items = as_array(value, at)?;
    let [width, height] = items else {
        return Err(TimelineError::type_mismatch(
            at,
            "a [width, height] pair",
            &format!("{} of length {}", json_type(value), items.len()),
        ));
    };
    Ok(Resolution {
        width: as_positive(width, &at.child(0))?,
        height: as_positive(height, &at.child(1))?,
    })
}

/// An array of layers, each an array of items.
fn parse_layers<T>(
    value: &Value,
    at: &Pointer,
    parse_item: impl Fn(&Value, &Pointer) -> Result<T, TimelineError>,
) -> Result<Vec<Vec<T>>, TimelineError> {
    as_array(value, at)?
        .iter()
        .enumerate()
        .map(|(l, layer)| -> Result<Vec<T>, TimelineError> {
            let layer_at = at.child(l);
            as_array(layer, &layer_at)?
                .iter()
                .enumerate()
                .map(|(i, item)| parse_item(item, &layer_at.child(i)))
                .collect()
        })
        .collect()
}

/// Build a v3 timeline from a top-level object whose version is already known.
pub(crate) fn from_map(
    map: &Map<String, Value>,
    opts: &ParseOptions,
) -> Result<TimelineV3, TimelineError> {
    let fields = Fields::new(map, &Pointer::root());
    fields.reject_unknown(V3_KEYS, opts)?;

    let (value, at) = fields.required("resolution")?;
    let resolution = parse_resolution(value, &at)?;
    let (value, at) = fields.required("timebase")?;
    let timebase = parse_timebase(value, &at)?;
    let (value, at) = fields.required("samplerate")?;
    let samplerate = as_positive(value, &at)?;
    let background = fields.color("background")?;

    let (value, at) = fields.required("v")?;
    let v = parse_layers(value, &at, |item, at| parse_video_item(item, at, opts))?;
    let (value, at) = fields.required("a")?;
    let a = parse_layers(value, &at, |item, at| parse_audio_item(item, at, opts))?;

    let timeline = TimelineV3 {
        resolution,
        timebase,
        samplerate,
        background,
        v,
        a,
    };
    validate_v3(&timeline, opts)?;
    debug!(
        video_layers = timeline.v.len(),
        audio_layers = timeline.a.len(),
        items = timeline.item_count(),
        "parsed v3 timeline"
    );
    Ok(timeline)
}
