use serde_json::Value;

use super::fields::Fields;
use super::scalar::{as_array, as_bounded_speed, as_natural, as_object, as_str, json_type};
use crate::error::{ErrorKind, Pointer, TimelineError};
use crate::model::{AudioClip, Chunk, ImageClip, RectClip, SpeedRange, VideoClip, VideoItem};
use crate::options::ParseOptions;

const VIDEO_KEYS: &[&str] = &["name", "src", "start", "dur", "offset", "speed", "stream"];
const IMAGE_KEYS: &[&str] = &["name", "src", "start", "dur", "x", "y", "width", "opacity"];
const RECT_KEYS: &[&str] = &["name", "start", "dur", "x", "y", "width", "height", "fill"];
const AUDIO_KEYS: &[&str] = &[
    "name", "src", "start", "dur", "offset", "speed", "volume", "stream",
];

fn variant_tag<'v>(fields: &Fields<'v>) -> Result<(&'v str, Pointer), TimelineError> {
    let (value, at) = fields.required("name")?;
    Ok((as_str(value, &at)?, at))
}

fn wrong_variant(at: &Pointer, tag: &str, expected: &str) -> TimelineError {
    TimelineError::new(
        ErrorKind::UnknownVariant,
        at,
        format!("{tag:?} is not a {expected}"),
    )
}

/// Parse one item of a video layer: `video`, `image` or `rect`.
pub fn parse_video_item(
    value: &Value,
    at: &Pointer,
    opts: &ParseOptions,
) -> Result<VideoItem, TimelineError> {
    let fields = Fields::new(as_object(value, at)?, at);
    let (tag, tag_at) = variant_tag(&fields)?;

    match tag {
        "video" => {
            fields.reject_unknown(VIDEO_KEYS, opts)?;
            Ok(VideoItem::Video(VideoClip {
                src: fields.string("src")?,
                start: fields.natural("start")?,
                dur: fields.natural("dur")?,
                offset: fields.natural("offset")?,
                speed: fields.speed("speed", SpeedRange::Exclusive)?,
                stream: fields.natural("stream")?,
            }))
        }
        "image" => {
            fields.reject_unknown(IMAGE_KEYS, opts)?;
            Ok(VideoItem::Image(ImageClip {
                src: fields.string("src")?,
                start: fields.natural("start")?,
                dur: fields.natural("dur")?,
                x: fields.integer("x")?,
                y: fields.integer("y")?,
                width: fields.natural("width")?,
                opacity: fields.unit_float("opacity")?,
            }))
        }
        "rect" => {
            fields.reject_unknown(RECT_KEYS, opts)?;
            Ok(VideoItem::Rect(RectClip {
                start: fields.natural("start")?,
                dur: fields.natural("dur")?,
                x: fields.integer("x")?,
                y: fields.integer("y")?,
                width: fields.natural("width")?,
                height: fields.natural("height")?,
                fill: fields.color("fill")?,
            }))
        }
        "audio" => Err(wrong_variant(
            &tag_at,
            tag,
            "video-layer variant (audio clips belong in \"a\")",
        )),
        other => Err(wrong_variant(
            &tag_at,
            other,
            "clip variant (expected video, image or rect)",
        )),
    }
}

/// Parse one item of an audio layer.
pub fn parse_audio_item(
    value: &Value,
    at: &Pointer,
    opts: &ParseOptions,
) -> Result<AudioClip, TimelineError> {
    let fields = Fields::new(as_object(value, at)?, at);
    let (tag, tag_at) = variant_tag(&fields)?;

    match tag {
        "audio" => {}
        "video" | "image" | "rect" => {
            return Err(wrong_variant(
                &tag_at,
                tag,
                "audio-layer variant (visual clips belong in \"v\")",
            ));
        }
        other => {
            return Err(wrong_variant(&tag_at, other, "clip variant (expected audio)"));
        }
    }

    fields.reject_unknown(AUDIO_KEYS, opts)?;
    Ok(AudioClip {
        src: fields.string("src")?,
        start: fields.natural("start")?,
        dur: fields.natural("dur")?,
        offset: fields.natural("offset")?,
        speed: fields
            .optional("speed")
            .map(|(value, at)| as_bounded_speed(value, &at, SpeedRange::Exclusive))
            .transpose()?,
        volume: fields.unit_float("volume")?,
        stream: fields.natural("stream")?,
    })
}

/// Parse a v1 chunk from its wire form, the triple `[start, end, speed]`.
///
/// Elements are located by role, e.g. `/chunks/1/start`.
pub fn parse_chunk(value: &Value, at: &Pointer) -> Result<Chunk, TimelineError> {
    let items = as_array(value, at)?;
    let [start, end, speed] = items else {
        return Err(TimelineError::type_mismatch(
            at,
            "a [start, end, speed] triple",
            &format!("{} of length {}", json_type(value), items.len()),
        ));
    };
    Ok(Chunk {
        start: as_natural(start, &at.child("start"))?,
        end: as_natural(end, &at.child("end"))?,
        speed: as_bounded_speed(speed, &at.child("speed"), SpeedRange::Inclusive)?,
    })
}
