//! Canonical JSON output for v1 and v3 timelines.
//!
//! Top-level keys and clip keys are emitted in schema order. Floats with no
//! fractional part are written as integers (`1`, not `1.0`); everything else
//! uses the shortest representation that parses back to the same `f64`.

use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::debug;

use crate::model::{
    AudioLayer, Chunk, Color, MAX_SAFE_INTEGER, Rational, Resolution, Timeline, TimelineV1,
    TimelineV3, VideoLayer,
};

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// A float written without a trailing `.0` when it is integral.
pub(crate) struct Number(pub(crate) f64);

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.0;
        if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER as f64 {
            serializer.serialize_i64(value as i64)
        } else {
            serializer.serialize_f64(value)
        }
    }
}

pub(crate) fn number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    Number(*value).serialize(serializer)
}

pub(crate) fn optional_number<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => number(v, serializer),
        None => serializer.serialize_none(),
    }
}

#[derive(Serialize)]
struct V1Document<'a> {
    version: &'static str,
    source: &'a str,
    chunks: &'a [Chunk],
}

#[derive(Serialize)]
struct V3Document<'a> {
    version: &'static str,
    resolution: &'a Resolution,
    timebase: &'a Rational,
    samplerate: u64,
    background: &'a Color,
    v: &'a [VideoLayer],
    a: &'a [AudioLayer],
}

impl<'a> From<&'a TimelineV1> for V1Document<'a> {
    fn from(t: &'a TimelineV1) -> Self {
        Self {
            version: "1",
            source: &t.source,
            chunks: &t.chunks,
        }
    }
}

impl<'a> From<&'a TimelineV3> for V3Document<'a> {
    fn from(t: &'a TimelineV3) -> Self {
        Self {
            version: "3",
            resolution: &t.resolution,
            timebase: &t.timebase,
            samplerate: t.samplerate,
            background: &t.background,
            v: &t.v,
            a: &t.a,
        }
    }
}

impl Serialize for TimelineV1 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        V1Document::from(self).serialize(serializer)
    }
}

impl Serialize for TimelineV3 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        V3Document::from(self).serialize(serializer)
    }
}

impl Serialize for Timeline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::V1(t) => t.serialize(serializer),
            Self::V3(t) => t.serialize(serializer),
        }
    }
}

/// Compact canonical form.
pub fn serialize(timeline: &Timeline) -> Result<Vec<u8>, SerializeError> {
    debug!(version = %timeline.version(), "serializing timeline");
    Ok(serde_json::to_vec(timeline)?)
}

/// Indented canonical form; parses to the same value as [`serialize`].
pub fn serialize_pretty(timeline: &Timeline) -> Result<Vec<u8>, SerializeError> {
    debug!(version = %timeline.version(), "serializing timeline (pretty)");
    Ok(serde_json::to_vec_pretty(timeline)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AudioClip, ImageClip, RectClip, VideoClip, VideoItem};

    fn to_string(t: &Timeline) -> String {
        String::from_utf8(serialize(t).unwrap()).unwrap()
    }

    #[test]
    fn v1_uses_integer_speeds_and_schema_order() {
        let t = Timeline::V1(TimelineV1 {
            source: "a.mp4".to_string(),
            chunks: vec![Chunk::new(0, 26, 1.0), Chunk::new(26, 34, 1.5)],
        });
        assert_eq!(
            to_string(&t),
            r#"{"version":"1","source":"a.mp4","chunks":[[0,26,1],[26,34,1.5]]}"#
        );
    }

    #[test]
    fn v3_clip_keys_follow_schema_order() {
        let t = Timeline::V3(TimelineV3 {
            resolution: Resolution::new(1920, 1080),
            timebase: "30000/1001".parse().unwrap(),
            samplerate: 48000,
            background: "#AaBbCc".parse().unwrap(),
            v: vec![vec![
                VideoItem::Video(VideoClip {
                    src: "a.mp4".to_string(),
                    start: 0,
                    dur: 26,
                    offset: 0,
                    speed: 1.0,
                    stream: 0,
                }),
                VideoItem::Image(ImageClip {
                    src: "logo.png".to_string(),
                    start: 5,
                    dur: 10,
                    x: -4,
                    y: 8,
                    width: 100,
                    opacity: 0.5,
                }),
                VideoItem::Rect(RectClip {
                    start: 6,
                    dur: 2,
                    x: 0,
                    y: 0,
                    width: 50,
                    height: 20,
                    fill: "#fff".parse().unwrap(),
                }),
            ]],
            a: vec![vec![AudioClip {
                src: "a.mp4".to_string(),
                start: 0,
                dur: 26,
                offset: 0,
                speed: None,
                volume: 1.0,
                stream: 0,
            }]],
        });
        let expected = concat!(
            r#"{"version":"3","resolution":[1920,1080],"timebase":"30000/1001","#,
            r##""samplerate":48000,"background":"#AaBbCc","v":[["##,
            r#"{"name":"video","src":"a.mp4","start":0,"dur":26,"offset":0,"speed":1,"stream":0},"#,
            r#"{"name":"image","src":"logo.png","start":5,"dur":10,"x":-4,"y":8,"width":100,"opacity":0.5},"#,
            r##"{"name":"rect","start":6,"dur":2,"x":0,"y":0,"width":50,"height":20,"fill":"#fff"}"##,
            r#"]],"a":[[{"name":"audio","src":"a.mp4","start":0,"dur":26,"offset":0,"volume":1,"stream":0}]]}"#,
        );
        assert_eq!(to_string(&t), expected);
    }

    #[test]
    fn audio_speed_is_emitted_after_offset_when_present() {
        let clip = AudioClip {
            src: "a.mp4".to_string(),
            start: 0,
            dur: 10,
            offset: 3,
            speed: Some(2.5),
            volume: 0.25,
            stream: 1,
        };
        assert_eq!(
            serde_json::to_string(&clip).unwrap(),
            r#"{"name":"audio","src":"a.mp4","start":0,"dur":10,"offset":3,"speed":2.5,"volume":0.25,"stream":1}"#
        );
    }

    #[test]
    fn non_ascii_paths_stay_unescaped() {
        let t = Timeline::V1(TimelineV1 {
            source: "vidéo \"1\".mp4".to_string(),
            chunks: Vec::new(),
        });
        assert_eq!(
            to_string(&t),
            r#"{"version":"1","source":"vidéo \"1\".mp4","chunks":[]}"#
        );
    }
}
