use serde::Serialize;

use super::scalar::Color;
use crate::serialize::{number, optional_number};

/// A clip from a source file placed on a video layer.
///
/// `start` and `dur` place the clip on the output timeline; `offset` is where
/// reading begins in the source. All four are counts of timebase ticks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoClip {
    pub src: String,
    pub start: u64,
    pub dur: u64,
    pub offset: u64,
    #[serde(serialize_with = "number")]
    pub speed: f64,
    pub stream: u64,
}

/// A still image overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageClip {
    pub src: String,
    pub start: u64,
    pub dur: u64,
    pub x: i64,
    pub y: i64,
    pub width: u64,
    #[serde(serialize_with = "number")]
    pub opacity: f64,
}

/// A solid rectangle overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RectClip {
    pub start: u64,
    pub dur: u64,
    pub x: i64,
    pub y: i64,
    pub width: u64,
    pub height: u64,
    pub fill: Color,
}

/// Anything that may sit on a video layer, discriminated by `name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum VideoItem {
    Video(VideoClip),
    Image(ImageClip),
    Rect(RectClip),
}

impl VideoItem {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Video(_) => "video",
            Self::Image(_) => "image",
            Self::Rect(_) => "rect",
        }
    }

    pub fn start(&self) -> u64 {
        match self {
            Self::Video(c) => c.start,
            Self::Image(c) => c.start,
            Self::Rect(c) => c.start,
        }
    }

    pub fn dur(&self) -> u64 {
        match self {
            Self::Video(c) => c.dur,
            Self::Image(c) => c.dur,
            Self::Rect(c) => c.dur,
        }
    }
}

/// The only item allowed on an audio layer.
///
/// `speed` is not part of the published schema but shows up in real
/// documents; it is kept when present and omitted otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "name", rename = "audio")]
pub struct AudioClip {
    pub src: String,
    pub start: u64,
    pub dur: u64,
    pub offset: u64,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "optional_number"
    )]
    pub speed: Option<f64>,
    #[serde(serialize_with = "number")]
    pub volume: f64,
    pub stream: u64,
}

pub type VideoLayer = Vec<VideoItem>;
pub type AudioLayer = Vec<AudioClip>;
