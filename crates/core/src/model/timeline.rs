use std::fmt;

use serde::Serialize;
use serde::ser::{SerializeTuple, Serializer};

use super::clip::{AudioLayer, VideoLayer};
use super::scalar::{Color, Rational, SPEED_LIMIT};
use crate::serialize::Number;

/// Document format version, carried on the wire as the string `"1"` or `"3"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    V1,
    V3,
}

impl Version {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "1",
            Self::V3 => "3",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "1" => Some(Self::V1),
            "3" => Some(Self::V3),
            _ => None,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous `[start, end)` run of source ticks played at one speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chunk {
    pub start: u64,
    pub end: u64,
    pub speed: f64,
}

impl Chunk {
    pub fn new(start: u64, end: u64, speed: f64) -> Self {
        Self { start, end, speed }
    }

    /// Both bounds of the v1 speed range mean "cut this segment".
    pub fn is_dropped(&self) -> bool {
        self.speed == 0.0 || self.speed == SPEED_LIMIT
    }

    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Wire form is the bare triple `[start, end, speed]`.
impl Serialize for Chunk {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.start)?;
        tuple.serialize_element(&self.end)?;
        tuple.serialize_element(&Number(self.speed))?;
        tuple.end()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineV1 {
    /// Opaque media path, never touched by the core.
    pub source: String,
    pub chunks: Vec<Chunk>,
}

impl TimelineV1 {
    pub fn kept(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter().filter(|c| !c.is_dropped())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u64,
    pub height: u64,
}

impl Resolution {
    pub fn new(width: u64, height: u64) -> Self {
        Self { width, height }
    }
}

impl Serialize for Resolution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.width)?;
        tuple.serialize_element(&self.height)?;
        tuple.end()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineV3 {
    pub resolution: Resolution,
    pub timebase: Rational,
    pub samplerate: u64,
    pub background: Color,
    pub v: Vec<VideoLayer>,
    pub a: Vec<AudioLayer>,
}

impl TimelineV3 {
    /// Tick just past the last item on any layer.
    pub fn end(&self) -> u64 {
        let video = self.v.iter().flatten().map(|item| item.start().saturating_add(item.dur()));
        let audio = self.a.iter().flatten().map(|clip| clip.start.saturating_add(clip.dur));
        video.chain(audio).max().unwrap_or(0)
    }

    pub fn item_count(&self) -> usize {
        self.v.iter().map(Vec::len).sum::<usize>() + self.a.iter().map(Vec::len).sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Timeline {
    V1(TimelineV1),
    V3(TimelineV3),
}

impl Timeline {
    pub fn version(&self) -> Version {
        match self {
            Self::V1(_) => Version::V1,
            Self::V3(_) => Version::V3,
        }
    }
}

impl From<TimelineV1> for Timeline {
    fn from(t: TimelineV1) -> Self {
        Self::V1(t)
    }
}

impl From<TimelineV3> for Timeline {
    fn from(t: TimelineV3) -> Self {
        Self::V3(t)
    }
}
