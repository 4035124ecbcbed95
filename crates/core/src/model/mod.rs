pub mod clip;
pub mod scalar;
pub mod timeline;

pub use clip::{AudioClip, AudioLayer, ImageClip, RectClip, VideoClip, VideoItem, VideoLayer};
pub use scalar::{Color, MAX_SAFE_INTEGER, Rational, SpeedRange};
pub use timeline::{Chunk, Resolution, Timeline, TimelineV1, TimelineV3, Version};
