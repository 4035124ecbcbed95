//! One-way conversion of a v1 cut list into an equivalent v3 timeline.
//!
//! v1 leaves the timebase, resolution and stream layout implicit in the
//! source file. The core never opens media, so the caller passes those in
//! as a [`SourceInfo`].

use tracing::debug;

use crate::error::TimelineError;
use crate::model::{
    AudioClip, AudioLayer, Color, Rational, Resolution, TimelineV1, TimelineV3, VideoClip,
    VideoItem, VideoLayer,
};
use crate::options::ParseOptions;
use crate::validate::{validate_v1, validate_v3};

/// What media inspection reports about a v1 document's `source`.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceInfo {
    /// Frame rate of the source, which is also the v1 tick rate.
    pub timebase: Rational,
    pub resolution: Resolution,
    pub samplerate: u64,
    pub video_streams: u64,
    pub audio_streams: u64,
}

/// Lay the kept chunks of `timeline` end to end on fresh layers, one per stream.
///
/// Each kept chunk becomes a clip whose `dur` is its length on the output
/// timeline, `round((end - start) / speed)`; chunks that round to nothing are
/// skipped. The input must itself be a valid cut list.
pub fn lift_v1(timeline: &TimelineV1, info: &SourceInfo) -> Result<TimelineV3, TimelineError> {
    lift_v1_with(timeline, info, &ParseOptions::default())
}

/// [`lift_v1`], validating the result under `opts`.
pub fn lift_v1_with(
    timeline: &TimelineV1,
    info: &SourceInfo,
    opts: &ParseOptions,
) -> Result<TimelineV3, TimelineError> {
    validate_v1(timeline)?;

    let mut v: Vec<VideoLayer> = (0..info.video_streams).map(|_| Vec::new()).collect();
    let mut a: Vec<AudioLayer> = (0..info.audio_streams).map(|_| Vec::new()).collect();

    let mut cursor: u64 = 0;
    for chunk in timeline.kept() {
        let dur = (chunk.len() as f64 / chunk.speed).round() as u64;
        if dur == 0 {
            continue;
        }
        for (stream, layer) in (0..).zip(v.iter_mut()) {
            layer.push(VideoItem::Video(VideoClip {
                src: timeline.source.clone(),
                start: cursor,
                dur,
                offset: chunk.start,
                speed: chunk.speed,
                stream,
            }));
        }
        for (stream, layer) in (0..).zip(a.iter_mut()) {
            layer.push(AudioClip {
                src: timeline.source.clone(),
                start: cursor,
                dur,
                offset: chunk.start,
                speed: Some(chunk.speed),
                volume: 1.0,
                stream,
            });
        }
        cursor += dur;
    }

    let lifted = TimelineV3 {
        resolution: info.resolution,
        timebase: info.timebase,
        samplerate: info.samplerate,
        background: Color::black(),
        v,
        a,
    };
    validate_v3(&lifted, opts)?;
    debug!(
        chunks = timeline.chunks.len(),
        items = lifted.item_count(),
        end = cursor,
        "lifted v1 timeline"
    );
    Ok(lifted)
}
