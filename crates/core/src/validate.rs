//! Cross-field invariants and in-memory domain checks.
//!
//! The parser runs this as its last step, and callers that build timelines by
//! hand run it directly. `Color` and `Rational` cannot hold invalid values, so
//! only the plain numeric fields and the structural rules are checked here.

use tracing::trace;

use crate::error::{Pointer, TimelineError};
use crate::model::scalar::is_unit_float;
use crate::model::{
    AudioClip, MAX_SAFE_INTEGER, SpeedRange, Timeline, TimelineV1, TimelineV3, VideoItem,
};
use crate::options::{OverlapPolicy, ParseOptions};

/// Returned by [`Report`] once a fail-fast report has its error.
struct Stop;

struct Report {
    errors: Vec<TimelineError>,
    fail_fast: bool,
}

impl Report {
    fn new(fail_fast: bool) -> Self {
        Self {
            errors: Vec::new(),
            fail_fast,
        }
    }

    fn check(&mut self, ok: bool, err: impl FnOnce() -> TimelineError) -> Result<(), Stop> {
        if ok {
            return Ok(());
        }
        self.errors.push(err());
        if self.fail_fast { Err(Stop) } else { Ok(()) }
    }

    fn natural(&mut self, value: u64, at: &Pointer) -> Result<(), Stop> {
        self.check(value <= MAX_SAFE_INTEGER, || {
            TimelineError::domain(at, format!("{value} exceeds 2^53 - 1"))
        })
    }

    fn positive(&mut self, value: u64, at: &Pointer) -> Result<(), Stop> {
        self.check(value > 0, || TimelineError::domain(at, "must be greater than zero"))?;
        self.natural(value, at)
    }

    fn integer(&mut self, value: i64, at: &Pointer) -> Result<(), Stop> {
        self.check(value.unsigned_abs() <= MAX_SAFE_INTEGER, || {
            TimelineError::domain(at, format!("{value} is outside ±(2^53 - 1)"))
        })
    }

    fn unit(&mut self, value: f64, at: &Pointer) -> Result<(), Stop> {
        self.check(is_unit_float(value), || {
            TimelineError::domain(at, format!("{value} is outside [0, 1]"))
        })
    }

    fn speed(&mut self, value: f64, range: SpeedRange, at: &Pointer) -> Result<(), Stop> {
        self.check(range.contains(value), || {
            TimelineError::domain(at, format!("speed {value} is outside {}", range.describe()))
        })
    }

    fn into_first(self) -> Result<(), TimelineError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn check_v1(t: &TimelineV1, report: &mut Report) -> Result<(), Stop> {
    let root = Pointer::root();
    report.check(!t.source.is_empty(), || {
        TimelineError::domain(&root.child("source"), "source must be a non-empty path")
    })?;

    let chunks_at = root.child("chunks");
    let mut expected_start = 0;
    for (i, chunk) in t.chunks.iter().enumerate() {
        let at = chunks_at.child(i);
        let start_at = at.child("start");
        report.natural(chunk.start, &start_at)?;
        report.natural(chunk.end, &at.child("end"))?;
        report.speed(chunk.speed, SpeedRange::Inclusive, &at.child("speed"))?;

        report.check(chunk.start == expected_start, || {
            let message = if i == 0 {
                format!("first chunk must start at 0, found {}", chunk.start)
            } else if chunk.start > expected_start {
                format!(
                    "gap: chunk starts at {} but the previous chunk ends at {expected_start}",
                    chunk.start
                )
            } else {
                format!(
                    "overlap: chunk starts at {} but the previous chunk ends at {expected_start}",
                    chunk.start
                )
            };
            TimelineError::invariant(&start_at, message)
        })?;
        report.check(chunk.start < chunk.end, || {
            TimelineError::invariant(
                &at.child("end"),
                format!("end {} must be greater than start {}", chunk.end, chunk.start),
            )
        })?;
        expected_start = chunk.end;
    }
    Ok(())
}

/// Start ordering and the optional no-overlap rule for one layer.
struct LayerCursor {
    prev_start: u64,
    max_end: u64,
    overlap: OverlapPolicy,
}

impl LayerCursor {
    fn new(overlap: OverlapPolicy) -> Self {
        Self {
            prev_start: 0,
            max_end: 0,
            overlap,
        }
    }

    fn advance(
        &mut self,
        start: u64,
        dur: u64,
        at: &Pointer,
        report: &mut Report,
    ) -> Result<(), Stop> {
        let start_at = at.child("start");
        report.check(start >= self.prev_start, || {
            TimelineError::invariant(
                &start_at,
                format!(
                    "items must be ordered by start: {start} comes after {}",
                    self.prev_start
                ),
            )
        })?;
        if self.overlap == OverlapPolicy::Reject {
            report.check(start >= self.max_end, || {
                TimelineError::invariant(
                    &start_at,
                    format!(
                        "overlaps the previous item in its layer, which ends at {}",
                        self.max_end
                    ),
                )
            })?;
        }
        self.prev_start = self.prev_start.max(start);
        self.max_end = self.max_end.max(start.saturating_add(dur));
        Ok(())
    }
}

fn check_video_item(item: &VideoItem, at: &Pointer, report: &mut Report) -> Result<(), Stop> {
    report.natural(item.start(), &at.child("start"))?;
    report.natural(item.dur(), &at.child("dur"))?;
    match item {
        VideoItem::Video(clip) => {
            report.natural(clip.offset, &at.child("offset"))?;
            report.speed(clip.speed, SpeedRange::Exclusive, &at.child("speed"))?;
            report.natural(clip.stream, &at.child("stream"))?;
        }
        VideoItem::Image(image) => {
            report.integer(image.x, &at.child("x"))?;
            report.integer(image.y, &at.child("y"))?;
            report.natural(image.width, &at.child("width"))?;
            report.unit(image.opacity, &at.child("opacity"))?;
        }
        VideoItem::Rect(rect) => {
            report.integer(rect.x, &at.child("x"))?;
            report.integer(rect.y, &at.child("y"))?;
            report.natural(rect.width, &at.child("width"))?;
            report.natural(rect.height, &at.child("height"))?;
        }
    }
    Ok(())
}

fn check_audio_clip(clip: &AudioClip, at: &Pointer, report: &mut Report) -> Result<(), Stop> {
    report.natural(clip.start, &at.child("start"))?;
    report.natural(clip.dur, &at.child("dur"))?;
    report.natural(clip.offset, &at.child("offset"))?;
    if let Some(speed) = clip.speed {
        report.speed(speed, SpeedRange::Exclusive, &at.child("speed"))?;
    }
    report.unit(clip.volume, &at.child("volume"))?;
    report.natural(clip.stream, &at.child("stream"))
}

fn check_v3(t: &TimelineV3, opts: &ParseOptions, report: &mut Report) -> Result<(), Stop> {
    let root = Pointer::root();
    let resolution_at = root.child("resolution");
    report.positive(t.resolution.width, &resolution_at.child(0))?;
    report.positive(t.resolution.height, &resolution_at.child(1))?;
    report.positive(t.samplerate, &root.child("samplerate"))?;

    let v_at = root.child("v");
    for (l, layer) in t.v.iter().enumerate() {
        trace!(layer = l, items = layer.len(), "checking video layer");
        let layer_at = v_at.child(l);
        let mut cursor = LayerCursor::new(opts.overlap);
        for (i, item) in layer.iter().enumerate() {
            let at = layer_at.child(i);
            check_video_item(item, &at, report)?;
            cursor.advance(item.start(), item.dur(), &at, report)?;
        }
    }

    let a_at = root.child("a");
    for (l, layer) in t.a.iter().enumerate() {
        trace!(layer = l, items = layer.len(), "checking audio layer");
        let layer_at = a_at.child(l);
        let mut cursor = LayerCursor::new(opts.overlap);
        for (i, clip) in layer.iter().enumerate() {
            let at = layer_at.child(i);
            check_audio_clip(clip, &at, report)?;
            cursor.advance(clip.start, clip.dur, &at, report)?;
        }
    }
    Ok(())
}

fn run(t: &Timeline, opts: &ParseOptions, report: &mut Report) {
    // Stop only means the fail-fast report is full.
    let _ = match t {
        Timeline::V1(t) => check_v1(t, report),
        Timeline::V3(t) => check_v3(t, opts, report),
    };
}

pub(crate) fn validate_v1(t: &TimelineV1) -> Result<(), TimelineError> {
    let mut report = Report::new(true);
    let _ = check_v1(t, &mut report);
    report.into_first()
}

pub(crate) fn validate_v3(t: &TimelineV3, opts: &ParseOptions) -> Result<(), TimelineError> {
    let mut report = Report::new(true);
    let _ = check_v3(t, opts, &mut report);
    report.into_first()
}

/// Check a timeline, stopping at the first violation.
///
/// Pure and idempotent; intended for timelines built in code rather than
/// parsed, since the parser already runs it.
pub fn validate(timeline: &Timeline, opts: &ParseOptions) -> Result<(), TimelineError> {
    let mut report = Report::new(true);
    run(timeline, opts, &mut report);
    report.into_first()
}

/// Every violation in document order; empty when the timeline is valid.
pub fn validate_all(timeline: &Timeline, opts: &ParseOptions) -> Vec<TimelineError> {
    let mut report = Report::new(false);
    run(timeline, opts, &mut report);
    report.errors
}
