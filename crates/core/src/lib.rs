//! Parser, validator, and serializer for v1 and v3 timeline documents.
//!
//! A v1 document is a cut list over one source: contiguous
//! `[start, end, speed]` chunks. A v3 document is a layered timeline of video,
//! image, rect and audio clips with an explicit timebase.
//!
//! ```
//! let doc = br#"{"version":"1","source":"a.mp4","chunks":[[0,26,1],[26,34,0]]}"#;
//! let timeline = cutlist_core::parse(doc).unwrap();
//! let text = cutlist_core::serialize(&timeline).unwrap();
//! assert_eq!(cutlist_core::parse(&text).unwrap(), timeline);
//! ```

pub mod error;
pub mod lift;
pub mod model;
pub mod options;
pub mod parsers;
pub mod serialize;
pub mod validate;

pub use error::{ErrorKind, Pointer, TimelineError};
pub use lift::{SourceInfo, lift_v1, lift_v1_with};
pub use model::{Timeline, TimelineV1, TimelineV3, Version};
pub use options::{OverlapPolicy, ParseOptions, Strictness};
pub use parsers::{parse, parse_v1, parse_v3, parse_v3_with, parse_with};
pub use serialize::{SerializeError, serialize, serialize_pretty};
pub use validate::{validate, validate_all};
