//! End-to-end documents: parse, check the resulting value or error, and
//! re-serialize.

use cutlist_core::model::{Chunk, VideoItem};
use cutlist_core::{
    ErrorKind, OverlapPolicy, ParseOptions, Timeline, TimelineError, Version, parse, parse_v1,
    parse_v3, parse_with, serialize, serialize_pretty, validate,
};
use serde_json::{Value, json};

const EMPTY_V3: &str = r##"{"version":"3","resolution":[1280,720],"timebase":"30/1","samplerate":48000,"background":"#000","v":[[]],"a":[[]]}"##;

fn error_of(input: &str) -> TimelineError {
    parse(input.as_bytes()).unwrap_err()
}

fn as_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[test]
fn v1_with_dropped_middle_chunk() {
    let input = include_bytes!("fixtures/v1-cutlist.json");
    let t = parse_v1(input).unwrap();
    assert_eq!(t.source, "a.mp4");
    assert_eq!(
        t.chunks,
        vec![
            Chunk::new(0, 26, 1.0),
            Chunk::new(26, 34, 0.0),
            Chunk::new(34, 396, 1.0),
        ]
    );

    // Same document once keys are put in schema order.
    let out = serialize(&Timeline::V1(t)).unwrap();
    assert_eq!(
        std::str::from_utf8(&out).unwrap(),
        r#"{"version":"1","source":"a.mp4","chunks":[[0,26,1],[26,34,0],[34,396,1]]}"#
    );
    assert_eq!(as_json(&out), as_json(input));
}

#[test]
fn v1_gap_between_chunks() {
    let err = error_of(r#"{"version":"1","source":"a.mp4","chunks":[[0,10,1],[11,20,1]]}"#);
    assert_eq!(err.kind, ErrorKind::Invariant);
    assert_eq!(err.location.as_str(), "/chunks/1/start");
}

#[test]
fn v1_empty_chunks() {
    let t = parse(br#"{"version":"1","source":"a.mp4","chunks":[]}"#).unwrap();
    let Timeline::V1(t) = t else {
        panic!("expected v1");
    };
    assert!(t.chunks.is_empty());
}

#[test]
fn v3_empty_layers() {
    let t = parse(EMPTY_V3.as_bytes()).unwrap();
    assert_eq!(t.version(), Version::V3);
    assert_eq!(validate(&t, &ParseOptions::default()), Ok(()));
}

#[test]
fn v3_decimal_timebase() {
    let err = error_of(&EMPTY_V3.replace("\"30/1\"", "\"29.97\""));
    assert_eq!(err.kind, ErrorKind::Domain);
    assert_eq!(err.location.as_str(), "/timebase");
}

#[test]
fn v3_video_speed_at_exclusive_bound() {
    let clip = r#"{"name":"video","src":"a.mp4","start":0,"dur":26,"offset":0,"speed":99999.0,"stream":0}"#;
    let err = error_of(&EMPTY_V3.replace(r#""v":[[]]"#, &format!(r#""v":[[{clip}]]"#)));
    assert_eq!(err.kind, ErrorKind::Domain);
    assert_eq!(err.location.as_str(), "/v/0/0/speed");
}

#[test]
fn timebase_syntax_table() {
    for ok in ["30/1", "30000/1001"] {
        let input = EMPTY_V3.replace("30/1", ok);
        assert!(parse(input.as_bytes()).is_ok(), "{ok}");
    }
    for bad in ["30", "29.97", "30/0", "/1", "30 / 1"] {
        let input = EMPTY_V3.replace("30/1", bad);
        let err = parse(input.as_bytes()).unwrap_err();
        assert!(
            matches!(err.kind, ErrorKind::Domain | ErrorKind::Invariant),
            "{bad}: {err}"
        );
        assert_eq!(err.location.as_str(), "/timebase");
    }
}

#[test]
fn zero_numerator_timebase_round_trips() {
    let t = parse(EMPTY_V3.replace("30/1", "0/1").as_bytes()).unwrap();
    let Timeline::V3(v3) = &t else {
        panic!("expected v3");
    };
    assert_eq!(v3.timebase.num(), 0);
    assert_eq!(validate(&t, &ParseOptions::default()), Ok(()));
    assert_eq!(parse(&serialize(&t).unwrap()).unwrap(), t);
}

/// Place one `clip` on the first layer of `layer` ("v" or "a") of an empty v3 document.
fn with_clip(layer: &str, clip: &Value) -> Vec<u8> {
    let mut doc: Value = serde_json::from_str(EMPTY_V3).unwrap();
    doc[layer] = json!([[clip]]);
    serde_json::to_vec(&doc).unwrap()
}

#[test]
fn natural_clip_fields_accept_zero_and_reject_negatives() {
    let cases = [
        (
            "v",
            json!({"name": "video", "src": "a.mp4", "start": 3, "dur": 26, "offset": 4, "speed": 1, "stream": 1}),
            &["start", "dur", "offset", "stream"][..],
        ),
        (
            "v",
            json!({"name": "image", "src": "logo.png", "start": 3, "dur": 10, "x": 0, "y": 0, "width": 64, "opacity": 1}),
            &["start", "dur", "width"][..],
        ),
        (
            "v",
            json!({"name": "rect", "start": 3, "dur": 10, "x": 0, "y": 0, "width": 64, "height": 32, "fill": "#fff"}),
            &["start", "dur", "width", "height"][..],
        ),
        (
            "a",
            json!({"name": "audio", "src": "a.wav", "start": 3, "dur": 26, "offset": 4, "volume": 1, "stream": 1}),
            &["start", "dur", "offset", "stream"][..],
        ),
    ];

    for (layer, clip, fields) in cases {
        assert!(parse(&with_clip(layer, &clip)).is_ok(), "{clip}");
        for field in fields {
            let mut zero = clip.clone();
            zero[*field] = json!(0);
            assert!(parse(&with_clip(layer, &zero)).is_ok(), "{zero}");

            let mut negative = clip.clone();
            negative[*field] = json!(-1);
            let err = parse(&with_clip(layer, &negative)).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Domain, "{negative}");
            assert_eq!(err.location.as_str(), format!("/{layer}/0/0/{field}"));
        }
    }
}

#[test]
fn color_syntax_table() {
    for ok in ["#000", "#FFFFFF", "#abc", "#AaBbCc"] {
        let input = EMPTY_V3.replace("#000", ok);
        assert!(parse(input.as_bytes()).is_ok(), "{ok}");
    }
    for bad in ["#0000", "000000", "#GGG", ""] {
        let input = EMPTY_V3.replace("#000", bad);
        let err = parse(input.as_bytes()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Domain, "{bad}");
        assert_eq!(err.location.as_str(), "/background");
    }
}

#[test]
fn v1_speed_accepts_both_sentinels() {
    for speed in ["0", "0.0", "99999", "99999.0"] {
        let input = format!(r#"{{"version":"1","source":"a.mp4","chunks":[[0,10,{speed}]]}}"#);
        let t = parse_v1(input.as_bytes()).unwrap();
        assert!(t.chunks[0].is_dropped(), "{speed}");
    }
    let err = error_of(r#"{"version":"1","source":"a.mp4","chunks":[[0,10,-1]]}"#);
    assert_eq!(err.kind, ErrorKind::Domain);
}

#[test]
fn layered_fixture_round_trips() {
    let input = include_bytes!("fixtures/v3-layers.json");
    let t = parse_v3(input).unwrap();
    assert_eq!(t.v.len(), 2);
    assert_eq!(t.a.len(), 2);
    assert!(matches!(t.v[1][1], VideoItem::Image(_)));
    assert_eq!(t.a[0][0].speed, None);
    assert_eq!(t.a[0][1].speed, Some(2.0));
    assert_eq!(t.end(), 297);

    let timeline = Timeline::V3(t);
    for out in [
        serialize(&timeline).unwrap(),
        serialize_pretty(&timeline).unwrap(),
    ] {
        assert_eq!(parse(&out).unwrap(), timeline);
        assert_eq!(as_json(&out), as_json(input));
    }
}

#[test]
fn stricter_overlap_profile_rejects_fixture() {
    let input = include_bytes!("fixtures/v3-layers.json");
    let opts = ParseOptions {
        overlap: OverlapPolicy::Reject,
        ..ParseOptions::default()
    };
    let err = parse_with(input, &opts).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Invariant);
    assert_eq!(err.location.as_str(), "/v/0/2/start");
}

#[test]
fn error_serializes_for_collaborators() {
    let err = error_of(r#"{"source":"a.mp4","chunks":[]}"#);
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["code"], "MISSING_VERSION");
    assert_eq!(json["location"], "/version");
}
