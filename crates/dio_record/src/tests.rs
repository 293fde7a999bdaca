//! End-to-end tests through the derive macros.

use std::collections::{BTreeMap, HashSet};

use bytes::Bytes;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use serde_json::json;

use crate::{
    Codec, DecodeOptions, Decoded, EncodeOptions, ExtraAttrs, Inputter, IoEnum, IoError, JsonStyle,
    LossyKind, MultiType, Outputter, PrepSession, Record, SchemaError, Value, ValueErrorKind,
    ValueMap, decode, decode_with, encode, encode_with, from_json, record_hash, to_json, validate,
};

fn value(json: serde_json::Value) -> Value {
    Value::from(json)
}

fn kind_of(err: &IoError) -> &ValueErrorKind {
    &err.as_value_error().expect("value error").kind
}

fn path_of(err: &IoError) -> &str {
    &err.as_value_error().expect("value error").path
}

// -----------------------------------------------------------------------------
// Shapes

#[derive(Record, Debug, Clone, PartialEq)]
#[io(auto_register)]
struct Point {
    x: i64,
    y: i64,
}

#[derive(MultiType, Debug, Clone, PartialEq)]
#[io(tag = "_t", auto_register)]
enum Shape {
    #[io(id = "c")]
    Circle(Circle),
    #[io(id = "s")]
    Square(Square),
    #[io(fallback)]
    Unknown,
}

#[derive(Record, Debug, Clone, PartialEq)]
#[io(multi_type = Shape, type_id = "c")]
struct Circle {
    center: Point,
    radius: f64,
}

#[derive(Record, Debug, Clone, PartialEq)]
#[io(multi_type = Shape, type_id = "s")]
struct Square {
    corner: Point,
    side: f64,
}

fn circle() -> Circle {
    Circle {
        center: Point { x: 1, y: 2 },
        radius: 3.5,
    }
}

#[test]
fn member_encodes_with_type_id() {
    let expected = value(json!({"center": {"x": 1, "y": 2}, "radius": 3.5, "_t": "c"}));

    let via_family = encode(&Shape::Circle(circle()), Codec::Json).unwrap();
    assert_eq!(via_family, expected);

    let bare = encode(&circle(), Codec::Json).unwrap();
    assert_eq!(bare, expected);

    assert_eq!(
        to_json(&Shape::Circle(circle()), JsonStyle::Compact).unwrap(),
        r#"{"_t":"c","center":{"x":1,"y":2},"radius":3.5}"#
    );
}

#[test]
fn family_selects_member_by_type_id() {
    let raw = value(json!({"center": {"x": 1, "y": 2}, "radius": 3.5, "_t": "c"}));
    let decoded = decode::<Shape>(raw, Codec::Json).unwrap();
    assert_eq!(decoded, Decoded::Exact(Shape::Circle(circle())));

    let raw = value(json!({"corner": {"x": 0, "y": 0}, "side": 2, "_t": "s"}));
    let decoded = decode::<Shape>(raw, Codec::Json).unwrap();
    assert_eq!(
        decoded.into_exact().unwrap(),
        Shape::Square(Square {
            corner: Point { x: 0, y: 0 },
            side: 2.0,
        })
    );
}

#[test]
fn member_decodes_on_its_own() {
    let raw = value(json!({"center": {"x": 1, "y": 2}, "radius": 3.5, "_t": "c"}));
    let decoded = decode::<Circle>(raw, Codec::Json).unwrap();
    assert_eq!(decoded.into_exact().unwrap(), circle());

    let raw = value(json!({"center": {"x": 1, "y": 2}, "radius": 3.5, "_t": "s"}));
    let err = decode::<Circle>(raw, Codec::Json).unwrap_err();
    assert!(matches!(kind_of(&err), ValueErrorKind::TypeIdMismatch { .. }));
}

#[test]
fn unknown_type_id_uses_fallback() {
    let raw = value(json!({"_t": "triangle", "points": 3}));
    let decoded = decode::<Shape>(raw.clone(), Codec::Json).unwrap();

    assert!(decoded.is_lossy());
    assert_eq!(decoded.value(), &Shape::Unknown);
    assert_eq!(decoded.reasons().len(), 1);
    assert_eq!(
        decoded.reasons()[0].kind,
        LossyKind::UnknownTypeId {
            family: core::any::type_name::<Shape>(),
            value: Value::from("triangle"),
        }
    );

    let err = Outputter::new(EncodeOptions::new(Codec::Json))
        .run_decoded(&decoded)
        .unwrap_err();
    assert!(matches!(err, IoError::LossyOutput(1)));
    assert!(err.to_string().contains("lossy data cannot be output"));

    let fallback = decoded.clone().into_exact().unwrap_err().into_lossy_value();
    let err = encode(&fallback, Codec::Json).unwrap_err();
    assert!(matches!(kind_of(&err), ValueErrorKind::FallbackOutput { .. }));

    let strict = DecodeOptions::new(Codec::Json).with_allow_lossy(false);
    let err = decode_with::<Shape>(raw, &strict).unwrap_err();
    assert!(matches!(kind_of(&err), ValueErrorKind::UnknownTypeId { .. }));
}

#[test]
fn missing_type_id() {
    let raw = value(json!({"radius": 1.0}));
    let err = decode::<Shape>(raw, Codec::Json).unwrap_err();
    assert!(matches!(
        kind_of(&err),
        ValueErrorKind::MissingTypeId { tag: "_t", .. }
    ));
}

// -----------------------------------------------------------------------------
// Integer type ids and payload fallbacks

#[derive(MultiType, Debug, PartialEq)]
enum Event {
    #[io(id = 1)]
    Click(Click),
    #[io(fallback)]
    Other(String),
}

#[derive(Record, Debug, PartialEq)]
#[io(multi_type = Event, type_id = 1)]
struct Click {
    x: i64,
}

#[test]
fn integer_type_ids_and_default_payload() {
    let encoded = encode(&Event::Click(Click { x: 4 }), Codec::Json).unwrap();
    assert_eq!(encoded, value(json!({"x": 4, "_dciotype": 1})));

    let decoded = decode::<Event>(value(json!({"_dciotype": 9})), Codec::Json).unwrap();
    assert!(decoded.is_lossy());
    assert_eq!(decoded.into_lossy_value(), Event::Other(String::new()));

    // A string id never matches an integer registry.
    let decoded = decode::<Event>(value(json!({"_dciotype": "1", "x": 4})), Codec::Json).unwrap();
    assert!(decoded.is_lossy());
}

// -----------------------------------------------------------------------------
// Enums

#[derive(IoEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Color {
    #[io(value = "red")]
    Red,
    #[io(value = "green")]
    Green,
    #[io(value = "unknown", fallback)]
    Unknown,
}

#[derive(IoEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    #[io(value = 1)]
    Low,
    #[io(value = 2)]
    High,
}

#[derive(Record, Debug, PartialEq)]
struct Palette {
    main: Color,
    level: Level,
    by_color: BTreeMap<Color, i32>,
}

#[test]
fn enums_store_their_values() {
    let palette = Palette {
        main: Color::Green,
        level: Level::High,
        by_color: BTreeMap::from([(Color::Red, 1), (Color::Green, 2)]),
    };
    let encoded = encode(&palette, Codec::Json).unwrap();
    assert_eq!(
        encoded,
        value(json!({"main": "green", "level": 2, "by_color": {"red": 1, "green": 2}}))
    );

    let decoded = decode::<Palette>(encoded, Codec::Json).unwrap();
    assert_eq!(decoded.into_exact().unwrap(), palette);
}

#[test]
fn unknown_enum_values_use_fallback() {
    let raw = value(json!({"main": "purple", "level": 1, "by_color": {"teal": 3}}));
    let decoded = decode::<Palette>(raw.clone(), Codec::Json).unwrap();

    let reasons = decoded.reasons().to_vec();
    assert_eq!(reasons.len(), 2);
    assert_eq!(reasons[0].path, "main");
    assert!(matches!(
        &reasons[0].kind,
        LossyKind::UnknownEnumValue { value, .. } if *value == Value::from("purple")
    ));

    let palette = decoded.into_lossy_value();
    assert_eq!(palette.main, Color::Unknown);
    assert_eq!(palette.by_color.get(&Color::Unknown), Some(&3));

    // Unlike a multi-type fallback, the enum fallback has a value of its own
    // and is written back in place of the one read.
    assert_eq!(
        encode(&palette, Codec::Json).unwrap(),
        value(json!({"main": "unknown", "level": 1, "by_color": {"unknown": 3}}))
    );

    let err = decode::<Palette>(value(json!({"main": "red", "level": 3, "by_color": {}})), Codec::Json)
        .unwrap_err();
    assert_eq!(path_of(&err), "level");
    assert!(matches!(kind_of(&err), ValueErrorKind::UnknownEnumValue { .. }));

    let strict = DecodeOptions::new(Codec::Json).with_allow_lossy(false);
    let err = decode_with::<Palette>(raw, &strict).unwrap_err();
    assert_eq!(path_of(&err), "main");
}

// -----------------------------------------------------------------------------
// Paths

#[derive(Record, Debug, Clone, PartialEq)]
struct Child {
    name: String,
    #[io(soft_default = Value::Null)]
    meta: Value,
}

#[derive(Record, Debug, Clone, PartialEq)]
struct Parent {
    children: Vec<Child>,
}

#[derive(Record, Debug, Clone, PartialEq)]
#[io(auto_register)]
struct Household {
    parent: Parent,
}

#[test]
fn decode_errors_carry_dotted_paths() {
    let raw = value(json!({"parent": {"children": [
        {"name": "a"}, {"name": "b"}, {"name": "c"}, {"name": 5},
    ]}}));
    let err = decode::<Household>(raw, Codec::Json).unwrap_err();

    assert_eq!(path_of(&err), "parent.children.3.name");
    assert!(matches!(kind_of(&err), ValueErrorKind::TypeMismatch { .. }));
    assert!(err.to_string().starts_with("at `parent.children.3.name`: expected str"));

    let stack = err.as_value_error().unwrap().type_stack.clone();
    if cfg!(all(debug_assertions, feature = "debug")) {
        let stack = stack.expect("type stack");
        assert!(stack.contains("Household"));
        assert!(stack.ends_with(&format!("`{}`", core::any::type_name::<Child>())));
    } else {
        assert_eq!(stack, None);
    }
}

#[test]
fn encode_errors_carry_dotted_paths() {
    let household = Household {
        parent: Parent {
            children: vec![
                Child {
                    name: "a".into(),
                    meta: Value::Null,
                },
                Child {
                    name: "b".into(),
                    meta: Value::from(vec![Value::Bytes(Bytes::from_static(b"raw"))]),
                },
            ],
        },
    };

    let err = encode(&household, Codec::Json).unwrap_err();
    assert_eq!(path_of(&err), "parent.children.1.meta.0");
    assert!(matches!(kind_of(&err), ValueErrorKind::NotCodecLegal { .. }));

    encode(&household, Codec::Firestore).unwrap();
}

#[test]
fn missing_field() {
    let err = decode::<Point>(value(json!({"x": 1})), Codec::Json).unwrap_err();
    assert_eq!(path_of(&err), "y");
    assert_eq!(kind_of(&err), &ValueErrorKind::MissingField);
}

// -----------------------------------------------------------------------------
// Defaults

fn default_tags() -> Vec<String> {
    vec!["new".to_owned()]
}

#[derive(Record, Debug, Clone, PartialEq)]
struct Settings {
    name: String,
    #[io(store_default = false, default)]
    retries: i64,
    #[io(store_default = false, soft_default = 30)]
    timeout: i64,
    #[io(store_default = false, default_factory = default_tags)]
    tags: Vec<String>,
    #[io(storage_name = "v", soft_default = 1)]
    version: i64,
}

#[test]
fn default_values_are_omitted() {
    let settings = Settings {
        name: "main".into(),
        retries: 0,
        timeout: 30,
        tags: default_tags(),
        version: 1,
    };

    let first = encode(&settings, Codec::Json).unwrap();
    assert_eq!(first, value(json!({"name": "main", "v": 1})));

    let decoded = decode::<Settings>(first.clone(), Codec::Json)
        .unwrap()
        .into_exact()
        .unwrap();
    assert_eq!(decoded, settings);

    let second = encode(&decoded, Codec::Json).unwrap();
    assert_eq!(first, second);
}

#[test]
fn non_default_values_are_stored() {
    let settings = Settings {
        name: "main".into(),
        retries: 2,
        timeout: 10,
        tags: vec![],
        version: 3,
    };
    let encoded = encode(&settings, Codec::Json).unwrap();
    assert_eq!(
        encoded,
        value(json!({"name": "main", "retries": 2, "timeout": 10, "tags": [], "v": 3}))
    );

    let missing_version = value(json!({"name": "x"}));
    let decoded = decode::<Settings>(missing_version, Codec::Json).unwrap();
    assert_eq!(decoded.value().version, 1);
    assert_eq!(decoded.value().tags, default_tags());
}

// -----------------------------------------------------------------------------
// Sets

#[derive(Record, Debug, PartialEq)]
struct Tagged {
    tags: HashSet<String>,
    scores: HashSet<i64>,
}

#[test]
fn sets_are_sorted() {
    let tagged = Tagged {
        tags: ["c", "a", "b"].into_iter().map(String::from).collect(),
        scores: [10, -1, 3].into_iter().collect(),
    };

    let encoded = encode(&tagged, Codec::Json).unwrap();
    assert_eq!(
        encoded,
        value(json!({"tags": ["a", "b", "c"], "scores": [-1, 3, 10]}))
    );

    // Same content, same bytes.
    let again = Tagged {
        tags: ["b", "c", "a"].into_iter().map(String::from).collect(),
        scores: [3, 10, -1].into_iter().collect(),
    };
    assert_eq!(record_hash(&tagged).unwrap(), record_hash(&again).unwrap());

    let decoded = decode::<Tagged>(encoded, Codec::Json).unwrap();
    assert_eq!(decoded.into_exact().unwrap(), tagged);
}

// -----------------------------------------------------------------------------
// Extra attributes

#[derive(Record, Debug, Clone, PartialEq)]
struct Loose {
    a: i64,
    #[io(extra)]
    extra: ExtraAttrs,
}

#[test]
fn unknown_attrs_are_carried_through() {
    let raw = value(json!({"a": 1, "future": "x", "nested": {"k": [1, 2]}}));
    let loose = decode::<Loose>(raw.clone(), Codec::Json)
        .unwrap()
        .into_exact()
        .unwrap();
    assert_eq!(loose.extra.len(), 2);
    assert_eq!(loose.extra.get("future"), Some(&Value::from("x")));

    assert_eq!(encode(&loose, Codec::Json).unwrap(), raw);

    let discard = EncodeOptions::new(Codec::Json).with_discard_extra_attrs(true);
    assert_eq!(encode_with(&loose, &discard).unwrap(), value(json!({"a": 1})));

    let dropped = DecodeOptions::new(Codec::Json).with_discard_unknown_attrs(true);
    let loose = decode_with::<Loose>(raw.clone(), &dropped).unwrap().into_exact().unwrap();
    assert!(loose.extra.is_empty());

    let strict = DecodeOptions::new(Codec::Json).with_allow_unknown_attrs(false);
    let err = decode_with::<Loose>(raw, &strict).unwrap_err();
    assert!(matches!(kind_of(&err), ValueErrorKind::UnknownAttr(key) if key == "future"));
}

#[test]
fn extra_attrs_are_checked_on_output() {
    let mut loose = Loose {
        a: 1,
        extra: ExtraAttrs::new(),
    };

    loose.extra.insert("a".into(), Value::Int(2));
    let err = encode(&loose, Codec::Json).unwrap_err();
    assert!(matches!(kind_of(&err), ValueErrorKind::ExtraAttrCollision(key) if key == "a"));

    loose.extra.clear();
    loose.extra.insert("blob".into(), Value::Bytes(Bytes::from_static(b"\x00")));
    let err = encode(&loose, Codec::Json).unwrap_err();
    assert_eq!(path_of(&err), "blob");
    assert!(encode(&loose, Codec::Firestore).is_ok());
}

#[test]
fn records_without_extra_slot_drop_unknown_attrs() {
    let decoded = decode::<Point>(value(json!({"x": 1, "y": 2, "z": 3})), Codec::Json).unwrap();
    assert_eq!(decoded.into_exact().unwrap(), Point { x: 1, y: 2 });
}

// -----------------------------------------------------------------------------
// Hooks and validation

fn rename_legacy(map: &mut ValueMap) {
    if let Some(old) = map.remove("title") {
        map.insert("name".into(), old);
    }
}

#[derive(Record, Debug, PartialEq)]
#[io(will_input = rename_legacy)]
struct Renamed {
    name: String,
}

fn broken_counter(_: &IoError) -> Option<Counter> {
    Some(Counter { count: 0 })
}

fn non_negative(count: &i64) -> Result<(), String> {
    if *count >= 0 {
        Ok(())
    } else {
        Err(format!("{count} is negative"))
    }
}

#[derive(Record, Debug, PartialEq)]
#[io(handle_input_error = broken_counter)]
struct Counter {
    #[io(validate = non_negative)]
    count: i64,
}

#[derive(Record, Debug, PartialEq)]
struct Strict {
    #[io(validate = non_negative)]
    count: i64,
}

#[derive(Record, Debug, PartialEq)]
struct Tally {
    counter: Counter,
}

#[test]
fn will_input_rewrites_raw_map() {
    let decoded = decode::<Renamed>(value(json!({"title": "old"})), Codec::Json).unwrap();
    assert_eq!(decoded.into_exact().unwrap(), Renamed { name: "old".into() });
}

#[test]
fn handle_input_error_substitutes() {
    let decoded = decode::<Tally>(value(json!({"counter": {"count": "lots"}})), Codec::Json).unwrap();
    assert_eq!(decoded.into_exact().unwrap().counter, Counter { count: 0 });

    let decoded = decode::<Tally>(value(json!({"counter": {"count": -4}})), Codec::Json).unwrap();
    assert_eq!(decoded.into_exact().unwrap().counter, Counter { count: 0 });
}

#[test]
fn validators_run_both_ways() {
    let err = encode(&Strict { count: -1 }, Codec::Json).unwrap_err();
    assert_eq!(path_of(&err), "count");
    assert_eq!(
        kind_of(&err),
        &ValueErrorKind::Validation("-1 is negative".into())
    );
    assert!(validate(&Strict { count: 1 }, Codec::Json).is_ok());

    let err = decode::<Strict>(value(json!({"count": -2})), Codec::Json).unwrap_err();
    assert_eq!(path_of(&err), "count");
}

// -----------------------------------------------------------------------------
// Codecs

#[derive(Record, Debug, Clone, PartialEq)]
struct Blob {
    data: Bytes,
    at: DateTime<Utc>,
    span: TimeDelta,
    #[io(whole_hours)]
    slot: Option<DateTime<Utc>>,
}

fn blob() -> Blob {
    Blob {
        data: Bytes::from_static(b"hello"),
        at: Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap() + TimeDelta::microseconds(6),
        span: TimeDelta::days(1) + TimeDelta::seconds(2) + TimeDelta::microseconds(3),
        slot: Some(Utc.with_ymd_and_hms(2020, 1, 2, 3, 0, 0).unwrap()),
    }
}

#[test]
fn json_codec_forms() {
    let encoded = encode(&blob(), Codec::Json).unwrap();
    assert_eq!(
        encoded,
        value(json!({
            "data": "aGVsbG8=",
            "at": [2020, 1, 2, 3, 4, 5, 6],
            "span": [1, 2, 3],
            "slot": [2020, 1, 2, 3, 0, 0, 0],
        }))
    );
    assert_eq!(decode::<Blob>(encoded, Codec::Json).unwrap().into_exact().unwrap(), blob());
}

#[test]
fn firestore_codec_forms() {
    let encoded = encode(&blob(), Codec::Firestore).unwrap();
    assert_eq!(encoded.get("data"), Some(&Value::Bytes(Bytes::from_static(b"hello"))));
    assert_eq!(encoded.get("at"), Some(&Value::DateTime(blob().at)));
    assert_eq!(
        decode::<Blob>(encoded.clone(), Codec::Firestore)
            .unwrap()
            .into_exact()
            .unwrap(),
        blob()
    );

    // Firestore values are not JSON values.
    assert!(decode::<Blob>(encoded, Codec::Json).is_err());
}

#[test]
fn granularity_is_enforced() {
    let mut off_hour = blob();
    off_hour.slot = Some(Utc.with_ymd_and_hms(2020, 1, 2, 3, 30, 0).unwrap());

    let err = encode(&off_hour, Codec::Json).unwrap_err();
    assert_eq!(path_of(&err), "slot");
    assert!(matches!(kind_of(&err), ValueErrorKind::NotWhole { .. }));

    let mut raw = encode(&blob(), Codec::Json).unwrap();
    raw.as_map_mut()
        .unwrap()
        .insert("slot".into(), value(json!([2020, 1, 2, 3, 30, 0, 0])));
    let err = decode::<Blob>(raw, Codec::Json).unwrap_err();
    assert_eq!(path_of(&err), "slot");
}

#[test]
fn json_text_round_trip() {
    let text = to_json(&blob(), JsonStyle::Pretty).unwrap();
    let decoded = from_json::<Blob>(&text).unwrap();
    assert_eq!(decoded.into_exact().unwrap(), blob());
}

#[derive(Record, Debug, Clone, PartialEq)]
struct Precise {
    when: DateTime<Utc>,
    span: TimeDelta,
}

#[test]
fn sub_microsecond_values_are_refused() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let fine_when = Precise {
        when: start + TimeDelta::nanoseconds(1_500),
        span: TimeDelta::microseconds(1),
    };
    let fine_span = Precise {
        when: start,
        span: TimeDelta::nanoseconds(1_500),
    };

    for codec in [Codec::Json, Codec::Firestore] {
        let err = encode(&fine_when, codec).unwrap_err();
        assert_eq!(path_of(&err), "when");
        assert!(matches!(kind_of(&err), ValueErrorKind::InvalidDateTime(_)));

        let err = encode(&fine_span, codec).unwrap_err();
        assert_eq!(path_of(&err), "span");
        assert!(matches!(kind_of(&err), ValueErrorKind::InvalidTimeDelta(_)));
    }

    let exact = Precise {
        when: start + TimeDelta::microseconds(2),
        span: TimeDelta::nanoseconds(-3_000),
    };
    for codec in [Codec::Json, Codec::Firestore] {
        let encoded = encode(&exact, codec).unwrap();
        assert_eq!(decode::<Precise>(encoded, codec).unwrap().into_exact().unwrap(), exact);
    }

    // Native input is held to the same precision.
    let mut raw = ValueMap::new();
    raw.insert("when".into(), Value::DateTime(start + TimeDelta::nanoseconds(1)));
    raw.insert("span".into(), value(json!([0, 0, 0])));
    let err = decode::<Precise>(Value::Map(raw), Codec::Firestore).unwrap_err();
    assert_eq!(path_of(&err), "when");
}

// -----------------------------------------------------------------------------
// Concurrent first use

#[derive(Record, Debug, Clone, PartialEq)]
struct Beacon {
    id: i64,
    label: String,
}

#[derive(Record, Debug, Clone, PartialEq)]
struct Relay<T> {
    hop: T,
    beacon: Beacon,
}

#[test]
fn first_use_from_many_threads() {
    use crate::RecordType;

    let results: Vec<(usize, usize)> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8_i64)
            .map(|n| {
                scope.spawn(move || {
                    let relay = Relay {
                        hop: n % 2 == 0,
                        beacon: Beacon { id: n, label: format!("b{n}") },
                    };
                    let encoded = encode(&relay, Codec::Json).unwrap();
                    let decoded = decode::<Relay<bool>>(encoded, Codec::Json).unwrap();
                    assert_eq!(decoded.into_exact().unwrap(), relay);

                    (
                        Beacon::schema() as *const _ as usize,
                        Relay::<bool>::schema() as *const _ as usize,
                    )
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(results.iter().all(|pair| *pair == results[0]));
    assert_eq!(PrepSession::prep::<Relay<bool>>(), Ok(()));
}

// -----------------------------------------------------------------------------
// Generic records

#[derive(Record, Debug, PartialEq)]
struct Wrapper<T> {
    value: T,
}

#[test]
fn generic_records_have_one_schema_per_instance() {
    use crate::RecordType;

    assert!(!core::ptr::eq(
        Wrapper::<i64>::schema(),
        Wrapper::<String>::schema()
    ));
    assert!(core::ptr::eq(Wrapper::<i64>::schema(), Wrapper::<i64>::schema()));

    let encoded = encode(&Wrapper { value: 5_i64 }, Codec::Json).unwrap();
    assert_eq!(encoded, value(json!({"value": 5})));

    let decoded = decode::<Wrapper<String>>(value(json!({"value": "s"})), Codec::Json).unwrap();
    assert_eq!(decoded.into_exact().unwrap(), Wrapper { value: "s".to_owned() });
}

// -----------------------------------------------------------------------------
// Schema errors

#[derive(Record)]
struct Ambiguous {
    a: Option<Option<i64>>,
}

#[derive(Record)]
struct NullableAny {
    v: Option<Value>,
}

#[derive(Record)]
struct NoDefault {
    #[io(store_default = false)]
    b: i64,
}

#[derive(Record)]
struct SameKey {
    #[io(storage_name = "k")]
    a: i64,
    #[io(storage_name = "k")]
    b: i64,
}

#[derive(Record)]
struct DaysOnInt {
    #[io(whole_days)]
    n: i64,
}

#[derive(MultiType)]
enum Mislabeled {
    #[io(id = "a")]
    Only(Wrong),
}

#[derive(Record)]
#[io(multi_type = Mislabeled, type_id = "b")]
struct Wrong {
    n: i64,
}

#[derive(MultiType)]
#[io(tag = "kind")]
enum Clashing {
    #[io(id = "a")]
    Only(Clash),
}

#[derive(Record)]
#[io(multi_type = Clashing, type_id = "a")]
struct Clash {
    kind: String,
}

#[test]
fn schema_errors_are_reported_before_values() {
    let err = encode(&Ambiguous { a: None }, Codec::Json).unwrap_err();
    assert!(matches!(
        err,
        IoError::Schema(SchemaError::NestedOptional { field: "a", .. })
    ));

    let err = encode(&NullableAny { v: Some(Value::Null) }, Codec::Json).unwrap_err();
    assert!(matches!(
        err,
        IoError::Schema(SchemaError::OptionalAny { field: "v", .. })
    ));
    assert!(decode::<NullableAny>(value(json!({"v": null})), Codec::Json).is_err());

    assert!(matches!(
        PrepSession::prep::<NoDefault>(),
        Err(SchemaError::MissingDefault { field: "b", .. })
    ));
    assert!(matches!(
        PrepSession::prep::<SameKey>(),
        Err(SchemaError::DuplicateStorageName { storage_name: "k", .. })
    ));
    assert!(matches!(
        PrepSession::prep::<DaysOnInt>(),
        Err(SchemaError::MisplacedDateTimeAttr { attr: "whole_days", .. })
    ));
    assert!(matches!(
        PrepSession::prep::<Mislabeled>(),
        Err(SchemaError::MemberIdMismatch { .. })
    ));
    assert!(matches!(
        PrepSession::prep::<Clashing>(),
        Err(SchemaError::TagCollision { field: "kind", .. })
    ));

    // Cached: the same error again.
    assert_eq!(
        PrepSession::prep::<NoDefault>(),
        PrepSession::prep::<NoDefault>()
    );
}

#[test]
fn top_level_must_be_a_record() {
    assert!(matches!(
        encode(&5_i64, Codec::Json),
        Err(IoError::NotARecord(_))
    ));
    assert!(matches!(
        Inputter::new(DecodeOptions::new(Codec::Json)).run::<Vec<i64>>(Value::List(vec![])),
        Err(IoError::NotARecord(_))
    ));
}

#[cfg(feature = "auto_register")]
#[test]
fn registered_types_prep() {
    let registered: Vec<_> = crate::registry::registered_types().collect();
    assert!(registered.iter().any(|path| path.ends_with("::Point")));
    assert!(registered.iter().any(|path| path.ends_with("::Shape")));
    assert!(registered.iter().any(|path| path.ends_with("::Household")));

    assert_eq!(crate::registry::prep_registered().unwrap(), registered.len());
}
