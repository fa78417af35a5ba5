use std::io::Cursor;

use formnest::{DecodeOptions, DuplicateKeys, ErrorKind};
use rstest::rstest;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Schedule {
    start_date: String,
    days_of_week: Vec<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Event {
    title: String,
    schedule: Schedule,
    #[serde(default)]
    tags: Vec<String>,
}

const EVENT_BODY: &str = "title=Weekly+sync\
    &schedule%5BstartDate%5D=2024-01-01\
    &schedule%5BdaysOfWeek%5D%5B0%5D=Mon\
    &schedule%5BdaysOfWeek%5D%5B1%5D=Tue";

fn expected_event() -> Event {
    Event {
        title: "Weekly sync".to_string(),
        schedule: Schedule {
            start_date: "2024-01-01".to_string(),
            days_of_week: vec!["Mon".to_string(), "Tue".to_string()],
        },
        tags: Vec::new(),
    }
}

#[rstest]
#[case("a=1&b=2", json!({"a": "1", "b": "2"}))]
#[case("a[b]=x", json!({"a": {"b": "x"}}))]
#[case("a%5B0%5D=x&a%5B1%5D=y", json!({"a": ["x", "y"]}))]
#[case("tag=a&tag=b", json!({"tag": ["a", "b"]}))]
#[case("a[]=x&a[]=y&b=1", json!({"b": "1"}))]
#[case("note=caf%C3%A9+au+lait", json!({"note": "café au lait"}))]
#[case("", json!({}))]
#[case("flag&empty=", json!({"flag": "", "empty": ""}))]
fn decode_to_value_cases(#[case] body: &str, #[case] expected: Value) {
    let actual = formnest::decode_to_value(body).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(actual, expected);
}

#[rstest]
fn decode_last_wins_duplicates() {
    let options = DecodeOptions::new().with_duplicates(DuplicateKeys::Last);
    let actual = formnest::decode_to_value_with_options("tag=a&tag=b", &options).unwrap();
    assert_eq!(actual, json!({"tag": "b"}));
}

#[rstest]
fn from_str_deserializes_nested_struct() {
    let event: Event = formnest::from_str(EVENT_BODY).expect("decode event");
    assert_eq!(event, expected_event());
}

#[rstest]
fn from_slice_and_from_reader_agree() {
    let from_slice: Event = formnest::from_slice(EVENT_BODY.as_bytes()).expect("slice");
    let from_reader: Event = formnest::from_reader(Cursor::new(EVENT_BODY)).expect("reader");
    assert_eq!(from_slice, expected_event());
    assert_eq!(from_reader, expected_event());
}

#[rstest]
fn from_str_reports_shape_mismatch() {
    let err = formnest::from_str::<Event>("title=x&schedule=now").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Deserialize);
    assert!(err.to_string().starts_with("deserialize failed"));
}

#[rstest]
fn strict_decode_surfaces_conflicts() {
    let options = DecodeOptions::new().with_strict(true);
    let err = formnest::decode_to_value_with_options("a[b]=x&a[0]=y", &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(err.key.as_deref(), Some("a[0]"));
}

#[rstest]
fn repeated_bracketed_field_keeps_array_leaf() {
    let actual = formnest::decode_to_value("a[b]=1&a[b]=2").unwrap();
    assert_eq!(actual, json!({"a": {"b": ["1", "2"]}}));
}

#[rstest]
fn from_flat_map_accepts_predecoded_fields() {
    let flat = match json!({"a[b]": "x", "c": "y"}) {
        Value::Object(map) => map,
        _ => unreachable!(),
    };
    let nested = formnest::decode::from_flat_map(flat, &DecodeOptions::default()).unwrap();
    assert_eq!(Value::Object(nested), json!({"a": {"b": "x"}, "c": "y"}));
}

fn array_cells(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len() + items.iter().map(array_cells).sum::<usize>(),
        Value::Object(map) => map.values().map(array_cells).sum(),
        _ => 0,
    }
}

#[rstest]
fn many_capped_indices_stay_within_hole_budget() {
    let body = (0..2_000)
        .map(|row| format!("k{row}[10000]=x"))
        .collect::<Vec<_>>()
        .join("&");
    let actual = formnest::decode_to_value(&body).expect("lossy decode");
    assert!(array_cells(&actual) <= 2_000 + formnest::constants::DEFAULT_MAX_HOLES);
    assert_eq!(actual["k0"][10_000], json!("x"));
    assert!(actual.get("k1").is_none());
}

#[rstest]
fn default_decode_caps_indices() {
    let actual = formnest::decode_to_value("a[20000]=x").expect("decode");
    assert_eq!(actual, json!({"a": {"20000": "x"}}));
}
