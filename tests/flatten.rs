use formnest::{flatten, EncodeOptions, ErrorKind, NullStyle};
use rstest::rstest;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Schedule {
    start_date: String,
    days_of_week: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Event {
    title: String,
    schedule: Schedule,
}

fn event() -> Event {
    Event {
        title: "Weekly sync".to_string(),
        schedule: Schedule {
            start_date: "2024-01-01".to_string(),
            days_of_week: vec!["Mon".to_string(), "Tue".to_string()],
        },
    }
}

#[rstest]
#[case(json!({"a": "x"}), "a=x")]
#[case(json!({"a": {"b": ["x y"]}}), "a%5Bb%5D%5B0%5D=x+y")]
#[case(json!({"n": 2.0, "f": false}), "n=2&f=false")]
#[case(json!({"a": [null, "x"]}), "a%5B1%5D=x")]
#[case(json!({}), "")]
fn to_string_cases(#[case] input: Value, #[case] expected: &str) {
    let actual = formnest::to_string(&input).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(actual, expected);
}

#[rstest]
fn to_string_with_empty_nulls() {
    let options = EncodeOptions::new().with_nulls(NullStyle::Empty);
    let actual = formnest::to_string_with_options(&json!({"a": null}), &options).unwrap();
    assert_eq!(actual, "a=");
}

#[rstest]
fn flatten_emits_document_order() {
    let pairs = flatten(
        &json!({"title": "x", "schedule": {"startDate": "d", "daysOfWeek": ["Mon"]}}),
        &EncodeOptions::default(),
    )
    .unwrap();
    let keys: Vec<&str> = pairs.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["title", "schedule[startDate]", "schedule[daysOfWeek][0]"]
    );
}

#[rstest]
fn struct_round_trips_through_form_body() {
    let original = event();
    let body = formnest::to_string(&original).expect("encode");
    let decoded: Event = formnest::from_str(&body).expect("decode");
    assert_eq!(decoded, original);
}

#[rstest]
#[case(json!({"a": {"b": ["x", "y"]}, "c": "z"}))]
#[case(json!({"rows": [{"name": "Ada"}, {"name": "Bob", "tags": ["t"]}]}))]
#[case(json!({"m": [["a", "b"], ["c"]]}))]
fn string_trees_round_trip(#[case] value: Value) {
    let body = formnest::to_string(&value).expect("encode");
    let decoded = formnest::decode_to_value(&body).expect("decode");
    assert_eq!(decoded, value);
}

#[rstest]
#[case(json!(["x"]))]
#[case(json!({"": "x"}))]
#[case(json!({"a[b]": "x"}))]
#[case(json!({"a": {"b]": "x"}}))]
fn to_string_rejects_unrepresentable_values(#[case] value: Value) {
    let err = formnest::to_string(&value).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Encode);
}

#[rstest]
#[case(json!({"a": {"0": "x"}}))]
#[case(json!({"rows": [{"7": "x"}]}))]
fn to_string_rejects_digit_names_below_root(#[case] value: Value) {
    let err = formnest::to_string(&value).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Encode);
    assert!(err.to_string().contains("array index"));
}

#[rstest]
fn digit_root_names_round_trip() {
    let value = json!({"0": "x", "1": {"b": ["y"]}});
    let body = formnest::to_string(&value).expect("encode");
    assert_eq!(formnest::decode_to_value(&body).expect("decode"), value);
}
