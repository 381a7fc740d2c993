use repro::{Record, RecordMeta, SCHEMA};
use serde_json::json;

fn sample_record() -> Record {
    let mut record = Record::new(RecordMeta {
        schema: SCHEMA,
        config: json!({ "grid": { "width": 20, "depth": 20 }, "height": { "seed": 7 } }),
        fixed_dt: 0.25,
        frames: 120,
    });
    record.push_shift(40, 1, 21);
    record.push_shift(52, 2, 22);
    record.final_digest = "abc".into();
    record
}

#[test]
fn canonical_format_orders_keys() {
    let text = sample_record().canonical_json().unwrap();
    assert!(text.ends_with('\n'));
    assert!(text.find("\"final_digest\"").unwrap() < text.find("\"meta\"").unwrap());
    assert!(text.find("\"meta\"").unwrap() < text.find("\"shifts\"").unwrap());
    assert!(text.find("\"back_row\"").unwrap() < text.find("\"frame\"").unwrap());
    assert!(text.find("\"depth\"").unwrap() < text.find("\"width\"").unwrap());
}

#[test]
fn canonical_text_parses_back() {
    let record = sample_record();
    let text = record.canonical_json().unwrap();
    let parsed: Record = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, record);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = serde_json::from_str::<Record>(
        r#"{"meta":{"schema":1,"config":{},"fixed_dt":0.1,"frames":1},"shifts":[],"extra":1}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("unknown field"), "{err}");
}
