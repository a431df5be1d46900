//! Every input field is accounted for exactly once.

use nidm_core::{Datatype, Dictionary, DictionaryEntry, RawRecord, ScalarValue};
use nidm_resolve::FieldResolver;
use rstest::rstest;

fn entry(key: &str, datatype: Datatype) -> DictionaryEntry {
    DictionaryEntry {
        source_key: key.to_string(),
        target_term: format!("qc:{key}"),
        datatype,
        unit: None,
        description: None,
    }
}

fn dictionary() -> Dictionary {
    Dictionary::from_entries([
        entry("cjv", Datatype::Numeric),
        entry("size_x", Datatype::Integer),
        entry("modality", Datatype::String),
        entry("passed", Datatype::Boolean),
    ])
    .unwrap()
}

fn number(lexical: &str) -> ScalarValue {
    ScalarValue::Number(lexical.to_string())
}

fn text(raw: &str) -> ScalarValue {
    ScalarValue::Text(raw.to_string())
}

#[rstest]
#[case::empty(vec![], 0, 0)]
#[case::all_mapped(
    vec![("cjv", number("0.4")), ("size_x", number("176")), ("modality", text("T1w")), ("passed", ScalarValue::Bool(true))],
    4,
    0
)]
#[case::all_unmapped(vec![("a", number("1")), ("b", text("x"))], 0, 2)]
#[case::mixed(
    vec![("cjv", text("bad")), ("size_x", number("1.5")), ("modality", ScalarValue::Null), ("unknown", number("3")), ("passed", text("false"))],
    1,
    4
)]
#[case::duplicate_keys(vec![("cjv", number("0.4")), ("CJV", number("0.5"))], 2, 0)]
fn fields_plus_errors_equals_record_length(
    #[case] fields: Vec<(&str, ScalarValue)>,
    #[case] resolved: usize,
    #[case] errors: usize,
) {
    let dictionary = dictionary();
    let record: RawRecord = fields.into_iter().collect();

    let resolution = FieldResolver::new(&dictionary).resolve(&record);

    assert_eq!(resolution.fields.len(), resolved);
    assert_eq!(resolution.errors.len(), errors);
    assert_eq!(resolution.total(), record.len());
}
