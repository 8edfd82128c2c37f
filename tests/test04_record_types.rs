use std::sync::Arc;
use std::thread;

use sql_rowshape::{CellValue, Record, RecordType, RowShapeError};

fn names(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

#[test]
fn identical_field_sets_share_one_type() {
    // Same names, same order; which query they came from makes no
    // difference.
    let first = RecordType::get_or_create(&names(&["id", "name"]));
    let second = RecordType::get_or_create(&names(&["id", "name"]));
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn different_field_sets_get_distinct_types() {
    let base = RecordType::get_or_create(&names(&["x", "y"]));
    let reordered = RecordType::get_or_create(&names(&["y", "x"]));
    let wider = RecordType::get_or_create(&names(&["x", "y", "z"]));
    assert!(!Arc::ptr_eq(&base, &reordered));
    assert!(!Arc::ptr_eq(&base, &wider));
}

#[test]
fn records_of_one_type_compare_by_value() {
    let ty = RecordType::get_or_create(&names(&["a", "b"]));
    let left =
        Record::new(&ty, vec![CellValue::Int(1), CellValue::Text("x".to_string())]).unwrap();
    let right =
        Record::new(&ty, vec![CellValue::Int(1), CellValue::Text("x".to_string())]).unwrap();
    let other =
        Record::new(&ty, vec![CellValue::Int(2), CellValue::Text("x".to_string())]).unwrap();
    assert_eq!(left, right);
    assert_ne!(left, other);
}

#[test]
fn arity_mismatch_is_a_construction_error() {
    let ty = RecordType::get_or_create(&names(&["a", "b"]));
    assert!(matches!(
        Record::new(&ty, vec![CellValue::Int(1)]),
        Err(RowShapeError::ConstructionError(_))
    ));
}

#[test]
fn field_lookup_follows_declaration_order() {
    let ty = RecordType::get_or_create(&names(&["first", "second"]));
    assert_eq!(ty.arity(), 2);
    assert_eq!(ty.index_of("first"), Some(0));
    assert_eq!(ty.index_of("second"), Some(1));
    assert_eq!(ty.index_of("third"), None);

    let record = Record::new(&ty, vec![CellValue::Int(10), CellValue::Int(20)]).unwrap();
    assert_eq!(record.get("second"), Some(&CellValue::Int(20)));
    assert_eq!(record.get_by_index(0), Some(&CellValue::Int(10)));
}

#[test]
fn concurrent_first_use_yields_one_type() {
    // A race between first uses of the same attribute set must not mint
    // two types.
    let fields = names(&["race_a", "race_b", "race_c"]);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let fields = fields.clone();
            thread::spawn(move || RecordType::get_or_create(&fields))
        })
        .collect();

    let types: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for ty in &types[1..] {
        assert!(Arc::ptr_eq(&types[0], ty));
    }
}

#[test]
fn records_serialize_as_json_objects() {
    let ty = RecordType::get_or_create(&names(&["id", "ok"]));
    let record = Record::new(&ty, vec![CellValue::Int(7), CellValue::Bool(true)]).unwrap();
    assert_eq!(
        serde_json::to_string(&record).unwrap(),
        r#"{"id":7,"ok":true}"#
    );
}
