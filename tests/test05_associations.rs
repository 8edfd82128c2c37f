use sql_rowshape::convert::{to_records, to_typed};
use sql_rowshape::{CellValue, FromMapping, MappedRow, RowShapeError};

fn owner_map(id: i64, name: &str) -> CellValue {
    CellValue::Map(MappedRow::from_pairs(vec![
        ("id".to_string(), CellValue::Int(id)),
        ("name".to_string(), CellValue::Text(name.to_string())),
    ]))
}

fn pet_row(id: i64, owner: CellValue) -> MappedRow {
    MappedRow::from_pairs(vec![
        ("id".to_string(), CellValue::Int(id)),
        ("owner".to_string(), owner),
    ])
}

#[test]
fn nested_mapping_becomes_a_generated_record() {
    let rows = vec![pet_row(1, owner_map(2, "x"))];
    let records = to_records(rows, &["owner"]).unwrap();

    let pet = &records[0];
    assert_eq!(pet.get("id"), Some(&CellValue::Int(1)));

    let owner = pet.get("owner").and_then(CellValue::as_record).unwrap();
    assert_eq!(
        owner.record_type().fields(),
        ["id".to_string(), "name".to_string()]
    );
    assert_eq!(owner.get("id"), Some(&CellValue::Int(2)));
    assert_eq!(owner.get("name"), Some(&CellValue::Text("x".to_string())));
}

#[test]
fn nested_sequences_convert_each_mapping_in_order() {
    let pets = CellValue::Array(vec![
        owner_map(10, "rex"),
        owner_map(11, "spot"),
    ]);
    let row = MappedRow::from_pairs(vec![
        ("id".to_string(), CellValue::Int(1)),
        ("pets".to_string(), pets),
    ]);

    let records = to_records(vec![row], &["pets"]).unwrap();
    let pets = records[0].get("pets").and_then(CellValue::as_array).unwrap();
    assert_eq!(pets.len(), 2);
    let first = pets[0].as_record().unwrap();
    let second = pets[1].as_record().unwrap();
    assert_eq!(first.get("id"), Some(&CellValue::Int(10)));
    assert_eq!(second.get("id"), Some(&CellValue::Int(11)));
    // Identically shaped nested rows share one generated type.
    assert!(std::sync::Arc::ptr_eq(
        first.record_type(),
        second.record_type()
    ));
}

#[test]
fn mixed_sequences_touch_only_the_mappings() {
    let values = CellValue::Array(vec![
        owner_map(1, "a"),
        CellValue::Null,
        CellValue::Int(99),
    ]);
    let row = MappedRow::from_pairs(vec![("items".to_string(), values)]);

    let records = to_records(vec![row], &["items"]).unwrap();
    let items = records[0].get("items").and_then(CellValue::as_array).unwrap();
    assert!(items[0].as_record().is_some());
    assert_eq!(items[1], CellValue::Null);
    assert_eq!(items[2], CellValue::Int(99));
}

#[test]
fn scalar_and_null_association_values_stay_untouched() {
    let rows = vec![
        pet_row(1, CellValue::Null),
        pet_row(2, CellValue::Int(42)),
    ];
    let records = to_records(rows, &["owner"]).unwrap();
    assert_eq!(records[0].get("owner"), Some(&CellValue::Null));
    assert_eq!(records[1].get("owner"), Some(&CellValue::Int(42)));
}

#[test]
fn absent_association_fields_are_skipped() {
    let row = MappedRow::from_pairs(vec![("id".to_string(), CellValue::Int(1))]);
    let records = to_records(vec![row], &["owner"]).unwrap();
    assert_eq!(records[0].record_type().fields(), ["id".to_string()]);
}

#[test]
fn association_expansion_recurses_into_nested_rows() {
    let tags = CellValue::Array(vec![CellValue::Map(MappedRow::from_pairs(vec![(
        "label".to_string(),
        CellValue::Text("good".to_string()),
    )]))]);
    let owner = CellValue::Map(MappedRow::from_pairs(vec![
        ("id".to_string(), CellValue::Int(2)),
        ("tags".to_string(), tags),
    ]));
    let row = pet_row(1, owner);

    let records = to_records(vec![row], &["owner", "tags"]).unwrap();
    let owner = records[0].get("owner").and_then(CellValue::as_record).unwrap();
    let tags = owner.get("tags").and_then(CellValue::as_array).unwrap();
    assert_eq!(
        tags[0].as_record().unwrap().get("label"),
        Some(&CellValue::Text("good".to_string()))
    );
}

#[test]
fn no_associations_means_plain_materialization() {
    let rows = vec![pet_row(1, owner_map(2, "x"))];
    let records = to_records(rows, &[]).unwrap();
    // The nested mapping is still a mapping.
    assert!(records[0].get("owner").and_then(CellValue::as_map).is_some());
}

#[derive(Debug)]
struct Pet {
    id: i64,
    owner: Option<sql_rowshape::Record>,
}

impl FromMapping for Pet {
    fn from_mapping(row: MappedRow) -> Result<Self, RowShapeError> {
        let id = row.get("id").and_then(CellValue::as_int).copied().ok_or_else(|| {
            RowShapeError::ConstructionError("id must be an integer".to_string())
        })?;
        let owner = match row.get("owner") {
            Some(CellValue::Record(record)) => Some(record.clone()),
            Some(CellValue::Null) | None => None,
            _ => {
                return Err(RowShapeError::ConstructionError(
                    "owner must be an expanded record or null".to_string(),
                ));
            }
        };
        Ok(Pet { id, owner })
    }
}

#[test]
fn typed_targets_see_expanded_records_in_their_mapping() {
    let rows = vec![pet_row(1, owner_map(2, "x")), pet_row(3, CellValue::Null)];
    let pets: Vec<Pet> = to_typed(rows, &["owner"]).unwrap();

    assert_eq!(pets[0].id, 1);
    let owner = pets[0].owner.as_ref().unwrap();
    assert_eq!(owner.get("name"), Some(&CellValue::Text("x".to_string())));
    assert_eq!(pets[1].id, 3);
    assert!(pets[1].owner.is_none());
}

#[test]
fn typed_target_rejections_propagate() {
    let rows = vec![MappedRow::from_pairs(vec![(
        "id".to_string(),
        CellValue::Text("not an int".to_string()),
    )])];
    assert!(matches!(
        to_typed::<Pet>(rows, &[]),
        Err(RowShapeError::ConstructionError(_))
    ));
}
