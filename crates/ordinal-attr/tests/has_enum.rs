//! Enum attribute behavior against an in-memory record.

use ordinal_attr::{AssignError, EnumAttribute, MemoryRecord};
use ordinal_bitset::{ColumnKind, Scalar};
use ordinal_enum::{EnumType, define_enum_type};
use std::sync::Arc;

fn product_type() -> Arc<EnumType> {
    define_enum_type(Some("Product"), ["Silver", "Gold", "Titanium"]).expect("product should define")
}

fn product() -> EnumAttribute {
    EnumAttribute::new("product", product_type())
}

fn text_record() -> MemoryRecord {
    MemoryRecord::new().with_column("product_type", ColumnKind::Text)
}

#[test]
fn stores_the_value_name_in_text_columns() {
    let product = product();
    let mut record = text_record();
    let gold = product.enum_type().with_name("Gold").expect("gold");

    product.assign(&mut record, gold).expect("assign");
    assert_eq!(record.get("product_type"), Some(&Scalar::from("Gold")));
    assert_eq!(product.read(&record), Some(gold));
}

#[test]
fn stores_the_ordinal_in_integer_columns() {
    let product = product();
    let mut record = MemoryRecord::new().with_column("product_type", ColumnKind::Integer);

    product.assign(&mut record, "Titanium").expect("assign");
    assert_eq!(record.get("product_type"), Some(&Scalar::Integer(2)));

    record.set("product_type", 0);
    assert_eq!(product.read(&record).map(|v| v.name()), Some("Silver"));
}

#[test]
fn blank_input_clears_and_marks_changed() {
    let product = product();
    for blank in [None, Some("    ")] {
        let mut record = text_record();
        product.assign(&mut record, "Silver").expect("assign");
        product.reset_changed(&mut record);
        assert!(!product.has_changed(&record));

        product.assign(&mut record, blank).expect("clear");
        assert_eq!(product.read(&record), None);
        assert!(product.has_changed(&record));
    }
}

#[test]
fn accepts_names_underscored_names_and_ordinals() {
    let product = product();
    for input in ["Gold", "gold", "1"] {
        let mut record = text_record();
        product.assign(&mut record, "Silver").expect("assign");
        product.reset_changed(&mut record);
        product.assign(&mut record, input).expect("assign");
        assert_eq!(product.read(&record).map(|v| v.name()), Some("Gold"), "{input}");
        assert!(product.has_changed(&record), "{input}");
    }

    let mut record = text_record();
    product.assign(&mut record, 1).expect("ordinal");
    assert_eq!(product.read(&record).map(|v| v.name()), Some("Gold"));
}

#[test]
fn rejects_values_it_cannot_resolve() {
    let product = product();
    let fakes = define_enum_type(Some("Fakes"), ["NOT_DEFINIED"]).expect("fakes");
    let mut record = text_record();

    for input in ["Product::Titanium", "symbol", "Platin"] {
        assert_eq!(
            product.assign(&mut record, input),
            Err(AssignError::Unresolved {
                attribute: "product".to_string(),
                input: input.to_string(),
            })
        );
    }
    assert!(product.assign(&mut record, fakes.first()).is_err());
    assert_eq!(record.get("product_type"), None);
    assert!(!product.has_changed(&record));
}

#[test]
fn reassigning_the_same_value_is_not_a_change() {
    let product = product();
    let mut record = text_record();
    product.assign(&mut record, "Silver").expect("assign");
    assert!(product.has_changed(&record));
    product.reset_changed(&mut record);

    product.assign(&mut record, "silver").expect("same value");
    assert!(!product.has_changed(&record));

    product.assign_raw(&mut record, Some(Scalar::from("Gold")));
    assert!(product.has_changed(&record));
}

#[test]
fn custom_column_name() {
    let product = product().with_column("product_enum");
    let mut record = MemoryRecord::new();
    product.assign(&mut record, "Gold").expect("assign");
    assert_eq!(record.get("product_enum"), Some(&Scalar::from("Gold")));
    assert_eq!(record.get("product_type"), None);
}

#[test]
fn stale_values_read_as_none_and_fail_validation() {
    let product = product();
    let mut record = text_record();
    assert!(product.validate(&mut record));

    record.set("product_type", "Platin");
    assert_eq!(product.read(&record), None);
    assert!(!product.validate(&mut record));
    assert_eq!(
        record.errors_on("product_type"),
        vec!["Wrong type 'Platin' for enum 'product'"]
    );
}

#[test]
fn validates_integer_columns() {
    let product = product();
    let mut record = MemoryRecord::new().with_column("product_type", ColumnKind::Integer);
    product.assign(&mut record, "Titanium").expect("assign");
    assert!(product.validate(&mut record));

    record.set("product_type", 20);
    assert!(!product.validate(&mut record));
}

#[test]
fn value_predicates() {
    let product = product();
    let mut record = text_record();
    let silver = product.enum_type().first();
    product.assign(&mut record, silver).expect("assign");
    assert!(product.is(&record, silver));
    assert_eq!(product.predicate(&record, "product_silver"), Some(true));
    assert_eq!(product.predicate(&record, "product_gold"), Some(false));

    product.assign(&mut record, "Gold").expect("assign");
    assert_eq!(product.predicate(&record, "product_silver"), Some(false));
    assert_eq!(product.predicate(&record, "product_gold"), Some(true));
}
