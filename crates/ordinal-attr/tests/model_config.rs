//! Loading a model description from TOML and driving its bindings.

use ordinal_attr::{ConfigError, MemoryRecord, ModelConfig};
use ordinal_bitset::{ColumnKind, Scalar};
use ordinal_enum::Namespace;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

const PARTY: &str = r#"
[types]
Product = ["Silver", "Gold", "Titanium"]
Drinks = ["Beer", "Wine", "CubaLibre"]
MusicStyles = ["Rock", "Pop", "RnB"]

[enums.product]

[sets.drinks]
column_name = "drinks_set"

[sets.music]
enum_class = "MusicStyles"
"#;

fn temp_path(prefix: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "ordinal-attr-{prefix}-{}-{unique}.toml",
        std::process::id()
    ))
}

#[test]
fn load_and_bind() {
    let path = temp_path("party");
    std::fs::write(&path, PARTY).expect("fixture should write");
    let config = ModelConfig::load(&path).expect("config should load");
    let _ = std::fs::remove_file(&path);

    let mut scope = Namespace::root();
    let bindings = config.bind(&mut scope).expect("bindings should resolve");
    assert_eq!(scope.len(), 3);

    let product = bindings.enum_attribute("product").expect("product binding");
    assert_eq!(product.column(), "product_type");
    let drinks = bindings.set_attribute("drinks").expect("drinks binding");
    assert_eq!(drinks.column(), "drinks_set");
    let music = bindings.set_attribute("music").expect("music binding");
    assert_eq!(music.column(), "music_bitfield");
    assert_eq!(music.enum_type().name(), Some("MusicStyles"));

    let mut party = MemoryRecord::new()
        .with_column("drinks_set", ColumnKind::Integer)
        .with_column("music_bitfield", ColumnKind::Integer);
    product.assign(&mut party, "Gold").expect("product");
    drinks.assign(&mut party, "Beer, CubaLibre").expect("drinks");
    music.assign(&mut party, "Rock, pop").expect("music");
    assert_eq!(party.get("music_bitfield"), Some(&Scalar::Integer(0b11)));

    assert!(bindings.validate(&mut party));
    bindings.after_save(&mut party);
    assert!(!product.has_changed(&party));
    assert!(!drinks.has_changed(&party));
    assert!(!music.has_changed(&party));
}

#[test]
fn validation_reports_every_stale_column() {
    let config = ModelConfig::from_toml_str(PARTY).expect("config should parse");
    let bindings = config
        .bind(&mut Namespace::root())
        .expect("bindings should resolve");

    let mut record = MemoryRecord::new();
    record.set("product_type", "Platin");
    record.set("drinks_set", 8);
    assert!(!bindings.validate(&mut record));
    insta::assert_json_snapshot!(record.errors(), @r###"
    [
      {
        "column": "product_type",
        "message": "Wrong type 'Platin' for enum 'product'"
      },
      {
        "column": "drinks_set",
        "message": "Unknown members in '8' for set 'drinks'"
      }
    ]
    "###);
}

#[test]
fn missing_file_is_a_read_error() {
    let err = ModelConfig::load(temp_path("missing")).expect_err("file does not exist");
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn redefining_a_type_fails() {
    let config = ModelConfig::from_toml_str(PARTY).expect("config should parse");
    let mut scope = Namespace::root();
    scope.define("Drinks", ["Water"]).expect("existing type");
    assert!(matches!(
        config.bind(&mut scope),
        Err(ConfigError::Definition(_))
    ));
}
