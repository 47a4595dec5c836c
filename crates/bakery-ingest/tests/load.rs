//! Loading a source directory end to end.

use std::fs;

use bakery_ingest::{IngestError, load_tables};
use bakery_model::{ColumnType, SourceKind};
use tempfile::TempDir;

#[test]
fn utf8_comma_file_reports_comma_and_ascii_compatible_encoding() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("shopify_products.csv"),
        "cookie_sku,product_name,category,price\n\
         CK-CHOC-001,Chocolate Chip,Dozen Cookies,28.00\n\
         ADD-NUTELLA,Nutella Drizzle,Add-on,4.00\n",
    )
    .unwrap();

    let tables = load_tables(dir.path()).unwrap();
    let products = tables.by_kind(SourceKind::Products).unwrap();

    assert_eq!(products.delimiter, b',');
    assert!(matches!(products.encoding.as_str(), "ascii" | "utf-8"));
    assert_eq!(products.row_count(), 2);
    assert_eq!(products.column_type("price"), Some(ColumnType::Float));
}

#[test]
fn loads_mixed_encodings_and_delimiters() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("ingredients.tsv"),
        b"ingredient\tunit\tsupplier\nbutter\tcup\tLa Laiti\xe8re\n".as_slice(),
    )
    .unwrap();
    fs::write(
        dir.path().join("recipes.csv"),
        "sku,ingredient,quantity_unit,quantity\nCK-CHOC-001,butter,cup,0.5\n",
    )
    .unwrap();
    fs::write(dir.path().join("consolidated_inspection_report.txt"), "old report").unwrap();

    let tables = load_tables(dir.path()).unwrap();
    assert_eq!(tables.len(), 2);

    let ingredients = tables.get("ingredients").unwrap();
    assert_eq!(ingredients.delimiter, b'\t');
    assert_eq!(ingredients.encoding, "windows-1252");
    assert_eq!(
        ingredients.text_values(&["supplier"]).unwrap(),
        vec![Some("La Laitière".to_string())]
    );

    let recipes = tables.by_kind(SourceKind::Recipes).unwrap();
    assert_eq!(recipes.numeric_values(&["quantity"]).unwrap(), vec![Some(0.5)]);
}

#[test]
fn undecodable_file_aborts_the_load() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a_ok.csv"), "a,b\n1,2\n").unwrap();
    fs::write(
        dir.path().join("b_bad.csv"),
        [0xFF, 0xFE, 0x00, 0xD8, 0x41, 0x00].as_slice(),
    )
    .unwrap();

    let err = load_tables(dir.path()).unwrap_err();
    assert!(matches!(err, IngestError::Decode { .. }));
}

#[test]
fn missing_directory_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = load_tables(&dir.path().join("source-data")).unwrap_err();
    assert!(matches!(err, IngestError::DirectoryNotFound { .. }));
}
