//! End-to-end report rendering from files on disk.

use std::fs;

use bakery_ingest::load_tables;
use bakery_model::{DimDate, DimProduct, DimensionalModel, RuleId, SourceKind, ValidationIssue};
use bakery_report::{
    ALL_CHECKS_PASSED, NO_MISSING_VALUES, ReportWriter, inspect_tables, write_report_file,
    write_staging_outputs,
};

const PRODUCTS: &str = "\
cookie_sku,product_name,category,price
CK-CHOC-001,Chocolate Chip,Dozen Cookies,28.00
CK-SUGR-001,Sugar,Dozen Cookies,26.00
";

const ORDERS: &str = "\
order_id,date,sku,quantity,total_price
1001,2024-03-01,CK-CHOC-001,1,28.00
1002,2024-03-01,CK-SUGR-001,0,26.00
1002,2024-03-01,CK-SUGR-001,0,26.00
";

#[test]
fn report_has_one_section_per_file_then_summary() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("shopify_products.csv"), PRODUCTS).unwrap();
    fs::write(dir.path().join("shopify_orders.csv"), ORDERS).unwrap();

    let tables = load_tables(dir.path()).unwrap();
    let inspections = inspect_tables(&tables);
    let mut writer = ReportWriter::new(Vec::new());
    writer.write_report(&inspections, &[]).unwrap();
    let text = String::from_utf8(writer.into_inner()).unwrap();

    let orders_at = text.find("INSPECTING FILE: shopify_orders.csv").unwrap();
    let products_at = text.find("INSPECTING FILE: shopify_products.csv").unwrap();
    let summary_at = text.find("VALIDATION SUMMARY").unwrap();
    assert!(orders_at < products_at && products_at < summary_at);

    assert!(text.contains("Delimiter: comma"));
    assert!(text.contains("Rows: 3"));
    assert!(text.contains("Duplicate Rows: 1"));
    assert!(text.contains("Duplicate Rows: 0"));
    assert!(text.contains(NO_MISSING_VALUES));
    assert!(text.contains("Chocolate Chip"));
    assert!(text.trim_end().ends_with(ALL_CHECKS_PASSED));
}

#[test]
fn report_file_is_created_with_parents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reports").join("inspection.txt");
    let issue = ValidationIssue::new(
        RuleId::OrderQuantityPositive,
        SourceKind::Orders,
        "Orders.quantity <= 0 for order_id(s)",
    )
    .with_offending(vec!["1002".to_string()]);

    write_report_file(&path, &[], &[issue]).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("1. Orders.quantity <= 0 for order_id(s): 1002"));
    assert!(!text.contains(ALL_CHECKS_PASSED));
}

#[test]
fn staging_writes_every_table_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let staging = dir.path().join("staging-data");
    let model = DimensionalModel {
        dim_product: vec![DimProduct {
            product_sku: Some("CK-CHOC-001".to_string()),
            product_name: Some("Chocolate Chip".to_string()),
            category: Some("Dozen Cookies".to_string()),
            price: Some(28.0),
            product_key: 1,
        }],
        dim_date: vec![DimDate {
            date_key: 20240301,
            date_only: "2024-03-01".to_string(),
            day_of_week: "Friday".to_string(),
            month: 3,
            year: 2024,
        }],
        ..DimensionalModel::default()
    };

    let staged = write_staging_outputs(&staging, &model).unwrap();

    let names: Vec<&str> = staged.iter().map(|table| table.table).collect();
    assert_eq!(
        names,
        vec![
            "dim_product",
            "dim_date",
            "dim_ingredient",
            "bridge_product_ingredient",
            "fact_orders"
        ]
    );
    assert_eq!(
        fs::read_to_string(staging.join("dim_date.csv")).unwrap(),
        "date_key,date_only,day_of_week,month,year\n20240301,2024-03-01,Friday,3,2024\n"
    );
    assert_eq!(
        fs::read_to_string(staging.join("dim_product.csv")).unwrap(),
        "product_sku,product_name,category,price,product_key\n\
         CK-CHOC-001,Chocolate Chip,Dozen Cookies,28.0,1\n"
    );
    assert_eq!(staged[4].rows, 0);
}
