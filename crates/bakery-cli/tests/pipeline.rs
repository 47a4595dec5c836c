//! Full pipeline runs against a temporary source directory.

use std::fs;
use std::path::{Path, PathBuf};

use bakery_cli::{PipelineError, inspect_sources, run_pipeline};
use bakery_model::{PipelineOptions, RuleId};

const PRODUCTS: &str = "\
cookie_sku,product_name,category,price
CK-CHOC-001,Chocolate Chip,Dozen Cookies,28.00
CK-SUGR-001,Sugar Cookie,Dozen Cookies,24.00
ADD-NUTELLA,Nutella Drizzle,Add-on,4.00
";

const INGREDIENTS: &str = "\
ingredient,unit,grams_per_unit,supplier,container_description,container_grams,cost_per_unit,cost_per_gram
flour,cup,120,Mill Co,5 lb bag,2268,0.30,0.0025
butter,cup,227,Dairy Co,1 lb box,454,2.27,0.01
chocolate chips,cup,170,Choc Co,12 oz bag,340,1.70,0.01
";

const RECIPES: &str = "\
sku,ingredient,quantity_unit,quantity
CK-CHOC-001,flour,cup,2.5
CK-CHOC-001,butter,cup,1
CK-CHOC-001,chocolate chips,cup,2
CK-SUGR-001,flour,cup,3
CK-SUGR-001,butter,cup,1
";

const ORDERS: &str = "\
order_id,date,sku,quantity,add_on_sku,total_price
1001,2024-03-01 10:15:00,CK-CHOC-001,1,ADD-NUTELLA,32.00
1002,2024-03-01 12:00:00,CK-SUGR-001,2,,48.00
1003,2024-03-02 09:30:00,CK-CHOC-001,1,,28.00
";

const BAD_ORDERS: &str = "\
order_id,date,sku,quantity,add_on_sku,total_price
1001,2024-03-01 10:15:00,CK-CHOC-001,1,ADD-NUTELLA,32.00
1002,2024-03-01 12:00:00,CK-BAD-001,2,,48.00
";

const OUTPUT_FILES: [&str; 5] = [
    "dim_product.csv",
    "dim_date.csv",
    "dim_ingredient.csv",
    "bridge_product_ingredient.csv",
    "fact_orders.csv",
];

struct Workspace {
    _dir: tempfile::TempDir,
    source: PathBuf,
    staging: PathBuf,
}

fn workspace(orders: &str) -> Workspace {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source-data");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("shopify_products.csv"), PRODUCTS).unwrap();
    fs::write(source.join("ingredients.csv"), INGREDIENTS).unwrap();
    fs::write(source.join("recipes.csv"), RECIPES).unwrap();
    fs::write(source.join("shopify_orders.csv"), orders).unwrap();
    let staging = dir.path().join("staging-data");
    Workspace {
        _dir: dir,
        source,
        staging,
    }
}

fn read_outputs(staging: &Path) -> Vec<String> {
    OUTPUT_FILES
        .iter()
        .map(|name| fs::read_to_string(staging.join(name)).unwrap())
        .collect()
}

#[test]
fn clean_run_writes_report_and_all_outputs() {
    let ws = workspace(ORDERS);
    let options = PipelineOptions::new(&ws.source);

    let outcome = run_pipeline(&options).unwrap();

    assert!(outcome.issues().is_empty());
    assert!(!outcome.gate.blocked);
    assert_eq!(outcome.staged.len(), 5);
    assert_eq!(options.staging_dir, ws.staging);
    for name in OUTPUT_FILES {
        assert!(ws.staging.join(name).is_file(), "{name} missing");
    }
    let report = fs::read_to_string(&options.report_path).unwrap();
    assert!(report.contains("INSPECTING FILE: shopify_orders.csv"));
    assert!(report.contains("All validation checks passed."));

    let fact = fs::read_to_string(ws.staging.join("fact_orders.csv")).unwrap();
    let mut lines = fact.lines();
    assert_eq!(
        lines.next(),
        Some("order_id,product_key,date_key,quantity,total_price,ingredient_cost,gross_margin")
    );
    assert_eq!(lines.count(), 3);
}

#[test]
fn blocked_run_writes_report_but_leaves_outputs_alone() {
    let ws = workspace(BAD_ORDERS);
    fs::create_dir_all(&ws.staging).unwrap();
    fs::write(ws.staging.join("fact_orders.csv"), "previous run\n").unwrap();
    let options = PipelineOptions::new(&ws.source);

    let error = run_pipeline(&options).unwrap_err();

    let (issue_count, report, issues) = match error {
        PipelineError::DataQuality {
            issue_count,
            report,
            issues,
        } => (issue_count, report, issues),
        other => panic!("expected data quality error, got {other:?}"),
    };
    assert_eq!(issue_count, 1);
    assert_eq!(issues[0].rule, RuleId::OrderSkuReference);
    let text = fs::read_to_string(report).unwrap();
    assert!(text.contains("1. Orders.sku not found in Products.cookie_sku: CK-BAD-001"));
    assert_eq!(
        fs::read_to_string(ws.staging.join("fact_orders.csv")).unwrap(),
        "previous run\n"
    );
    assert!(!ws.staging.join("dim_product.csv").exists());
}

#[test]
fn issues_are_returned_when_not_fatal() {
    let ws = workspace(BAD_ORDERS);
    let options = PipelineOptions::new(&ws.source).with_fail_on_issues(false);

    let outcome = run_pipeline(&options).unwrap();

    assert_eq!(outcome.issues().len(), 1);
    assert_eq!(outcome.gate.issue_count, 1);
    let fact = fs::read_to_string(ws.staging.join("fact_orders.csv")).unwrap();
    assert_eq!(fact.lines().count(), 2, "unmatched order is dropped");
}

#[test]
fn repeated_runs_are_byte_identical() {
    let ws = workspace(ORDERS);
    let options = PipelineOptions::new(&ws.source);

    run_pipeline(&options).unwrap();
    let first = read_outputs(&ws.staging);
    run_pipeline(&options).unwrap();
    let second = read_outputs(&ws.staging);

    assert_eq!(first, second);
}

#[test]
fn inspect_writes_issue_json_without_outputs() {
    let ws = workspace(BAD_ORDERS);
    let json_path = ws.source.join("reports").join("issues.json");
    let options = PipelineOptions::new(&ws.source).with_issues_json(Some(json_path.clone()));

    let outcome = inspect_sources(&options).unwrap();

    assert_eq!(outcome.inspections.len(), 4);
    assert_eq!(outcome.issues.len(), 1);
    let json = fs::read_to_string(&json_path).unwrap();
    assert!(json.contains("\"rule\": \"order_sku_reference\""));
    assert!(!ws.staging.exists());
}

#[test]
fn unparseable_order_date_is_caught_before_the_transform() {
    let orders = ORDERS.replace("2024-03-01 12:00:00", "next tuesday");
    let ws = workspace(&orders);
    let options = PipelineOptions::new(&ws.source);

    let error = run_pipeline(&options).unwrap_err();

    let (issues, report) = match error {
        PipelineError::DataQuality { issues, report, .. } => (issues, report),
        other => panic!("expected data quality error, got {other:?}"),
    };
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].rule, RuleId::UnparseableDate);
    let text = fs::read_to_string(report).unwrap();
    assert!(text.contains("1. Orders.date holds values that are not dates: next tuesday"));
    assert!(!ws.staging.exists());
}
