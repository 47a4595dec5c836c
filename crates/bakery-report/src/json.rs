//! Machine-readable validation issues.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use bakery_model::ValidationIssue;

use crate::error::{ReportError, Result};

#[derive(Debug, Serialize)]
pub struct IssueReport<'a> {
    pub issue_count: usize,
    pub passed: bool,
    pub issues: &'a [ValidationIssue],
}

impl<'a> IssueReport<'a> {
    pub fn new(issues: &'a [ValidationIssue]) -> Self {
        Self {
            issue_count: issues.len(),
            passed: issues.is_empty(),
            issues,
        }
    }
}

pub fn write_issues_json(path: &Path, issues: &[ValidationIssue]) -> Result<()> {
    crate::ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &IssueReport::new(issues)).map_err(|source| {
        ReportError::Json {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use bakery_model::{RuleId, SourceKind};

    use super::*;

    #[test]
    fn issue_report_shape() {
        let issues = vec![
            ValidationIssue::new(
                RuleId::ContainerCoversUnit,
                SourceKind::Ingredients,
                "Ingredients.container_grams < Ingredients.grams_per_unit for",
            )
            .with_offending(vec!["vanilla".to_string()]),
        ];
        insta::assert_json_snapshot!(IssueReport::new(&issues), @r#"
        {
          "issue_count": 1,
          "passed": false,
          "issues": [
            {
              "rule": "container_covers_unit",
              "category": "consistency",
              "table": "ingredients",
              "message": "Ingredients.container_grams < Ingredients.grams_per_unit for",
              "offending": [
                "vanilla"
              ]
            }
          ]
        }
        "#);
    }

    #[test]
    fn written_file_is_complete_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("issues.json");
        let issues = vec![ValidationIssue::new(
            RuleId::UnparseableDate,
            SourceKind::Orders,
            "Orders.date holds values that are not dates",
        )];

        write_issues_json(&path, &issues).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["issue_count"], 1);
        assert_eq!(value["issues"][0]["rule"], "unparseable_date");
        assert_eq!(value["issues"][0]["category"], "structure");
    }
}
