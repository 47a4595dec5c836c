//! Configuration options for a pipeline run.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Allowed gap between stored and derived cost per gram.
pub const DEFAULT_COST_TOLERANCE: f64 = 1e-6;

/// Staging directory name, created next to the source directory.
pub const DEFAULT_STAGING_DIR: &str = "staging-data";

/// Report file name, written inside the source directory.
pub const DEFAULT_REPORT_FILE: &str = "consolidated_inspection_report.txt";

/// Product categories accepted when no override is configured.
pub fn default_categories() -> BTreeSet<String> {
    ["Dozen Cookies", "Add-on"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// What the transform does with a fact row whose dimension lookup fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JoinPolicy {
    /// Drop the row and log how many were dropped.
    #[default]
    DropUnmatched,
    /// Abort the transform.
    Fail,
}

/// Thresholds and reference sets used by the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSettings {
    pub cost_tolerance: f64,
    pub allowed_categories: BTreeSet<String>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            cost_tolerance: DEFAULT_COST_TOLERANCE,
            allowed_categories: default_categories(),
        }
    }
}

impl ValidationSettings {
    pub fn with_cost_tolerance(mut self, tolerance: f64) -> Self {
        self.cost_tolerance = tolerance;
        self
    }

    pub fn with_allowed_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_categories = categories.into_iter().map(Into::into).collect();
        self
    }
}

/// Options controlling one pipeline run.
///
/// Paths are explicit; nothing is read from process-wide defaults once the
/// options are built.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub source_dir: PathBuf,
    /// Directory receiving the dimensional CSV outputs.
    pub staging_dir: PathBuf,
    /// Consolidated inspection and validation report.
    pub report_path: PathBuf,
    /// Abort before the transform when validation reports any issue.
    pub fail_on_issues: bool,
    pub join_policy: JoinPolicy,
    pub validation: ValidationSettings,
    /// Optional machine-readable copy of the issue list.
    pub issues_json: Option<PathBuf>,
}

impl PipelineOptions {
    /// Options with the staging directory beside `source_dir` and the report
    /// inside it.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        let source_dir = source_dir.into();
        let staging_dir = default_staging_dir(&source_dir);
        let report_path = source_dir.join(DEFAULT_REPORT_FILE);
        Self {
            source_dir,
            staging_dir,
            report_path,
            fail_on_issues: true,
            join_policy: JoinPolicy::default(),
            validation: ValidationSettings::default(),
            issues_json: None,
        }
    }

    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = path.into();
        self
    }

    pub fn with_fail_on_issues(mut self, fail: bool) -> Self {
        self.fail_on_issues = fail;
        self
    }

    pub fn with_join_policy(mut self, policy: JoinPolicy) -> Self {
        self.join_policy = policy;
        self
    }

    pub fn with_validation(mut self, settings: ValidationSettings) -> Self {
        self.validation = settings;
        self
    }

    pub fn with_issues_json(mut self, path: Option<PathBuf>) -> Self {
        self.issues_json = path;
        self
    }
}

fn default_staging_dir(source_dir: &Path) -> PathBuf {
    match source_dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(DEFAULT_STAGING_DIR),
        _ => PathBuf::from(DEFAULT_STAGING_DIR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_place_staging_beside_source() {
        let options = PipelineOptions::new("/data/bakery/source-data");
        assert_eq!(
            options.staging_dir,
            PathBuf::from("/data/bakery/staging-data")
        );
        assert_eq!(
            options.report_path,
            PathBuf::from("/data/bakery/source-data/consolidated_inspection_report.txt")
        );
        assert!(options.fail_on_issues);
        assert_eq!(options.join_policy, JoinPolicy::DropUnmatched);
    }

    #[test]
    fn relative_source_without_parent() {
        let options = PipelineOptions::new("source-data").with_fail_on_issues(false);
        assert_eq!(options.staging_dir, PathBuf::from("staging-data"));
        assert!(!options.fail_on_issues);
    }

    #[test]
    fn default_categories_are_cookies_and_add_ons() {
        let settings = ValidationSettings::default();
        assert!(settings.allowed_categories.contains("Dozen Cookies"));
        assert!(settings.allowed_categories.contains("Add-on"));
        assert_eq!(settings.allowed_categories.len(), 2);
    }
}
