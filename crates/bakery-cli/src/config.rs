//! Optional `bakery.toml` run configuration.
//!
//! Every key is optional. Values from the file sit between the built-in
//! defaults and the command-line flags.
//!
//! ```toml
//! staging_dir = "../staging-data"
//! report = "reports/inspection.txt"
//! fail_on_issues = true
//! join_policy = "fail"
//! cost_tolerance = 1e-6
//! allowed_categories = ["Dozen Cookies", "Add-on"]
//! issues_json = "reports/issues.json"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use bakery_model::{JoinPolicy, PipelineOptions};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "bakery.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cost_tolerance must be a finite, non-negative number (got {value})")]
    InvalidTolerance { value: f64 },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BakeryConfig {
    pub staging_dir: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub fail_on_issues: Option<bool>,
    pub join_policy: Option<JoinPolicy>,
    pub cost_tolerance: Option<f64>,
    pub allowed_categories: Option<Vec<String>>,
    pub issues_json: Option<PathBuf>,
}

impl BakeryConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(path, &contents)?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(value) = config.cost_tolerance
            && (!value.is_finite() || value < 0.0)
        {
            return Err(ConfigError::InvalidTolerance { value });
        }
        Ok(config)
    }

    /// The explicit file when given, else `bakery.toml` in the working
    /// directory if present, else an empty config.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            Self::load(fallback)
        } else {
            Ok(Self::default())
        }
    }

    /// Overlays the file's values onto `options`.
    pub fn apply(&self, mut options: PipelineOptions) -> PipelineOptions {
        if let Some(dir) = &self.staging_dir {
            options = options.with_staging_dir(dir.clone());
        }
        if let Some(path) = &self.report {
            options = options.with_report_path(path.clone());
        }
        if let Some(fail) = self.fail_on_issues {
            options = options.with_fail_on_issues(fail);
        }
        if let Some(policy) = self.join_policy {
            options = options.with_join_policy(policy);
        }
        if let Some(tolerance) = self.cost_tolerance {
            options.validation = options.validation.with_cost_tolerance(tolerance);
        }
        if let Some(categories) = &self.allowed_categories {
            options.validation = options
                .validation
                .with_allowed_categories(categories.iter().cloned());
        }
        if self.issues_json.is_some() {
            options = options.with_issues_json(self.issues_json.clone());
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(contents: &str) -> Result<BakeryConfig, ConfigError> {
        BakeryConfig::parse(Path::new("bakery.toml"), contents)
    }

    #[test]
    fn empty_file_changes_nothing() {
        let config = parse("").unwrap();
        let options = config.apply(PipelineOptions::new("/data/source-data"));
        assert_eq!(options, PipelineOptions::new("/data/source-data"));
    }

    #[test]
    fn file_values_override_defaults() {
        let config = parse(
            r#"
            staging_dir = "/tmp/out"
            fail_on_issues = false
            join_policy = "fail"
            cost_tolerance = 0.001
            allowed_categories = ["Dozen Cookies", "Add-on", "Gift Box"]
            "#,
        )
        .unwrap();
        let options = config.apply(PipelineOptions::new("/data/source-data"));
        assert_eq!(options.staging_dir, PathBuf::from("/tmp/out"));
        assert!(!options.fail_on_issues);
        assert_eq!(options.join_policy, JoinPolicy::Fail);
        assert_eq!(options.validation.cost_tolerance, 0.001);
        assert!(options.validation.allowed_categories.contains("Gift Box"));
        assert_eq!(
            options.report_path,
            PathBuf::from("/data/source-data/consolidated_inspection_report.txt")
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            parse("stagingdir = \"x\""),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        assert!(matches!(
            parse("cost_tolerance = -1.0"),
            Err(ConfigError::InvalidTolerance { .. })
        ));
    }
}
