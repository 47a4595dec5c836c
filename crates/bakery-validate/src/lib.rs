//! Validation of loaded bakery source tables.
//!
//! [`validate_tables`] runs every applicable rule and collects all issues;
//! nothing short-circuits. [`gate_on_issues`] turns the issue list into the
//! decision the pipeline uses to stop before the transform.

mod checks;

use std::time::Instant;

use tracing::{debug, info, info_span};

use bakery_ingest::TableSet;
use bakery_model::{ValidationIssue, ValidationSettings};

/// Whether the pipeline may continue past validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateDecision {
    pub blocked: bool,
    pub issue_count: usize,
}

/// Blocks when any issue exists and issues are configured as fatal.
pub fn gate_on_issues(issues: &[ValidationIssue], fail_on_issues: bool) -> GateDecision {
    GateDecision {
        blocked: fail_on_issues && !issues.is_empty(),
        issue_count: issues.len(),
    }
}

/// Runs the full rule battery.
///
/// Issues come back grouped by rule family (structure, referential, domain,
/// consistency, completeness) and in rule order within each family. Rules
/// whose tables are absent are skipped.
pub fn validate_tables(tables: &TableSet, settings: &ValidationSettings) -> Vec<ValidationIssue> {
    let span = info_span!("validate", tables = tables.len());
    let _guard = span.enter();
    let start = Instant::now();

    let issues = checks::run_all(tables, settings);

    for issue in &issues {
        debug!(
            rule = issue.rule.code(),
            table = %issue.table,
            offending = issue.offending.len(),
            "validation issue"
        );
    }
    info!(
        issue_count = issues.len(),
        duration_ms = start.elapsed().as_millis(),
        "validation complete"
    );
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use bakery_model::{RuleId, SourceKind};

    #[test]
    fn gate_blocks_only_when_configured() {
        let issues = vec![ValidationIssue::new(
            RuleId::OrderIdPresent,
            SourceKind::Orders,
            "Null Orders.order_id detected",
        )];
        assert_eq!(
            gate_on_issues(&issues, true),
            GateDecision {
                blocked: true,
                issue_count: 1
            }
        );
        assert!(!gate_on_issues(&issues, false).blocked);
        assert!(!gate_on_issues(&[], true).blocked);
    }
}
