//! The validator's output: a located, actionable report of spec violations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::patch::PatchAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub paragraph_index: Option<usize>,
    pub text_snippet: Option<String>,
    #[serde(default)]
    pub detail: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FixSuggestion {
    pub action: String,
    #[serde(default)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl From<&PatchAction> for FixSuggestion {
    fn from(action: &PatchAction) -> Self {
        Self {
            action: action.name().to_string(),
            params: action.params_json(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Violation {
    pub id: String,
    pub severity: Severity,
    pub message: String,
    pub location: Location,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub suggestion: Option<FixSuggestion>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationSummary {
    pub ok: bool,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationReport {
    pub summary: ValidationSummary,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new(violations: Vec<Violation>) -> Self {
        let errors = violations.iter().filter(|v| v.severity == Severity::Error).count();
        let warnings = violations.iter().filter(|v| v.severity == Severity::Warning).count();
        let infos = violations.iter().filter(|v| v.severity == Severity::Info).count();
        Self {
            summary: ValidationSummary { ok: errors == 0, errors, warnings, infos },
            violations,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.summary.ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_counts_by_severity_and_sets_ok() {
        let report = ValidationReport::new(vec![
            Violation {
                id: "a".into(),
                severity: Severity::Warning,
                message: "m".into(),
                location: Location::default(),
                expected: None,
                actual: None,
                suggestion: None,
            },
            Violation {
                id: "b".into(),
                severity: Severity::Info,
                message: "m".into(),
                location: Location::default(),
                expected: None,
                actual: None,
                suggestion: None,
            },
        ]);
        assert!(report.is_ok());
        assert_eq!(report.summary.warnings, 1);
        assert_eq!(report.summary.infos, 1);
        assert_eq!(report.summary.errors, 0);
    }
}
