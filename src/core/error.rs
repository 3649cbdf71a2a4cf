use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl FieldViolation {
    pub fn new(field: &'static str, value: impl ToString, reason: &'static str) -> Self {
        Self {
            field,
            value: value.to_string(),
            reason,
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} ({})", self.field, self.value, self.reason)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("invalid input: {}", join_violations(.violations))]
    InvalidInput { violations: Vec<FieldViolation> },
}

impl ProjectionError {
    pub fn invalid(violations: Vec<FieldViolation>) -> Self {
        ProjectionError::InvalidInput { violations }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            ProjectionError::InvalidInput { violations } => violations,
        }
    }

    pub fn mentions(&self, field: &str) -> bool {
        self.violations().iter().any(|v| v.field == field)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, ProjectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_every_violation() {
        let err = ProjectionError::invalid(vec![
            FieldViolation::new("currentSavings", -1.0, "must be >= 0"),
            FieldViolation::new("annualRatePercent", "abc", "not a number"),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid input: currentSavings = -1 (must be >= 0), annualRatePercent = abc (not a number)"
        );
        assert!(err.mentions("currentSavings"));
        assert!(!err.mentions("targetAmount"));
    }
}
