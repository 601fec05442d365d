//! Error types for projections and configuration loading

use thiserror::Error;

/// Failure of a single projection run
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    /// Input outside the domain the engine can evaluate
    #[error("invalid input: {field} ({reason})")]
    Domain { field: String, reason: String },

    /// Cash-flow series has no sign change, IRR is undefined
    #[error("no IRR solution: {0}")]
    NoSolution(String),

    /// Root finder exhausted its iteration budget
    #[error("IRR did not converge after {iterations} iterations (last NPV {last_npv:.6e})")]
    Convergence { iterations: u32, last_npv: f64 },
}

impl ProjectionError {
    pub(crate) fn domain(field: &str, reason: impl Into<String>) -> Self {
        ProjectionError::Domain {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable name, used in service responses
    pub fn kind(&self) -> &'static str {
        match self {
            ProjectionError::Domain { .. } => "domain",
            ProjectionError::NoSolution(_) => "no_solution",
            ProjectionError::Convergence { .. } => "convergence",
        }
    }
}

/// Failure while reading deal or scenario configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed scenario table: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed deal record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),

    #[error("invalid preset '{name}': {reason}")]
    InvalidPreset { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ProjectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_message() {
        let err = ProjectionError::domain("cap_rate_sale", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "invalid input: cap_rate_sale (must be greater than zero)"
        );
        assert_eq!(err.kind(), "domain");
    }

    #[test]
    fn test_convergence_kind() {
        let err = ProjectionError::Convergence { iterations: 1000, last_npv: 1.5 };
        assert_eq!(err.kind(), "convergence");
        assert!(err.to_string().contains("1000 iterations"));
    }
}
