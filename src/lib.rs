//! Realty Projection - cash-flow and IRR engine for a leveraged rental property
//!
//! This library provides:
//! - Fixed-rate loan amortization (payment, remaining balance, schedule)
//! - Year-by-year NOI and cash-flow projection with a refinance and a sale
//! - IRR solving over the resulting cash-flow series
//! - Deal records and scenario presets loaded from configuration files
//! - Multi-scenario runs for a single deal

pub mod error;
pub mod loan;
pub mod deal;
pub mod assumptions;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::{ConfigError, ProjectionError};
pub use deal::PropertyDeal;
pub use assumptions::{ScenarioAssumptions, ScenarioPreset};
pub use projection::{project, ProjectionEngine, ProjectionInput, ProjectionResult, AnnualCashflowRow};
pub use scenario::{ScenarioRunner, ScenarioRun};
