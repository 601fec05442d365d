//! Projection engine: annual operations, refinance, sale and IRR

mod state;
mod engine;
mod cashflows;
mod input;
pub mod irr;

pub use state::ProjectionState;
pub use engine::{ProjectionEngine, project};
pub use cashflows::{AnnualCashflowRow, CashFlowSeries, ProjectionResult, ProjectionSummary};
pub use input::ProjectionInput;
pub use irr::{IrrSolver, calculate_irr, npv};
