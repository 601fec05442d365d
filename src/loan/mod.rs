//! Fixed-rate amortizing loan arithmetic

mod amortization;
mod state;

pub use amortization::{
    originate, remaining_balance, amortization_schedule, AmortizationRow, MAX_AMORTIZATION_YEARS,
};
pub use state::LoanState;
