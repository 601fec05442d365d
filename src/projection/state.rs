//! Projection state carried from one year to the next

use super::input::ProjectionInput;
use crate::error::Result;
use crate::loan::LoanState;

/// Operating and financing state of the property during a projection
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Current projection year (0 before the first year is simulated)
    pub year: u32,

    /// Gross potential rent for the current year
    pub gross_potential_rent: f64,

    /// Operating expenses for the current year
    pub operating_expenses: f64,

    /// Loan currently on the property
    pub loan: LoanState,
}

impl ProjectionState {
    /// State at closing: initial rent roll and expenses, acquisition loan originated
    pub fn at_acquisition(input: &ProjectionInput) -> Result<Self> {
        let loan = LoanState::originate(
            input.initial_loan_amount(),
            input.loan_interest_rate,
            input.loan_amortization_years,
        )?;

        Ok(Self {
            year: 0,
            gross_potential_rent: input.initial_gross_potential_rent,
            operating_expenses: input.initial_operating_expenses,
            loan,
        })
    }

    /// Step into the next year, escalating rent and expenses
    ///
    /// Growth applies in year 1 as well, so year 1 runs on escalated figures.
    pub fn advance_year(&mut self, input: &ProjectionInput) {
        self.year += 1;
        self.gross_potential_rent *= 1.0 + input.rent_growth_rate;
        self.operating_expenses *= 1.0 + input.expense_growth_rate;
    }

    /// Loan payments made before the current year began, as the balance
    /// formula counts them
    pub fn payments_made(&self) -> u32 {
        self.year.saturating_sub(1).saturating_mul(12)
    }
}
