//! Loan carried through a projection

use serde::{Deserialize, Serialize};

use super::amortization::{originate, remaining_balance};
use crate::error::Result;

/// Terms of the loan currently on the property
///
/// Created at acquisition and replaced once at refinance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanState {
    /// Principal at origination
    pub principal: f64,

    /// Annual interest rate (fraction)
    pub annual_rate: f64,

    /// Amortization term in years
    pub amortization_years: u32,

    /// Fixed monthly payment
    pub monthly_payment: f64,
}

impl LoanState {
    /// Originate a new fully amortizing loan
    pub fn originate(principal: f64, annual_rate: f64, amortization_years: u32) -> Result<Self> {
        let monthly_payment = originate(principal, annual_rate, amortization_years)?;
        Ok(Self {
            principal,
            annual_rate,
            amortization_years,
            monthly_payment,
        })
    }

    /// Re-originate with the same rate and term at a new principal
    pub fn refinance(&self, new_principal: f64) -> Result<Self> {
        Self::originate(new_principal, self.annual_rate, self.amortization_years)
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 12.0
    }

    pub fn total_payments(&self) -> u32 {
        self.amortization_years.saturating_mul(12)
    }

    /// Twelve monthly payments
    pub fn annual_debt_service(&self) -> f64 {
        self.monthly_payment * 12.0
    }

    /// Outstanding balance per this loan's own schedule after `payments_made`
    pub fn balance_after(&self, payments_made: u32) -> f64 {
        remaining_balance(
            self.monthly_payment,
            self.monthly_rate(),
            payments_made,
            self.total_payments(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_refinance_keeps_terms() {
        let loan = LoanState::originate(700_000.0, 0.05, 30).unwrap();
        let refi = loan.refinance(900_000.0).unwrap();

        assert_eq!(refi.annual_rate, loan.annual_rate);
        assert_eq!(refi.amortization_years, loan.amortization_years);
        assert_relative_eq!(
            refi.monthly_payment / loan.monthly_payment,
            900_000.0 / 700_000.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_balance_declines() {
        let loan = LoanState::originate(700_000.0, 0.05, 30).unwrap();
        assert_relative_eq!(loan.balance_after(0), 700_000.0, max_relative = 1e-9);
        assert!(loan.balance_after(12) < loan.balance_after(0));
        assert!(loan.balance_after(24) < loan.balance_after(12));
        assert_relative_eq!(loan.annual_debt_service(), loan.monthly_payment * 12.0);
    }

    #[test]
    fn test_hand_built_long_term_does_not_overflow() {
        let loan = LoanState {
            principal: 100_000.0,
            annual_rate: 0.12,
            amortization_years: u32::MAX,
            monthly_payment: 1_000.0,
        };
        assert_eq!(loan.total_payments(), u32::MAX);
        assert_relative_eq!(loan.balance_after(12), 100_000.0, max_relative = 1e-9);
    }
}
