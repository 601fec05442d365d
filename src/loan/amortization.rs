//! Annuity payment and remaining balance formulas
//!
//! All functions are pure. Balances are always taken from the closed-form
//! present value of the remaining payments, never accumulated month by month.

use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, Result};

/// Longest amortization term accepted, in years
pub const MAX_AMORTIZATION_YEARS: u32 = 100;

/// One month of an amortization schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Payment number (1-indexed)
    pub month: u32,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    /// Balance after this payment
    pub balance: f64,
}

/// Fixed monthly payment that fully amortizes `principal` over
/// `amortization_years * 12` months at `annual_rate / 12` per month.
///
/// A zero rate is amortized linearly (`principal / n_payments`).
/// A zero principal is accepted and yields a zero payment (unlevered deal).
pub fn originate(principal: f64, annual_rate: f64, amortization_years: u32) -> Result<f64> {
    if !principal.is_finite() || principal < 0.0 {
        return Err(ProjectionError::domain(
            "principal",
            format!("loan principal must be a finite non-negative amount, got {}", principal),
        ));
    }
    if !annual_rate.is_finite() || !(0.0..=1.0).contains(&annual_rate) {
        return Err(ProjectionError::domain(
            "loan_interest_rate",
            format!("must be a fraction in [0, 1], got {}", annual_rate),
        ));
    }
    if !(1..=MAX_AMORTIZATION_YEARS).contains(&amortization_years) {
        return Err(ProjectionError::domain(
            "loan_amortization_years",
            format!(
                "amortization term must be within 1..={} years, got {}",
                MAX_AMORTIZATION_YEARS, amortization_years
            ),
        ));
    }

    let n_payments = amortization_years * 12;
    let monthly_rate = annual_rate / 12.0;

    if monthly_rate == 0.0 {
        return Ok(principal / n_payments as f64);
    }

    // P * r / (1 - (1+r)^-n)
    let discount = (1.0 + monthly_rate).powf(-f64::from(n_payments));
    Ok(principal * monthly_rate / (1.0 - discount))
}

/// Outstanding balance after `payments_made` of `total_payments`
///
/// Present value of the remaining payments at `monthly_rate`, with the loan
/// fully retired at term. Returns zero once the term has run out.
pub fn remaining_balance(
    monthly_payment: f64,
    monthly_rate: f64,
    payments_made: u32,
    total_payments: u32,
) -> f64 {
    if payments_made >= total_payments {
        return 0.0;
    }
    let remaining = f64::from(total_payments - payments_made);

    if monthly_rate == 0.0 {
        return monthly_payment * remaining;
    }

    let discount = (1.0 + monthly_rate).powf(-remaining);
    monthly_payment * (1.0 - discount) / monthly_rate
}

/// Month-by-month schedule for a freshly originated loan
pub fn amortization_schedule(
    principal: f64,
    annual_rate: f64,
    amortization_years: u32,
) -> Result<Vec<AmortizationRow>> {
    let payment = originate(principal, annual_rate, amortization_years)?;
    let monthly_rate = annual_rate / 12.0;
    let n_payments = amortization_years * 12;

    let mut balance = principal;
    let mut rows = Vec::with_capacity(n_payments as usize);

    for month in 1..=n_payments {
        let interest = balance * monthly_rate;
        let principal_paid = payment - interest;
        balance -= principal_paid;

        rows.push(AmortizationRow {
            month,
            payment,
            interest,
            principal: principal_paid,
            balance,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_standard_mortgage_payment() {
        // $700k, 5%, 30 years
        let pmt = originate(700_000.0, 0.05, 30).unwrap();
        assert_relative_eq!(pmt, 3757.751361085, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_rate_is_linear() {
        let pmt = originate(360_000.0, 0.0, 30).unwrap();
        assert_relative_eq!(pmt, 1000.0);
        assert_relative_eq!(remaining_balance(pmt, 0.0, 120, 360), 240_000.0);
    }

    #[test]
    fn test_zero_principal_allowed() {
        assert_eq!(originate(0.0, 0.05, 30).unwrap(), 0.0);
    }

    #[test]
    fn test_invalid_origination() {
        assert!(matches!(
            originate(-1.0, 0.05, 30),
            Err(ProjectionError::Domain { .. })
        ));
        assert!(matches!(
            originate(100_000.0, 0.05, 0),
            Err(ProjectionError::Domain { .. })
        ));
        assert!(matches!(
            originate(100_000.0, f64::NAN, 30),
            Err(ProjectionError::Domain { .. })
        ));
    }

    #[test]
    fn test_rejects_unbounded_terms() {
        for years in [MAX_AMORTIZATION_YEARS + 1, 200_000_000, 400_000_000, u32::MAX] {
            match originate(700_000.0, 0.05, years) {
                Err(ProjectionError::Domain { field, .. }) => {
                    assert_eq!(field, "loan_amortization_years")
                }
                other => panic!("term of {} years accepted: {:?}", years, other),
            }
        }

        // Longest term still pays at least the interest
        let pmt = originate(700_000.0, 0.05, MAX_AMORTIZATION_YEARS).unwrap();
        assert!(pmt > 700_000.0 * 0.05 / 12.0);
    }

    #[test]
    fn test_remaining_balance_over_huge_term() {
        // Perpetuity limit: payment / rate
        let balance = remaining_balance(100.0, 0.01, 0, u32::MAX);
        assert_relative_eq!(balance, 10_000.0, max_relative = 1e-9);
    }

    #[test]
    fn test_remaining_balance_endpoints() {
        let principal = 700_000.0;
        let pmt = originate(principal, 0.05, 30).unwrap();
        let r = 0.05 / 12.0;

        assert_relative_eq!(remaining_balance(pmt, r, 0, 360), principal, max_relative = 1e-9);
        assert_abs_diff_eq!(remaining_balance(pmt, r, 360, 360), 0.0, epsilon = 1e-6);
        assert_eq!(remaining_balance(pmt, r, 400, 360), 0.0);
    }

    #[test]
    fn test_schedule_retires_loan() {
        let principal = 700_000.0;
        let schedule = amortization_schedule(principal, 0.05, 30).unwrap();
        assert_eq!(schedule.len(), 360);

        let total_principal: f64 = schedule.iter().map(|row| row.principal).sum();
        assert_relative_eq!(total_principal, principal, max_relative = 1e-9);
        assert_abs_diff_eq!(schedule.last().unwrap().balance, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_schedule_matches_closed_form_balance() {
        let schedule = amortization_schedule(500_000.0, 0.065, 25).unwrap();
        let pmt = schedule[0].payment;
        let r = 0.065 / 12.0;

        for months in [12_u32, 60, 120, 240] {
            let closed_form = remaining_balance(pmt, r, months, 300);
            let tracked = schedule[months as usize - 1].balance;
            assert_relative_eq!(tracked, closed_form, max_relative = 1e-9);
        }
    }
}
