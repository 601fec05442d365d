//! Engine input record and its domain checks

use serde::{Deserialize, Serialize};

use crate::assumptions::ScenarioAssumptions;
use crate::deal::PropertyDeal;
use crate::error::{ProjectionError, Result};
use crate::loan::MAX_AMORTIZATION_YEARS;

/// Longest holding period accepted, in years
pub const MAX_HOLDING_PERIOD: u32 = 100;

/// Complete, immutable input to one projection run
///
/// All rates are per-annum fractions (0.05 = 5%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    // Purchase economics
    pub purchase_price: f64,
    pub initial_gross_potential_rent: f64,
    pub initial_operating_expenses: f64,

    /// Years simulated; the sale happens at the end of the last one
    pub holding_period: u32,

    // Loan terms
    pub loan_to_value: f64,
    pub loan_interest_rate: f64,
    pub loan_amortization_years: u32,

    /// Year in which the loan is replaced (1..=holding_period)
    pub refinance_year: u32,

    pub selling_costs_rate: f64,

    // Scenario assumptions
    pub year1_vacancy_rate: f64,
    pub ongoing_vacancy_rate: f64,
    pub expense_growth_rate: f64,
    pub rent_growth_rate: f64,
    pub cap_rate_refinance: f64,
    pub cap_rate_sale: f64,
}

impl ProjectionInput {
    /// Combine a deal record with one scenario's assumptions
    pub fn from_parts(deal: &PropertyDeal, scenario: &ScenarioAssumptions) -> Self {
        Self {
            purchase_price: deal.purchase_price,
            initial_gross_potential_rent: deal.gross_potential_rent,
            initial_operating_expenses: deal.operating_expenses,
            holding_period: deal.holding_period,
            loan_to_value: deal.loan_to_value,
            loan_interest_rate: deal.loan_interest_rate,
            loan_amortization_years: deal.loan_amortization_years,
            refinance_year: deal.refinance_year,
            selling_costs_rate: deal.selling_costs_rate,
            year1_vacancy_rate: scenario.year1_vacancy_rate,
            ongoing_vacancy_rate: scenario.ongoing_vacancy_rate,
            expense_growth_rate: scenario.expense_growth_rate,
            rent_growth_rate: scenario.rent_growth_rate,
            cap_rate_refinance: scenario.cap_rate_refinance,
            cap_rate_sale: scenario.cap_rate_sale,
        }
    }

    /// Vacancy applied in a given projection year
    pub fn vacancy_rate_for(&self, year: u32) -> f64 {
        if year == 1 {
            self.year1_vacancy_rate
        } else {
            self.ongoing_vacancy_rate
        }
    }

    /// Loan amount at acquisition
    pub fn initial_loan_amount(&self) -> f64 {
        self.purchase_price * self.loan_to_value
    }

    /// Cash the investor puts in at year 0
    pub fn initial_equity(&self) -> f64 {
        self.purchase_price - self.initial_loan_amount()
    }

    /// Reject inputs the engine cannot evaluate
    pub fn validate(&self) -> Result<()> {
        positive("purchase_price", self.purchase_price)?;
        positive("initial_gross_potential_rent", self.initial_gross_potential_rent)?;
        positive("initial_operating_expenses", self.initial_operating_expenses)?;

        if !(1..=MAX_HOLDING_PERIOD).contains(&self.holding_period) {
            return Err(ProjectionError::domain(
                "holding_period",
                format!(
                    "must be within 1..={} years, got {}",
                    MAX_HOLDING_PERIOD, self.holding_period
                ),
            ));
        }
        if !(1..=MAX_AMORTIZATION_YEARS).contains(&self.loan_amortization_years) {
            return Err(ProjectionError::domain(
                "loan_amortization_years",
                format!(
                    "must be within 1..={} years, got {}",
                    MAX_AMORTIZATION_YEARS, self.loan_amortization_years
                ),
            ));
        }
        if self.refinance_year < 1 || self.refinance_year > self.holding_period {
            return Err(ProjectionError::domain(
                "refinance_year",
                format!(
                    "must be within 1..={} (holding period), got {}",
                    self.holding_period, self.refinance_year
                ),
            ));
        }

        fraction("loan_to_value", self.loan_to_value)?;
        fraction("loan_interest_rate", self.loan_interest_rate)?;
        fraction("selling_costs_rate", self.selling_costs_rate)?;
        fraction("year1_vacancy_rate", self.year1_vacancy_rate)?;
        fraction("ongoing_vacancy_rate", self.ongoing_vacancy_rate)?;

        growth("expense_growth_rate", self.expense_growth_rate)?;
        growth("rent_growth_rate", self.rent_growth_rate)?;

        positive("cap_rate_refinance", self.cap_rate_refinance)?;
        positive("cap_rate_sale", self.cap_rate_sale)?;

        Ok(())
    }
}

fn positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ProjectionError::domain(
            field,
            format!("must be greater than zero, got {}", value),
        ))
    }
}

fn fraction(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ProjectionError::domain(
            field,
            format!("must be a fraction in [0, 1], got {}", value),
        ))
    }
}

fn growth(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > -1.0 {
        Ok(())
    } else {
        Err(ProjectionError::domain(
            field,
            format!("must be greater than -1, got {}", value),
        ))
    }
}
