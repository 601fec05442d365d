//! Purchase and financing terms of a single property

use serde::{Deserialize, Serialize};

fn default_refinance_year() -> u32 {
    2
}

/// Deal-level constants shared by every scenario
///
/// Rates are fractions (0.70 = 70% LTV).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDeal {
    /// Display name
    #[serde(default)]
    pub name: String,

    pub purchase_price: f64,

    /// Gross potential rent before year-1 escalation
    pub gross_potential_rent: f64,

    /// Operating expenses before year-1 escalation
    pub operating_expenses: f64,

    pub loan_to_value: f64,
    pub loan_interest_rate: f64,
    pub loan_amortization_years: u32,

    pub selling_costs_rate: f64,

    /// Years held; the property is sold at the end of the last one
    pub holding_period: u32,

    #[serde(default = "default_refinance_year")]
    pub refinance_year: u32,
}

impl PropertyDeal {
    /// Equity required at closing
    pub fn equity_required(&self) -> f64 {
        self.purchase_price * (1.0 - self.loan_to_value)
    }

    /// Year-1 NOI over purchase price, before escalation and vacancy
    pub fn going_in_cap_rate(&self) -> f64 {
        (self.gross_potential_rent - self.operating_expenses) / self.purchase_price
    }
}
