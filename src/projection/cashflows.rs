//! Cashflow output structures for projections

use serde::{Deserialize, Serialize};

/// A single row of projection output for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualCashflowRow {
    pub year: u32,

    // Operations
    pub vacancy_rate: f64,
    pub gross_potential_rent: f64,
    pub effective_gross_income: f64,
    pub operating_expenses: f64,
    pub net_operating_income: f64,

    // Financing
    /// Balance of the loan in place at the start of the year
    pub opening_loan_balance: f64,
    pub debt_service: f64,
    /// NOI / debt service; None for an unlevered year
    pub dscr: Option<f64>,

    /// NOI less debt service
    pub operating_cash_flow: f64,

    // Capital events
    pub refinance_value: Option<f64>,
    /// New loan less payoff of the old one; negative means cash in
    pub refinance_cash_out: f64,
    pub sale_value: Option<f64>,
    /// Sale price net of selling costs and loan payoff
    pub net_sale_proceeds: f64,

    /// Operating cash flow plus capital events
    pub total_cash_flow: f64,
}

impl AnnualCashflowRow {
    pub fn new(year: u32) -> Self {
        Self {
            year,
            vacancy_rate: 0.0,
            gross_potential_rent: 0.0,
            effective_gross_income: 0.0,
            operating_expenses: 0.0,
            net_operating_income: 0.0,
            opening_loan_balance: 0.0,
            debt_service: 0.0,
            dscr: None,
            operating_cash_flow: 0.0,
            refinance_value: None,
            refinance_cash_out: 0.0,
            sale_value: None,
            net_sale_proceeds: 0.0,
            total_cash_flow: 0.0,
        }
    }

    pub fn is_refinance_year(&self) -> bool {
        self.refinance_value.is_some()
    }

    pub fn is_sale_year(&self) -> bool {
        self.sale_value.is_some()
    }
}

/// Ordered annual cash flows, index 0 being the equity outlay at closing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CashFlowSeries(Vec<f64>);

impl CashFlowSeries {
    /// Start a series with the (positive) equity invested at closing
    pub fn with_initial_equity(equity: f64) -> Self {
        Self(vec![-equity])
    }

    pub fn push(&mut self, cash_flow: f64) {
        self.0.push(cash_flow);
    }

    /// Negative year-0 outlay
    pub fn initial_outlay(&self) -> f64 {
        self.0.first().copied().unwrap_or(0.0)
    }

    /// Cash flows for years 1..=N
    pub fn distributions(&self) -> &[f64] {
        self.0.get(1..).unwrap_or(&[])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Year 0..=N cash flows
    pub cash_flows: CashFlowSeries,

    /// IRR of `cash_flows`, in percent
    pub irr_pct: f64,

    /// Annual detail rows (years 1..=N)
    pub rows: Vec<AnnualCashflowRow>,
}

impl ProjectionResult {
    pub fn new(initial_equity: f64) -> Self {
        Self {
            cash_flows: CashFlowSeries::with_initial_equity(initial_equity),
            irr_pct: 0.0,
            rows: Vec::new(),
        }
    }

    /// Add a year's row and its total to the series
    pub fn add_row(&mut self, row: AnnualCashflowRow) {
        self.cash_flows.push(row.total_cash_flow);
        self.rows.push(row);
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let equity_invested = -self.cash_flows.initial_outlay();
        let total_distributions: f64 = self.cash_flows.distributions().iter().sum();
        let total_operating: f64 = self.rows.iter().map(|r| r.operating_cash_flow).sum();
        let years = self.rows.len().max(1) as f64;

        let (equity_multiple, average_cash_on_cash) = if equity_invested > 0.0 {
            (
                total_distributions / equity_invested,
                total_operating / years / equity_invested,
            )
        } else {
            (0.0, 0.0)
        };

        let min_dscr = self
            .rows
            .iter()
            .filter_map(|r| r.dscr)
            .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.min(d))));

        ProjectionSummary {
            holding_years: self.rows.len() as u32,
            equity_invested,
            total_distributions,
            net_profit: total_distributions - equity_invested,
            equity_multiple,
            average_cash_on_cash,
            min_dscr,
            irr_pct: self.irr_pct,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub holding_years: u32,
    pub equity_invested: f64,
    pub total_distributions: f64,
    pub net_profit: f64,
    pub equity_multiple: f64,
    /// Mean operating cash flow over equity invested
    pub average_cash_on_cash: f64,
    pub min_dscr: Option<f64>,
    pub irr_pct: f64,
}
