//! Core projection engine for annual property cash flows

use log::{debug, warn};

use super::cashflows::{AnnualCashflowRow, ProjectionResult};
use super::input::ProjectionInput;
use super::irr::IrrSolver;
use super::state::ProjectionState;
use crate::error::{ProjectionError, Result};

/// Main projection engine
///
/// Holds no per-run state; one engine can serve any number of concurrent
/// projections.
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    solver: IrrSolver,
}

impl ProjectionEngine {
    /// Create a new projection engine with the given IRR solver settings
    pub fn new(solver: IrrSolver) -> Self {
        Self { solver }
    }

    pub fn solver(&self) -> &IrrSolver {
        &self.solver
    }

    /// Run the full holding period and solve for IRR
    pub fn project(&self, input: &ProjectionInput) -> Result<ProjectionResult> {
        input.validate()?;

        let mut state = ProjectionState::at_acquisition(input)?;
        let mut result = ProjectionResult::new(input.initial_equity());

        for _year in 1..=input.holding_period {
            state.advance_year(input);
            let row = self.calculate_year(input, &mut state)?;
            result.add_row(row);
        }

        let irr = self.solver.solve(result.cash_flows.as_slice())?;
        result.irr_pct = irr * 100.0;

        debug!(
            "projection complete: {} years, IRR {:.4}%",
            input.holding_period, result.irr_pct
        );
        Ok(result)
    }

    /// Operations, financing and capital events for the current year
    fn calculate_year(
        &self,
        input: &ProjectionInput,
        state: &mut ProjectionState,
    ) -> Result<AnnualCashflowRow> {
        let mut row = AnnualCashflowRow::new(state.year);

        row.vacancy_rate = input.vacancy_rate_for(state.year);
        row.gross_potential_rent = state.gross_potential_rent;
        row.effective_gross_income = state.gross_potential_rent * (1.0 - row.vacancy_rate);
        row.operating_expenses = state.operating_expenses;
        row.net_operating_income = row.effective_gross_income - row.operating_expenses;
        row.opening_loan_balance = state.loan.balance_after(state.payments_made());

        if state.year == input.refinance_year {
            self.refinance(input, state, &mut row)?;
        }

        // Debt service of whichever loan is in place after any refinance
        row.debt_service = state.loan.annual_debt_service();
        row.operating_cash_flow = row.net_operating_income - row.debt_service;
        row.dscr = if row.debt_service > 0.0 {
            Some(row.net_operating_income / row.debt_service)
        } else {
            None
        };

        if state.year == input.holding_period {
            self.sell(input, state, &mut row);
        }

        row.total_cash_flow =
            row.operating_cash_flow + row.refinance_cash_out + row.net_sale_proceeds;

        if let Some(dscr) = row.dscr {
            if dscr < 1.0 {
                warn!("year {}: NOI does not cover debt service (DSCR {:.2})", row.year, dscr);
            }
        }
        debug!(
            "year {}: NOI {:.2}, debt service {:.2}, cash flow {:.2}",
            row.year, row.net_operating_income, row.debt_service, row.total_cash_flow
        );

        Ok(row)
    }

    /// Replace the loan with one sized off the refinance valuation
    fn refinance(
        &self,
        input: &ProjectionInput,
        state: &mut ProjectionState,
        row: &mut AnnualCashflowRow,
    ) -> Result<()> {
        let value = row.net_operating_income / input.cap_rate_refinance;
        if value <= 0.0 {
            return Err(ProjectionError::domain(
                "net_operating_income",
                format!(
                    "refinance valuation in year {} is not positive (NOI {:.2})",
                    state.year, row.net_operating_income
                ),
            ));
        }

        let new_loan_amount = value * input.loan_to_value;
        let payoff = state.loan.balance_after(state.payments_made());

        row.refinance_value = Some(value);
        row.refinance_cash_out = new_loan_amount - payoff;

        state.loan = state.loan.refinance(new_loan_amount)?;

        if row.refinance_cash_out < 0.0 {
            warn!(
                "year {}: refinance requires {:.2} of new equity",
                state.year, -row.refinance_cash_out
            );
        }
        debug!(
            "year {}: refinance at value {:.2}, new loan {:.2}, payoff {:.2}",
            state.year, value, new_loan_amount, payoff
        );

        Ok(())
    }

    /// Sell at the sale cap rate and retire the outstanding loan
    fn sell(&self, input: &ProjectionInput, state: &ProjectionState, row: &mut AnnualCashflowRow) {
        let value = row.net_operating_income / input.cap_rate_sale;
        let gross_proceeds = value * (1.0 - input.selling_costs_rate);
        let payoff = state.loan.balance_after(state.payments_made());

        row.sale_value = Some(value);
        row.net_sale_proceeds = gross_proceeds - payoff;

        debug!(
            "year {}: sale at value {:.2}, payoff {:.2}, net proceeds {:.2}",
            state.year, value, payoff, row.net_sale_proceeds
        );
    }
}

/// Project with default solver settings
pub fn project(input: &ProjectionInput) -> Result<ProjectionResult> {
    ProjectionEngine::default().project(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::input::tests::reference_input;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_reference_fixture_regression() {
        let result = project(&reference_input()).unwrap();

        let expected = [
            -300_000.0,
            32_156.983666980253,
            183_752.9661089407,
            32_540.15518996856,
            35_146.30908496858,
            498_914.6460949184,
        ];
        assert_eq!(result.cash_flows.len(), 6);
        for (actual, expected) in result.cash_flows.as_slice().iter().zip(expected) {
            assert_relative_eq!(*actual, expected, max_relative = 1e-9);
        }
        assert_abs_diff_eq!(result.irr_pct, 29.357360215787175, epsilon = 1e-4);
    }

    #[test]
    fn test_reference_rows() {
        let result = project(&reference_input()).unwrap();
        let rows = &result.rows;
        assert_eq!(rows.len(), 5);

        assert_relative_eq!(rows[0].gross_potential_rent, 154_500.0, max_relative = 1e-12);
        assert_relative_eq!(rows[0].effective_gross_income, 139_050.0, max_relative = 1e-12);
        assert_relative_eq!(rows[0].net_operating_income, 77_250.0, max_relative = 1e-12);
        assert_relative_eq!(rows[0].debt_service, 45_093.01633301975, max_relative = 1e-9);
        assert_relative_eq!(rows[0].opening_loan_balance, 700_000.0, max_relative = 1e-9);

        assert!(rows[1].is_refinance_year());
        assert_relative_eq!(rows[1].debt_service, 54_331.64131003144, max_relative = 1e-9);
        assert_relative_eq!(
            rows[1].refinance_value.unwrap(),
            84_341.55 / 0.07,
            max_relative = 1e-9
        );
        // New loan's debt service carries through to the sale
        assert_relative_eq!(rows[4].debt_service, rows[1].debt_service);
        assert!(rows[4].is_sale_year());
        assert!(!rows[2].is_refinance_year() && !rows[2].is_sale_year());
    }

    #[test]
    fn test_zero_rate_single_year_closed_form() {
        let input = ProjectionInput {
            holding_period: 1,
            refinance_year: 1,
            loan_interest_rate: 0.0,
            year1_vacancy_rate: 0.0,
            ongoing_vacancy_rate: 0.0,
            expense_growth_rate: 0.0,
            rent_growth_rate: 0.0,
            cap_rate_refinance: 0.08,
            cap_rate_sale: 0.08,
            ..reference_input()
        };
        let result = project(&input).unwrap();

        // NOI 90k; refinance into 70% of 1.125M, 30-year straight-line
        let noi = 90_000.0;
        let new_loan = noi / 0.08 * 0.70;
        let cash_out = new_loan - 700_000.0;
        let operating = noi - new_loan / 30.0;
        let net_sale = noi / 0.08 * 0.95 - new_loan;
        let year1 = operating + cash_out + net_sale;
        let expected_irr = (year1 / 300_000.0 - 1.0) * 100.0;

        assert_relative_eq!(result.cash_flows.as_slice()[1], year1, max_relative = 1e-12);
        assert_abs_diff_eq!(result.irr_pct, expected_irr, epsilon = 1e-4);
        assert_abs_diff_eq!(result.irr_pct, 44.1666667, epsilon = 1e-4);
    }

    #[test]
    fn test_refinance_in_sale_year() {
        let input = ProjectionInput { refinance_year: 5, ..reference_input() };
        let result = project(&input).unwrap();

        let last = result.rows.last().unwrap();
        assert!(last.is_refinance_year() && last.is_sale_year());
        assert_relative_eq!(
            result.cash_flows.as_slice()[5],
            686_863.956150274,
            max_relative = 1e-9
        );
        assert_abs_diff_eq!(result.irr_pct, 26.495938367622573, epsilon = 1e-4);
    }

    #[test]
    fn test_refinance_in_first_year_uses_original_principal() {
        let input = ProjectionInput { refinance_year: 1, ..reference_input() };
        let result = project(&input).unwrap();
        let first = &result.rows[0];

        let new_loan = first.refinance_value.unwrap() * 0.70;
        assert_abs_diff_eq!(first.refinance_cash_out, new_loan - 700_000.0, epsilon = 1e-4);
    }

    #[test]
    fn test_zero_sale_cap_rate_is_domain_error() {
        let input = ProjectionInput { cap_rate_sale: 0.0, ..reference_input() };
        assert!(matches!(project(&input), Err(ProjectionError::Domain { .. })));
    }

    #[test]
    fn test_unlevered_deal() {
        let input = ProjectionInput { loan_to_value: 0.0, ..reference_input() };
        let result = project(&input).unwrap();

        assert_relative_eq!(result.cash_flows.initial_outlay(), -1_000_000.0);
        assert!(result.rows.iter().all(|r| r.debt_service == 0.0 && r.dscr.is_none()));
        assert!(result.rows.iter().all(|r| r.refinance_cash_out == 0.0));
    }

    #[test]
    fn test_rent_growth_monotonicity() {
        let mut previous = f64::NEG_INFINITY;
        for step in -2..=10 {
            let rent_growth_rate = step as f64 / 100.0;
            let input = ProjectionInput { rent_growth_rate, ..reference_input() };
            let irr = project(&input).unwrap().irr_pct;
            assert!(
                irr >= previous,
                "IRR fell from {} to {} at rent growth {}",
                previous,
                irr,
                rent_growth_rate
            );
            previous = irr;
        }
    }

    #[test]
    fn test_deep_decline_has_no_irr() {
        // Cash flows change sign but NPV stays negative at every rate
        let input = ProjectionInput { rent_growth_rate: -0.05, ..reference_input() };
        assert!(matches!(project(&input), Err(ProjectionError::Convergence { .. })));
    }

    #[test]
    fn test_negative_refinance_noi_rejected() {
        let input = ProjectionInput {
            initial_operating_expenses: 200_000.0,
            ..reference_input()
        };
        match project(&input) {
            Err(ProjectionError::Domain { field, .. }) => assert_eq!(field, "net_operating_income"),
            other => panic!("expected domain error, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_loan_term_rejected() {
        for years in [200_000_000, 400_000_000] {
            let input = ProjectionInput { loan_amortization_years: years, ..reference_input() };
            match project(&input) {
                Err(ProjectionError::Domain { field, .. }) => {
                    assert_eq!(field, "loan_amortization_years")
                }
                other => panic!("term of {} years accepted: {:?}", years, other),
            }
        }
    }
}
