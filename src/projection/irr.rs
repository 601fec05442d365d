//! Internal Rate of Return (IRR) calculation
//!
//! Annual cash flows, year 0 first. The solver scans NPV for sign-change
//! brackets, refines each with bisection-guarded Newton steps and returns the
//! root closest to zero.

use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, Result};

/// Cash flows smaller than this are treated as zero for the sign-change test
const SIGN_THRESHOLD: f64 = 1e-10;

/// Smallest `1 + rate` examined; rates are never pushed closer to -100%
const MIN_GROWTH_FACTOR: f64 = 1e-9;

/// Root finder settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrSolver {
    /// Absolute tolerance on the rate
    pub tolerance: f64,

    /// Iteration budget per refinement
    pub max_iterations: u32,

    /// Lowest rate on the scan grid (must be > -1); below it the gap to
    /// -100% is searched by repeated halving
    pub lower_bound: f64,

    /// Highest rate scanned
    pub upper_bound: f64,

    /// Width of the bracket scan grid
    pub scan_step: f64,

    /// Starting point for the unbracketed Newton fallback
    pub initial_guess: f64,
}

impl Default for IrrSolver {
    fn default() -> Self {
        Self {
            tolerance: 1e-7,
            max_iterations: 1000,
            lower_bound: -0.99,
            upper_bound: 10.0,
            scan_step: 0.01,
            initial_guess: 0.10,
        }
    }
}

impl IrrSolver {
    /// Solve for the IRR of `cashflows`, returned as a decimal rate
    pub fn solve(&self, cashflows: &[f64]) -> Result<f64> {
        if cashflows.len() < 2 {
            return Err(ProjectionError::NoSolution(
                "IRR requires at least two cash flows".to_string(),
            ));
        }
        if cashflows.iter().any(|cf| !cf.is_finite()) {
            return Err(ProjectionError::domain("cash_flows", "cash flows must be finite"));
        }

        // At least one sign change is required for IRR to exist
        let has_positive = cashflows.iter().any(|&cf| cf > SIGN_THRESHOLD);
        let has_negative = cashflows.iter().any(|&cf| cf < -SIGN_THRESHOLD);
        if !has_positive || !has_negative {
            return Err(ProjectionError::NoSolution(
                "cash flows never change sign".to_string(),
            ));
        }

        let brackets = self.scan_brackets(cashflows);
        if brackets.is_empty() {
            log::debug!("no IRR bracket in [{}, {}], trying Newton", self.lower_bound, self.upper_bound);
            return self.newton(cashflows);
        }

        let mut best: Option<f64> = None;
        let mut last_err = None;
        for (low, high) in brackets {
            match self.refine(cashflows, low, high) {
                Ok(root) => {
                    if best.map_or(true, |b| root.abs() < b.abs()) {
                        best = Some(root);
                    }
                }
                Err(e) => last_err = Some(e),
            }
        }

        match (best, last_err) {
            (Some(root), _) => Ok(root),
            (None, Some(e)) => Err(e),
            (None, None) => self.newton(cashflows),
        }
    }

    /// Grid intervals over which NPV changes sign (degenerate when a grid
    /// point is itself a root)
    fn scan_brackets(&self, cashflows: &[f64]) -> Vec<(f64, f64)> {
        let steps = ((self.upper_bound - self.lower_bound) / self.scan_step).ceil() as usize;
        let mut brackets = Vec::new();

        let mut prev_rate = self.lower_bound;
        let mut prev_npv = npv_at_rate(cashflows, prev_rate);

        for i in 1..=steps {
            let rate = (self.lower_bound + i as f64 * self.scan_step).min(self.upper_bound);
            let value = npv_at_rate(cashflows, rate);

            if prev_npv.is_finite() && value.is_finite() {
                if prev_npv == 0.0 {
                    brackets.push((prev_rate, prev_rate));
                } else if prev_npv * value < 0.0 {
                    brackets.push((prev_rate, rate));
                }
            }

            prev_rate = rate;
            prev_npv = value;
        }
        if prev_npv == 0.0 {
            brackets.push((prev_rate, prev_rate));
        }

        self.scan_toward_total_loss(cashflows, &mut brackets);
        brackets
    }

    /// Halve the distance from the lower bound to -100% until it is
    /// `MIN_GROWTH_FACTOR`, recording any sign change on the way
    fn scan_toward_total_loss(&self, cashflows: &[f64], brackets: &mut Vec<(f64, f64)>) {
        let mut prev_rate = self.lower_bound;
        let mut prev_npv = npv_at_rate(cashflows, prev_rate);
        let mut gap = 1.0 + self.lower_bound;

        while gap > MIN_GROWTH_FACTOR {
            gap = (gap * 0.5).max(MIN_GROWTH_FACTOR);
            let rate = -1.0 + gap;
            let value = npv_at_rate(cashflows, rate);
            if !value.is_finite() {
                break;
            }

            if value == 0.0 {
                brackets.push((rate, rate));
            } else if prev_npv.is_finite() && prev_npv * value < 0.0 {
                brackets.push((rate, prev_rate));
            }

            prev_rate = rate;
            prev_npv = value;
        }
    }

    /// Newton iteration kept inside [low, high], bisecting whenever the
    /// Newton step would leave the bracket
    fn refine(&self, cashflows: &[f64], low: f64, high: f64) -> Result<f64> {
        if low == high {
            return Ok(low);
        }

        let (mut low, mut high) = (low, high);
        let mut npv_low = npv_at_rate(cashflows, low);
        let mut rate = 0.5 * (low + high);

        for _ in 0..self.max_iterations {
            let (npv, dnpv) = npv_and_derivative(cashflows, rate);
            if npv == 0.0 {
                return Ok(rate);
            }

            if npv.signum() == npv_low.signum() {
                low = rate;
                npv_low = npv;
            } else {
                high = rate;
            }

            let newton = rate - npv / dnpv;
            let next = if newton.is_finite() && newton > low && newton < high {
                newton
            } else {
                0.5 * (low + high)
            };

            if (next - rate).abs() < self.tolerance || (high - low) < self.tolerance {
                return Ok(next);
            }
            rate = next;
        }

        Err(ProjectionError::Convergence {
            iterations: self.max_iterations,
            last_npv: npv_at_rate(cashflows, rate),
        })
    }

    /// Unbracketed Newton-Raphson from the initial guess, used when the scan
    /// range holds no bracket
    fn newton(&self, cashflows: &[f64]) -> Result<f64> {
        let scale: f64 = cashflows.iter().map(|cf| cf.abs()).sum();
        let mut rate = self.initial_guess;

        for _ in 0..self.max_iterations {
            let (npv, dnpv) = npv_and_derivative(cashflows, rate);

            if dnpv.abs() < 1e-20 {
                break;
            }

            let new_rate = (rate - npv / dnpv).max(MIN_GROWTH_FACTOR - 1.0);

            // Steps near the floor are tiny without being near a root
            if (new_rate - rate).abs() < self.tolerance
                && npv_at_rate(cashflows, new_rate).abs() <= 1e-9 * scale
            {
                return Ok(new_rate);
            }

            rate = new_rate;
        }

        Err(ProjectionError::Convergence {
            iterations: self.max_iterations,
            last_npv: npv_at_rate(cashflows, rate),
        })
    }
}

/// IRR with the default solver settings, as a decimal rate
pub fn calculate_irr(cashflows: &[f64]) -> Result<f64> {
    IrrSolver::default().solve(cashflows)
}

/// Net present value at an annual discount rate; year 0 is undiscounted
pub fn npv(rate: f64, cashflows: &[f64]) -> Result<f64> {
    if !rate.is_finite() || rate <= -1.0 {
        return Err(ProjectionError::domain(
            "rate",
            "discount rate must be greater than -100%",
        ));
    }
    Ok(npv_at_rate(cashflows, rate))
}

/// Calculate NPV and its derivative with respect to rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        npv += cf / discount;
        if t > 0 {
            dnpv -= (t as f64) * cf / ((1.0 + rate).powi(t as i32 + 1));
        }
    }

    (npv, dnpv)
}

fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}
