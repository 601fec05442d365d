//! Scenario presets as entered by users, in percent

use serde::{Deserialize, Serialize};

use super::ScenarioAssumptions;
use crate::error::ConfigError;

/// One row of the scenario table; every rate is a percentage (7.0 = 7%)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPreset {
    #[serde(rename = "Scenario")]
    pub name: String,
    #[serde(rename = "CapRateRefinance")]
    pub cap_rate_refinance: f64,
    #[serde(rename = "CapRateSale")]
    pub cap_rate_sale: f64,
    #[serde(rename = "Year1Vacancy")]
    pub y1_vacancy: f64,
    #[serde(rename = "OngoingVacancy")]
    pub ongoing_vacancy: f64,
    #[serde(rename = "ExpenseGrowth")]
    pub expense_growth: f64,
    #[serde(rename = "RentGrowth")]
    pub rent_growth: f64,
    #[serde(rename = "Description", default)]
    pub description: String,
}

impl ScenarioPreset {
    /// Convert percentages to the fractions the engine works in
    ///
    /// Only checks that values are numbers; range checks belong to the engine.
    pub fn to_assumptions(&self) -> Result<ScenarioAssumptions, ConfigError> {
        let fields = [
            ("CapRateRefinance", self.cap_rate_refinance),
            ("CapRateSale", self.cap_rate_sale),
            ("Year1Vacancy", self.y1_vacancy),
            ("OngoingVacancy", self.ongoing_vacancy),
            ("ExpenseGrowth", self.expense_growth),
            ("RentGrowth", self.rent_growth),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::InvalidPreset {
                name: self.name.clone(),
                reason: format!("{} is not a finite number", field),
            });
        }

        Ok(ScenarioAssumptions {
            name: self.name.clone(),
            cap_rate_refinance: self.cap_rate_refinance / 100.0,
            cap_rate_sale: self.cap_rate_sale / 100.0,
            year1_vacancy_rate: self.y1_vacancy / 100.0,
            ongoing_vacancy_rate: self.ongoing_vacancy / 100.0,
            expense_growth_rate: self.expense_growth / 100.0,
            rent_growth_rate: self.rent_growth / 100.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_percent_to_fraction() {
        let preset = ScenarioPreset {
            name: "Bull".to_string(),
            cap_rate_refinance: 6.4,
            cap_rate_sale: 6.45,
            y1_vacancy: 8.0,
            ongoing_vacancy: 2.0,
            expense_growth: 2.0,
            rent_growth: 4.0,
            description: String::new(),
        };
        let a = preset.to_assumptions().unwrap();

        assert_eq!(a.name, "Bull");
        assert_relative_eq!(a.cap_rate_refinance, 0.064, max_relative = 1e-12);
        assert_relative_eq!(a.cap_rate_sale, 0.0645, max_relative = 1e-12);
        assert_relative_eq!(a.year1_vacancy_rate, 0.08, max_relative = 1e-12);
        assert_relative_eq!(a.ongoing_vacancy_rate, 0.02, max_relative = 1e-12);
        assert_relative_eq!(a.rent_growth_rate, 0.04, max_relative = 1e-12);
    }

    #[test]
    fn test_non_finite_rejected() {
        let preset = ScenarioPreset {
            name: "Broken".to_string(),
            cap_rate_refinance: f64::NAN,
            cap_rate_sale: 6.45,
            y1_vacancy: 8.0,
            ongoing_vacancy: 2.0,
            expense_growth: 2.0,
            rent_growth: 4.0,
            description: String::new(),
        };
        assert!(matches!(
            preset.to_assumptions(),
            Err(ConfigError::InvalidPreset { .. })
        ));
    }
}
