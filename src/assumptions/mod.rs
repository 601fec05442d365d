//! Scenario assumptions: vacancy, growth and cap rates

mod preset;
pub mod loader;

pub use preset::ScenarioPreset;
pub use loader::{load_presets, load_presets_from_reader, load_default_presets};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Market assumptions for one scenario, as per-annum fractions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAssumptions {
    pub name: String,
    pub cap_rate_refinance: f64,
    pub cap_rate_sale: f64,
    pub year1_vacancy_rate: f64,
    pub ongoing_vacancy_rate: f64,
    pub expense_growth_rate: f64,
    pub rent_growth_rate: f64,
}

/// Look up a scenario by name, ignoring case
pub fn find_scenario<'a>(
    scenarios: &'a [ScenarioAssumptions],
    name: &str,
) -> Result<&'a ScenarioAssumptions, ConfigError> {
    scenarios
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ConfigError::UnknownScenario(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(name: &str) -> ScenarioAssumptions {
        ScenarioAssumptions {
            name: name.to_string(),
            cap_rate_refinance: 0.067,
            cap_rate_sale: 0.0685,
            year1_vacancy_rate: 0.15,
            ongoing_vacancy_rate: 0.05,
            expense_growth_rate: 0.025,
            rent_growth_rate: 0.03,
        }
    }

    #[test]
    fn test_find_scenario_ignores_case() {
        let scenarios = vec![scenario("Bear"), scenario("Base")];
        assert_eq!(find_scenario(&scenarios, "base").unwrap().name, "Base");
        assert!(matches!(
            find_scenario(&scenarios, "Bull"),
            Err(ConfigError::UnknownScenario(name)) if name == "Bull"
        ));
    }
}
