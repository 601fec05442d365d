//! Scenario runner for one deal under several market scenarios
//!
//! Loads the deal and the preset table once, then projects any number of
//! scenarios against them.

use std::path::Path;

use log::info;
use rayon::prelude::*;
use serde::Serialize;

use crate::assumptions::{find_scenario, load_presets, ScenarioAssumptions, ScenarioPreset};
use crate::deal::{load_deal, PropertyDeal};
use crate::error::{ConfigError, ProjectionError};
use crate::projection::{ProjectionEngine, ProjectionInput, ProjectionResult};

/// Outcome of projecting one named scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioRun {
    pub scenario: ScenarioAssumptions,
    pub input: ProjectionInput,
    #[serde(serialize_with = "serialize_outcome")]
    pub outcome: Result<ProjectionResult, ProjectionError>,
}

impl ScenarioRun {
    pub fn name(&self) -> &str {
        &self.scenario.name
    }

    pub fn irr_pct(&self) -> Option<f64> {
        self.outcome.as_ref().ok().map(|r| r.irr_pct)
    }
}

/// `{"result": ...}` on success, `{"error": ..., "kind": ...}` on failure
fn serialize_outcome<S>(
    outcome: &Result<ProjectionResult, ProjectionError>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeMap;

    let mut map = serializer.serialize_map(Some(2))?;
    match outcome {
        Ok(result) => {
            map.serialize_entry("result", result)?;
            map.serialize_entry("summary", &result.summary())?;
        }
        Err(e) => {
            map.serialize_entry("error", &e.to_string())?;
            map.serialize_entry("kind", e.kind())?;
        }
    }
    map.end()
}

/// Pre-loaded runner for one deal and its scenario table
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_files(deal_path, scenarios_path)?;
/// for run in runner.run_all() {
///     println!("{}: {:?}", run.name(), run.irr_pct());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    deal: PropertyDeal,
    scenarios: Vec<ScenarioAssumptions>,
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Create runner from an in-memory deal and scenarios
    pub fn new(deal: PropertyDeal, scenarios: Vec<ScenarioAssumptions>) -> Self {
        Self {
            deal,
            scenarios,
            engine: ProjectionEngine::default(),
        }
    }

    /// Create runner by loading the deal JSON and the preset CSV
    pub fn from_files(deal_path: &Path, scenarios_path: &Path) -> Result<Self, ConfigError> {
        let deal = load_deal(deal_path)?;
        let scenarios = load_presets(scenarios_path)?
            .iter()
            .map(ScenarioPreset::to_assumptions)
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "loaded deal '{}' with {} scenarios",
            deal.name,
            scenarios.len()
        );
        Ok(Self::new(deal, scenarios))
    }

    /// Use a specific engine (e.g. custom IRR solver settings)
    pub fn with_engine(mut self, engine: ProjectionEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Run a single scenario by name
    pub fn run(&self, name: &str) -> Result<ScenarioRun, ConfigError> {
        let scenario = find_scenario(&self.scenarios, name)?;
        Ok(self.run_assumptions(scenario))
    }

    /// Run arbitrary assumptions against this deal
    pub fn run_assumptions(&self, scenario: &ScenarioAssumptions) -> ScenarioRun {
        let input = ProjectionInput::from_parts(&self.deal, scenario);
        let outcome = self.engine.project(&input);

        match &outcome {
            Ok(result) => info!("scenario '{}': IRR {:.2}%", scenario.name, result.irr_pct),
            Err(e) => info!("scenario '{}' failed: {}", scenario.name, e),
        }

        ScenarioRun {
            scenario: scenario.clone(),
            input,
            outcome,
        }
    }

    /// Run every loaded scenario in parallel, preserving table order
    pub fn run_all(&self) -> Vec<ScenarioRun> {
        self.scenarios
            .par_iter()
            .map(|scenario| self.run_assumptions(scenario))
            .collect()
    }

    /// Run a subset of scenarios by name, in the order given
    pub fn run_named(&self, names: &[String]) -> Result<Vec<ScenarioRun>, ConfigError> {
        let selected = names
            .iter()
            .map(|name| find_scenario(&self.scenarios, name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(selected
            .into_par_iter()
            .map(|scenario| self.run_assumptions(scenario))
            .collect())
    }

    pub fn deal(&self) -> &PropertyDeal {
        &self.deal
    }

    /// Mutable deal, for holding period or refinance overrides
    pub fn deal_mut(&mut self) -> &mut PropertyDeal {
        &mut self.deal
    }

    pub fn scenarios(&self) -> &[ScenarioAssumptions] {
        &self.scenarios
    }
}
