//! CSV-based scenario preset loader
//!
//! Loads the scenario table from data/scenarios.csv

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{ScenarioAssumptions, ScenarioPreset};
use crate::error::ConfigError;

/// Default path to the scenario table
pub const DEFAULT_SCENARIOS_PATH: &str = "data/scenarios.csv";

/// Load presets from a CSV file
pub fn load_presets(path: &Path) -> Result<Vec<ScenarioPreset>, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_presets_from_reader(file)
}

/// Load presets from any CSV reader
pub fn load_presets_from_reader<R: Read>(reader: R) -> Result<Vec<ScenarioPreset>, ConfigError> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut presets = Vec::new();

    for result in reader.deserialize() {
        let preset: ScenarioPreset = result?;
        presets.push(preset);
    }

    log::debug!("loaded {} scenario presets", presets.len());
    Ok(presets)
}

/// Load presets from the default location and convert them to fractions
pub fn load_default_presets() -> Result<Vec<ScenarioAssumptions>, ConfigError> {
    load_presets(Path::new(DEFAULT_SCENARIOS_PATH))?
        .iter()
        .map(ScenarioPreset::to_assumptions)
        .collect()
}
