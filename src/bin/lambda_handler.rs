//! AWS Lambda handler for single-scenario projections
//!
//! Accepts a deal (optional, defaults to the bundled deal record) and either
//! the name of a bundled preset or one scenario in percent units, and returns
//! the annual cash flows and IRR.
//!
//! Set DEAL_PATH to point at a different default deal record.

use std::path::{Path, PathBuf};

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

use realty_projection::assumptions::{find_scenario, load_default_presets};
use realty_projection::deal::{load_deal, load_default_deal};
use realty_projection::projection::ProjectionSummary;
use realty_projection::{
    AnnualCashflowRow, ConfigError, ProjectionEngine, ProjectionInput, PropertyDeal,
    ScenarioAssumptions, ScenarioPreset,
};

/// Input configuration for the projection
#[derive(Debug, Deserialize)]
pub struct ProjectionRequest {
    /// Deal record; the bundled deal is used when omitted
    #[serde(default)]
    pub deal: Option<PropertyDeal>,

    /// Name of a bundled preset (Bear, Base, Bull)
    #[serde(default)]
    pub preset: Option<String>,

    /// Custom scenario; takes precedence over `preset`
    #[serde(default)]
    pub scenario: Option<ScenarioRequest>,
}

/// Scenario assumptions as entered by a user, in percent
#[derive(Debug, Deserialize)]
pub struct ScenarioRequest {
    #[serde(default = "default_scenario_name")]
    pub name: String,
    pub cap_rate_refinance: f64,
    pub cap_rate_sale: f64,
    pub y1_vacancy: f64,
    pub ongoing_vacancy: f64,
    pub expense_growth: f64,
    pub rent_growth: f64,
}

fn default_scenario_name() -> String { "Custom".to_string() }

impl ScenarioRequest {
    fn to_preset(&self) -> ScenarioPreset {
        ScenarioPreset {
            name: self.name.clone(),
            cap_rate_refinance: self.cap_rate_refinance,
            cap_rate_sale: self.cap_rate_sale,
            y1_vacancy: self.y1_vacancy,
            ongoing_vacancy: self.ongoing_vacancy,
            expense_growth: self.expense_growth,
            rent_growth: self.rent_growth,
            description: String::new(),
        }
    }
}

/// Output from the projection
#[derive(Debug, Serialize, Default)]
pub struct ProjectionResponse {
    pub scenario: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irr_pct: Option<f64>,
    pub cash_flows: Vec<f64>,
    pub rows: Vec<AnnualCashflowRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ProjectionSummary>,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl ProjectionResponse {
    fn failed(scenario: &str, kind: &str, message: String) -> Self {
        Self {
            scenario: scenario.to_string(),
            error: Some(message),
            error_kind: Some(kind.to_string()),
            ..Default::default()
        }
    }
}

fn default_deal(deal_path: Option<&Path>) -> Result<PropertyDeal, ConfigError> {
    match deal_path {
        Some(path) => load_deal(path),
        None => load_default_deal(),
    }
}

fn resolve_scenario(request: &ProjectionRequest) -> Result<ScenarioAssumptions, ConfigError> {
    if let Some(custom) = &request.scenario {
        return custom.to_preset().to_assumptions();
    }
    let name = request.preset.as_deref().unwrap_or("Base");
    let presets = load_default_presets()?;
    find_scenario(&presets, name).cloned()
}

/// Project one request; configuration and projection failures both come
/// back as error responses
fn respond(request: ProjectionRequest, deal_path: Option<&Path>) -> ProjectionResponse {
    let requested_name = match (&request.scenario, &request.preset) {
        (Some(custom), _) => custom.name.clone(),
        (None, Some(preset)) => preset.clone(),
        (None, None) => String::new(),
    };

    let assumptions = match resolve_scenario(&request) {
        Ok(a) => a,
        Err(e) => return ProjectionResponse::failed(&requested_name, "config", e.to_string()),
    };

    let deal = match request.deal {
        Some(deal) => deal,
        None => match default_deal(deal_path) {
            Ok(deal) => deal,
            Err(e) => {
                log::warn!("failed to load deal: {}", e);
                return ProjectionResponse::failed(&assumptions.name, "config", e.to_string());
            }
        },
    };

    let input = ProjectionInput::from_parts(&deal, &assumptions);
    let name = assumptions.name;
    match ProjectionEngine::default().project(&input) {
        Ok(result) => ProjectionResponse {
            irr_pct: Some(result.irr_pct),
            summary: Some(result.summary()),
            cash_flows: result.cash_flows.as_slice().to_vec(),
            rows: result.rows,
            scenario: name,
            ..Default::default()
        },
        Err(e) => {
            log::warn!("projection for '{}' failed: {}", name, e);
            ProjectionResponse::failed(&name, e.kind(), e.to_string())
        }
    }
}

/// Lambda handler function
async fn handler(event: LambdaEvent<ProjectionRequest>) -> Result<ProjectionResponse, Error> {
    let start = std::time::Instant::now();
    let deal_path = std::env::var("DEAL_PATH").ok().map(PathBuf::from);

    let mut response = respond(event.payload, deal_path.as_deref());

    response.execution_time_ms = start.elapsed().as_millis() as u64;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
