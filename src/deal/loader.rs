//! Load the deal record from JSON

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::PropertyDeal;
use crate::error::ConfigError;

/// Default path to the deal record
pub const DEFAULT_DEAL_PATH: &str = "data/deal.json";

/// Load a deal record from a JSON file
pub fn load_deal(path: &Path) -> Result<PropertyDeal, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_deal_from_reader(file)
}

/// Load a deal record from any JSON reader
pub fn load_deal_from_reader<R: Read>(reader: R) -> Result<PropertyDeal, ConfigError> {
    let deal: PropertyDeal = serde_json::from_reader(reader)?;
    log::debug!("loaded deal '{}' ({} year hold)", deal.name, deal.holding_period);
    Ok(deal)
}

/// Load the deal record from the default location (data/deal.json)
pub fn load_default_deal() -> Result<PropertyDeal, ConfigError> {
    load_deal(Path::new(DEFAULT_DEAL_PATH))
}
