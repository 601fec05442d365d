//! Property deal record and its loader

mod data;
pub mod loader;

pub use data::PropertyDeal;
pub use loader::{load_deal, load_deal_from_reader, load_default_deal};
