pub mod app_core;
mod async_runtime;
pub mod catalog_store;
pub mod domain;
pub mod filter_cache;
pub mod gateways;
pub mod kernel;
pub mod mirror;
pub mod ports;
pub mod viewmodel;

pub use app_core::*;
pub use catalog_store::CatalogStore;
pub use domain::BoardState;
pub use filter_cache::FilterCache;
pub use gateways::{HttpGateway, RedbGateway};
pub use kernel::WodBoard;
pub use mirror::MirrorOutcome;
pub use ports::*;
pub use viewmodel::*;
