//! Core module - fundamental types and services

pub mod config;
pub mod costing;
pub mod entity;
pub mod error;
pub mod identity;
pub mod pricing;
pub mod project;
pub mod sample;
pub mod sizing;
pub mod store;

pub use config::Config;
pub use costing::{CostingService, MaterialSource, ProductionCostCalculator};
pub use entity::Entity;
pub use error::{Error, Result};
pub use identity::{EntityId, EntityPrefix, IdParseError};
pub use pricing::DiscountTier;
pub use project::{Project, ProjectError};
pub use sizing::{SizeCatalog, SizeConversion, SizeConversionRequest};
pub use store::Store;
