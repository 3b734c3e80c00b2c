//! Record type definitions
//!
//! FootwearCraft stores the following record types:
//!
//! **Measurement Catalog:**
//! - [`SizeChart`] - Regional size charts, one per (region, gender)
//! - [`SizeEntry`] - Size labels with foot length and width
//!
//! **Product Catalog:**
//! - [`Material`] - Raw materials with per-unit costs
//! - [`Category`] - Footwear categories
//! - [`Product`] - Footwear styles with pricing and production data
//! - [`BomLine`] - Material requirements per product
//!
//! **Production:**
//! - [`CustomDesign`] - Customer designs based on customizable products
//! - [`ProductionOrder`] - Work orders with cost tracking

pub mod bom;
pub mod category;
pub mod custom_design;
pub mod material;
pub mod product;
pub mod production_order;
pub mod size_chart;

pub use bom::BomLine;
pub use category::Category;
pub use custom_design::CustomDesign;
pub use material::{Material, MaterialType};
pub use product::Product;
pub use production_order::{CostBreakdown, OrderStatus, ProductionOrder};
pub use size_chart::{ChartKey, Gender, Region, SizeChart, SizeEntry};
