//! FWC: FootwearCraft
//!
//! Size-chart conversion and bill-of-materials costing for footwear
//! production, backed by a per-project SQLite store.

pub mod cli;
pub mod core;
pub mod entities;
