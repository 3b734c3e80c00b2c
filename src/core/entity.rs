//! Entity trait - common interface for all stored record types

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::core::identity::EntityId;

/// Common trait for all FootwearCraft records
pub trait Entity: Serialize + DeserializeOwned {
    /// The record type prefix (e.g., "PRD", "MAT")
    const PREFIX: &'static str;

    /// Human-readable record kind, used in error messages
    const KIND: &'static str;

    /// Get the record's unique ID
    fn id(&self) -> &EntityId;

    /// Get the display title
    fn title(&self) -> String;

    /// Get the creation timestamp
    fn created(&self) -> DateTime<Utc>;
}
