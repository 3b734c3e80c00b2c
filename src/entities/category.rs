//! Category entity - Footwear product categories

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// A footwear category (e.g., "Boots"), addressed by its unique slug
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,

    pub name: String,

    /// URL-safe unique key (e.g., "athletic-shoes")
    pub slug: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Parent category slug for nested categories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    pub created: DateTime<Utc>,
}

impl Category {
    pub fn new(name: String, slug: String) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Cat),
            name,
            slug,
            description: String::new(),
            parent: None,
            created: Utc::now(),
        }
    }
}

impl Entity for Category {
    const PREFIX: &'static str = "CAT";
    const KIND: &'static str = "category";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

/// Derive a slug from a display name: lowercase, runs of non-alphanumerics become '-'
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
