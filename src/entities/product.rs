//! Product entity type - Footwear styles offered for production

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::size_chart::Gender;

fn default_production_days() -> u32 {
    14
}

fn default_moq() -> u32 {
    1
}

fn default_active() -> bool {
    true
}

/// A footwear Product, addressed by its unique SKU
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier
    pub id: EntityId,

    pub name: String,

    /// Stock keeping unit, unique across the catalog
    pub sku: String,

    /// Category slug
    pub category: String,

    pub gender: Gender,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// List price for a single pair
    pub base_price: Decimal,

    /// Heel height in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heel_height: Option<Decimal>,

    /// Sole thickness in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sole_thickness: Option<Decimal>,

    /// Weight in grams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Decimal>,

    /// Whether customers may submit custom designs for this product
    #[serde(default)]
    pub customizable: bool,

    /// Production lead time in days
    #[serde(default = "default_production_days")]
    pub production_time_days: u32,

    #[serde(default = "default_moq")]
    pub minimum_order_quantity: u32,

    #[serde(default = "default_active")]
    pub active: bool,

    /// Materials a customer may choose from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_materials: Vec<EntityId>,

    /// Size entries this product is made in
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_sizes: Vec<EntityId>,

    pub created: DateTime<Utc>,

    pub updated: DateTime<Utc>,
}

impl Product {
    pub fn new(
        name: String,
        sku: String,
        category: String,
        gender: Gender,
        base_price: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new(EntityPrefix::Prd),
            name,
            sku,
            category,
            gender,
            description: String::new(),
            base_price,
            heel_height: None,
            sole_thickness: None,
            weight: None,
            customizable: false,
            production_time_days: default_production_days(),
            minimum_order_quantity: default_moq(),
            active: default_active(),
            available_materials: Vec::new(),
            available_sizes: Vec::new(),
            created: now,
            updated: now,
        }
    }

    /// Unit price after bulk discounts: 20% off at 100+ pairs, 10% off at 50+
    pub fn price_for_quantity(&self, quantity: u32) -> Decimal {
        if quantity >= 100 {
            self.base_price * Decimal::new(8, 1)
        } else if quantity >= 50 {
            self.base_price * Decimal::new(9, 1)
        } else {
            self.base_price
        }
    }
}

impl Entity for Product {
    const PREFIX: &'static str = "PRD";
    const KIND: &'static str = "product";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        format!("{} ({})", self.name, self.sku)
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boot() -> Product {
        Product::new(
            "Premium Leather Boot".to_string(),
            "PRM-LTH-001".to_string(),
            "boots".to_string(),
            Gender::Men,
            "249.99".parse().unwrap(),
        )
    }

    #[test]
    fn test_product_defaults() {
        let prd = boot();
        assert!(prd.id.to_string().starts_with("PRD-"));
        assert_eq!(prd.production_time_days, 14);
        assert_eq!(prd.minimum_order_quantity, 1);
        assert!(prd.active);
        assert!(!prd.customizable);
    }

    #[test]
    fn test_bulk_pricing_tiers() {
        let prd = boot();
        assert_eq!(prd.price_for_quantity(1), "249.99".parse::<Decimal>().unwrap());
        assert_eq!(prd.price_for_quantity(49), "249.99".parse::<Decimal>().unwrap());
        assert_eq!(prd.price_for_quantity(50), "224.991".parse::<Decimal>().unwrap());
        assert_eq!(prd.price_for_quantity(100), "199.992".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_product_yaml_has_gender_code() {
        let yaml = serde_yml::to_string(&boot()).unwrap();
        assert!(yaml.contains("gender: M"));
        assert!(yaml.contains("sku: PRM-LTH-001"));
    }
}
