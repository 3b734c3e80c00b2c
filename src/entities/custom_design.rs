//! Custom design entity - Customer variations on a customizable product

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// A customer's design based on a customizable product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomDesign {
    pub id: EntityId,

    /// Customer account name
    pub customer: String,

    pub base_product_id: EntityId,

    pub design_name: String,

    /// Chosen size entry
    pub size_id: EntityId,

    /// Component -> color (e.g., {"upper": "#FF0000", "sole": "#000000"})
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_colors: BTreeMap<String, String>,

    /// Component -> material; one material per component
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub selected_materials: BTreeMap<String, EntityId>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub special_instructions: String,

    /// Product list price at the time the design was made
    pub base_price: Decimal,

    #[serde(default)]
    pub customization_fee: Decimal,

    pub total_price: Decimal,

    #[serde(default)]
    pub approved: bool,

    pub created: DateTime<Utc>,
}

impl CustomDesign {
    /// Create a design priced at `base_price + customization_fee`
    pub fn new(
        customer: String,
        base_product_id: EntityId,
        design_name: String,
        size_id: EntityId,
        base_price: Decimal,
        customization_fee: Decimal,
    ) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Des),
            customer,
            base_product_id,
            design_name,
            size_id,
            custom_colors: BTreeMap::new(),
            selected_materials: BTreeMap::new(),
            special_instructions: String::new(),
            base_price,
            customization_fee,
            total_price: base_price + customization_fee,
            approved: false,
            created: Utc::now(),
        }
    }
}

impl Entity for CustomDesign {
    const PREFIX: &'static str = "DES";
    const KIND: &'static str = "custom design";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        format!("{} by {}", self.design_name, self.customer)
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

/// Parse a `COMPONENT=VALUE` pair
pub fn parse_component_pair(s: &str) -> Result<(String, String), String> {
    let (component, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid value '{}'. Expected COMPONENT=VALUE", s))?;
    let component = component.trim().to_lowercase();
    if component.is_empty() {
        return Err(format!("Missing component name in '{}'", s));
    }
    Ok((component, value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_design_total_price() {
        let design = CustomDesign::new(
            "demo".to_string(),
            EntityId::new(EntityPrefix::Prd),
            "Red Runner".to_string(),
            EntityId::new(EntityPrefix::Size),
            "129.99".parse().unwrap(),
            "50.00".parse().unwrap(),
        );
        assert_eq!(design.total_price, "179.99".parse::<Decimal>().unwrap());
        assert!(!design.approved);
        assert_eq!(design.title(), "Red Runner by demo");
    }

    #[test]
    fn test_parse_component_pair() {
        assert_eq!(
            parse_component_pair("Upper=#FF0000").unwrap(),
            ("upper".to_string(), "#FF0000".to_string())
        );
        assert!(parse_component_pair("upper").is_err());
        assert!(parse_component_pair("=red").is_err());
    }
}
