//! Bill-of-materials line - one material requirement of a product

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::identity::{EntityId, EntityPrefix};
use crate::entities::material::Material;

/// BOM line item, unique per (product, material, component name)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomLine {
    pub id: EntityId,

    /// Owning product
    pub product_id: EntityId,

    pub material_id: EntityId,

    /// Quantity of material per pair, in the material's unit of measure
    pub quantity_required: Decimal,

    /// Part of the shoe this line covers (e.g., "Upper", "Sole", "Laces")
    pub component_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl BomLine {
    pub fn new(
        product_id: EntityId,
        material_id: EntityId,
        component_name: String,
        quantity_required: Decimal,
    ) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Bom),
            product_id,
            material_id,
            quantity_required,
            component_name,
            notes: String::new(),
        }
    }

    /// Line cost given the material it references
    pub fn cost(&self, material: &Material) -> Decimal {
        self.quantity_required * material.cost_per_unit
    }
}
