//! Material entity type - Raw materials with per-unit cost

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// Material category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialType {
    Leather,
    Synthetic,
    Fabric,
    Rubber,
    Foam,
    Metal,
    Plastic,
}

impl std::fmt::Display for MaterialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaterialType::Leather => write!(f, "leather"),
            MaterialType::Synthetic => write!(f, "synthetic"),
            MaterialType::Fabric => write!(f, "fabric"),
            MaterialType::Rubber => write!(f, "rubber"),
            MaterialType::Foam => write!(f, "foam"),
            MaterialType::Metal => write!(f, "metal"),
            MaterialType::Plastic => write!(f, "plastic"),
        }
    }
}

impl std::str::FromStr for MaterialType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "leather" => Ok(MaterialType::Leather),
            "synthetic" => Ok(MaterialType::Synthetic),
            "fabric" => Ok(MaterialType::Fabric),
            "rubber" => Ok(MaterialType::Rubber),
            "foam" => Ok(MaterialType::Foam),
            "metal" => Ok(MaterialType::Metal),
            "plastic" => Ok(MaterialType::Plastic),
            _ => Err(format!(
                "Invalid material type: {}. Use leather, synthetic, fabric, rubber, foam, metal, or plastic",
                s
            )),
        }
    }
}

fn default_unit() -> String {
    "sq_ft".to_string()
}

fn default_minimum_order() -> u32 {
    1
}

fn default_lead_time() -> u32 {
    7
}

/// A Material entity - something a product is built from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Unique identifier
    pub id: EntityId,

    pub name: String,

    pub material_type: MaterialType,

    pub color: String,

    pub supplier: String,

    /// Cost of one unit of measure
    pub cost_per_unit: Decimal,

    /// Unit of measure (sq_ft, meters, pieces)
    #[serde(default = "default_unit")]
    pub unit_of_measure: String,

    /// Minimum order quantity
    #[serde(default = "default_minimum_order")]
    pub minimum_order: u32,

    /// Supplier lead time in days
    #[serde(default = "default_lead_time")]
    pub lead_time_days: u32,

    pub created: DateTime<Utc>,
}

impl Material {
    /// Create a new material with the default unit, MOQ and lead time
    pub fn new(
        name: String,
        material_type: MaterialType,
        color: String,
        supplier: String,
        cost_per_unit: Decimal,
    ) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Mat),
            name,
            material_type,
            color,
            supplier,
            cost_per_unit,
            unit_of_measure: default_unit(),
            minimum_order: default_minimum_order(),
            lead_time_days: default_lead_time(),
            created: Utc::now(),
        }
    }
}

impl Entity for Material {
    const PREFIX: &'static str = "MAT";
    const KIND: &'static str = "material";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        format!("{} ({})", self.name, self.color)
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_defaults() {
        let mat = Material::new(
            "Premium Leather".to_string(),
            MaterialType::Leather,
            "Brown".to_string(),
            "Italian Leather Co.".to_string(),
            Decimal::new(2500, 2),
        );

        assert!(mat.id.to_string().starts_with("MAT-"));
        assert_eq!(mat.unit_of_measure, "sq_ft");
        assert_eq!(mat.minimum_order, 1);
        assert_eq!(mat.lead_time_days, 7);
        assert_eq!(mat.title(), "Premium Leather (Brown)");
    }

    #[test]
    fn test_material_type_serialization() {
        let mat = Material::new(
            "Rubber Sole".to_string(),
            MaterialType::Rubber,
            "Black".to_string(),
            "Sole Solutions".to_string(),
            Decimal::new(1200, 2),
        );

        let yaml = serde_yml::to_string(&mat).unwrap();
        assert!(yaml.contains("material_type: rubber"));
        assert!(yaml.contains("cost_per_unit: '12.00'") || yaml.contains("cost_per_unit: \"12.00\""));
    }

    #[test]
    fn test_material_type_parse_is_case_insensitive() {
        assert_eq!("FOAM".parse::<MaterialType>().unwrap(), MaterialType::Foam);
        assert!("wood".parse::<MaterialType>().is_err());
    }
}
