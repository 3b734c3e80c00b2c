//! Size chart entity - Regional size tables mapping labels to foot length

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// Sizing region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    Us,
    Eu,
    Uk,
    Jp,
    Cn,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Us => "US",
            Region::Eu => "EU",
            Region::Uk => "UK",
            Region::Jp => "JP",
            Region::Cn => "CN",
        }
    }

    /// Full region name
    pub fn label(&self) -> &'static str {
        match self {
            Region::Us => "United States",
            Region::Eu => "European Union",
            Region::Uk => "United Kingdom",
            Region::Jp => "Japan",
            Region::Cn => "China",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "US" => Ok(Region::Us),
            "EU" => Ok(Region::Eu),
            "UK" => Ok(Region::Uk),
            "JP" => Ok(Region::Jp),
            "CN" => Ok(Region::Cn),
            _ => Err(format!("Invalid region: {}. Use US, EU, UK, JP, or CN", s)),
        }
    }
}

/// Gender a chart or product is cut for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Men,
    #[serde(rename = "W")]
    Women,
    #[serde(rename = "K")]
    Kids,
    #[serde(rename = "U")]
    Unisex,
}

impl Gender {
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Men => "M",
            Gender::Women => "W",
            Gender::Kids => "K",
            Gender::Unisex => "U",
        }
    }
}

impl Default for Gender {
    fn default() -> Self {
        Gender::Unisex
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "m" | "men" => Ok(Gender::Men),
            "w" | "women" => Ok(Gender::Women),
            "k" | "kids" => Ok(Gender::Kids),
            "u" | "unisex" => Ok(Gender::Unisex),
            _ => Err(format!("Invalid gender: {}. Use M, W, K, or U", s)),
        }
    }
}

/// Natural key of a size chart, written `REGION-GENDER` (e.g. `US-M`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartKey {
    pub region: Region,
    pub gender: Gender,
}

impl ChartKey {
    pub fn new(region: Region, gender: Gender) -> Self {
        Self { region, gender }
    }
}

impl std::fmt::Display for ChartKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.region, self.gender)
    }
}

impl std::str::FromStr for ChartKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (region, gender) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid chart key: {}. Expected REGION-GENDER, e.g. US-M", s))?;
        Ok(Self {
            region: region.parse()?,
            gender: gender.parse()?,
        })
    }
}

/// A regional size chart, unique per (region, gender)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeChart {
    /// Unique identifier
    pub id: EntityId,

    /// Display name (e.g., "US Men Sizes")
    pub name: String,

    pub region: Region,

    pub gender: Gender,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    pub created: DateTime<Utc>,
}

impl SizeChart {
    pub fn new(name: String, region: Region, gender: Gender) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Cht),
            name,
            region,
            gender,
            description: String::new(),
            created: Utc::now(),
        }
    }

    pub fn key(&self) -> ChartKey {
        ChartKey::new(self.region, self.gender)
    }
}

impl Entity for SizeChart {
    const PREFIX: &'static str = "CHT";
    const KIND: &'static str = "size chart";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        format!("{} ({} - {})", self.name, self.region, self.gender)
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

/// One size in a chart, unique per (chart, label)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeEntry {
    pub id: EntityId,

    /// Owning chart
    pub chart_id: EntityId,

    /// Size label as printed (e.g., "8.5", "42")
    pub label: String,

    /// Foot length in millimeters
    pub length_mm: Decimal,

    /// Foot width in millimeters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_mm: Option<Decimal>,
}

impl SizeEntry {
    pub fn new(chart_id: EntityId, label: String, length_mm: Decimal) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Size),
            chart_id,
            label,
            length_mm,
            width_mm: None,
        }
    }

    pub fn with_width(mut self, width_mm: Option<Decimal>) -> Self {
        self.width_mm = width_mm;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_key_parse() {
        let key: ChartKey = "us-m".parse().unwrap();
        assert_eq!(key.region, Region::Us);
        assert_eq!(key.gender, Gender::Men);
        assert_eq!(key.to_string(), "US-M");
    }

    #[test]
    fn test_chart_key_rejects_garbage() {
        assert!("US".parse::<ChartKey>().is_err());
        assert!("XX-M".parse::<ChartKey>().is_err());
        assert!("EU-Z".parse::<ChartKey>().is_err());
    }

    #[test]
    fn test_gender_accepts_words() {
        assert_eq!("women".parse::<Gender>().unwrap(), Gender::Women);
        assert_eq!("K".parse::<Gender>().unwrap(), Gender::Kids);
    }

    #[test]
    fn test_chart_serialization() {
        let chart = SizeChart::new("EU Sizes".to_string(), Region::Eu, Gender::Unisex);
        let yaml = serde_yml::to_string(&chart).unwrap();
        assert!(yaml.contains("region: EU"));
        assert!(yaml.contains("gender: U"));
        assert!(chart.id.to_string().starts_with("CHT-"));
    }

    #[test]
    fn test_size_entry_length_serializes_as_string() {
        let chart = SizeChart::new("US Men".to_string(), Region::Us, Gender::Men);
        let entry = SizeEntry::new(chart.id.clone(), "10".to_string(), Decimal::new(28000, 2));
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"length_mm\":\"280.00\""));
    }
}
