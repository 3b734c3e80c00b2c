//! Wholesale pricing: bulk quantity breaks plus customer discount tiers

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::product::Product;

/// Wholesale customer discount tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl DiscountTier {
    /// Discount in percent
    pub fn percent(&self) -> u32 {
        match self {
            DiscountTier::Bronze => 5,
            DiscountTier::Silver => 10,
            DiscountTier::Gold => 15,
            DiscountTier::Platinum => 20,
        }
    }

    fn multiplier(&self) -> Decimal {
        Decimal::ONE - Decimal::new(i64::from(self.percent()), 2)
    }
}

impl std::fmt::Display for DiscountTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DiscountTier::Bronze => "bronze",
            DiscountTier::Silver => "silver",
            DiscountTier::Gold => "gold",
            DiscountTier::Platinum => "platinum",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for DiscountTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bronze" => Ok(DiscountTier::Bronze),
            "silver" => Ok(DiscountTier::Silver),
            "gold" => Ok(DiscountTier::Gold),
            "platinum" => Ok(DiscountTier::Platinum),
            _ => Err(format!(
                "Invalid tier: {}. Use bronze, silver, gold, or platinum",
                s
            )),
        }
    }
}

/// Price quote for a quantity of one product
#[derive(Debug, Clone, Serialize)]
pub struct PriceQuote {
    pub sku: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<DiscountTier>,
    pub base_price: Decimal,
    pub unit_price: Decimal,
    pub total: Decimal,
}

/// Unit price after the bulk break and the optional tier discount, rounded to cents
pub fn wholesale_price(product: &Product, quantity: u32, tier: Option<DiscountTier>) -> Decimal {
    let bulk = product.price_for_quantity(quantity);
    let unit = match tier {
        Some(t) => bulk * t.multiplier(),
        None => bulk,
    };
    unit.round_dp(2)
}

pub fn quote(product: &Product, quantity: u32, tier: Option<DiscountTier>) -> PriceQuote {
    let unit_price = wholesale_price(product, quantity, tier);
    PriceQuote {
        sku: product.sku.clone(),
        quantity,
        tier,
        base_price: product.base_price,
        unit_price,
        total: unit_price * Decimal::from(quantity),
    }
}
