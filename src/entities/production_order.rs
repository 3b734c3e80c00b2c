//! Production order entity - Manufacturing work orders with cost tracking

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::error::{Error, Result};
use crate::core::identity::{EntityId, EntityPrefix};

/// Production order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Approved,
    InProduction,
    QualityCheck,
    Completed,
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::InProduction => "in_production",
            OrderStatus::QualityCheck => "quality_check",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn all() -> &'static [OrderStatus] {
        &[
            OrderStatus::Pending,
            OrderStatus::Approved,
            OrderStatus::InProduction,
            OrderStatus::QualityCheck,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ]
    }

    /// The next step on the happy path, if any
    fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Approved),
            OrderStatus::Approved => Some(OrderStatus::InProduction),
            OrderStatus::InProduction => Some(OrderStatus::QualityCheck),
            OrderStatus::QualityCheck => Some(OrderStatus::Completed),
            OrderStatus::Completed | OrderStatus::Cancelled => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Orders move forward one step at a time, or get cancelled before completion
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        target == OrderStatus::Cancelled || self.next() == Some(target)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "approved" => Ok(OrderStatus::Approved),
            "in_production" => Ok(OrderStatus::InProduction),
            "quality_check" => Ok(OrderStatus::QualityCheck),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("Unknown order status: {}", s)),
        }
    }
}

/// Cost components of a production run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub material_cost: Decimal,
    pub labor_cost: Decimal,
    pub overhead_cost: Decimal,
    pub total_cost: Decimal,
}

impl CostBreakdown {
    /// Build a breakdown whose total is the sum of the three components
    pub fn from_components(material: Decimal, labor: Decimal, overhead: Decimal) -> Self {
        Self {
            material_cost: material,
            labor_cost: labor,
            overhead_cost: overhead,
            total_cost: material + labor + overhead,
        }
    }

    /// Components rounded to currency precision, with the total re-summed
    /// from the rounded components so a printed report always adds up
    pub fn rounded(&self) -> Self {
        Self::from_components(
            self.material_cost.round_dp(2),
            self.labor_cost.round_dp(2),
            self.overhead_cost.round_dp(2),
        )
    }
}

/// A Production order for a quantity of one product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionOrder {
    pub id: EntityId,

    /// Human-readable order number (e.g., PO20261019001); assigned by the store when empty
    #[serde(default)]
    pub order_number: String,

    pub product_id: EntityId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_design_id: Option<EntityId>,

    /// Total pairs to produce
    pub quantity: u32,

    /// Pairs per size label (e.g., {"US8": 10, "US9": 15})
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub size_breakdown: BTreeMap<String, u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    pub expected_completion: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_completion: Option<NaiveDate>,

    #[serde(default)]
    pub status: OrderStatus,

    #[serde(flatten)]
    pub costs: CostBreakdown,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    pub created_by: String,

    pub created: DateTime<Utc>,
}

impl ProductionOrder {
    pub fn new(
        product_id: EntityId,
        quantity: u32,
        expected_completion: NaiveDate,
        created_by: String,
    ) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Ord),
            order_number: String::new(),
            product_id,
            custom_design_id: None,
            quantity,
            size_breakdown: BTreeMap::new(),
            start_date: None,
            expected_completion,
            actual_completion: None,
            status: OrderStatus::default(),
            costs: CostBreakdown::default(),
            notes: String::new(),
            created_by,
            created: Utc::now(),
        }
    }

    /// Check quantity and size breakdown before the order is persisted
    pub fn validate(&self) -> Result<()> {
        if self.quantity < 1 {
            return Err(Error::validation("order quantity must be at least 1"));
        }
        if !self.size_breakdown.is_empty() {
            let sum: u64 = self.size_breakdown.values().map(|&n| u64::from(n)).sum();
            if sum != u64::from(self.quantity) {
                return Err(Error::validation(format!(
                    "size breakdown totals {} pairs but order quantity is {}",
                    sum, self.quantity
                )));
            }
        }
        Ok(())
    }

    /// Recompute total_cost from the other three components
    pub fn enforce_total(&mut self) {
        let c = self.costs;
        self.costs = CostBreakdown::from_components(c.material_cost, c.labor_cost, c.overhead_cost);
    }

    /// Move to a new status, stamping start and completion dates
    pub fn transition(&mut self, target: OrderStatus, today: NaiveDate) -> Result<()> {
        if !self.status.can_transition_to(target) {
            return Err(Error::validation(format!(
                "cannot move order {} from {} to {}",
                self.order_number, self.status, target
            )));
        }
        match target {
            OrderStatus::InProduction if self.start_date.is_none() => {
                self.start_date = Some(today);
            }
            OrderStatus::Completed => {
                self.actual_completion = Some(today);
            }
            _ => {}
        }
        self.status = target;
        Ok(())
    }
}

impl Entity for ProductionOrder {
    const PREFIX: &'static str = "ORD";
    const KIND: &'static str = "production order";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> String {
        format!("PO {}", self.order_number)
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

/// Parse a `LABEL=COUNT` size breakdown item
pub fn parse_breakdown_item(s: &str) -> std::result::Result<(String, u32), String> {
    let (label, count) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid size breakdown '{}'. Expected LABEL=COUNT", s))?;
    let count = count
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("Invalid pair count in '{}'", s))?;
    Ok((label.trim().to_string(), count))
}
