//! BOM cost roll-up and production order costing

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::error::{Error, Result};
use crate::core::identity::EntityId;
use crate::core::store::Store;
use crate::entities::bom::BomLine;
use crate::entities::material::Material;
use crate::entities::product::Product;
use crate::entities::production_order::{CostBreakdown, ProductionOrder};

/// Anything that can resolve a material by ID for costing
pub trait MaterialSource {
    /// `Ok(None)` when the material does not exist
    fn lookup_material(&self, id: &EntityId) -> Result<Option<Material>>;
}

impl MaterialSource for Store {
    fn lookup_material(&self, id: &EntityId) -> Result<Option<Material>> {
        match self.material(id) {
            Ok(material) => Ok(Some(material)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl MaterialSource for HashMap<EntityId, Material> {
    fn lookup_material(&self, id: &EntityId) -> Result<Option<Material>> {
        Ok(self.get(id).cloned())
    }
}

/// One costed BOM line
#[derive(Debug, Clone, Serialize)]
pub struct CostedLine {
    pub component_name: String,
    pub material_id: EntityId,
    pub material_name: String,
    pub quantity_required: Decimal,
    pub cost_per_unit: Decimal,
    pub line_cost: Decimal,
}

/// Cost every line of a BOM; a missing material is an error, never a zero cost
pub fn cost_lines<S: MaterialSource + ?Sized>(
    lines: &[BomLine],
    source: &S,
) -> Result<Vec<CostedLine>> {
    lines
        .iter()
        .map(|line| {
            let material = source
                .lookup_material(&line.material_id)?
                .ok_or_else(|| Error::not_found("material", line.material_id.to_string()))?;
            Ok(CostedLine {
                component_name: line.component_name.clone(),
                material_id: material.id.clone(),
                material_name: material.name.clone(),
                quantity_required: line.quantity_required,
                cost_per_unit: material.cost_per_unit,
                line_cost: line.cost(&material),
            })
        })
        .collect()
}

/// Material cost of one pair: Σ quantity_required × cost_per_unit, unrounded
pub fn unit_material_cost<S: MaterialSource + ?Sized>(
    lines: &[BomLine],
    source: &S,
) -> Result<Decimal> {
    Ok(cost_lines(lines, source)?
        .iter()
        .map(|l| l.line_cost)
        .sum())
}

/// Labor and overhead rates applied on top of material cost
#[derive(Debug, Clone, Copy)]
pub struct ProductionCostCalculator {
    /// Fraction of material cost charged as labor
    pub labor_rate: Decimal,
    /// Fraction of (material + labor) charged as overhead
    pub overhead_rate: Decimal,
}

impl Default for ProductionCostCalculator {
    fn default() -> Self {
        Self {
            labor_rate: Decimal::new(20, 2),
            overhead_rate: Decimal::new(10, 2),
        }
    }
}

impl ProductionCostCalculator {
    /// Full breakdown for `quantity` pairs at `unit_material_cost` each
    pub fn breakdown(&self, quantity: u32, unit_material_cost: Decimal) -> CostBreakdown {
        let material = Decimal::from(quantity) * unit_material_cost;
        let labor = material * self.labor_rate;
        let overhead = (material + labor) * self.overhead_rate;
        CostBreakdown::from_components(material, labor, overhead)
    }

    /// Fill in an order's costs if they have not been computed yet
    ///
    /// A non-zero material cost is kept as is; only the total is refreshed.
    /// Returns whether the components were (re)computed.
    pub fn apply(&self, order: &mut ProductionOrder, unit_material_cost: Decimal) -> bool {
        if !order.costs.material_cost.is_zero() {
            order.enforce_total();
            return false;
        }
        order.costs = self.breakdown(order.quantity, unit_material_cost);
        true
    }
}

/// Explicit costing entry point over the store
pub struct CostingService<'a> {
    store: &'a Store,
    calculator: ProductionCostCalculator,
}

impl<'a> CostingService<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            calculator: ProductionCostCalculator::default(),
        }
    }

    /// Per-pair material cost of a product's BOM
    pub fn unit_cost(&self, product: &Product) -> Result<Decimal> {
        let lines = self.store.bom_lines(&product.id)?;
        unit_material_cost(&lines, self.store)
    }

    /// Costed BOM lines of a product
    pub fn costed_bom(&self, product: &Product) -> Result<Vec<CostedLine>> {
        let lines = self.store.bom_lines(&product.id)?;
        cost_lines(&lines, self.store)
    }

    /// Compute and persist an order's costs
    ///
    /// With `force`, the stored material cost is reset first so that a
    /// cost computed from outdated material prices is refreshed.
    pub fn recalculate(&self, order_number: &str, force: bool) -> Result<CostBreakdown> {
        let mut order = self.store.order(order_number)?;
        if force {
            order.costs.material_cost = Decimal::ZERO;
        }

        let product = self.store.product(&order.product_id)?;
        let unit = self.unit_cost(&product)?;
        if self.calculator.apply(&mut order, unit) {
            tracing::info!(
                order = %order.order_number,
                material = %order.costs.material_cost,
                total = %order.costs.total_cost,
                "production costs computed"
            );
        } else {
            tracing::debug!(
                order = %order.order_number,
                material = %order.costs.material_cost,
                "material cost already set, keeping it"
            );
        }

        self.store.save_order(&mut order)?;
        Ok(order.costs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::EntityPrefix;
    use crate::entities::category::Category;
    use crate::entities::material::MaterialType;
    use crate::entities::size_chart::Gender;
    use chrono::NaiveDate;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn material(name: &str, cost: &str) -> Material {
        Material::new(
            name.to_string(),
            MaterialType::Leather,
            "Brown".to_string(),
            "Supplier".to_string(),
            dec(cost),
        )
    }

    fn line(product: &EntityId, material: &Material, component: &str, qty: &str) -> BomLine {
        BomLine::new(
            product.clone(),
            material.id.clone(),
            component.to_string(),
            dec(qty),
        )
    }

    #[test]
    fn test_boot_unit_cost() {
        let product = EntityId::new(EntityPrefix::Prd);
        let leather = material("Leather", "25.00");
        let sole = material("Rubber Sole", "12.00");
        let lines = vec![
            line(&product, &leather, "Upper", "2.0"),
            line(&product, &sole, "Sole", "1.0"),
        ];
        let source: HashMap<EntityId, Material> = [leather, sole]
            .into_iter()
            .map(|m| (m.id.clone(), m))
            .collect();

        assert_eq!(unit_material_cost(&lines, &source).unwrap(), dec("62.00"));
    }

    #[test]
    fn test_zero_quantity_line_does_not_change_total() {
        let product = EntityId::new(EntityPrefix::Prd);
        let leather = material("Leather", "25.00");
        let laces = material("Laces", "2.50");
        let source: HashMap<EntityId, Material> = [leather.clone(), laces.clone()]
            .into_iter()
            .map(|m| (m.id.clone(), m))
            .collect();

        let base = vec![line(&product, &leather, "Upper", "2.0")];
        let mut with_zero = base.clone();
        with_zero.push(line(&product, &laces, "Laces", "0"));

        assert_eq!(
            unit_material_cost(&base, &source).unwrap(),
            unit_material_cost(&with_zero, &source).unwrap()
        );
    }

    #[test]
    fn test_missing_material_is_not_found() {
        let product = EntityId::new(EntityPrefix::Prd);
        let ghost = material("Ghost", "1.00");
        let lines = vec![line(&product, &ghost, "Upper", "1")];
        let source: HashMap<EntityId, Material> = HashMap::new();

        assert!(unit_material_cost(&lines, &source)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_empty_bom_costs_nothing() {
        let source: HashMap<EntityId, Material> = HashMap::new();
        assert_eq!(unit_material_cost(&[], &source).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_boot_order_breakdown() {
        let costs = ProductionCostCalculator::default().breakdown(10, dec("62.00"));
        assert_eq!(costs.material_cost, dec("620.00"));
        assert_eq!(costs.labor_cost, dec("124.00"));
        assert_eq!(costs.overhead_cost, dec("74.40"));
        assert_eq!(costs.total_cost, dec("818.40"));
    }

    #[test]
    fn test_breakdown_formula_holds_for_any_quantity() {
        let calc = ProductionCostCalculator::default();
        let unit = dec("17.35");
        for n in [1u32, 2, 7, 49, 50, 99, 100, 1000, 12345] {
            let c = calc.breakdown(n, unit);
            let material = Decimal::from(n) * unit;
            assert_eq!(c.material_cost, material);
            assert_eq!(c.labor_cost, material * dec("0.20"));
            assert_eq!(c.overhead_cost, (material + c.labor_cost) * dec("0.10"));
            assert_eq!(
                c.total_cost,
                c.material_cost + c.labor_cost + c.overhead_cost
            );
        }
    }

    #[test]
    fn test_apply_keeps_existing_material_cost() {
        let calc = ProductionCostCalculator::default();
        let mut order = ProductionOrder::new(
            EntityId::new(EntityPrefix::Prd),
            10,
            NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            "test".to_string(),
        );
        assert!(calc.apply(&mut order, dec("62.00")));
        let first = order.costs;

        // A later price change is not picked up without a forced reset
        assert!(!calc.apply(&mut order, dec("70.00")));
        assert_eq!(order.costs, first);
    }

    fn boot_store() -> (Store, Product, Material) {
        let store = Store::open_in_memory().unwrap();
        store
            .insert_category(&Category::new("Boots".to_string(), "boots".to_string()))
            .unwrap();
        let boot = Product::new(
            "Boot".to_string(),
            "BOOT-001".to_string(),
            "boots".to_string(),
            Gender::Men,
            dec("249.99"),
        );
        store.insert_product(&boot).unwrap();
        let leather = material("Leather", "25.00");
        let sole = material("Rubber Sole", "12.00");
        store.insert_material(&leather).unwrap();
        store.insert_material(&sole).unwrap();
        store
            .insert_bom_line(&line(&boot.id, &leather, "Upper", "2.0"))
            .unwrap();
        store
            .insert_bom_line(&line(&boot.id, &sole, "Sole", "1.0"))
            .unwrap();
        (store, boot, leather)
    }

    #[test]
    fn test_recalculate_persists_breakdown() {
        let (store, boot, _) = boot_store();
        let mut order = ProductionOrder::new(
            boot.id.clone(),
            10,
            NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            "test".to_string(),
        );
        store
            .create_order(&mut order, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
            .unwrap();

        let service = CostingService::new(&store);
        let costs = service.recalculate(&order.order_number, false).unwrap();
        assert_eq!(costs.total_cost, dec("818.40"));

        let saved = store.order(&order.order_number).unwrap();
        assert_eq!(saved.costs, costs);
    }

    #[test]
    fn test_recalculate_is_stale_unless_forced() {
        let (store, boot, leather) = boot_store();
        let mut order = ProductionOrder::new(
            boot.id.clone(),
            10,
            NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            "test".to_string(),
        );
        store
            .create_order(&mut order, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
            .unwrap();
        let service = CostingService::new(&store);
        service.recalculate(&order.order_number, false).unwrap();

        store.update_material_cost(&leather.id, dec("30.00")).unwrap();
        let stale = service.recalculate(&order.order_number, false).unwrap();
        assert_eq!(stale.material_cost, dec("620.00"));

        let fresh = service.recalculate(&order.order_number, true).unwrap();
        assert_eq!(fresh.material_cost, dec("720.00"));
        assert_eq!(
            fresh.total_cost,
            fresh.material_cost + fresh.labor_cost + fresh.overhead_cost
        );
    }
}
