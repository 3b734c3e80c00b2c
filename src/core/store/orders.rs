//! Production order persistence and order number allocation

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

use super::{
    conflict_on_unique, decimal_col, id_col, json_col, not_found_on_empty, opt_parse_col,
    parse_col, to_json, Store,
};
use crate::core::error::{Error, Result};
use crate::core::identity::EntityId;
use crate::entities::production_order::{CostBreakdown, OrderStatus, ProductionOrder};

const ORDER_COLUMNS: &str = "id, order_number, product_id, custom_design_id, quantity, \
     size_breakdown, start_date, expected_completion, actual_completion, status, \
     material_cost, labor_cost, overhead_cost, total_cost, notes, created_by, created";

fn order_from_row(row: &Row<'_>) -> rusqlite::Result<ProductionOrder> {
    Ok(ProductionOrder {
        id: id_col(row, 0)?,
        order_number: row.get(1)?,
        product_id: id_col(row, 2)?,
        custom_design_id: opt_parse_col(row, 3)?,
        quantity: row.get(4)?,
        size_breakdown: json_col(row, 5)?,
        start_date: row.get(6)?,
        expected_completion: row.get(7)?,
        actual_completion: row.get(8)?,
        status: parse_col(row, 9)?,
        costs: CostBreakdown {
            material_cost: decimal_col(row, 10)?,
            labor_cost: decimal_col(row, 11)?,
            overhead_cost: decimal_col(row, 12)?,
            total_cost: decimal_col(row, 13)?,
        },
        notes: row.get(14)?,
        created_by: row.get(15)?,
        created: row.get(16)?,
    })
}

/// Filter for listing production orders
#[derive(Debug, Default, Clone)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub product_id: Option<EntityId>,
    /// Only orders that are neither completed nor cancelled
    pub open_only: bool,
}

impl OrderFilter {
    fn matches(&self, order: &ProductionOrder) -> bool {
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }
        if let Some(ref product_id) = self.product_id {
            if &order.product_id != product_id {
                return false;
            }
        }
        !(self.open_only && order.status.is_terminal())
    }
}

/// Allocate the next order number for `day` (`PO` + `YYYYMMDD` + 3-digit sequence)
///
/// Must run inside the transaction that inserts the order so that two
/// writers never see the same sequence value.
fn next_order_number(conn: &Connection, day: NaiveDate) -> Result<String> {
    let day_key = day.format("%Y%m%d").to_string();
    let seq: i64 = conn.query_row(
        "INSERT INTO order_sequences (day, last) VALUES (?1, 1)
         ON CONFLICT(day) DO UPDATE SET last = last + 1
         RETURNING last",
        params![day_key],
        |row| row.get(0),
    )?;
    if seq > 999 {
        return Err(Error::validation(format!(
            "order numbers for {} are exhausted",
            day_key
        )));
    }
    Ok(format!("PO{}{:03}", day_key, seq))
}

impl Store {
    /// Persist a new production order
    ///
    /// An empty order number is allocated from the per-day sequence for
    /// `today`. The total cost is recomputed from its components before
    /// the row is written.
    pub fn create_order(&self, order: &mut ProductionOrder, today: NaiveDate) -> Result<()> {
        order.validate()?;
        self.product(&order.product_id)?;
        if let Some(ref design_id) = order.custom_design_id {
            self.design(design_id)?;
        }
        order.enforce_total();

        let tx = self.conn.unchecked_transaction()?;
        if order.order_number.is_empty() {
            order.order_number = next_order_number(&tx, today)?;
        }
        let breakdown = to_json(&order.size_breakdown, "size_breakdown")?;
        tx.execute(
            &format!(
                "INSERT INTO production_orders ({})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
                ORDER_COLUMNS
            ),
            params![
                order.id.to_string(),
                order.order_number,
                order.product_id.to_string(),
                order.custom_design_id.as_ref().map(|id| id.to_string()),
                order.quantity,
                breakdown,
                order.start_date,
                order.expected_completion,
                order.actual_completion,
                order.status.as_str(),
                order.costs.material_cost.to_string(),
                order.costs.labor_cost.to_string(),
                order.costs.overhead_cost.to_string(),
                order.costs.total_cost.to_string(),
                order.notes,
                order.created_by,
                order.created,
            ],
        )
        .map_err(|e| conflict_on_unique(e, "production order", &order.order_number))?;
        tx.commit()?;

        tracing::info!(
            order = %order.order_number,
            quantity = order.quantity,
            "production order created"
        );
        Ok(())
    }

    /// Write back an existing order
    pub fn save_order(&self, order: &mut ProductionOrder) -> Result<()> {
        order.validate()?;
        order.enforce_total();
        let breakdown = to_json(&order.size_breakdown, "size_breakdown")?;
        let changed = self.conn.execute(
            "UPDATE production_orders
             SET custom_design_id = ?2, quantity = ?3, size_breakdown = ?4, start_date = ?5,
                 expected_completion = ?6, actual_completion = ?7, status = ?8,
                 material_cost = ?9, labor_cost = ?10, overhead_cost = ?11, total_cost = ?12,
                 notes = ?13
             WHERE order_number = ?1",
            params![
                order.order_number,
                order.custom_design_id.as_ref().map(|id| id.to_string()),
                order.quantity,
                breakdown,
                order.start_date,
                order.expected_completion,
                order.actual_completion,
                order.status.as_str(),
                order.costs.material_cost.to_string(),
                order.costs.labor_cost.to_string(),
                order.costs.overhead_cost.to_string(),
                order.costs.total_cost.to_string(),
                order.notes,
            ],
        )?;
        if changed == 0 {
            return Err(Error::not_found("production order", order.order_number.clone()));
        }
        tracing::debug!(order = %order.order_number, status = %order.status, "production order saved");
        Ok(())
    }

    /// Look up an order by its order number
    pub fn order(&self, order_number: &str) -> Result<ProductionOrder> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM production_orders WHERE order_number = ?1",
                    ORDER_COLUMNS
                ),
                params![order_number],
                order_from_row,
            )
            .map_err(|e| not_found_on_empty(e, "production order", order_number))
    }

    /// Orders matching a filter, newest order number first
    pub fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<ProductionOrder>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM production_orders ORDER BY order_number DESC",
            ORDER_COLUMNS
        ))?;
        let orders = stmt
            .query_map([], order_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(orders.into_iter().filter(|o| filter.matches(o)).collect())
    }

    /// Number of orders in each status (statuses without orders are reported as 0)
    pub fn order_status_counts(&self) -> Result<Vec<(OrderStatus, i64)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM production_orders GROUP BY status")?;
        let rows = stmt
            .query_map([], |row| Ok((parse_col::<OrderStatus>(row, 0)?, row.get::<_, i64>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(OrderStatus::all()
            .iter()
            .map(|status| {
                let n = rows
                    .iter()
                    .find(|(s, _)| s == status)
                    .map(|(_, n)| *n)
                    .unwrap_or(0);
                (*status, n)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::category::Category;
    use crate::entities::product::Product;
    use crate::entities::size_chart::Gender;
    use rust_decimal::Decimal;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (Store, Product) {
        let store = Store::open_in_memory().unwrap();
        store
            .insert_category(&Category::new("Boots".to_string(), "boots".to_string()))
            .unwrap();
        let product = Product::new(
            "Boot".to_string(),
            "BOOT-001".to_string(),
            "boots".to_string(),
            Gender::Men,
            "249.99".parse().unwrap(),
        );
        store.insert_product(&product).unwrap();
        (store, product)
    }

    fn order(product: &Product, quantity: u32) -> ProductionOrder {
        ProductionOrder::new(
            product.id.clone(),
            quantity,
            day(2026, 11, 2),
            "test".to_string(),
        )
    }

    #[test]
    fn test_order_numbers_are_sequential_per_day() {
        let (store, product) = setup();
        let today = day(2026, 10, 19);

        let mut first = order(&product, 10);
        store.create_order(&mut first, today).unwrap();
        let mut second = order(&product, 5);
        store.create_order(&mut second, today).unwrap();
        let mut tomorrow = order(&product, 5);
        store.create_order(&mut tomorrow, day(2026, 10, 20)).unwrap();

        assert_eq!(first.order_number, "PO20261019001");
        assert_eq!(second.order_number, "PO20261019002");
        assert_eq!(tomorrow.order_number, "PO20261020001");
    }

    #[test]
    fn test_explicit_order_number_is_kept() {
        let (store, product) = setup();
        let mut po = order(&product, 1);
        po.order_number = "PO20250101042".to_string();
        store.create_order(&mut po, day(2026, 10, 19)).unwrap();
        assert!(store.order("PO20250101042").is_ok());

        let mut dup = order(&product, 1);
        dup.order_number = "PO20250101042".to_string();
        assert!(store
            .create_order(&mut dup, day(2026, 10, 19))
            .unwrap_err()
            .is_conflict());
    }

    #[test]
    fn test_create_order_enforces_total() {
        let (store, product) = setup();
        let mut po = order(&product, 1);
        po.costs.material_cost = "10".parse().unwrap();
        po.costs.labor_cost = "2".parse().unwrap();
        po.costs.overhead_cost = "1.2".parse().unwrap();
        po.costs.total_cost = Decimal::ZERO;
        store.create_order(&mut po, day(2026, 10, 19)).unwrap();

        let loaded = store.order(&po.order_number).unwrap();
        assert_eq!(loaded.costs.total_cost, "13.2".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_create_order_rejects_bad_breakdown() {
        let (store, product) = setup();
        let mut po = order(&product, 10);
        po.size_breakdown.insert("US9".to_string(), 4);
        let err = store.create_order(&mut po, day(2026, 10, 19)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        // No number is consumed for a rejected order
        assert!(po.order_number.is_empty());
    }

    #[test]
    fn test_create_order_requires_product() {
        let (store, _) = setup();
        let mut po = ProductionOrder::new(
            EntityId::new(crate::core::identity::EntityPrefix::Prd),
            1,
            day(2026, 11, 2),
            "test".to_string(),
        );
        assert!(store
            .create_order(&mut po, day(2026, 10, 19))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_save_order_roundtrip() {
        let (store, product) = setup();
        let mut po = order(&product, 25);
        po.size_breakdown.insert("US8".to_string(), 10);
        po.size_breakdown.insert("US9".to_string(), 15);
        store.create_order(&mut po, day(2026, 10, 19)).unwrap();

        po.transition(OrderStatus::Approved, day(2026, 10, 19)).unwrap();
        store.save_order(&mut po).unwrap();

        let loaded = store.order(&po.order_number).unwrap();
        assert_eq!(loaded.status, OrderStatus::Approved);
        assert_eq!(loaded.size_breakdown.get("US9"), Some(&15));
    }

    #[test]
    fn test_list_orders_filter_and_counts() {
        let (store, product) = setup();
        let today = day(2026, 10, 19);
        let mut a = order(&product, 1);
        store.create_order(&mut a, today).unwrap();
        let mut b = order(&product, 2);
        store.create_order(&mut b, today).unwrap();
        b.transition(OrderStatus::Cancelled, today).unwrap();
        store.save_order(&mut b).unwrap();

        let open = store
            .list_orders(&OrderFilter {
                open_only: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].order_number, a.order_number);

        let counts = store.order_status_counts().unwrap();
        assert!(counts.contains(&(OrderStatus::Pending, 1)));
        assert!(counts.contains(&(OrderStatus::Cancelled, 1)));
        assert!(counts.contains(&(OrderStatus::Completed, 0)));
    }

    #[test]
    fn test_deleting_product_cascades_orders() {
        let (store, product) = setup();
        let mut po = order(&product, 3);
        store.create_order(&mut po, day(2026, 10, 19)).unwrap();
        store.delete_product(&product.id).unwrap();
        assert!(store.order(&po.order_number).unwrap_err().is_not_found());
    }
}
