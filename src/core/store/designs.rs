//! Custom design persistence

use rusqlite::{params, Row};

use super::{decimal_col, id_col, json_col, not_found_on_empty, to_json, Store};
use crate::core::error::{Error, Result};
use crate::core::identity::EntityId;
use crate::entities::custom_design::CustomDesign;

const DESIGN_COLUMNS: &str = "id, customer, base_product_id, design_name, size_id, \
     custom_colors, selected_materials, special_instructions, base_price, \
     customization_fee, total_price, approved, created";

fn design_from_row(row: &Row<'_>) -> rusqlite::Result<CustomDesign> {
    Ok(CustomDesign {
        id: id_col(row, 0)?,
        customer: row.get(1)?,
        base_product_id: id_col(row, 2)?,
        design_name: row.get(3)?,
        size_id: id_col(row, 4)?,
        custom_colors: json_col(row, 5)?,
        selected_materials: json_col(row, 6)?,
        special_instructions: row.get(7)?,
        base_price: decimal_col(row, 8)?,
        customization_fee: decimal_col(row, 9)?,
        total_price: decimal_col(row, 10)?,
        approved: row.get(11)?,
        created: row.get(12)?,
    })
}

impl Store {
    /// Persist a custom design
    ///
    /// The base product must be customizable, and when it restricts its
    /// sizes or materials the design's choices must come from those lists.
    pub fn insert_design(&self, design: &CustomDesign) -> Result<()> {
        let product = self.product(&design.base_product_id)?;
        if !product.customizable {
            return Err(Error::validation(format!(
                "product {} is not customizable",
                product.sku
            )));
        }

        self.size_entry_by_id(&design.size_id)?;
        if !product.available_sizes.is_empty() && !product.available_sizes.contains(&design.size_id)
        {
            return Err(Error::validation(format!(
                "size {} is not offered for product {}",
                design.size_id, product.sku
            )));
        }

        for (component, material_id) in &design.selected_materials {
            self.material(material_id)?;
            if !product.available_materials.is_empty()
                && !product.available_materials.contains(material_id)
            {
                return Err(Error::validation(format!(
                    "material {} for {} is not offered for product {}",
                    material_id, component, product.sku
                )));
            }
        }

        self.conn.execute(
            &format!(
                "INSERT INTO custom_designs ({})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                DESIGN_COLUMNS
            ),
            params![
                design.id.to_string(),
                design.customer,
                design.base_product_id.to_string(),
                design.design_name,
                design.size_id.to_string(),
                to_json(&design.custom_colors, "custom_colors")?,
                to_json(&design.selected_materials, "selected_materials")?,
                design.special_instructions,
                design.base_price.to_string(),
                design.customization_fee.to_string(),
                design.total_price.to_string(),
                design.approved,
                design.created,
            ],
        )?;
        tracing::info!(design = %design.id, sku = %product.sku, "custom design created");
        Ok(())
    }

    pub fn design(&self, id: &EntityId) -> Result<CustomDesign> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM custom_designs WHERE id = ?1", DESIGN_COLUMNS),
                params![id.to_string()],
                design_from_row,
            )
            .map_err(|e| not_found_on_empty(e, "custom design", &id.to_string()))
    }

    /// Designs, optionally restricted to one customer, newest first
    pub fn list_designs(&self, customer: Option<&str>) -> Result<Vec<CustomDesign>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM custom_designs
             WHERE ?1 IS NULL OR customer = ?1
             ORDER BY created DESC",
            DESIGN_COLUMNS
        ))?;
        let designs = stmt
            .query_map(params![customer], design_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(designs)
    }

    pub fn set_design_approved(&self, id: &EntityId, approved: bool) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE custom_designs SET approved = ?1 WHERE id = ?2",
            params![approved, id.to_string()],
        )?;
        if changed == 0 {
            return Err(Error::not_found("custom design", id.to_string()));
        }
        tracing::info!(design = %id, approved, "custom design approval changed");
        Ok(())
    }
}
