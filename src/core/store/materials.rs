//! Material persistence

use rusqlite::{params, Row};
use rust_decimal::Decimal;

use super::{decimal_col, id_col, not_found_on_empty, parse_col, Store};
use crate::core::error::{Error, Result};
use crate::core::identity::EntityId;
use crate::entities::material::Material;

const MATERIAL_COLUMNS: &str = "id, name, material_type, color, supplier, cost_per_unit, \
     unit_of_measure, minimum_order, lead_time_days, created";

fn material_from_row(row: &Row<'_>) -> rusqlite::Result<Material> {
    Ok(Material {
        id: id_col(row, 0)?,
        name: row.get(1)?,
        material_type: parse_col(row, 2)?,
        color: row.get(3)?,
        supplier: row.get(4)?,
        cost_per_unit: decimal_col(row, 5)?,
        unit_of_measure: row.get(6)?,
        minimum_order: row.get(7)?,
        lead_time_days: row.get(8)?,
        created: row.get(9)?,
    })
}

impl Store {
    pub fn insert_material(&self, material: &Material) -> Result<()> {
        self.conn.execute(
            "INSERT INTO materials (id, name, material_type, color, supplier, cost_per_unit,
                                    unit_of_measure, minimum_order, lead_time_days, created)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                material.id.to_string(),
                material.name,
                material.material_type.to_string(),
                material.color,
                material.supplier,
                material.cost_per_unit.to_string(),
                material.unit_of_measure,
                material.minimum_order,
                material.lead_time_days,
                material.created,
            ],
        )?;
        tracing::info!(material = %material.name, cost = %material.cost_per_unit, "material created");
        Ok(())
    }

    pub fn material(&self, id: &EntityId) -> Result<Material> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM materials WHERE id = ?1", MATERIAL_COLUMNS),
                params![id.to_string()],
                material_from_row,
            )
            .map_err(|e| not_found_on_empty(e, "material", &id.to_string()))
    }

    /// Find a material by full ID or by (case-insensitive) name
    ///
    /// A name shared by several materials is rejected as ambiguous.
    pub fn find_material(&self, key: &str) -> Result<Material> {
        if let Ok(id) = key.parse::<EntityId>() {
            return self.material(&id);
        }

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM materials WHERE name = ?1 COLLATE NOCASE",
            MATERIAL_COLUMNS
        ))?;
        let mut matches = stmt
            .query_map(params![key], material_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        match matches.len() {
            0 => Err(Error::not_found("material", key)),
            1 => Ok(matches.remove(0)),
            n => Err(Error::validation(format!(
                "material name '{}' matches {} materials; use the material ID",
                key, n
            ))),
        }
    }

    pub fn list_materials(&self) -> Result<Vec<Material>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM materials ORDER BY name, color",
            MATERIAL_COLUMNS
        ))?;
        let materials = stmt
            .query_map([], material_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(materials)
    }

    /// Change a material's unit cost
    ///
    /// Orders whose material cost was already computed keep their old value.
    pub fn update_material_cost(&self, id: &EntityId, cost_per_unit: Decimal) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE materials SET cost_per_unit = ?1 WHERE id = ?2",
            params![cost_per_unit.to_string(), id.to_string()],
        )?;
        if changed == 0 {
            return Err(Error::not_found("material", id.to_string()));
        }
        tracing::info!(material = %id, cost = %cost_per_unit, "material cost updated");
        Ok(())
    }
}
