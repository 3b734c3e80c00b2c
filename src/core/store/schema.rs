//! Database schema initialization

use rusqlite::{params, OptionalExtension};

use super::{Store, SCHEMA_VERSION};
use crate::core::error::{Error, Result};

impl Store {
    /// Create tables if missing and record the schema version
    pub(super) fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Measurement catalog
            CREATE TABLE IF NOT EXISTS size_charts (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                region TEXT NOT NULL,
                gender TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                created TEXT NOT NULL,
                UNIQUE (region, gender)
            );

            CREATE TABLE IF NOT EXISTS size_entries (
                id TEXT PRIMARY KEY,
                chart_id TEXT NOT NULL REFERENCES size_charts(id) ON DELETE CASCADE,
                label TEXT NOT NULL,
                length_mm TEXT NOT NULL,
                width_mm TEXT,
                UNIQUE (chart_id, label)
            );
            CREATE INDEX IF NOT EXISTS idx_size_entries_chart ON size_entries(chart_id);

            -- Material catalog
            CREATE TABLE IF NOT EXISTS materials (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                material_type TEXT NOT NULL,
                color TEXT NOT NULL,
                supplier TEXT NOT NULL,
                cost_per_unit TEXT NOT NULL,
                unit_of_measure TEXT NOT NULL,
                minimum_order INTEGER NOT NULL,
                lead_time_days INTEGER NOT NULL,
                created TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_materials_name ON materials(name);

            -- Product catalog
            CREATE TABLE IF NOT EXISTS categories (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT '',
                parent TEXT REFERENCES categories(slug) ON DELETE CASCADE,
                created TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                sku TEXT NOT NULL UNIQUE,
                category TEXT NOT NULL REFERENCES categories(slug) ON DELETE CASCADE,
                gender TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                base_price TEXT NOT NULL,
                heel_height TEXT,
                sole_thickness TEXT,
                weight TEXT,
                customizable INTEGER NOT NULL,
                production_time_days INTEGER NOT NULL,
                minimum_order_quantity INTEGER NOT NULL,
                active INTEGER NOT NULL,
                created TEXT NOT NULL,
                updated TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_products_category ON products(category);

            CREATE TABLE IF NOT EXISTS product_materials (
                product_id TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
                material_id TEXT NOT NULL REFERENCES materials(id) ON DELETE CASCADE,
                PRIMARY KEY (product_id, material_id)
            );

            CREATE TABLE IF NOT EXISTS product_sizes (
                product_id TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
                size_id TEXT NOT NULL REFERENCES size_entries(id) ON DELETE CASCADE,
                PRIMARY KEY (product_id, size_id)
            );

            -- Bill of materials, owned by the product
            CREATE TABLE IF NOT EXISTS bom_lines (
                id TEXT PRIMARY KEY,
                product_id TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
                material_id TEXT NOT NULL REFERENCES materials(id),
                quantity_required TEXT NOT NULL,
                component_name TEXT NOT NULL,
                notes TEXT NOT NULL DEFAULT '',
                UNIQUE (product_id, material_id, component_name)
            );
            CREATE INDEX IF NOT EXISTS idx_bom_lines_product ON bom_lines(product_id);

            -- Customization and production
            CREATE TABLE IF NOT EXISTS custom_designs (
                id TEXT PRIMARY KEY,
                customer TEXT NOT NULL,
                base_product_id TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
                design_name TEXT NOT NULL,
                size_id TEXT NOT NULL REFERENCES size_entries(id),
                custom_colors TEXT NOT NULL,
                selected_materials TEXT NOT NULL,
                special_instructions TEXT NOT NULL DEFAULT '',
                base_price TEXT NOT NULL,
                customization_fee TEXT NOT NULL,
                total_price TEXT NOT NULL,
                approved INTEGER NOT NULL,
                created TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS production_orders (
                id TEXT PRIMARY KEY,
                order_number TEXT NOT NULL UNIQUE,
                product_id TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
                custom_design_id TEXT REFERENCES custom_designs(id) ON DELETE CASCADE,
                quantity INTEGER NOT NULL CHECK (quantity >= 1),
                size_breakdown TEXT NOT NULL,
                start_date TEXT,
                expected_completion TEXT NOT NULL,
                actual_completion TEXT,
                status TEXT NOT NULL,
                material_cost TEXT NOT NULL,
                labor_cost TEXT NOT NULL,
                overhead_cost TEXT NOT NULL,
                total_cost TEXT NOT NULL,
                notes TEXT NOT NULL DEFAULT '',
                created_by TEXT NOT NULL,
                created TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_orders_status ON production_orders(status);

            -- Per-day order number sequence
            CREATE TABLE IF NOT EXISTS order_sequences (
                day TEXT PRIMARY KEY,
                last INTEGER NOT NULL
            );
            "#,
        )?;

        let current: Option<i32> = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        match current {
            None => {
                self.conn.execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    params![SCHEMA_VERSION],
                )?;
            }
            Some(v) if v != SCHEMA_VERSION => {
                return Err(Error::validation(format!(
                    "store schema version {} is not supported (expected {})",
                    v, SCHEMA_VERSION
                )));
            }
            Some(_) => {}
        }

        Ok(())
    }
}
