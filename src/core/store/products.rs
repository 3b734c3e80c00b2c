//! Category, product and bill-of-materials persistence

use rusqlite::{params, OptionalExtension, Row};

use super::{
    conflict_on_unique, decimal_col, id_col, not_found_on_empty, opt_decimal_col, parse_col, Store,
};
use crate::core::error::{Error, Result};
use crate::core::identity::EntityId;
use crate::entities::bom::BomLine;
use crate::entities::category::Category;
use crate::entities::product::Product;
use crate::entities::size_chart::Gender;

const CATEGORY_COLUMNS: &str = "id, name, slug, description, parent, created";

const PRODUCT_COLUMNS: &str = "id, name, sku, category, gender, description, base_price, \
     heel_height, sole_thickness, weight, customizable, production_time_days, \
     minimum_order_quantity, active, created, updated";

const BOM_COLUMNS: &str = "id, product_id, material_id, quantity_required, component_name, notes";

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: id_col(row, 0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        description: row.get(3)?,
        parent: row.get(4)?,
        created: row.get(5)?,
    })
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: id_col(row, 0)?,
        name: row.get(1)?,
        sku: row.get(2)?,
        category: row.get(3)?,
        gender: parse_col(row, 4)?,
        description: row.get(5)?,
        base_price: decimal_col(row, 6)?,
        heel_height: opt_decimal_col(row, 7)?,
        sole_thickness: opt_decimal_col(row, 8)?,
        weight: opt_decimal_col(row, 9)?,
        customizable: row.get(10)?,
        production_time_days: row.get(11)?,
        minimum_order_quantity: row.get(12)?,
        active: row.get(13)?,
        available_materials: Vec::new(),
        available_sizes: Vec::new(),
        created: row.get(14)?,
        updated: row.get(15)?,
    })
}

fn bom_from_row(row: &Row<'_>) -> rusqlite::Result<BomLine> {
    Ok(BomLine {
        id: id_col(row, 0)?,
        product_id: id_col(row, 1)?,
        material_id: id_col(row, 2)?,
        quantity_required: decimal_col(row, 3)?,
        component_name: row.get(4)?,
        notes: row.get(5)?,
    })
}

impl Store {
    // =========================================================================
    // Categories
    // =========================================================================

    pub fn insert_category(&self, category: &Category) -> Result<()> {
        if let Some(ref parent) = category.parent {
            self.category(parent)?;
        }
        self.conn
            .execute(
                "INSERT INTO categories (id, name, slug, description, parent, created)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    category.id.to_string(),
                    category.name,
                    category.slug,
                    category.description,
                    category.parent,
                    category.created,
                ],
            )
            .map_err(|e| conflict_on_unique(e, "category", &category.slug))?;
        tracing::info!(slug = %category.slug, "category created");
        Ok(())
    }

    pub fn category(&self, slug: &str) -> Result<Category> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM categories WHERE slug = ?1", CATEGORY_COLUMNS),
                params![slug],
                category_from_row,
            )
            .map_err(|e| not_found_on_empty(e, "category", slug))
    }

    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM categories ORDER BY name",
            CATEGORY_COLUMNS
        ))?;
        let categories = stmt
            .query_map([], category_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(categories)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Insert a product with its allowed materials and sizes
    ///
    /// The SKU must be unique and the category and every linked record
    /// must exist. Nothing is written when any of these checks fail.
    pub fn insert_product(&self, product: &Product) -> Result<()> {
        self.category(&product.category)?;
        for material_id in &product.available_materials {
            self.material(material_id)?;
        }
        for size_id in &product.available_sizes {
            self.size_entry_by_id(size_id)?;
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO products (id, name, sku, category, gender, description, base_price,
                                   heel_height, sole_thickness, weight, customizable,
                                   production_time_days, minimum_order_quantity, active,
                                   created, updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                product.id.to_string(),
                product.name,
                product.sku,
                product.category,
                product.gender.code(),
                product.description,
                product.base_price.to_string(),
                product.heel_height.map(|v| v.to_string()),
                product.sole_thickness.map(|v| v.to_string()),
                product.weight.map(|v| v.to_string()),
                product.customizable,
                product.production_time_days,
                product.minimum_order_quantity,
                product.active,
                product.created,
                product.updated,
            ],
        )
        .map_err(|e| conflict_on_unique(e, "product", &product.sku))?;
        for material_id in &product.available_materials {
            tx.execute(
                "INSERT OR IGNORE INTO product_materials (product_id, material_id) VALUES (?1, ?2)",
                params![product.id.to_string(), material_id.to_string()],
            )?;
        }
        for size_id in &product.available_sizes {
            tx.execute(
                "INSERT OR IGNORE INTO product_sizes (product_id, size_id) VALUES (?1, ?2)",
                params![product.id.to_string(), size_id.to_string()],
            )?;
        }
        tx.commit()?;

        tracing::info!(sku = %product.sku, "product created");
        Ok(())
    }

    fn load_product_links(&self, mut product: Product) -> Result<Product> {
        let mut stmt = self.conn.prepare(
            "SELECT material_id FROM product_materials WHERE product_id = ?1 ORDER BY material_id",
        )?;
        product.available_materials = stmt
            .query_map(params![product.id.to_string()], |row| id_col(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT size_id FROM product_sizes WHERE product_id = ?1 ORDER BY size_id",
        )?;
        product.available_sizes = stmt
            .query_map(params![product.id.to_string()], |row| id_col(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(product)
    }

    pub fn product(&self, id: &EntityId) -> Result<Product> {
        let product = self
            .conn
            .query_row(
                &format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS),
                params![id.to_string()],
                product_from_row,
            )
            .map_err(|e| not_found_on_empty(e, "product", &id.to_string()))?;
        self.load_product_links(product)
    }

    pub fn product_by_sku(&self, sku: &str) -> Result<Product> {
        let product = self
            .conn
            .query_row(
                &format!("SELECT {} FROM products WHERE sku = ?1", PRODUCT_COLUMNS),
                params![sku],
                product_from_row,
            )
            .map_err(|e| not_found_on_empty(e, "product", sku))?;
        self.load_product_links(product)
    }

    /// Find a product by SKU or full ID
    pub fn find_product(&self, key: &str) -> Result<Product> {
        match key.parse::<EntityId>() {
            Ok(id) => self.product(&id),
            Err(_) => self.product_by_sku(key),
        }
    }

    /// Products matching a filter, ordered by SKU
    pub fn find_products(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        Ok(self
            .list_products()?
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect())
    }

    /// Show or hide a product in the catalog
    pub fn set_product_active(&self, id: &EntityId, active: bool) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE products SET active = ?1, updated = ?2 WHERE id = ?3",
            params![active, chrono::Utc::now(), id.to_string()],
        )?;
        if changed == 0 {
            return Err(Error::not_found("product", id.to_string()));
        }
        tracing::info!(product = %id, active, "product visibility changed");
        Ok(())
    }

    pub fn list_products(&self) -> Result<Vec<Product>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM products ORDER BY sku",
            PRODUCT_COLUMNS
        ))?;
        let products = stmt
            .query_map([], product_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        products
            .into_iter()
            .map(|p| self.load_product_links(p))
            .collect()
    }

    /// Delete a product; its BOM lines, designs and orders go with it
    pub fn delete_product(&self, id: &EntityId) -> Result<()> {
        let removed = self
            .conn
            .execute("DELETE FROM products WHERE id = ?1", params![id.to_string()])?;
        if removed == 0 {
            return Err(Error::not_found("product", id.to_string()));
        }
        tracing::info!(product = %id, "product deleted");
        Ok(())
    }

    /// Allow a material to be selected for a product; repeated calls are no-ops
    pub fn allow_material(&self, product_id: &EntityId, material_id: &EntityId) -> Result<()> {
        self.material(material_id)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO product_materials (product_id, material_id) VALUES (?1, ?2)",
            params![product_id.to_string(), material_id.to_string()],
        )?;
        self.touch_product(product_id)
    }

    /// Make a size entry available for a product; repeated calls are no-ops
    pub fn allow_size(&self, product_id: &EntityId, size_id: &EntityId) -> Result<()> {
        self.size_entry_by_id(size_id)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO product_sizes (product_id, size_id) VALUES (?1, ?2)",
            params![product_id.to_string(), size_id.to_string()],
        )?;
        self.touch_product(product_id)
    }

    fn touch_product(&self, product_id: &EntityId) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE products SET updated = ?1 WHERE id = ?2",
            params![chrono::Utc::now(), product_id.to_string()],
        )?;
        if changed == 0 {
            return Err(Error::not_found("product", product_id.to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // Bill of materials
    // =========================================================================

    /// Insert a BOM line; (product, material, component) must be unique
    pub fn insert_bom_line(&self, line: &BomLine) -> Result<()> {
        if line.quantity_required.is_sign_negative() {
            return Err(Error::validation(format!(
                "quantity for {} must not be negative",
                line.component_name
            )));
        }
        let product = self.product(&line.product_id)?;
        let material = self.material(&line.material_id)?;

        self.conn
            .execute(
                &format!(
                    "INSERT INTO bom_lines ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    BOM_COLUMNS
                ),
                params![
                    line.id.to_string(),
                    line.product_id.to_string(),
                    line.material_id.to_string(),
                    line.quantity_required.to_string(),
                    line.component_name,
                    line.notes,
                ],
            )
            .map_err(|e| {
                conflict_on_unique(
                    e,
                    "BOM line",
                    &format!("{} / {} / {}", product.sku, material.name, line.component_name),
                )
            })?;
        tracing::debug!(sku = %product.sku, component = %line.component_name, "BOM line added");
        Ok(())
    }

    /// BOM lines of a product, ordered by component name
    pub fn bom_lines(&self, product_id: &EntityId) -> Result<Vec<BomLine>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM bom_lines WHERE product_id = ?1 ORDER BY component_name, id",
            BOM_COLUMNS
        ))?;
        let lines = stmt
            .query_map(params![product_id.to_string()], bom_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lines)
    }

    pub fn bom_line(
        &self,
        product_id: &EntityId,
        material_id: &EntityId,
        component_name: &str,
    ) -> Result<Option<BomLine>> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM bom_lines
                     WHERE product_id = ?1 AND material_id = ?2 AND component_name = ?3",
                    BOM_COLUMNS
                ),
                params![
                    product_id.to_string(),
                    material_id.to_string(),
                    component_name
                ],
                bom_from_row,
            )
            .optional()?)
    }

    pub fn delete_bom_line(&self, id: &EntityId) -> Result<()> {
        let removed = self
            .conn
            .execute("DELETE FROM bom_lines WHERE id = ?1", params![id.to_string()])?;
        if removed == 0 {
            return Err(Error::not_found("BOM line", id.to_string()));
        }
        Ok(())
    }

    /// Number of records per table, for the status dashboard
    pub fn count(&self, table: CountedTable) -> Result<i64> {
        Ok(self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.as_str()),
            [],
            |row| row.get(0),
        )?)
    }
}

/// Filter for listing products
///
/// Inactive products are hidden unless `include_inactive` is set.
#[derive(Debug, Default, Clone)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub gender: Option<Gender>,
    pub customizable_only: bool,
    /// Case-insensitive match against name and description
    pub search: Option<String>,
    pub include_inactive: bool,
}

impl ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        if !self.include_inactive && !product.active {
            return false;
        }
        if let Some(ref category) = self.category {
            if &product.category != category {
                return false;
            }
        }
        if let Some(gender) = self.gender {
            if product.gender != gender {
                return false;
            }
        }
        if self.customizable_only && !product.customizable {
            return false;
        }
        match self.search {
            Some(ref needle) => {
                let needle = needle.to_lowercase();
                product.name.to_lowercase().contains(&needle)
                    || product.description.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

/// Tables the dashboard reports counts for
#[derive(Debug, Clone, Copy)]
pub enum CountedTable {
    SizeCharts,
    Materials,
    Categories,
    Products,
    CustomDesigns,
}

impl CountedTable {
    fn as_str(&self) -> &'static str {
        match self {
            CountedTable::SizeCharts => "size_charts",
            CountedTable::Materials => "materials",
            CountedTable::Categories => "categories",
            CountedTable::Products => "products",
            CountedTable::CustomDesigns => "custom_designs",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::material::{Material, MaterialType};
    use crate::entities::size_chart::{SizeChart, SizeEntry, Region};

    fn setup() -> (Store, Product, Material) {
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
        let leather = Material::new(
            "Leather".to_string(),
            MaterialType::Leather,
            "Brown".to_string(),
            "Italian Leather Co.".to_string(),
            "25.00".parse().unwrap(),
        );
        store.insert_material(&leather).unwrap();
        (store, product, leather)
    }

    #[test]
    fn test_duplicate_sku_conflicts() {
        let (store, _, _) = setup();
        let dup = Product::new(
            "Other Boot".to_string(),
            "BOOT-001".to_string(),
            "boots".to_string(),
            Gender::Women,
            "99.00".parse().unwrap(),
        );
        assert!(store.insert_product(&dup).unwrap_err().is_conflict());
    }

    #[test]
    fn test_product_requires_category() {
        let store = Store::open_in_memory().unwrap();
        let product = Product::new(
            "Sandal".to_string(),
            "SND-001".to_string(),
            "sandals".to_string(),
            Gender::Unisex,
            "39.00".parse().unwrap(),
        );
        assert!(store.insert_product(&product).unwrap_err().is_not_found());
    }

    #[test]
    fn test_duplicate_category_slug_conflicts() {
        let (store, _, _) = setup();
        let dup = Category::new("Boots Again".to_string(), "boots".to_string());
        assert!(store.insert_category(&dup).unwrap_err().is_conflict());
    }

    #[test]
    fn test_duplicate_bom_line_conflicts() {
        let (store, product, leather) = setup();
        let line = BomLine::new(
            product.id.clone(),
            leather.id.clone(),
            "Upper".to_string(),
            "2.0".parse().unwrap(),
        );
        store.insert_bom_line(&line).unwrap();

        let dup = BomLine::new(
            product.id.clone(),
            leather.id.clone(),
            "Upper".to_string(),
            "1.0".parse().unwrap(),
        );
        assert!(store.insert_bom_line(&dup).unwrap_err().is_conflict());

        // Same material for a different component is a distinct line
        let tongue = BomLine::new(
            product.id.clone(),
            leather.id.clone(),
            "Tongue".to_string(),
            "0.25".parse().unwrap(),
        );
        store.insert_bom_line(&tongue).unwrap();
        assert_eq!(store.bom_lines(&product.id).unwrap().len(), 2);
    }

    #[test]
    fn test_negative_bom_quantity_rejected() {
        let (store, product, leather) = setup();
        let line = BomLine::new(
            product.id.clone(),
            leather.id.clone(),
            "Upper".to_string(),
            "-1".parse().unwrap(),
        );
        assert!(matches!(
            store.insert_bom_line(&line).unwrap_err(),
            Error::Validation(_)
        ));
    }

    #[test]
    fn test_deleting_product_cascades_bom_lines() {
        let (store, product, leather) = setup();
        let line = BomLine::new(
            product.id.clone(),
            leather.id.clone(),
            "Upper".to_string(),
            "2.0".parse().unwrap(),
        );
        store.insert_bom_line(&line).unwrap();

        store.delete_product(&product.id).unwrap();
        assert!(store.bom_lines(&product.id).unwrap().is_empty());
        assert!(store.product_by_sku("BOOT-001").unwrap_err().is_not_found());
        // The material itself survives
        assert!(store.material(&leather.id).is_ok());
    }

    #[test]
    fn test_allowed_materials_are_idempotent() {
        let (store, product, leather) = setup();
        store.allow_material(&product.id, &leather.id).unwrap();
        store.allow_material(&product.id, &leather.id).unwrap();

        let loaded = store.find_product("BOOT-001").unwrap();
        assert_eq!(loaded.available_materials, vec![leather.id]);
    }

    #[test]
    fn test_product_links_written_with_product() {
        let (store, _, leather) = setup();
        let chart = SizeChart::new("US Men Sizes".to_string(), Region::Us, Gender::Men);
        store.insert_chart(&chart).unwrap();
        let ten = SizeEntry::new(chart.id.clone(), "10".to_string(), "280.0".parse().unwrap());
        store.insert_size_entry(&ten).unwrap();

        let mut product = Product::new(
            "Chelsea Boot".to_string(),
            "BOOT-002".to_string(),
            "boots".to_string(),
            Gender::Men,
            "189.00".parse().unwrap(),
        );
        product.available_materials = vec![leather.id.clone()];
        product.available_sizes = vec![ten.id.clone()];
        store.insert_product(&product).unwrap();

        let loaded = store.find_product("BOOT-002").unwrap();
        assert_eq!(loaded.available_materials, vec![leather.id]);
        assert_eq!(loaded.available_sizes, vec![ten.id]);
    }

    #[test]
    fn test_bad_product_link_writes_nothing() {
        let (store, _, leather) = setup();
        let mut product = Product::new(
            "Chelsea Boot".to_string(),
            "BOOT-002".to_string(),
            "boots".to_string(),
            Gender::Men,
            "189.00".parse().unwrap(),
        );
        product.available_materials = vec![
            leather.id.clone(),
            EntityId::new(crate::core::identity::EntityPrefix::Mat),
        ];

        assert!(store.insert_product(&product).unwrap_err().is_not_found());
        assert!(store.product_by_sku("BOOT-002").unwrap_err().is_not_found());
        assert_eq!(store.count(CountedTable::Products).unwrap(), 1);
    }

    #[test]
    fn test_product_filter() {
        let (store, boot, _) = setup();
        store
            .insert_category(&Category::new("Sneakers".to_string(), "sneakers".to_string()))
            .unwrap();
        let mut runner = Product::new(
            "Trail Runner".to_string(),
            "RUN-001".to_string(),
            "sneakers".to_string(),
            Gender::Women,
            "89.00".parse().unwrap(),
        );
        runner.description = "Lightweight mesh for rocky paths".to_string();
        runner.customizable = true;
        store.insert_product(&runner).unwrap();

        let skus = |filter: ProductFilter| -> Vec<String> {
            store
                .find_products(&filter)
                .unwrap()
                .into_iter()
                .map(|p| p.sku)
                .collect()
        };

        assert_eq!(skus(ProductFilter::default()), vec!["BOOT-001", "RUN-001"]);
        let women = ProductFilter {
            gender: Some(Gender::Women),
            ..Default::default()
        };
        assert_eq!(skus(women), vec!["RUN-001"]);
        let search = ProductFilter {
            search: Some("MESH".to_string()),
            ..Default::default()
        };
        assert_eq!(skus(search), vec!["RUN-001"]);
        let search_name = ProductFilter {
            search: Some("boot".to_string()),
            ..Default::default()
        };
        assert_eq!(skus(search_name), vec!["BOOT-001"]);
        let custom = ProductFilter {
            customizable_only: true,
            category: Some("sneakers".to_string()),
            ..Default::default()
        };
        assert_eq!(skus(custom), vec!["RUN-001"]);

        store.set_product_active(&boot.id, false).unwrap();
        assert_eq!(skus(ProductFilter::default()), vec!["RUN-001"]);
        let all = ProductFilter {
            include_inactive: true,
            ..Default::default()
        };
        assert_eq!(skus(all), vec!["BOOT-001", "RUN-001"]);
        assert!(!store.product(&boot.id).unwrap().active);

        store.set_product_active(&boot.id, true).unwrap();
        assert_eq!(skus(ProductFilter::default()), vec!["BOOT-001", "RUN-001"]);
    }

    #[test]
    fn test_set_active_on_missing_product() {
        let store = Store::open_in_memory().unwrap();
        let id = EntityId::new(crate::core::identity::EntityPrefix::Prd);
        assert!(store.set_product_active(&id, false).unwrap_err().is_not_found());
    }

    #[test]
    fn test_count_tables() {
        let (store, _, _) = setup();
        assert_eq!(store.count(CountedTable::Products).unwrap(), 1);
        assert_eq!(store.count(CountedTable::Materials).unwrap(), 1);
        assert_eq!(store.count(CountedTable::SizeCharts).unwrap(), 0);
    }
}
