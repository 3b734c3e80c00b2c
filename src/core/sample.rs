//! Bundled starter catalog
//!
//! `fwc init --sample` loads `data/sample_catalog.yaml`, which is compiled
//! into the binary, so a fresh project has categories, materials, size
//! charts and a few products with bills of materials to work with.

use rust_decimal::Decimal;
use rust_embed::Embed;
use serde::Deserialize;

use crate::core::error::{Error, Result};
use crate::core::store::Store;
use crate::entities::bom::BomLine;
use crate::entities::category::Category;
use crate::entities::material::{Material, MaterialType};
use crate::entities::product::Product;
use crate::entities::size_chart::{ChartKey, Gender, SizeChart, SizeEntry};

#[derive(Embed)]
#[folder = "data/"]
struct SampleData;

const CATALOG_FILE: &str = "sample_catalog.yaml";

#[derive(Debug, Deserialize)]
struct SampleCatalog {
    #[serde(default)]
    categories: Vec<SampleCategory>,
    #[serde(default)]
    materials: Vec<SampleMaterial>,
    #[serde(default)]
    charts: Vec<SampleChart>,
    #[serde(default)]
    products: Vec<SampleProduct>,
}

#[derive(Debug, Deserialize)]
struct SampleCategory {
    name: String,
    slug: String,
    parent: Option<String>,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct SampleMaterial {
    name: String,
    material_type: MaterialType,
    color: String,
    supplier: String,
    cost_per_unit: Decimal,
    unit_of_measure: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SampleChart {
    key: String,
    name: String,
    #[serde(default)]
    sizes: Vec<SampleSize>,
}

#[derive(Debug, Deserialize)]
struct SampleSize {
    label: String,
    length_mm: Decimal,
}

#[derive(Debug, Deserialize)]
struct SampleProduct {
    name: String,
    sku: String,
    category: String,
    gender: Gender,
    base_price: Decimal,
    #[serde(default)]
    customizable: bool,
    heel_height: Option<Decimal>,
    production_time_days: Option<u32>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    bom: Vec<SampleBomLine>,
}

#[derive(Debug, Deserialize)]
struct SampleBomLine {
    component: String,
    material: String,
    quantity: Decimal,
    #[serde(default)]
    notes: String,
}

/// What a sample load created
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SampleSummary {
    pub categories: usize,
    pub materials: usize,
    pub charts: usize,
    pub sizes: usize,
    pub products: usize,
    pub bom_lines: usize,
}

fn load_catalog() -> Result<SampleCatalog> {
    let file = SampleData::get(CATALOG_FILE)
        .ok_or_else(|| Error::not_found("bundled file", CATALOG_FILE))?;
    let text = std::str::from_utf8(&file.data).map_err(|e| Error::Decode {
        field: CATALOG_FILE,
        value: e.to_string(),
    })?;
    serde_yml::from_str(text).map_err(|e| Error::Decode {
        field: CATALOG_FILE,
        value: e.to_string(),
    })
}

/// Insert the bundled catalog into `store`
///
/// Fails with a conflict if any of the sample records already exist.
pub fn seed(store: &Store) -> Result<SampleSummary> {
    let catalog = load_catalog()?;
    let mut summary = SampleSummary::default();

    for c in catalog.categories {
        let mut category = Category::new(c.name, c.slug);
        category.parent = c.parent;
        category.description = c.description;
        store.insert_category(&category)?;
        summary.categories += 1;
    }

    for m in catalog.materials {
        let mut material = Material::new(m.name, m.material_type, m.color, m.supplier, m.cost_per_unit);
        if let Some(unit) = m.unit_of_measure {
            material.unit_of_measure = unit;
        }
        store.insert_material(&material)?;
        summary.materials += 1;
    }

    for c in catalog.charts {
        let key: ChartKey = c.key.parse().map_err(Error::Validation)?;
        let chart = SizeChart::new(c.name, key.region, key.gender);
        store.insert_chart(&chart)?;
        summary.charts += 1;
        for size in c.sizes {
            store.insert_size_entry(&SizeEntry::new(chart.id.clone(), size.label, size.length_mm))?;
            summary.sizes += 1;
        }
    }

    for p in catalog.products {
        let mut product = Product::new(p.name, p.sku, p.category, p.gender, p.base_price);
        product.customizable = p.customizable;
        product.heel_height = p.heel_height;
        product.description = p.description;
        if let Some(days) = p.production_time_days {
            product.production_time_days = days;
        }
        store.insert_product(&product)?;
        summary.products += 1;

        for line in p.bom {
            let material = store.find_material(&line.material)?;
            let mut bom_line =
                BomLine::new(product.id.clone(), material.id, line.component, line.quantity);
            bom_line.notes = line.notes;
            store.insert_bom_line(&bom_line)?;
            summary.bom_lines += 1;
        }
    }

    tracing::info!(
        products = summary.products,
        materials = summary.materials,
        charts = summary.charts,
        "sample catalog loaded"
    );
    Ok(summary)
}
