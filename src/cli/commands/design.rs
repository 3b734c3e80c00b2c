//! `fwc design` command - Custom design management

use std::collections::BTreeMap;

use clap::Subcommand;
use console::style;
use miette::Result;
use rust_decimal::Decimal;

use crate::cli::commands::utils::{open_workspace, print_record, print_structured};
use crate::cli::helpers::{format_money, format_short_id};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::core::error::Error;
use crate::core::identity::EntityId;
use crate::core::store::Store;
use crate::entities::custom_design::{parse_component_pair, CustomDesign};

#[derive(Subcommand, Debug)]
pub enum DesignCommands {
    /// Create a custom design based on a customizable product
    New(NewArgs),

    /// List custom designs
    List(ListArgs),

    /// Show a design's details
    Show(IdArgs),

    /// Approve a design for production
    Approve(IdArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Base product SKU or ID
    pub product: String,

    /// Customer account name
    #[arg(long)]
    pub customer: String,

    /// Design name
    #[arg(long, short = 'n')]
    pub name: String,

    /// Size as REGION-GENDER:LABEL (e.g. US-M:10)
    #[arg(long, short = 's')]
    pub size: String,

    /// Component color as COMPONENT=COLOR (repeatable)
    #[arg(long = "color", value_parser = parse_component_pair)]
    pub colors: Vec<(String, String)>,

    /// Component material as COMPONENT=MATERIAL (repeatable; name or ID)
    #[arg(long = "material", value_parser = parse_component_pair)]
    pub materials: Vec<(String, String)>,

    /// Customization fee (default from config)
    #[arg(long)]
    pub fee: Option<Decimal>,

    #[arg(long)]
    pub instructions: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only designs for this customer
    #[arg(long)]
    pub customer: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct IdArgs {
    /// Design ID (DES-...)
    pub id: EntityId,
}

pub fn run(cmd: DesignCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        DesignCommands::New(args) => run_new(args, global),
        DesignCommands::List(args) => run_list(args, global),
        DesignCommands::Show(args) => run_show(args, global),
        DesignCommands::Approve(args) => run_approve(args, global),
    }
}

/// Resolve `component=material` choices; each component may be chosen once
fn select_materials(
    store: &Store,
    choices: Vec<(String, String)>,
) -> Result<BTreeMap<String, EntityId>> {
    let mut selected = BTreeMap::new();
    for (component, material) in choices {
        let material = store.find_material(&material)?;
        if selected.contains_key(&component) {
            return Err(Error::conflict("design material", component).into());
        }
        selected.insert(component, material.id);
    }
    Ok(selected)
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let product = ws.store.find_product(&args.product)?;
    let size = ws.store.size_entry_by_ref(&args.size)?;
    let fee = args.fee.unwrap_or_else(|| ws.config.customization_fee());

    let mut design = CustomDesign::new(
        args.customer,
        product.id.clone(),
        args.name,
        size.id.clone(),
        product.base_price,
        fee,
    );
    design.custom_colors = args.colors.into_iter().collect();
    design.selected_materials = select_materials(&ws.store, args.materials)?;
    design.special_instructions = args.instructions.unwrap_or_default();
    ws.store.insert_design(&design)?;

    if !global.quiet {
        println!(
            "{} Created design {}",
            style("✓").green(),
            style(&design.id).cyan()
        );
        println!(
            "   {} on {} in {} | {}",
            style(&design.design_name).yellow(),
            product.sku,
            args.size,
            format_money(design.total_price, ws.config.currency())
        );
    }
    Ok(())
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("name", "DESIGN", 24),
    ColumnDef::new("customer", "CUSTOMER", 16),
    ColumnDef::new("total", "TOTAL", 10),
    ColumnDef::new("approved", "APPROVED", 8),
    ColumnDef::new("created", "CREATED", 10),
];

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let designs = ws.store.list_designs(args.customer.as_deref())?;

    if print_structured(&designs, global.format)? {
        return Ok(());
    }

    let rows = designs.iter().map(|d| {
        TableRow::new(d.id.to_string())
            .cell("id", CellValue::Id(format_short_id(&d.id)))
            .cell("name", CellValue::Text(d.design_name.clone()))
            .cell("customer", CellValue::Text(d.customer.clone()))
            .cell("total", CellValue::Money(d.total_price))
            .cell("approved", CellValue::Flag(d.approved))
            .cell("created", CellValue::Created(d.created))
    });
    TableFormatter::new(COLUMNS, "design")
        .quiet(global.quiet)
        .output(rows, global.format);
    Ok(())
}

fn run_show(args: IdArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let design = ws.store.design(&args.id)?;
    print_record(&design, global.format)
}

fn run_approve(args: IdArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    ws.store.set_design_approved(&args.id, true)?;
    if !global.quiet {
        println!(
            "{} Approved design {}",
            style("✓").green(),
            style(&args.id).cyan()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::material::{Material, MaterialType};

    fn store_with_materials() -> Store {
        let store = Store::open_in_memory().unwrap();
        for (name, kind) in [("Mesh", MaterialType::Synthetic), ("Suede", MaterialType::Leather)] {
            let material = Material::new(
                name.to_string(),
                kind,
                "Grey".to_string(),
                "Textile Inc.".to_string(),
                "8.50".parse().unwrap(),
            );
            store.insert_material(&material).unwrap();
        }
        store
    }

    #[test]
    fn test_select_materials_per_component() {
        let store = store_with_materials();
        let selected = select_materials(
            &store,
            vec![
                ("Upper".to_string(), "Mesh".to_string()),
                ("Heel".to_string(), "Suede".to_string()),
            ],
        )
        .unwrap();
        assert_eq!(selected.len(), 2);
        assert!(selected.contains_key("Upper"));
    }

    #[test]
    fn test_repeated_component_conflicts() {
        let store = store_with_materials();
        let err = select_materials(
            &store,
            vec![
                ("Upper".to_string(), "Mesh".to_string()),
                ("Upper".to_string(), "Suede".to_string()),
            ],
        )
        .unwrap_err();
        assert!(err.to_string().contains("design material already exists: Upper"));
    }
}
