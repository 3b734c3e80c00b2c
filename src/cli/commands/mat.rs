//! `fwc mat` command - Material management

use clap::Subcommand;
use console::style;
use miette::Result;
use rust_decimal::Decimal;

use crate::cli::commands::utils::{open_workspace, print_record, print_structured};
use crate::cli::helpers::{format_money, format_short_id};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::core::entity::Entity;
use crate::entities::material::{Material, MaterialType};

#[derive(Subcommand, Debug)]
pub enum MatCommands {
    /// Add a material to the catalog
    New(NewArgs),

    /// List materials
    List,

    /// Show a material's details
    Show(ShowArgs),

    /// Change a material's cost per unit
    SetCost(SetCostArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Material name
    #[arg(long, short = 'n')]
    pub name: String,

    /// Material type
    #[arg(long = "type", short = 't')]
    pub material_type: MaterialType,

    #[arg(long, short = 'c', default_value = "Natural")]
    pub color: String,

    #[arg(long, short = 's', default_value = "")]
    pub supplier: String,

    /// Cost per unit of measure
    #[arg(long)]
    pub cost: Decimal,

    /// Unit of measure
    #[arg(long, default_value = "sq_ft")]
    pub unit: String,

    /// Minimum order quantity
    #[arg(long, default_value_t = 1)]
    pub min_order: u32,

    /// Supplier lead time in days
    #[arg(long, default_value_t = 7)]
    pub lead_time: u32,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Material name or ID
    pub material: String,
}

#[derive(clap::Args, Debug)]
pub struct SetCostArgs {
    /// Material name or ID
    pub material: String,

    /// New cost per unit
    pub cost: Decimal,
}

pub fn run(cmd: MatCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        MatCommands::New(args) => run_new(args, global),
        MatCommands::List => run_list(global),
        MatCommands::Show(args) => run_show(args, global),
        MatCommands::SetCost(args) => run_set_cost(args, global),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let mut material = Material::new(
        args.name,
        args.material_type,
        args.color,
        args.supplier,
        args.cost,
    );
    material.unit_of_measure = args.unit;
    material.minimum_order = args.min_order;
    material.lead_time_days = args.lead_time;
    ws.store.insert_material(&material)?;

    if !global.quiet {
        println!(
            "{} Created material {}",
            style("✓").green(),
            style(&material.id).cyan()
        );
        println!(
            "   {} | {} per {}",
            style(material.title()).yellow(),
            format_money(material.cost_per_unit, ws.config.currency()),
            material.unit_of_measure
        );
    }
    Ok(())
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 16),
    ColumnDef::new("name", "NAME", 24),
    ColumnDef::new("type", "TYPE", 10),
    ColumnDef::new("color", "COLOR", 12),
    ColumnDef::new("cost", "COST", 10),
    ColumnDef::new("unit", "UNIT", 8),
    ColumnDef::new("supplier", "SUPPLIER", 24),
];

fn run_list(global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let materials = ws.store.list_materials()?;

    if print_structured(&materials, global.format)? {
        return Ok(());
    }

    let rows = materials.iter().map(|m| {
        TableRow::new(m.id.to_string())
            .cell("id", CellValue::Id(format_short_id(&m.id)))
            .cell("name", CellValue::Text(m.name.clone()))
            .cell("type", CellValue::Text(m.material_type.to_string()))
            .cell("color", CellValue::Text(m.color.clone()))
            .cell("cost", CellValue::Money(m.cost_per_unit))
            .cell("unit", CellValue::Text(m.unit_of_measure.clone()))
            .cell("supplier", CellValue::Text(m.supplier.clone()))
    });
    TableFormatter::new(COLUMNS, "material")
        .quiet(global.quiet)
        .output(rows, global.format);
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let material = ws.store.find_material(&args.material)?;
    print_record(&material, global.format)
}

fn run_set_cost(args: SetCostArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let material = ws.store.find_material(&args.material)?;
    ws.store.update_material_cost(&material.id, args.cost)?;

    if !global.quiet {
        let currency = ws.config.currency();
        println!(
            "{} {} cost {} -> {}",
            style("✓").green(),
            style(material.title()).cyan(),
            format_money(material.cost_per_unit, currency),
            format_money(args.cost, currency)
        );
        println!(
            "   {}",
            style("Orders already costed keep their material cost; use `fwc po recalc --force` to refresh").dim()
        );
    }
    Ok(())
}
