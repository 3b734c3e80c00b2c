//! `fwc prd` command - Product, BOM and pricing management

use clap::Subcommand;
use console::style;
use miette::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::commands::utils::{open_workspace, print_record, print_structured};
use crate::cli::helpers::{format_money, truncate_str};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::costing::{CostedLine, CostingService, ProductionCostCalculator};
use crate::core::error::Error;
use crate::core::pricing::{self, DiscountTier};
use crate::core::store::ProductFilter;
use crate::entities::bom::BomLine;
use crate::entities::product::Product;
use crate::entities::production_order::CostBreakdown;
use crate::entities::size_chart::Gender;

#[derive(Subcommand, Debug)]
pub enum PrdCommands {
    /// Create a product
    New(NewArgs),

    /// List products
    List(ListArgs),

    /// Show a product with its BOM and allowed options
    Show(ShowArgs),

    /// Delete a product together with its BOM, designs and orders
    Delete(ShowArgs),

    /// Return a hidden product to the catalog
    Activate(ShowArgs),

    /// Hide a product from the catalog without deleting it
    Deactivate(ShowArgs),

    /// Add a material requirement to a product's BOM
    BomAdd(BomAddArgs),

    /// Remove a BOM line
    BomRemove(BomRemoveArgs),

    /// Cost a product's BOM, optionally for a production quantity
    Cost(CostArgs),

    /// Quote a wholesale price
    Price(PriceArgs),

    /// Allow a material to be selected in custom designs
    AllowMaterial(AllowMaterialArgs),

    /// Offer a size for this product
    AllowSize(AllowSizeArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    #[arg(long, short = 'n')]
    pub name: String,

    /// Stock keeping unit (unique)
    #[arg(long, short = 's')]
    pub sku: String,

    /// Category slug
    #[arg(long, short = 'c')]
    pub category: String,

    /// Gender (M, W, K, U)
    #[arg(long, short = 'g', default_value = "U")]
    pub gender: Gender,

    /// Base price per pair
    #[arg(long, short = 'p')]
    pub price: Decimal,

    /// Accept custom designs for this product
    #[arg(long)]
    pub customizable: bool,

    /// Production lead time in days
    #[arg(long, default_value_t = 14)]
    pub production_days: u32,

    /// Minimum order quantity
    #[arg(long, default_value_t = 1)]
    pub moq: u32,

    /// Heel height in mm
    #[arg(long)]
    pub heel_height: Option<Decimal>,

    /// Sole thickness in mm
    #[arg(long)]
    pub sole_thickness: Option<Decimal>,

    /// Weight in grams
    #[arg(long)]
    pub weight: Option<Decimal>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Create the product hidden from the catalog
    #[arg(long)]
    pub inactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only products in this category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Only products cut for this gender (M, W, K, U)
    #[arg(long, short = 'g')]
    pub gender: Option<Gender>,

    /// Only customizable products
    #[arg(long)]
    pub customizable: bool,

    /// Match text in the name or description (case-insensitive)
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Include inactive products
    #[arg(long)]
    pub all: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Product SKU or ID
    pub product: String,
}

#[derive(clap::Args, Debug)]
pub struct BomAddArgs {
    /// Product SKU or ID
    pub product: String,

    /// Material name or ID
    #[arg(long, short = 'm')]
    pub material: String,

    /// Shoe component (e.g. Upper, Sole, Laces)
    #[arg(long, short = 'c')]
    pub component: String,

    /// Material quantity per pair
    #[arg(long)]
    pub qty: Decimal,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct BomRemoveArgs {
    /// Product SKU or ID
    pub product: String,

    /// Material name or ID
    #[arg(long, short = 'm')]
    pub material: String,

    #[arg(long, short = 'c')]
    pub component: String,
}

#[derive(clap::Args, Debug)]
pub struct CostArgs {
    /// Product SKU or ID
    pub product: String,

    /// Production quantity for a labor/overhead breakdown
    #[arg(long)]
    pub qty: Option<u32>,
}

#[derive(clap::Args, Debug)]
pub struct PriceArgs {
    /// Product SKU or ID
    pub product: String,

    /// Number of pairs
    #[arg(long, default_value_t = 1)]
    pub qty: u32,

    /// Wholesale discount tier (bronze, silver, gold, platinum)
    #[arg(long, short = 't')]
    pub tier: Option<DiscountTier>,
}

#[derive(clap::Args, Debug)]
pub struct AllowMaterialArgs {
    /// Product SKU or ID
    pub product: String,

    /// Material name or ID
    pub material: String,
}

#[derive(clap::Args, Debug)]
pub struct AllowSizeArgs {
    /// Product SKU or ID
    pub product: String,

    /// Size as REGION-GENDER:LABEL (e.g. US-M:10)
    pub size: String,
}

pub fn run(cmd: PrdCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        PrdCommands::New(args) => run_new(args, global),
        PrdCommands::List(args) => run_list(args, global),
        PrdCommands::Show(args) => run_show(args, global),
        PrdCommands::Delete(args) => run_delete(args, global),
        PrdCommands::Activate(args) => run_set_active(args, true, global),
        PrdCommands::Deactivate(args) => run_set_active(args, false, global),
        PrdCommands::BomAdd(args) => run_bom_add(args, global),
        PrdCommands::BomRemove(args) => run_bom_remove(args, global),
        PrdCommands::Cost(args) => run_cost(args, global),
        PrdCommands::Price(args) => run_price(args, global),
        PrdCommands::AllowMaterial(args) => run_allow_material(args, global),
        PrdCommands::AllowSize(args) => run_allow_size(args, global),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let mut product = Product::new(args.name, args.sku, args.category, args.gender, args.price);
    product.customizable = args.customizable;
    product.production_time_days = args.production_days;
    product.minimum_order_quantity = args.moq;
    product.heel_height = args.heel_height;
    product.sole_thickness = args.sole_thickness;
    product.weight = args.weight;
    product.description = args.description.unwrap_or_default();
    product.active = !args.inactive;
    ws.store.insert_product(&product)?;

    if !global.quiet {
        println!(
            "{} Created product {}",
            style("✓").green(),
            style(&product.sku).cyan()
        );
        println!(
            "   {} | {} | {}",
            style(&product.name).yellow(),
            product.category,
            format_money(product.base_price, ws.config.currency())
        );
    }
    Ok(())
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("sku", "SKU", 14),
    ColumnDef::new("name", "NAME", 30),
    ColumnDef::new("category", "CATEGORY", 16),
    ColumnDef::new("gender", "G", 3),
    ColumnDef::new("price", "PRICE", 10),
    ColumnDef::new("custom", "CUSTOM", 6),
    ColumnDef::new("active", "ACTIVE", 6),
];

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let filter = ProductFilter {
        category: args.category,
        gender: args.gender,
        customizable_only: args.customizable,
        search: args.search,
        include_inactive: args.all,
    };
    let products = ws.store.find_products(&filter)?;

    if print_structured(&products, global.format)? {
        return Ok(());
    }

    let rows = products.iter().map(|p| {
        TableRow::new(p.sku.clone())
            .cell("sku", CellValue::Id(p.sku.clone()))
            .cell("name", CellValue::Text(p.name.clone()))
            .cell("category", CellValue::Text(p.category.clone()))
            .cell("gender", CellValue::Text(p.gender.to_string()))
            .cell("price", CellValue::Money(p.base_price))
            .cell("custom", CellValue::Flag(p.customizable))
            .cell("active", CellValue::Flag(p.active))
    });
    TableFormatter::new(COLUMNS, "product")
        .quiet(global.quiet)
        .output(rows, global.format);
    Ok(())
}

/// A product together with its BOM, for structured output
#[derive(Serialize)]
struct ProductView {
    #[serde(flatten)]
    product: Product,
    bom: Vec<BomLine>,
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let product = ws.store.find_product(&args.product)?;
    let bom = ws.store.bom_lines(&product.id)?;
    print_record(&ProductView { product, bom }, global.format)
}

fn run_delete(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let product = ws.store.find_product(&args.product)?;
    ws.store.delete_product(&product.id)?;
    if !global.quiet {
        println!(
            "{} Deleted product {}",
            style("✓").green(),
            style(&product.sku).cyan()
        );
    }
    Ok(())
}

fn run_set_active(args: ShowArgs, active: bool, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let product = ws.store.find_product(&args.product)?;
    ws.store.set_product_active(&product.id, active)?;
    if !global.quiet {
        let state = if active { "Activated" } else { "Deactivated" };
        println!(
            "{} {} product {}",
            style("✓").green(),
            state,
            style(&product.sku).cyan()
        );
    }
    Ok(())
}

fn run_bom_add(args: BomAddArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let product = ws.store.find_product(&args.product)?;
    let material = ws.store.find_material(&args.material)?;

    let mut line = BomLine::new(
        product.id.clone(),
        material.id.clone(),
        args.component,
        args.qty,
    );
    line.notes = args.notes.unwrap_or_default();
    ws.store.insert_bom_line(&line)?;

    if !global.quiet {
        println!(
            "{} Added {} x {} ({}) to {}",
            style("✓").green(),
            line.quantity_required,
            style(&material.name).cyan(),
            line.component_name,
            style(&product.sku).cyan()
        );
    }
    Ok(())
}

fn run_bom_remove(args: BomRemoveArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let product = ws.store.find_product(&args.product)?;
    let material = ws.store.find_material(&args.material)?;
    let line = ws
        .store
        .bom_line(&product.id, &material.id, &args.component)?
        .ok_or_else(|| {
            Error::not_found(
                "BOM line",
                format!("{} / {} / {}", product.sku, material.name, args.component),
            )
        })?;
    ws.store.delete_bom_line(&line.id)?;

    if !global.quiet {
        println!(
            "{} Removed {} ({}) from {}",
            style("✓").green(),
            material.name,
            line.component_name,
            style(&product.sku).cyan()
        );
    }
    Ok(())
}

/// BOM cost report for structured output
#[derive(Serialize)]
struct CostReport {
    sku: String,
    lines: Vec<CostedLine>,
    unit_material_cost: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    production: Option<CostBreakdown>,
}

fn run_cost(args: CostArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let product = ws.store.find_product(&args.product)?;
    let service = CostingService::new(&ws.store);
    let lines = service.costed_bom(&product)?;
    let unit: Decimal = lines.iter().map(|l| l.line_cost).sum();
    let production = args
        .qty
        .map(|q| ProductionCostCalculator::default().breakdown(q, unit).rounded());

    let report = CostReport {
        sku: product.sku.clone(),
        lines,
        unit_material_cost: unit.round_dp(2),
        quantity: args.qty,
        production,
    };

    if matches!(global.format, OutputFormat::Json | OutputFormat::Yaml) {
        return print_record(&report, global.format);
    }

    let currency = ws.config.currency();
    let markdown = global.format == OutputFormat::Md;

    println!(
        "{} {}",
        style(&product.sku).cyan().bold(),
        style(&product.name).bold()
    );

    let mut builder = Builder::default();
    builder.push_record(["Component", "Material", "Qty", "Unit Cost", "Line Cost"]);
    for line in &report.lines {
        builder.push_record([
            line.component_name.clone(),
            truncate_str(&line.material_name, 30),
            line.quantity_required.normalize().to_string(),
            format_money(line.cost_per_unit, currency),
            format_money(line.line_cost, currency),
        ]);
    }
    println!("{}", render(builder, markdown));
    println!(
        "Material cost per pair: {}",
        style(format_money(report.unit_material_cost, currency)).bold()
    );

    if let (Some(qty), Some(costs)) = (report.quantity, report.production) {
        println!();
        let mut summary = Builder::default();
        summary.push_record(["Production (qty)".to_string(), qty.to_string()]);
        summary.push_record(["Material".to_string(), format_money(costs.material_cost, currency)]);
        summary.push_record(["Labor (20%)".to_string(), format_money(costs.labor_cost, currency)]);
        summary.push_record([
            "Overhead (10%)".to_string(),
            format_money(costs.overhead_cost, currency),
        ]);
        summary.push_record(["Total".to_string(), format_money(costs.total_cost, currency)]);
        println!("{}", render(summary, markdown));
    }
    Ok(())
}

fn render(builder: Builder, markdown: bool) -> String {
    let mut table = builder.build();
    if markdown {
        table.with(Style::markdown()).to_string()
    } else {
        table.with(Style::rounded()).to_string()
    }
}

fn run_price(args: PriceArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let product = ws.store.find_product(&args.product)?;
    if args.qty < product.minimum_order_quantity {
        tracing::warn!(
            sku = %product.sku,
            qty = args.qty,
            moq = product.minimum_order_quantity,
            "quantity below minimum order"
        );
    }
    let quote = pricing::quote(&product, args.qty, args.tier);

    match global.format {
        OutputFormat::Json | OutputFormat::Yaml => print_record(&quote, global.format),
        _ => {
            let currency = ws.config.currency();
            println!(
                "{} x {} @ {} = {}",
                quote.quantity,
                style(&quote.sku).cyan(),
                format_money(quote.unit_price, currency),
                style(format_money(quote.total, currency)).bold()
            );
            if let Some(tier) = quote.tier {
                println!(
                    "   {} tier, {}% off after bulk pricing (list {})",
                    tier,
                    tier.percent(),
                    format_money(quote.base_price, currency)
                );
            }
            Ok(())
        }
    }
}

fn run_allow_material(args: AllowMaterialArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let product = ws.store.find_product(&args.product)?;
    let material = ws.store.find_material(&args.material)?;
    ws.store.allow_material(&product.id, &material.id)?;
    if !global.quiet {
        println!(
            "{} {} may now use {}",
            style("✓").green(),
            style(&product.sku).cyan(),
            material.name
        );
    }
    Ok(())
}

fn run_allow_size(args: AllowSizeArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let product = ws.store.find_product(&args.product)?;
    let size = ws.store.size_entry_by_ref(&args.size)?;
    ws.store.allow_size(&product.id, &size.id)?;
    if !global.quiet {
        println!(
            "{} {} is now offered in {}",
            style("✓").green(),
            style(&product.sku).cyan(),
            args.size
        );
    }
    Ok(())
}
