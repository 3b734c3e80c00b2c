//! `fwc po` command - Production order management

use chrono::{Days, NaiveDate};
use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::commands::utils::{open_workspace, print_record, print_structured};
use crate::cli::helpers::{format_money, today};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::costing::CostingService;
use crate::core::error::Error;
use crate::core::identity::EntityId;
use crate::core::store::OrderFilter;
use crate::entities::production_order::{
    parse_breakdown_item, CostBreakdown, OrderStatus, ProductionOrder,
};

#[derive(Subcommand, Debug)]
pub enum PoCommands {
    /// Create a production order and compute its costs
    New(NewArgs),

    /// List production orders
    List(ListArgs),

    /// Show an order's details
    Show(NumberArgs),

    /// Move an order to a new status
    Status(StatusArgs),

    /// Recompute an order's costs
    Recalc(RecalcArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Product SKU or ID
    pub product: String,

    /// Number of pairs
    #[arg(long)]
    pub qty: u32,

    /// Pairs per size as LABEL=COUNT (repeatable; must add up to the quantity)
    #[arg(long = "size", value_parser = parse_breakdown_item)]
    pub sizes: Vec<(String, u32)>,

    /// Custom design this order produces
    #[arg(long)]
    pub design: Option<EntityId>,

    /// Expected completion date (default: today + product lead time)
    #[arg(long)]
    pub expected: Option<NaiveDate>,

    /// Explicit order number (default: allocated as POYYYYMMDDNNN)
    #[arg(long)]
    pub number: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only orders in this status
    #[arg(long, short = 's')]
    pub status: Option<OrderStatus>,

    /// Only orders that are not completed or cancelled
    #[arg(long)]
    pub open: bool,

    /// Only orders for this product (SKU or ID)
    #[arg(long, short = 'p')]
    pub product: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct NumberArgs {
    /// Order number (e.g. PO20261019001)
    pub number: String,
}

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Order number
    pub number: String,

    /// Target status (approved, in_production, quality_check, completed, cancelled)
    pub status: OrderStatus,
}

#[derive(clap::Args, Debug)]
pub struct RecalcArgs {
    /// Order number
    pub number: String,

    /// Discard the stored material cost and recompute from current prices
    #[arg(long)]
    pub force: bool,
}

pub fn run(cmd: PoCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        PoCommands::New(args) => run_new(args, global),
        PoCommands::List(args) => run_list(args, global),
        PoCommands::Show(args) => run_show(args, global),
        PoCommands::Status(args) => run_status(args, global),
        PoCommands::Recalc(args) => run_recalc(args, global),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let product = ws.store.find_product(&args.product)?;
    let today = today();

    if let Some(ref design_id) = args.design {
        let design = ws.store.design(design_id)?;
        if design.base_product_id != product.id {
            return Err(Error::validation(format!(
                "design {} is based on a different product than {}",
                design_id, product.sku
            ))
            .into());
        }
        if !design.approved {
            tracing::warn!(design = %design_id, "ordering a design that is not approved yet");
        }
    }
    if !product.active {
        tracing::warn!(sku = %product.sku, "ordering a product that is not active");
    }
    if args.qty < product.minimum_order_quantity {
        tracing::warn!(
            sku = %product.sku,
            qty = args.qty,
            moq = product.minimum_order_quantity,
            "quantity below minimum order"
        );
    }

    let expected = match args.expected {
        Some(date) => date,
        None => today
            .checked_add_days(Days::new(u64::from(product.production_time_days)))
            .ok_or_else(|| miette::miette!("production lead time is out of range"))?,
    };

    let mut order = ProductionOrder::new(product.id.clone(), args.qty, expected, ws.config.author());
    order.custom_design_id = args.design;
    order.order_number = args.number.unwrap_or_default();
    order.notes = args.notes.unwrap_or_default();
    for (label, count) in args.sizes {
        *order.size_breakdown.entry(label).or_insert(0) += count;
    }
    ws.store.create_order(&mut order, today)?;

    let costs = CostingService::new(&ws.store).recalculate(&order.order_number, false)?;

    if !global.quiet {
        println!(
            "{} Created production order {}",
            style("✓").green(),
            style(&order.order_number).cyan()
        );
        println!(
            "   {} x {} | due {} | total cost {}",
            order.quantity,
            style(&product.sku).yellow(),
            order.expected_completion,
            format_money(costs.rounded().total_cost, ws.config.currency())
        );
    }
    Ok(())
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("number", "ORDER", 14),
    ColumnDef::new("sku", "SKU", 14),
    ColumnDef::new("qty", "QTY", 6),
    ColumnDef::new("status", "STATUS", 14),
    ColumnDef::new("due", "DUE", 10),
    ColumnDef::new("total", "TOTAL COST", 12),
];

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let product_id = match args.product {
        Some(ref key) => Some(ws.store.find_product(key)?.id),
        None => None,
    };
    let filter = OrderFilter {
        status: args.status,
        product_id,
        open_only: args.open,
    };
    let orders = ws.store.list_orders(&filter)?;

    if print_structured(&orders, global.format)? {
        return Ok(());
    }

    let mut rows = Vec::with_capacity(orders.len());
    for order in &orders {
        let sku = ws.store.product(&order.product_id)?.sku;
        rows.push(
            TableRow::new(order.order_number.clone())
                .cell("number", CellValue::Id(order.order_number.clone()))
                .cell("sku", CellValue::Text(sku))
                .cell("qty", CellValue::Number(i64::from(order.quantity)))
                .cell("status", CellValue::Status(order.status))
                .cell("due", CellValue::Date(order.expected_completion))
                .cell("total", CellValue::Money(order.costs.total_cost)),
        );
    }
    TableFormatter::new(COLUMNS, "production order")
        .quiet(global.quiet)
        .output(rows, global.format);
    Ok(())
}

fn run_show(args: NumberArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let order = ws.store.order(&args.number)?;
    print_record(&order, global.format)
}

fn run_status(args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let mut order = ws.store.order(&args.number)?;
    let from = order.status;
    order.transition(args.status, today())?;
    ws.store.save_order(&mut order)?;

    if !global.quiet {
        println!(
            "{} {} {} -> {}",
            style("✓").green(),
            style(&order.order_number).cyan(),
            from,
            style(order.status).bold()
        );
    }
    Ok(())
}

fn run_recalc(args: RecalcArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let costs = CostingService::new(&ws.store).recalculate(&args.number, args.force)?;

    match global.format {
        OutputFormat::Json | OutputFormat::Yaml => print_record(&costs, global.format),
        _ => {
            print_breakdown(&args.number, &costs, ws.config.currency());
            Ok(())
        }
    }
}

fn print_breakdown(number: &str, costs: &CostBreakdown, currency: &str) {
    let costs = costs.rounded();
    println!("{}", style(number).cyan().bold());
    println!("  Material  {:>14}", format_money(costs.material_cost, currency));
    println!("  Labor     {:>14}", format_money(costs.labor_cost, currency));
    println!("  Overhead  {:>14}", format_money(costs.overhead_cost, currency));
    println!(
        "  {}     {:>14}",
        style("Total").bold(),
        format_money(costs.total_cost, currency)
    );
}
