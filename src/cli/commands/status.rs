//! `fwc status` command - Catalog and production dashboard

use std::collections::BTreeMap;

use console::style;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;

use crate::cli::commands::utils::{open_workspace, Workspace};
use crate::cli::helpers::format_money;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store::{CountedTable, OrderFilter};
use crate::entities::production_order::OrderStatus;

#[derive(serde::Serialize, Default)]
struct CatalogMetrics {
    size_charts: i64,
    materials: i64,
    categories: i64,
    products: i64,
    custom_designs: i64,
}

#[derive(serde::Serialize, Default)]
struct ProductionMetrics {
    total_orders: i64,
    open_orders: i64,
    by_status: BTreeMap<String, i64>,
    /// Sum of total cost over orders that were not cancelled
    production_value: Decimal,
}

pub fn run(global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let catalog = collect_catalog_metrics(&ws)?;
    let production = collect_production_metrics(&ws)?;

    if matches!(global.format, OutputFormat::Json) {
        let status = serde_json::json!({
            "project": ws.project.root(),
            "catalog": catalog,
            "production": production,
        });
        println!("{}", serde_json::to_string_pretty(&status).into_diagnostic()?);
        return Ok(());
    }

    let currency = ws.config.currency();
    println!("{}", style("Footwear Project Status").bold().underlined());
    println!("{}", "═".repeat(64));
    println!("  {}", style(ws.project.root().display()).dim());
    println!();

    let catalog_lines = vec![
        format!("Size charts:  {}", catalog.size_charts),
        format!("Materials:    {}", catalog.materials),
        format!("Categories:   {}", catalog.categories),
        format!("Products:     {}", catalog.products),
        format!("Designs:      {}", catalog.custom_designs),
    ];
    let mut production_lines = vec![
        format!("Orders:   {} ({} open)", production.total_orders, production.open_orders),
    ];
    for status in OrderStatus::all() {
        let count = production.by_status.get(status.as_str()).copied().unwrap_or(0);
        if count > 0 {
            production_lines.push(format!("  {:<15} {}", status.as_str(), count));
        }
    }
    print_two_columns("CATALOG", &catalog_lines, "PRODUCTION", &production_lines);

    println!();
    println!(
        "{} {}",
        style("Production value:").bold(),
        style(format_money(production.production_value, currency)).green()
    );
    Ok(())
}

fn collect_catalog_metrics(ws: &Workspace) -> Result<CatalogMetrics> {
    Ok(CatalogMetrics {
        size_charts: ws.store.count(CountedTable::SizeCharts)?,
        materials: ws.store.count(CountedTable::Materials)?,
        categories: ws.store.count(CountedTable::Categories)?,
        products: ws.store.count(CountedTable::Products)?,
        custom_designs: ws.store.count(CountedTable::CustomDesigns)?,
    })
}

fn collect_production_metrics(ws: &Workspace) -> Result<ProductionMetrics> {
    let mut metrics = ProductionMetrics::default();
    for (status, count) in ws.store.order_status_counts()? {
        metrics.total_orders += count;
        if !status.is_terminal() {
            metrics.open_orders += count;
        }
        metrics.by_status.insert(status.as_str().to_string(), count);
    }

    metrics.production_value = ws
        .store
        .list_orders(&OrderFilter::default())?
        .iter()
        .filter(|o| o.status != OrderStatus::Cancelled)
        .map(|o| o.costs.total_cost)
        .sum();
    Ok(metrics)
}

fn print_two_columns(title1: &str, lines1: &[String], title2: &str, lines2: &[String]) {
    let col_width = 32;

    println!("{:<col_width$} {}", style(title1).bold(), style(title2).bold());
    println!("{:-<col_width$} {:-<col_width$}", "", "");

    let max_lines = lines1.len().max(lines2.len());
    for i in 0..max_lines {
        let l1 = lines1.get(i).map(|s| s.as_str()).unwrap_or("");
        let l2 = lines2.get(i).map(|s| s.as_str()).unwrap_or("");
        println!("  {:<30} {}", l1, l2);
    }
}
