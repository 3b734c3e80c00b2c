//! `fwc chart` command - Size chart management

use std::path::PathBuf;

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cli::commands::utils::{open_workspace, print_record, print_structured};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store::Store;
use crate::entities::size_chart::{ChartKey, SizeChart, SizeEntry};

#[derive(Subcommand, Debug)]
pub enum ChartCommands {
    /// Create a size chart for a region and gender
    New(NewArgs),

    /// List size charts
    List,

    /// Show a chart and its sizes
    Show(ShowArgs),

    /// Add a size to a chart
    AddSize(AddSizeArgs),

    /// Import sizes from a CSV file (columns: size,length_mm[,width_mm])
    Import(ImportArgs),

    /// Delete a chart and all of its sizes
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Chart key as REGION-GENDER (e.g. US-M, EU-U)
    pub key: ChartKey,

    /// Display name (default: derived from the key)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Chart key as REGION-GENDER
    pub key: ChartKey,
}

#[derive(clap::Args, Debug)]
pub struct AddSizeArgs {
    /// Chart key as REGION-GENDER
    pub key: ChartKey,

    /// Size label (e.g. 9.5, 42)
    pub label: String,

    /// Foot length in millimetres
    #[arg(long, short = 'l')]
    pub length: Decimal,

    /// Foot width in millimetres
    #[arg(long, short = 'w')]
    pub width: Option<Decimal>,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Chart key as REGION-GENDER
    pub key: ChartKey,

    /// CSV file with a header row
    pub file: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Chart key as REGION-GENDER
    pub key: ChartKey,
}

pub fn run(cmd: ChartCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ChartCommands::New(args) => run_new(args, global),
        ChartCommands::List => run_list(global),
        ChartCommands::Show(args) => run_show(args, global),
        ChartCommands::AddSize(args) => run_add_size(args, global),
        ChartCommands::Import(args) => run_import(args, global),
        ChartCommands::Delete(args) => run_delete(args, global),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let name = args.name.unwrap_or_else(|| {
        format!(
            "{} {} Sizes",
            args.key.region.as_str(),
            gender_name(&args.key)
        )
    });
    let mut chart = SizeChart::new(name, args.key.region, args.key.gender);
    chart.description = args.description.unwrap_or_default();
    ws.store.insert_chart(&chart)?;

    if !global.quiet {
        println!(
            "{} Created size chart {} ({})",
            style("✓").green(),
            style(chart.key()).cyan(),
            chart.name
        );
    }
    Ok(())
}

fn gender_name(key: &ChartKey) -> &'static str {
    use crate::entities::size_chart::Gender;
    match key.gender {
        Gender::Men => "Men",
        Gender::Women => "Women",
        Gender::Kids => "Kids",
        Gender::Unisex => "Unisex",
    }
}

const CHART_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("key", "KEY", 8),
    ColumnDef::new("name", "NAME", 30),
    ColumnDef::new("region", "REGION", 16),
    ColumnDef::new("sizes", "SIZES", 6),
];

fn run_list(global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let charts = ws.store.list_charts()?;

    if print_structured(&charts, global.format)? {
        return Ok(());
    }

    let mut rows = Vec::with_capacity(charts.len());
    for chart in &charts {
        let sizes = ws.store.size_entries(&chart.id)?.len();
        rows.push(
            TableRow::new(chart.key().to_string())
                .cell("key", CellValue::Id(chart.key().to_string()))
                .cell("name", CellValue::Text(chart.name.clone()))
                .cell("region", CellValue::Text(chart.region.label().to_string()))
                .cell("sizes", CellValue::Number(sizes as i64)),
        );
    }
    TableFormatter::new(CHART_COLUMNS, "size chart")
        .quiet(global.quiet)
        .output(rows, global.format);
    Ok(())
}

/// A chart with its entries, for structured output
#[derive(Serialize)]
struct ChartView {
    #[serde(flatten)]
    chart: SizeChart,
    sizes: Vec<SizeEntry>,
}

const SIZE_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("label", "SIZE", 8),
    ColumnDef::new("length", "LENGTH MM", 10),
    ColumnDef::new("width", "WIDTH MM", 10),
];

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let chart = ws.store.chart(args.key)?;
    let sizes = ws.store.size_entries(&chart.id)?;

    match global.format {
        OutputFormat::Json | OutputFormat::Yaml => {
            print_record(&ChartView { chart, sizes }, global.format)
        }
        format => {
            if matches!(format, OutputFormat::Auto | OutputFormat::Tsv) {
                println!(
                    "{} {}",
                    style(chart.key()).cyan().bold(),
                    style(&chart.name).bold()
                );
                if !chart.description.is_empty() {
                    println!("{}", style(&chart.description).dim());
                }
                println!();
            }
            let rows = sizes.iter().map(|e| {
                TableRow::new(e.label.clone())
                    .cell("label", CellValue::Text(e.label.clone()))
                    .cell("length", CellValue::Measure(e.length_mm))
                    .cell(
                        "width",
                        e.width_mm.map(CellValue::Measure).unwrap_or(CellValue::Empty),
                    )
            });
            TableFormatter::new(SIZE_COLUMNS, "size")
                .quiet(global.quiet)
                .output(rows, format);
            Ok(())
        }
    }
}

fn run_add_size(args: AddSizeArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let chart = ws.store.chart(args.key)?;
    let entry = SizeEntry::new(chart.id.clone(), args.label, args.length).with_width(args.width);
    ws.store.insert_size_entry(&entry)?;

    if !global.quiet {
        println!(
            "{} Added size {} to {} ({} mm)",
            style("✓").green(),
            style(&entry.label).cyan(),
            chart.key(),
            entry.length_mm
        );
    }
    Ok(())
}

/// One row of a size import file
#[derive(Debug, Deserialize)]
struct ImportRow {
    size: String,
    length_mm: String,
    #[serde(default)]
    width_mm: Option<String>,
}

/// Parse size entries for `chart` from CSV data with a header row
fn read_import<R: std::io::Read>(chart: &SizeChart, input: R) -> Result<Vec<SizeEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut entries = Vec::new();
    for (idx, record) in reader.deserialize::<ImportRow>().enumerate() {
        let line = idx + 2;
        let row = record.map_err(|e| miette::miette!("line {}: {}", line, e))?;
        let length: Decimal = row
            .length_mm
            .parse()
            .map_err(|_| miette::miette!("line {}: invalid length '{}'", line, row.length_mm))?;
        let width = match row.width_mm.as_deref() {
            None | Some("") => None,
            Some(w) => Some(
                w.parse::<Decimal>()
                    .map_err(|_| miette::miette!("line {}: invalid width '{}'", line, w))?,
            ),
        };
        entries.push(SizeEntry::new(chart.id.clone(), row.size, length).with_width(width));
    }
    Ok(entries)
}

fn import_entries(store: &Store, entries: &[SizeEntry]) -> Result<usize> {
    store.insert_size_entries(entries)?;
    Ok(entries.len())
}

fn run_import(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let chart = ws.store.chart(args.key)?;
    let file = std::fs::File::open(&args.file).into_diagnostic()?;
    let entries = read_import(&chart, file)?;
    let count = import_entries(&ws.store, &entries)?;

    if !global.quiet {
        println!(
            "{} Imported {} size(s) into {}",
            style("✓").green(),
            style(count).cyan(),
            chart.key()
        );
    }
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    ws.store.delete_chart(args.key)?;
    if !global.quiet {
        println!("{} Deleted size chart {}", style("✓").green(), args.key);
    }
    Ok(())
}
