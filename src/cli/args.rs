//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    cat::CatCommands, chart::ChartCommands, completions::CompletionsArgs, convert::ConvertArgs,
    design::DesignCommands, init::InitArgs, mat::MatCommands, po::PoCommands, prd::PrdCommands,
};

#[derive(Parser)]
#[command(name = "fwc")]
#[command(author, version, about = "FootwearCraft - footwear catalog and production toolkit")]
#[command(long_about = "Manage size charts, materials, products and their bills of materials, \
    convert shoe sizes between regions, and cost production orders.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose (debug) logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .fwc/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new FWC project
    Init(InitArgs),

    /// Size chart management
    #[command(subcommand)]
    Chart(ChartCommands),

    /// Convert a shoe size between regions
    Convert(ConvertArgs),

    /// Material catalog management
    #[command(subcommand)]
    Mat(MatCommands),

    /// Product category management
    #[command(subcommand)]
    Cat(CatCommands),

    /// Product, BOM and pricing management
    #[command(subcommand)]
    Prd(PrdCommands),

    /// Custom design management
    #[command(subcommand)]
    Design(DesignCommands),

    /// Production order management
    #[command(subcommand)]
    Po(PoCommands),

    /// Show project status dashboard
    Status,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (yaml for show, tsv for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}
