//! `fwc cat` command - Product category management

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::commands::utils::{open_workspace, print_structured};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::entities::category::{slugify, Category};

#[derive(Subcommand, Debug)]
pub enum CatCommands {
    /// Create a category
    New(NewArgs),

    /// List categories
    List,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Category name (e.g. "Athletic Shoes")
    pub name: String,

    /// Slug (default: derived from the name)
    #[arg(long)]
    pub slug: Option<String>,

    /// Parent category slug
    #[arg(long, short = 'p')]
    pub parent: Option<String>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

pub fn run(cmd: CatCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CatCommands::New(args) => run_new(args, global),
        CatCommands::List => run_list(global),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let slug = args.slug.unwrap_or_else(|| slugify(&args.name));
    if slug.is_empty() {
        return Err(miette::miette!("cannot derive a slug from '{}'; pass --slug", args.name));
    }

    let mut category = Category::new(args.name, slug);
    category.parent = args.parent;
    category.description = args.description.unwrap_or_default();
    ws.store.insert_category(&category)?;

    if !global.quiet {
        println!(
            "{} Created category {} ({})",
            style("✓").green(),
            style(&category.slug).cyan(),
            category.name
        );
    }
    Ok(())
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("slug", "SLUG", 20),
    ColumnDef::new("name", "NAME", 24),
    ColumnDef::new("parent", "PARENT", 20),
];

fn run_list(global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let categories = ws.store.list_categories()?;

    if print_structured(&categories, global.format)? {
        return Ok(());
    }

    let rows = categories.iter().map(|c| {
        TableRow::new(c.slug.clone())
            .cell("slug", CellValue::Id(c.slug.clone()))
            .cell("name", CellValue::Text(c.name.clone()))
            .cell(
                "parent",
                c.parent
                    .clone()
                    .map(CellValue::Text)
                    .unwrap_or(CellValue::Empty),
            )
    });
    TableFormatter::new(COLUMNS, "category")
        .quiet(global.quiet)
        .output(rows, global.format);
    Ok(())
}
