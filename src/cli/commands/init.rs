//! `fwc init` command - Initialize a new FWC project

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::core::project::{Project, ProjectError};
use crate::core::sample;
use crate::core::store::Store;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Force initialization even if .fwc/ already exists
    #[arg(long)]
    pub force: bool,

    /// Load the bundled starter catalog (categories, materials, size charts, products)
    #[arg(long)]
    pub sample: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    let project = if args.force {
        Project::init_force(&path)
    } else {
        Project::init(&path)
    };

    let project = match project {
        Ok(project) => project,
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} FWC project already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!("Use {} to reinitialize", style("fwc init --force").yellow());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    // Opening the store creates the database and applies the schema
    let store = Store::open(&project)?;
    println!(
        "{} Initialized FWC project at {}",
        style("✓").green(),
        style(project.root().display()).cyan()
    );

    if args.sample {
        let summary = sample::seed(&store)?;
        println!(
            "{} Loaded sample catalog: {} categories, {} materials, {} size charts ({} sizes), {} products",
            style("✓").green(),
            summary.categories,
            summary.materials,
            summary.charts,
            summary.sizes,
            summary.products
        );
    }

    println!();
    println!("Next steps:");
    if args.sample {
        println!(
            "  {} Convert a size between regions",
            style("fwc convert 10 --from US --to EU --gender M").yellow()
        );
        println!(
            "  {} Cost a product's bill of materials",
            style("fwc prd cost PRO-RUN-001").yellow()
        );
        println!(
            "  {} Start a production run",
            style("fwc po new PRO-RUN-001 --qty 10").yellow()
        );
    } else {
        println!(
            "  {} Create a size chart",
            style("fwc chart new US-M").yellow()
        );
        println!(
            "  {} Add a material",
            style("fwc mat new --name Canvas --type fabric --cost 8.50").yellow()
        );
        println!("  {} Show the dashboard", style("fwc status").yellow());
    }
    Ok(())
}
