//! Shared utilities for CLI commands

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::project::Project;
use crate::core::store::Store;
use crate::core::Config;

/// Everything a command needs to work on the current project
pub struct Workspace {
    pub project: Project,
    pub store: Store,
    pub config: Config,
}

/// Locate the project (from `--project` or the working directory) and open its store
pub fn open_workspace(global: &GlobalOpts) -> Result<Workspace> {
    let project = match global.project {
        Some(ref path) => Project::discover_from(path)?,
        None => Project::discover()?,
    };
    let store = Store::open(&project)?;
    let config = Config::load_for(Some(&project));
    tracing::debug!(root = %project.root().display(), "opened project");
    Ok(Workspace {
        project,
        store,
        config,
    })
}

/// Print a single record in the requested format (YAML unless JSON is asked for)
pub fn print_record<T: Serialize>(record: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(record).into_diagnostic()?);
        }
        _ => {
            print!("{}", serde_yml::to_string(record).into_diagnostic()?);
        }
    }
    Ok(())
}

/// Print a list of records as JSON or YAML; returns false for table formats
pub fn print_structured<T: Serialize>(records: &[T], format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records).into_diagnostic()?);
            Ok(true)
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(records).into_diagnostic()?);
            Ok(true)
        }
        _ => Ok(false),
    }
}
