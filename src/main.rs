use clap::{Parser, ValueEnum};
use miette::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use fwc::cli::{Cli, Commands, GlobalOpts, OutputFormat};
use fwc::core::{Config, Project};

fn main() -> Result<()> {
    // Reset SIGPIPE so piping into `head` or `grep -q` terminates quietly
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let mut global = cli.global;
    init_logging(&global);
    apply_default_format(&mut global);

    match cli.command {
        Commands::Init(args) => fwc::cli::commands::init::run(args),
        Commands::Chart(cmd) => fwc::cli::commands::chart::run(cmd, &global),
        Commands::Convert(args) => fwc::cli::commands::convert::run(args, &global),
        Commands::Mat(cmd) => fwc::cli::commands::mat::run(cmd, &global),
        Commands::Cat(cmd) => fwc::cli::commands::cat::run(cmd, &global),
        Commands::Prd(cmd) => fwc::cli::commands::prd::run(cmd, &global),
        Commands::Design(cmd) => fwc::cli::commands::design::run(cmd, &global),
        Commands::Po(cmd) => fwc::cli::commands::po::run(cmd, &global),
        Commands::Status => fwc::cli::commands::status::run(&global),
        Commands::Completions(args) => fwc::cli::commands::completions::run(args),
    }
}

/// Logs go to stderr so they never mix with command output.
/// `FWC_LOG` takes an `EnvFilter` directive and wins over `--verbose`.
fn init_logging(global: &GlobalOpts) {
    let filter = EnvFilter::try_from_env("FWC_LOG").unwrap_or_else(|_| {
        if global.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Use the configured `default_format` when `--format` was left on auto
fn apply_default_format(global: &mut GlobalOpts) {
    if global.format != OutputFormat::Auto {
        return;
    }
    let project = match global.project {
        Some(ref path) => Project::discover_from(path).ok(),
        None => Project::discover().ok(),
    };
    let configured = Config::load_for(project.as_ref()).default_format;
    if let Some(name) = configured {
        match <OutputFormat as ValueEnum>::from_str(&name, true) {
            Ok(format) => global.format = format,
            Err(_) => tracing::warn!(format = %name, "ignoring unknown default_format in config"),
        }
    }
}
