//! `fwc convert` command - Convert a shoe size between regions

use console::style;
use miette::Result;

use crate::cli::commands::utils::{open_workspace, print_record};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::sizing::{self, ConversionFailure, SizeConversionRequest};
use crate::entities::size_chart::{Gender, Region};

#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// Size label in the source region (e.g. 10)
    pub size: String,

    /// Source region (US, EU, UK, JP, CN)
    #[arg(long)]
    pub from: Region,

    /// Target region
    #[arg(long)]
    pub to: Region,

    /// Chart gender (M, W, K, U)
    #[arg(long, short = 'g', default_value = "U")]
    pub gender: Gender,
}

pub fn run(args: ConvertArgs, global: &GlobalOpts) -> Result<()> {
    let ws = open_workspace(global)?;
    let request = SizeConversionRequest {
        size: args.size,
        from: args.from,
        to: args.to,
        gender: args.gender,
    };

    match sizing::convert(&ws.store, &request) {
        Ok(conversion) => match global.format {
            OutputFormat::Json | OutputFormat::Yaml => print_record(&conversion, global.format),
            OutputFormat::Id => {
                println!("{}", conversion.converted_size);
                Ok(())
            }
            _ => {
                println!(
                    "{} {} {} = {} {} ({} mm)",
                    style("✓").green(),
                    conversion.from_region,
                    style(&conversion.from_size).cyan(),
                    conversion.to_region,
                    style(&conversion.converted_size).cyan().bold(),
                    conversion.length_mm
                );
                Ok(())
            }
        },
        Err(e) if e.is_not_found() => {
            tracing::debug!(error = %e, "conversion lookup failed");
            if matches!(global.format, OutputFormat::Json | OutputFormat::Yaml) {
                print_record(&ConversionFailure::not_found(), global.format)?;
            }
            Err(miette::miette!(
                code = "fwc::convert::not_found",
                help = "sizes convert only when both charts list exactly the same foot length",
                "Size conversion not found: {}",
                e
            ))
        }
        Err(e) => Err(e.into()),
    }
}
