//! Stackforge - a declarative AWS stack synthesizer
//!
//! This is the main entry point for the Stackforge CLI.

use anyhow::Result;
use colored::Colorize;
use stackforge::cli::{Cli, Commands, SynthArgs};
use stackforge::context::{SynthContext, ValidationMode};
use stackforge::prelude::synthesize;
use stackforge::settings::GlobalSettings;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(cli.verbosity());

    if cli.no_color {
        colored::control::set_override(false);
    }

    let context = SynthContext::resolve(cli.context_file.as_deref(), &cli.context)?;
    let settings = GlobalSettings::new();

    let exit_code = match &cli.command {
        Commands::Synth(args) => run_synth(context, settings, args)?,
        Commands::Validate(_) => run_validate(context, settings),
    };

    std::process::exit(exit_code);
}

/// Initialize logging based on verbosity level
fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stackforge={default_level}")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Build the composition and write the manifest to stdout or a file.
fn run_synth(context: SynthContext, settings: GlobalSettings, args: &SynthArgs) -> Result<i32> {
    let manifest = synthesize(context, settings)?;
    let rendered = manifest.to_json_pretty()?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            eprintln!(
                "{} {} ({} resources, {} outputs)",
                "Wrote".green().bold(),
                path.display(),
                manifest.resources.len(),
                manifest.outputs.len()
            );
        }
        None => print!("{rendered}"),
    }

    Ok(0)
}

/// Build the composition in strict validation mode and report findings.
fn run_validate(mut context: SynthContext, settings: GlobalSettings) -> i32 {
    context.validation = ValidationMode::Strict;

    match synthesize(context, settings) {
        Ok(manifest) => {
            eprintln!(
                "{} {} resources, {} outputs",
                "Declaration is valid:".green().bold(),
                manifest.resources.len(),
                manifest.outputs.len()
            );
            0
        }
        Err(e) => {
            eprintln!("{} {e}", "Validation failed:".red().bold());
            1
        }
    }
}
