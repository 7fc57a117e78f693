mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Extract(args) => {
            let config = Config::load()?;
            commands::extract::handle(args, &config)?;
        }

        Commands::Decode { input, output } => {
            commands::decode::handle(&input, &output)?;
        }

        Commands::Configure {
            input,
            output,
            catalog,
            reference_locale,
            show,
        } => {
            let settings = commands::configure::Settings {
                input,
                output,
                catalog,
                reference_locale,
            };
            commands::configure::handle(settings, show)?;
        }
    }

    Ok(())
}

/// Log to stderr; RUST_LOG wins over --verbose
fn init_logging(verbose: bool) {
    let default = if verbose {
        "aftermath=debug,aftermath_dvpl=debug,info"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
