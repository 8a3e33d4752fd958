mod command;

use std::path::{Path, PathBuf};

use anyhow::Context;
use cardfile_core::config::load_config;
use cardfile_rfc::rfc::vcard::ParseOptions;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cardfile")]
#[command(about = "Check, reformat and inspect vCard files", long_about = None)]
struct Cli {
    /// Skip the required-property check
    #[arg(long, global = true)]
    no_validate: bool,

    /// Keep properties the card's version does not define, as extensions
    #[arg(long, global = true)]
    keep_unsupported: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Parse files and report the first error in each
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Print a file in canonical form
    Fmt {
        file: PathBuf,

        /// Rewrite the file instead of printing it
        #[arg(long, short)]
        write: bool,
    },

    /// Print the parsed cards as JSON
    Dump { file: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config()?;

    tracing::debug!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping warn");
    }

    let mut options = ParseOptions::from(config.parser);
    if cli.no_validate {
        options.validate = false;
    }
    if cli.keep_unsupported {
        options.keep_unsupported = true;
    }

    match cli.command {
        Commands::Check { files } => {
            let mut failed = 0usize;
            for file in &files {
                let report = command::check(&read(file)?, options);
                if !report.is_valid() {
                    failed += 1;
                }
                println!("{}", report.describe(&file.display().to_string()));
            }
            if failed > 0 {
                anyhow::bail!("{failed} of {} file(s) failed", files.len());
            }
        }
        Commands::Fmt { file, write } => {
            let formatted = command::format(&read(&file)?, options)
                .with_context(|| format!("Failed to parse {}", file.display()))?;
            if write {
                std::fs::write(&file, formatted)
                    .with_context(|| format!("Failed to write {}", file.display()))?;
                tracing::info!(file = %file.display(), "Rewrote file");
            } else {
                print!("{formatted}");
            }
        }
        Commands::Dump { file } => {
            let json = command::dump(&read(&file)?, options)
                .with_context(|| format!("Failed to dump {}", file.display()))?;
            println!("{json}");
        }
    }

    Ok(())
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
