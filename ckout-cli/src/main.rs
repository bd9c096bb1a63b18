//! ckout
//!
//! Inspects and checks the configuration of the checkout service.

mod commands;
mod config;

use ckout_core::ConfigStore;
use clap::{Args as ClapArgs, Parser, Subcommand};
use commands::{Lookup, ValueKind};
use config::SettingsLoader;
use serde_json::Value;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// ckout - checkout configuration tool
#[derive(Parser, Debug)]
#[command(name = "ckout")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration files, read in order; later files override earlier ones
    #[arg(
        short,
        long = "config",
        env = "CKOUT_CONFIG",
        value_delimiter = ',',
        default_value = "./ckout.ini"
    )]
    config: Vec<PathBuf>,

    /// TOML file with default values
    #[arg(short, long)]
    defaults: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read one option as a typed value
    Get(GetArgs),
    /// List the options of a section
    Items { section: String },
    /// List the sections
    Sections,
    /// Load the checkout settings and report any configuration error
    Check,
}

#[derive(ClapArgs, Debug)]
struct GetArgs {
    section: String,
    option: String,

    /// Type to convert the value to
    #[arg(long = "as", value_enum, default_value_t = ValueKind::String)]
    kind: ValueKind,

    /// Fail when the option has no value and no default
    #[arg(long)]
    required: bool,

    /// Do not expand %(name)s references
    #[arg(long)]
    raw: bool,

    /// Substitute for an empty integer value
    #[arg(long, allow_negative_numbers = true)]
    default: Option<i64>,

    /// Smallest accepted integer
    #[arg(long, allow_negative_numbers = true)]
    min: Option<i64>,

    /// Largest accepted integer
    #[arg(long, allow_negative_numbers = true)]
    max: Option<i64>,
}

impl From<GetArgs> for Lookup {
    fn from(args: GetArgs) -> Self {
        Lookup {
            section: args.section,
            option: args.option,
            kind: args.kind,
            required: args.required,
            raw: args.raw,
            default: args.default,
            min: args.min,
            max: args.max,
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::debug!("Starting ckout v{}", env!("CARGO_PKG_VERSION"));

    let loader = SettingsLoader::new(args.config, args.defaults.as_ref());

    let output = match args.command {
        Command::Check => {
            let (_, settings) = loader.load().map_err(|e| {
                tracing::error!("Configuration check failed: {}", e);
                e
            })?;
            tracing::info!("Configuration is valid");
            if args.json {
                serde_json::to_value(&settings)?
            } else {
                let lines: Vec<String> = settings
                    .summary()
                    .into_iter()
                    .map(|(name, value)| format!("{name} = {value}"))
                    .collect();
                Value::String(lines.join("\n"))
            }
        }
        Command::Get(get) => commands::get(&load_store(&loader)?, &get.into())?,
        Command::Items { section } => commands::items(&load_store(&loader)?, &section)?,
        Command::Sections => commands::sections(&load_store(&loader)?),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", commands::render_text(&output));
    }

    Ok(())
}

fn load_store(loader: &SettingsLoader) -> anyhow::Result<ConfigStore> {
    loader.load_store().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e.into()
    })
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
