use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use liner_resolve::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "liner", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a role taxonomy file (default: built-in table)
    #[arg(long, global = true)]
    taxonomy: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Parse one raw credit string into structured credits
    ///
    /// Splits the text into role fragments, classifies each role against the
    /// taxonomy and extracts the person names. Nothing is deduplicated or
    /// merged; use 'liner resolve' for that.
    ///
    /// Examples:
    ///
    ///   liner parse "Produced by DJ Premier, Mixed by Eddie Sancho"
    ///
    ///   liner parse --source rapedia "Réalisé par Kore & Skalp"
    Parse {
        /// The raw credit text
        text: String,

        /// Source the text came from
        #[arg(long, default_value = "manual")]
        source: String,

        /// Track the text applies to, when it comes from a release page
        #[arg(long)]
        scope: Option<String>,

        /// Print the full parse report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve credits from several sources into a canonical list
    ///
    /// Reads a JSON object keyed by source name. Each value is a list of
    /// records: a plain string, an object with a "text" field, or an object
    /// with structured "entries" of name/role pairs.
    ///
    ///   {
    ///     "discogs": [{"entries": [{"name": "DJ Premier", "role": "Producer"}]}],
    ///     "genius_web": ["Produced by DJ Premier"]
    ///   }
    ///
    /// Use '-' to read from stdin.
    Resolve {
        /// Input JSON file
        file: PathBuf,

        /// Track reference to label the output with
        #[arg(long, default_value = "track")]
        track: String,

        /// Print the canonical credits as JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect and manage the role taxonomy
    Taxonomy {
        #[command(subcommand)]
        action: TaxonomyAction,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum TaxonomyAction {
    /// List every canonical role with its category and aliases
    Show,
    /// Check a taxonomy file for errors
    Validate {
        /// File to check (default: the configured taxonomy)
        path: Option<PathBuf>,
    },
    /// Print the taxonomy in TOML form
    Export,
    /// Write the built-in taxonomy to the user config directory
    Init,
    /// Show the default taxonomy file path
    Path,
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print a single value, or the whole config file
    Get {
        /// Key to read
        key: Option<String>,
    },
    /// Set a value in the config file
    Set {
        /// Key to set (e.g. confidence_threshold, source_priority.discogs)
        key: String,
        /// New value
        value: String,
    },
    /// Show the config file path
    Path,
    /// Print an example configuration
    Example,
    /// Create the config file with defaults
    Init,
}

fn load_config(taxonomy: Option<PathBuf>) -> Result<Config> {
    match taxonomy {
        Some(path) => Config::load_with_taxonomy_path(path),
        None => Config::load(),
    }
}

fn run_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => commands::config::show_config(),
        ConfigAction::Get { key } => commands::config::get_config(key),
        ConfigAction::Set { key, value } => commands::config::set_config(&key, &value),
        ConfigAction::Path => commands::config::show_path(),
        ConfigAction::Example => commands::config::show_example(),
        ConfigAction::Init => commands::config::init_config(),
    }
}

fn run_taxonomy(action: TaxonomyAction, config: &Config) -> Result<()> {
    match action {
        TaxonomyAction::Show => commands::taxonomy::show_taxonomy(config),
        TaxonomyAction::Validate { path } => commands::taxonomy::validate_taxonomy(config, path),
        TaxonomyAction::Export => commands::taxonomy::export_taxonomy(config),
        TaxonomyAction::Init => commands::taxonomy::init_taxonomy(),
        TaxonomyAction::Path => commands::taxonomy::show_path(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        // Config commands must work even when the file on disk is broken.
        Commands::Config { action } => return run_config(action),
        command => command,
    };

    let config = load_config(cli.taxonomy)?;
    if let Err(e) = twyg::setup(config.logging.clone()) {
        eprintln!("Warning: could not set up logging: {}", e);
    }
    log::debug!("Loaded configuration: {:?}", config);

    match command {
        Commands::Parse {
            text,
            source,
            scope,
            json,
        } => {
            commands::run_parse(&config, &text, &source, scope, json)?;
        }
        Commands::Resolve { file, track, json } => {
            commands::run_resolve(&config, &file, &track, json)?;
        }
        Commands::Taxonomy { action } => run_taxonomy(action, &config)?,
        Commands::Config { action } => run_config(action)?,
    }

    Ok(())
}
