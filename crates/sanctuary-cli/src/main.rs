mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sanctuary",
    about = "Event countdowns, seasonal theme and scripture lookup for a church site",
    version,
    propagate_version = true
)]
struct Cli {
    /// Site root (default: nearest directory with sanctuary.yaml)
    #[arg(long, global = true, env = "SANCTUARY_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter sanctuary.yaml
    Init {
        /// Site name (default: directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Show every event's countdown
    Events {
        /// Evaluate at this local time instead of now (e.g. 2025-12-24T18:00)
        #[arg(long, conflicts_with = "watch")]
        at: Option<String>,
        /// Re-render on every tick until Ctrl-C
        #[arg(long)]
        watch: bool,
    },

    /// Show the next upcoming or in-progress event
    Next {
        #[arg(long)]
        at: Option<String>,
    },

    /// Look up a verse by reference (e.g. "John 3:16")
    Verse {
        #[arg(required = true, num_args = 1..)]
        reference: Vec<String>,
    },

    /// Show the verse of the day
    Daily {
        #[arg(long)]
        at: Option<String>,
        /// Use the local rotation without contacting the provider
        #[arg(long)]
        offline: bool,
    },

    /// Correct and validate a verse reference without fetching it
    Reference {
        #[arg(required = true, num_args = 1..)]
        reference: Vec<String>,
    },

    /// Show the liturgical season and page theme
    Theme {
        #[arg(long)]
        at: Option<String>,
    },

    /// Inspect and validate sanctuary.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Events { watch: true, .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init { name } => cmd::init::run(&root, name.as_deref()),
        Commands::Events { at, watch } => cmd::events::run(&root, at.as_deref(), watch, cli.json),
        Commands::Next { at } => cmd::next::run(&root, at.as_deref(), cli.json),
        Commands::Verse { reference } => cmd::verse::run(&root, &reference.join(" "), cli.json),
        Commands::Daily { at, offline } => {
            cmd::daily::run(&root, at.as_deref(), offline, cli.json)
        }
        Commands::Reference { reference } => cmd::reference::run(&reference.join(" "), cli.json),
        Commands::Theme { at } => cmd::theme::run(at.as_deref(), cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
