use clap::{Parser, Subcommand};
use common::{AppState, Config};
use records::{DEFAULT_CATEGORIES, SortDirection, SortKey};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod handlers;

#[derive(Debug, Parser)]
#[command(name = "finance", author, version, about = "Personal finance tracker", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Args)]
pub struct RecordArgs {
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub amount: String,
    #[arg(long, value_parser = clap::builder::PossibleValuesParser::new(DEFAULT_CATEGORIES))]
    pub category: String,
    /// Defaults to today.
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, clap::Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub amount: Option<String>,
    #[arg(long, value_parser = clap::builder::PossibleValuesParser::new(DEFAULT_CATEGORIES))]
    pub category: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Record a new transaction
    Add(RecordArgs),
    /// Change an existing transaction; only the given fields are checked, the rest keep their stored value
    Update {
        id: String,
        #[command(flatten)]
        fields: UpdateArgs,
    },
    /// Remove a transaction
    Delete { id: String },
    /// Print one transaction
    Show { id: String },
    /// List transactions in the active order
    List {
        /// Only show records matching this pattern
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        case_sensitive: bool,
    },
    /// Search descriptions, categories, amounts and dates
    Search {
        pattern: String,
        #[arg(long)]
        case_sensitive: bool,
        /// Mark matches in the description with <mark> tags
        #[arg(long)]
        highlight: bool,
    },
    /// Check whether a search pattern compiles
    CheckPattern { pattern: String },
    /// Change the active sort order
    Sort {
        key: SortKey,
        #[arg(default_value = "asc")]
        direction: SortDirection,
    },
    /// Totals, averages and top categories
    Stats,
    /// Daily totals around today
    Trend,
    /// Spending against the budget cap
    Budget,
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: handlers::settings::SettingsCommand,
    },
    /// Show, set or toggle the theme (light, dark, toggle)
    Theme { mode: Option<String> },
    /// Replace all transactions with the contents of a JSON file
    Import { file: PathBuf },
    /// Write all transactions to a JSON file
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete every transaction
    Clear,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment overrides from .env, if any
    dotenvy::dotenv().ok();

    // 2. Initialize Logging (stderr, so command output stays clean)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // 3. Parse arguments
    let cli = Cli::parse();
    tracing::debug!("Using data directory {}", cli.config.data_dir.display());

    // 4. Load state
    let mut state = AppState::open(cli.config)?;

    // 5. Dispatch
    match cli.command {
        Command::Add(args) => handlers::records::add(&mut state, args),
        Command::Update { id, fields } => handlers::records::update(&mut state, &id, fields),
        Command::Delete { id } => handlers::records::delete(&mut state, &id),
        Command::Show { id } => handlers::records::show(&state, &id),
        Command::List { search, case_sensitive } => {
            handlers::records::list(&state, search.as_deref(), case_sensitive)
        }
        Command::Search { pattern, case_sensitive, highlight } => {
            handlers::records::search(&state, &pattern, case_sensitive, highlight)
        }
        Command::CheckPattern { pattern } => handlers::records::check_pattern(&pattern),
        Command::Sort { key, direction } => handlers::records::sort(&mut state, key, direction),
        Command::Stats => handlers::reports::stats(&state),
        Command::Trend => handlers::reports::trend(&state),
        Command::Budget => handlers::reports::budget(&state),
        Command::Settings { action } => handlers::settings::run(&mut state, action),
        Command::Theme { mode } => handlers::settings::theme(&mut state, mode.as_deref()),
        Command::Import { file } => handlers::records::import(&mut state, &file),
        Command::Export { out } => handlers::records::export(&state, out),
        Command::Clear => handlers::records::clear(&mut state),
    }
}
