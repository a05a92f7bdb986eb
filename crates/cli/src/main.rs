//! typescout CLI — the main entry point.
//!
//! Commands:
//! - `search`   — Filter the registry by text and tags
//! - `rank`     — Relevance-ranked types for a question
//! - `tags`     — Tag usage counts
//! - `show`     — Everything about one type
//! - `ask`      — Single-shot answer grounded in ranked types
//! - `explore`  — Iterative tool-using exploration, step by step
//! - `init`     — Write a default config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "typescout",
    about = "typescout — ask questions about an indexed codebase",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (default: ~/.typescout/config.toml)
    #[arg(long, global = true, env = "TYPESCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Catalog file to index (TOML or JSON)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search registered types by text and tags
    Search {
        /// Text matched against names, docstrings, notes and modules
        query: Option<String>,

        /// Restrict to types carrying this tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Require every tag instead of any
        #[arg(long)]
        all_tags: bool,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Rank types by relevance to a question
    Rank {
        query: String,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List tags with usage counts
    Tags,

    /// Show details of one type
    Show {
        /// Full path, e.g. app.services.UserService
        path: String,
    },

    /// Answer a question from the most relevant types
    Ask { question: String },

    /// Explore the codebase iteratively with tools
    Explore {
        question: String,

        /// Override the iteration ceiling
        #[arg(short, long)]
        max_iterations: Option<usize>,

        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.global.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let global = cli.global;
    match cli.command {
        Commands::Search {
            query,
            tags,
            all_tags,
            limit,
        } => commands::search::run(&global, query, tags, all_tags, limit).await?,
        Commands::Rank { query, limit } => commands::rank::run(&global, query, limit).await?,
        Commands::Tags => commands::tags::run(&global).await?,
        Commands::Show { path } => commands::show::run(&global, path).await?,
        Commands::Ask { question } => commands::ask::run(&global, question).await?,
        Commands::Explore {
            question,
            max_iterations,
            json,
        } => commands::explore::run(&global, question, max_iterations, json).await?,
        Commands::Init { force } => commands::init::run(&global, force).await?,
    }

    Ok(())
}
