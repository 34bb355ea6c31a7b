//! bookshelf CLI
//!
//! Command-line front end for browsing, searching, and maintaining a
//! personal digital library catalog.

mod commands;
mod error;
mod settings;

use std::io::Write;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

pub(crate) use error::CliError;

use commands::browse::{run_browse, run_categories, run_subjects};
use commands::config::{run_config_init, run_config_path, run_config_show};
use commands::maintenance::{run_normalize_flat, run_seed, run_upgrade};
use commands::open::run_open;
use commands::search::{FindArgs, run_find, run_search};
use commands::stats::run_stats;
use commands::validate::run_validate;

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(about = "Browse and search a personal digital library catalog", long_about = None)]
struct Cli {
    /// Catalog database (defaults to the settings file, then Assets/my_library.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Directory holding book files
    #[arg(long, global = true)]
    books_dir: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Print listings as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List categories with their book counts
    Categories,

    /// List the subjects of a category
    Subjects {
        /// Category name (case-insensitive)
        category: String,
    },

    /// Show the books in a category, optionally narrowed to a subject
    Browse {
        /// Category name (case-insensitive)
        category: String,

        /// Subject within the category
        #[arg(short, long)]
        subject: Option<String>,
    },

    /// Search titles for a substring (at least 2 characters)
    Search {
        term: String,
    },

    /// Search with combined filters
    Find {
        /// Free text matched against title, author, subject, and keywords
        #[arg(short, long)]
        text: Option<String>,

        /// Restrict to these categories
        #[arg(short, long, value_delimiter = ',')]
        category: Vec<String>,

        /// Restrict to these authors (exact name, else substring)
        #[arg(short, long, value_delimiter = ',')]
        author: Vec<String>,

        /// Restrict to these subjects
        #[arg(short, long, value_delimiter = ',')]
        subject: Vec<String>,

        /// Minimum rating (0-5)
        #[arg(long)]
        min_rating: Option<i64>,

        /// Maximum rating (0-5)
        #[arg(long)]
        max_rating: Option<i64>,

        /// Sort by title, author, category, or subject
        #[arg(long)]
        sort: Option<String>,

        /// Sort order: asc or desc
        #[arg(long)]
        order: Option<String>,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<u32>,

        /// Results to skip (only with --limit)
        #[arg(long)]
        offset: Option<u32>,

        /// Also match free text against descriptions
        #[arg(long)]
        description: bool,
    },

    /// Open a book in the system viewer
    Open {
        /// Exact book title
        title: String,
    },

    /// Show library statistics
    Stats,

    /// Check database integrity and that book files exist
    Validate {
        /// Only check files of books in this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Load categories, subjects, and books from a YAML file or directory
    Seed {
        /// Seed file or directory of seed files
        path: PathBuf,
    },

    /// Link books stored with text category/subject columns to real rows
    NormalizeFlat,

    /// Add optional book columns missing from an older database
    Upgrade,

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show effective library locations and their sources
    Show,

    /// Print the settings file path
    Path,

    /// Write the effective locations to a new settings file
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

/// Log an empty line at info level.
pub(crate) fn log_blank() {
    log::info!("");
}

fn init_logger(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => log::LevelFilter::Warn,
        (false, 0) => log::LevelFilter::Info,
        (false, 1) => log::LevelFilter::Debug,
        (false, _) => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "[{}] {}", level, record.args()),
        })
        .target(env_logger::Target::Stdout)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let library = settings::load_settings().resolve(cli.db, cli.books_dir, &base);
    let json = cli.json;

    let result = match cli.command {
        Commands::Categories => run_categories(&library, json),
        Commands::Subjects { category } => run_subjects(&library, &category, json),
        Commands::Browse { category, subject } => {
            run_browse(&library, &category, subject.as_deref(), json)
        }
        Commands::Search { term } => run_search(&library, &term, json),
        Commands::Find {
            text,
            category,
            author,
            subject,
            min_rating,
            max_rating,
            sort,
            order,
            limit,
            offset,
            description,
        } => run_find(
            &library,
            FindArgs {
                text,
                categories: category,
                authors: author,
                subjects: subject,
                min_rating,
                max_rating,
                sort,
                order,
                limit,
                offset,
                description,
            },
            json,
        ),
        Commands::Open { title } => run_open(&library, &title),
        Commands::Stats => run_stats(&library, json),
        Commands::Validate { category } => run_validate(&library, category.as_deref()),
        Commands::Seed { path } => run_seed(&library, &path),
        Commands::NormalizeFlat => run_normalize_flat(&library),
        Commands::Upgrade => run_upgrade(&library),
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                run_config_show(&library);
                Ok(())
            }
            ConfigAction::Path => {
                run_config_path();
                Ok(())
            }
            ConfigAction::Init { force } => run_config_init(&library, force),
        },
    };

    if let Err(e) = result {
        eprintln!(
            "{} {}",
            "error:".if_supports_color(Stderr, |t| t.red()),
            e
        );
        std::process::exit(1);
    }
}
