//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod admin;
pub mod config;
pub mod engage;
pub mod post;
pub mod render;
pub mod show;
pub mod workspace;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// avalia - threaded comments, votes and moderation for course reviews
#[derive(Debug, Parser)]
#[command(name = "avalia")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Directory holding comments.json and bans.json
    #[arg(long, global = true, env = "AVALIA_DATA_DIR", default_value = ".avalia")]
    pub data_dir: PathBuf,

    /// Act as this user
    #[arg(long = "as", global = true, env = "AVALIA_USER", value_name = "USER")]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOpts {
    pub config: Option<PathBuf>,
    pub data_dir: PathBuf,
    pub user: Option<String>,
}

impl From<&Cli> for GlobalOpts {
    fn from(cli: &Cli) -> Self {
        Self {
            config: cli.config.clone(),
            data_dir: cli.data_dir.clone(),
            user: cli.user.clone(),
        }
    }
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Post a comment on a discipline or professor
    Post(post::PostArgs),

    /// Reply to a comment
    Reply(post::ReplyArgs),

    /// Edit one of your comments
    Edit(engage::EditArgs),

    /// Vote a comment up or down (repeat to withdraw)
    Vote(engage::VoteArgs),

    /// Report a comment as abusive
    Report(engage::ReportArgs),

    /// Delete one of your comments and its replies
    Delete(engage::DeleteArgs),

    /// Show a comment thread
    Show(show::ShowArgs),

    /// Show the comment feed of a discipline or professor
    Feed(show::FeedArgs),

    /// Moderation tools
    #[command(subcommand)]
    Admin(admin::AdminCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let opts = GlobalOpts::from(&cli);

    // Dispatch to command handler
    match cli.command {
        Commands::Post(args) => post::execute_post(&opts, args),
        Commands::Reply(args) => post::execute_reply(&opts, args),
        Commands::Edit(args) => engage::execute_edit(&opts, args),
        Commands::Vote(args) => engage::execute_vote(&opts, args),
        Commands::Report(args) => engage::execute_report(&opts, args),
        Commands::Delete(args) => engage::execute_delete(&opts, args),
        Commands::Show(args) => show::execute_show(&opts, args),
        Commands::Feed(args) => show::execute_feed(&opts, args),
        Commands::Admin(cmd) => admin::execute(&opts, cmd),
        Commands::Config(cmd) => config::execute(&opts, cmd),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
