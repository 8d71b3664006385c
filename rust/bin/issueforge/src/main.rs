//! `issueforge`: the IssueForge command-line client.
//!
//! One-shot commands (`list`, `add`, `edit`, `delete`) or an interactive
//! board (`shell`) against a running `issueforged`.

mod commands;
mod config;
mod table;

use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;

use commands::issues::{self, OutputFormat};
use commands::{FormArgs, Prompt};
use config::ClientConfig;
use issueforge_client::{Board, HttpIssueApi, StatusFilter};

/// IssueForge CLI.
#[derive(Parser, Debug)]
#[command(name = "issueforge", about = "IssueForge command-line client")]
struct Cli {
    /// Path to client config file (default: ~/.issueforge/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    /// Server root URL; overrides the config file.
    #[arg(long = "server", env = "ISSUEFORGE_SERVER", global = true)]
    server: Option<String>,

    /// Output format for `list`.
    #[arg(long = "output", short = 'o', global = true, value_enum, default_value_t)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List issues, newest first.
    List {
        /// Only issues with this status (All, New, "In Progress", Fixed, Closed).
        #[arg(long, value_parser = parse_filter)]
        status: Option<StatusFilter>,
        /// Only issues whose owner contains this text (any case).
        #[arg(long)]
        owner: Option<String>,
    },

    /// Create an issue. Prompts for every field when no flags are given.
    Add {
        #[command(flatten)]
        fields: FormArgs,
    },

    /// Edit an issue. Prompts with current values when no flags are given.
    Edit {
        /// Issue ID (a unique prefix is enough).
        id: String,
        #[command(flatten)]
        fields: FormArgs,
    },

    /// Delete an issue.
    Delete {
        /// Issue ID (a unique prefix is enough).
        id: String,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Interactive board.
    Shell,

    /// Check server status.
    Status,

    /// Client settings.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Remember the server URL.
    SetServer { url: String },
    /// Print the effective settings.
    Show,
}

fn parse_filter(s: &str) -> Result<StatusFilter, String> {
    StatusFilter::parse(s).ok_or_else(|| format!("unknown status {s:?}"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(ClientConfig::default_path);
    let mut config = ClientConfig::load(&config_path)
        .with_context(|| format!("failed to read {}", config_path.display()))?;
    let server = config.server_url(cli.server.as_deref());
    let color = io::stdout().is_terminal();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut prompt = Prompt::new(BufReader::new(io::stdin()), io::stderr());

    let connect = || -> anyhow::Result<Board<HttpIssueApi>> {
        let api = HttpIssueApi::new(&server)?;
        tracing::debug!("using server {}", api.base_url());
        Ok(Board::new(api))
    };

    match cli.command {
        Commands::List { status, owner } => {
            let mut board = connect()?;
            board.refresh().context("Failed to load issues")?;
            issues::apply_filters(&mut board, status, owner);
            issues::list(&board, cli.output, color, &mut out)?;
        }

        Commands::Add { fields } => {
            let mut board = connect()?;
            issues::add(&mut board, fields, &mut prompt, &mut out)?;
        }

        Commands::Edit { id, fields } => {
            let mut board = connect()?;
            board.refresh().context("Failed to load issues")?;
            issues::edit(&mut board, &id, fields, &mut prompt, &mut out)?;
        }

        Commands::Delete { id, yes } => {
            let mut board = connect()?;
            board.refresh().context("Failed to load issues")?;
            issues::delete(&mut board, &id, yes, &mut prompt, &mut out)?;
        }

        Commands::Shell => {
            let mut board = connect()?;
            // The shell owns the terminal; everything goes to stdout.
            let mut prompt = Prompt::new(BufReader::new(io::stdin()), io::stdout());
            commands::shell::run(&mut board, &mut prompt, color)?;
        }

        Commands::Status => {
            let api = HttpIssueApi::new(&server)?;
            issues::status(&api, &mut out)?;
        }

        Commands::Config { action } => match action {
            ConfigAction::SetServer { url } => {
                HttpIssueApi::new(&url)?;
                config.server = url.trim().trim_end_matches('/').to_string();
                config.save(&config_path)?;
                println!("Server set to {}", config.server);
            }
            ConfigAction::Show => {
                println!("Config file: {}", config_path.display());
                println!("Server:      {server}");
            }
        },

        Commands::Version => {
            println!("issueforge cli v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
