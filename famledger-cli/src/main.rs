use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use famledger_core::{Currency, Roster};
use famledger_finance::FinanceAgent;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod notes;
mod report;
mod session;
mod state;

use config::{Config, config_path, init_config, load_config};
use notes::InMemoryNoteStore;
use session::{Session, run_session};

#[derive(Parser, Debug)]
#[command(name = "famledger", version, about = "Family expense notes to ledger and settlements")]
struct Cli {
    /// Log debug output to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a block of notes and print balances and settlements
    Analyze {
        /// Family members (defaults to config / FAMILY_MEMBERS)
        #[arg(long, num_args = 1..)]
        members: Vec<String>,

        /// Notes file (reads stdin when omitted)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Default currency code: AED, USD or EUR
        #[arg(long)]
        currency: Option<String>,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,

        /// Also print the Arabic explanation
        #[arg(long)]
        explain_ar: bool,
    },

    /// Interactive note-taking session with /summary, /loans and /reset
    Session {
        /// Conversation id; notes are kept per id for the life of the session
        #[arg(long, default_value_t = 0)]
        chat: i64,

        #[arg(long, num_args = 1..)]
        members: Vec<String>,

        #[arg(long)]
        currency: Option<String>,
    },

    /// Manage ~/.famledger/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Analyze {
            members,
            file,
            currency,
            json,
            explain_ar,
        } => {
            let agent = build_agent(&load_config()?, &members, currency.as_deref())?;
            let text = read_input(file.as_ref())?;
            let analysis = agent.analyze(&text);

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&analysis).context("serialize analysis")?
                );
            } else {
                println!("{}", report::format_summary(&analysis));
            }
            if explain_ar {
                println!("\n{}", report::explain_ar(&analysis));
            }
        }

        Command::Session {
            chat,
            members,
            currency,
        } => {
            let agent = build_agent(&load_config()?, &members, currency.as_deref())?;
            let store = InMemoryNoteStore::new();
            run_session(&Session::new(&store, chat, agent))?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => init_config()?,
            ConfigCommand::Show => {
                let cfg = load_config()?;
                println!("# {}", config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

/// `RUST_LOG` (default `warn`), or `debug` with `-v`. Logs go to stderr so
/// `--json` output stays clean.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Flags win over `FAMILY_MEMBERS`, which wins over the config file.
fn build_agent(cfg: &Config, members: &[String], currency: Option<&str>) -> Result<FinanceAgent> {
    let roster = if members.is_empty() {
        cfg.roster()?
    } else {
        Roster::new(members).context("invalid --members")?
    };
    let currency: Currency = match currency {
        Some(code) => code.parse()?,
        None => cfg.currency()?,
    };
    tracing::debug!(members = roster.len(), %currency, "building finance agent");
    Ok(FinanceAgent::with_roster(roster, currency))
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("read {}", path.display())),
        None => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("read notes from stdin")?;
            Ok(s)
        }
    }
}
