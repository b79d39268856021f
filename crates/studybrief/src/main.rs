//! studybrief - Daily study digest webhook backed by Notion

mod preview;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use studybrief_core::config::DEFAULT_TIMEZONE;
use studybrief_core::Settings;
use studybrief_web::AppState;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "studybrief",
    version,
    about = "Daily study digest webhook backed by Notion",
    long_about = "Reads today's row from a Notion study plan, resolves the objectives,\n\
                  resources, practice test and open mistakes it links to, and answers\n\
                  with a ready-to-send email subject and body.\n\
                  \n\
                  Examples:\n\
                    studybrief                                # Serve the webhook (default)\n\
                    studybrief serve --port 9000              # Custom port\n\
                    studybrief preview --date 2026-03-02      # Print one digest\n\
                    studybrief preview --json                 # Today's digest as JSON\n\
                  \n\
                  Environment Variables:\n\
                    NOTION_TOKEN, AUTH_TOKEN                  # Credentials\n\
                    PLAN_DB_ID, OBJECTIVES_DB_ID, RESOURCES_DB_ID,\n\
                    PRACTICE_DB_ID, MISTAKES_DB_ID            # Notion database ids\n\
                    STUDYBRIEF_LOG                            # Log filter (e.g. debug)"
)]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,

    #[command(flatten)]
    settings: SettingsArgs,

    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0", global = true)]
    host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value = "8000", global = true)]
    port: u16,

    /// Debug logging (STUDYBRIEF_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Mode {
    /// Serve the webhook (default)
    Serve,
    /// Build one digest and print it
    Preview {
        /// Day to build, YYYY-MM-DD (default: today in --timezone)
        #[arg(long, short = 'd')]
        date: Option<String>,
        /// IANA timezone used to pick "today"
        #[arg(long, default_value = DEFAULT_TIMEZONE)]
        timezone: String,
        /// Output the webhook JSON envelope
        #[arg(long)]
        json: bool,
    },
}

/// Everything read from the environment at startup
#[derive(Args)]
struct SettingsArgs {
    /// Notion integration token
    #[arg(long, env = "NOTION_TOKEN", hide_env_values = true, global = true)]
    notion_token: Option<String>,

    /// Shared secret expected in X-AUTH-TOKEN
    #[arg(long, env = "AUTH_TOKEN", hide_env_values = true, global = true)]
    auth_token: Option<String>,

    #[arg(long, env = "PLAN_DB_ID", global = true)]
    plan_db_id: Option<String>,

    #[arg(long, env = "OBJECTIVES_DB_ID", global = true)]
    objectives_db_id: Option<String>,

    #[arg(long, env = "RESOURCES_DB_ID", global = true)]
    resources_db_id: Option<String>,

    #[arg(long, env = "PRACTICE_DB_ID", global = true)]
    practice_db_id: Option<String>,

    #[arg(long, env = "MISTAKES_DB_ID", global = true)]
    mistakes_db_id: Option<String>,

    /// Notion API root (default: https://api.notion.com/v1)
    #[arg(long, env = "NOTION_BASE_URL", global = true)]
    notion_base_url: Option<String>,

    /// Per-request timeout for Notion calls, in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", global = true)]
    upstream_timeout_secs: Option<u64>,

    /// Maximum concurrent objective/resource lookups
    #[arg(long, env = "FETCH_CONCURRENCY", global = true)]
    fetch_concurrency: Option<usize>,

    /// Exam name shown in the subject and body
    #[arg(long, env = "EXAM_LABEL", global = true)]
    exam_label: Option<String>,
}

impl From<SettingsArgs> for Settings {
    fn from(args: SettingsArgs) -> Self {
        Settings {
            notion_token: args.notion_token,
            auth_token: args.auth_token,
            plan_db_id: args.plan_db_id,
            objectives_db_id: args.objectives_db_id,
            resources_db_id: args.resources_db_id,
            practice_db_id: args.practice_db_id,
            mistakes_db_id: args.mistakes_db_id,
            notion_base_url: args.notion_base_url,
            timeout_secs: args.upstream_timeout_secs,
            fetch_concurrency: args.fetch_concurrency,
            exam_label: args.exam_label,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let settings = Settings::from(cli.settings);

    match cli.mode.unwrap_or(Mode::Serve) {
        Mode::Serve => {
            run_serve(settings, SocketAddr::new(cli.host, cli.port)).await?;
        }
        Mode::Preview {
            date,
            timezone,
            json,
        } => {
            preview::run_preview(settings, date, timezone, json).await?;
        }
    }

    Ok(())
}

async fn run_serve(settings: Settings, addr: SocketAddr) -> Result<()> {
    info!(?settings, "Starting studybrief");
    let state = AppState::from_settings(&settings).context("Failed to create Notion client")?;

    studybrief_web::run(Arc::new(state), addr)
        .await
        .with_context(|| format!("Webhook server on {} failed", addr))
}

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    let filter = tracing_subscriber::EnvFilter::try_from_env("STUDYBRIEF_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("Failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
