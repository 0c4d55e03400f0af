mod api;
mod callback;
mod conversation;
mod gateway;
mod i18n;
mod listing;
mod menu;
mod reading;

use chrono::Local;
use clap::{Parser, Subcommand};
use daykeeper_channels::telegram::TelegramChannel;
use daykeeper_core::config::{self, Config};
use daykeeper_store::Store;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "daykeeper",
    version,
    about = "Daykeeper — tasks, reminders, birthdays and events in your chat"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Start,
    /// Show configuration and stored record counts.
    Status,
    /// Archive today's tasks and reset reminder flags right now.
    ResetNow,
}

/// Console output plus a daily-rotated file under the data directory.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(cfg: &Config) -> anyhow::Result<WorkerGuard> {
    let log_dir = cfg.daykeeper.log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, "daykeeper.log"));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.daykeeper.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _log_guard = init_tracing(&cfg)?;

    match cli.command {
        Commands::Start => {
            if !cfg.telegram.enabled {
                anyhow::bail!(
                    "Telegram is disabled. Enable it in config.toml or set TELEGRAM_TOKEN."
                );
            }
            if cfg.telegram.bot_token.is_empty() {
                anyhow::bail!(
                    "Telegram is enabled but bot_token is empty. \
                     Set it in config.toml or TELEGRAM_TOKEN env var."
                );
            }

            let channel = Arc::new(TelegramChannel::new(cfg.telegram.clone()));
            let store = Store::open(cfg.daykeeper.snapshot_dir())?;

            println!("{} — starting...", cfg.daykeeper.name);
            let gw = Arc::new(gateway::Gateway::new(channel, store, &cfg)?);
            gw.run().await?;
        }
        Commands::Status => {
            println!("{} — Status Check\n", cfg.daykeeper.name);
            println!("Config: {}", cli.config);
            println!("Language: {}", cfg.daykeeper.language);
            println!("Data: {}", cfg.daykeeper.snapshot_dir().display());
            println!(
                "  telegram: {}",
                if cfg.telegram.enabled && !cfg.telegram.bot_token.is_empty() {
                    "configured"
                } else if cfg.telegram.enabled {
                    "enabled but missing bot_token"
                } else {
                    "disabled"
                }
            );
            println!(
                "  scheduler: {}",
                if cfg.scheduler.enabled {
                    format!(
                        "every {}s, daily reset at {}",
                        cfg.scheduler.sweep_interval_secs, cfg.scheduler.reset_time
                    )
                } else {
                    "disabled".to_string()
                }
            );
            println!(
                "  api: {}",
                if cfg.api.enabled {
                    format!("{}:{}", cfg.api.host, cfg.api.port)
                } else {
                    "disabled".to_string()
                }
            );
            println!();

            let store = Store::open(cfg.daykeeper.snapshot_dir())?;
            let counts = store.counts().await;
            println!("Users: {}", counts.users);
            println!("Tasks: {}", counts.tasks);
            println!("Reminders: {}", counts.reminders);
            println!("Birthdays: {}", counts.birthdays);
            println!("Events: {}", counts.events);
            println!("History entries: {}", counts.history_entries);
        }
        Commands::ResetNow => {
            let store = Store::open(cfg.daykeeper.snapshot_dir())?;
            let today = Local::now().date_naive();
            let summary = gateway::reset_day(&store, today).await;
            println!(
                "Archived {} tasks for {} users under {}; cleared {} reminder flags.",
                summary.archived_tasks,
                summary.archived_users,
                i18n::format_date(today),
                summary.reminders_reset
            );
        }
    }

    Ok(())
}
