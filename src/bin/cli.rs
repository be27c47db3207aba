//! NexusMods Notifier CLI
//!
//! Polls the content API for new or updated mods and forwards them to a
//! Telegram chat. `unit` writes systemd files to run it unattended.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use nexus_notifier::{
    error::{AppError, Result},
    models::{Config, Mode},
    pipeline::{self, AdditionsDetector, RunMode, UpdatesDetector, WatchOptions},
    services::{
        CatalogClient, CategoryCache, Destination, NexusClient, Notifier, NullNotifier,
        TelegramNotifier,
    },
    storage::StateFile,
    systemd::{self, UnitSpec},
};

/// NexusMods Notifier - new and updated mods to Telegram
#[derive(Parser, Debug)]
#[command(name = "notifier", version, about = "Forward new and updated NexusMods mods to Telegram")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "notifier.toml")]
    config: PathBuf,

    /// API key for NexusMods
    #[arg(short = 'k', long, env = "NEXUS_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Game domain name for NexusMods, eg. 'starfield'
    #[arg(short = 'g', long = "game-name")]
    game: String,

    /// Telegram chat ID
    #[arg(short = 'c', long, allow_hyphen_values = true)]
    chat_id: Option<String>,

    /// Telegram bot token
    #[arg(short = 't', long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    tg_token: Option<String>,

    /// Telegram group topic ID
    #[arg(short = 'o', long)]
    topic_id: Option<String>,

    /// Hide adult content
    #[arg(short = 'a', long)]
    hide_adult_content: bool,

    /// Run a single check instead of looping forever
    #[arg(short = 'l', long, visible_alias = "no-loop")]
    once: bool,

    /// Seconds between checks (defaults: 300 additions, 3600 updates)
    #[arg(short = 'f', long)]
    frequency: Option<u64>,

    /// Override the seen-mods state file
    #[arg(long)]
    seen_file: Option<PathBuf>,

    /// Override the update cache file
    #[arg(long)]
    cache_file: Option<PathBuf>,

    /// Override the category cache file
    #[arg(long)]
    categories_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Get notified about newly added mods
    Additions,

    /// Get notified about new versions of tracked mods
    Updates,

    /// Generate systemd service and timer files
    Unit {
        /// Which check the service should run
        #[arg(value_enum)]
        mode: UnitMode,

        /// Directory to write the units to (default: ~/.config/systemd/user)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Service name (default: nexusmods-notifier-{game}-{mode})
        #[arg(long)]
        name: Option<String>,

        /// Service description
        #[arg(long)]
        description: Option<String>,

        /// Print the units instead of writing them
        #[arg(long)]
        print: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum UnitMode {
    Additions,
    Updates,
}

impl From<UnitMode> for Mode {
    fn from(mode: UnitMode) -> Self {
        match mode {
            UnitMode::Additions => Mode::Additions,
            UnitMode::Updates => Mode::Updates,
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let telegram = telegram_credentials(&cli)?;

    let mode = match &cli.command {
        Command::Additions => Mode::Additions,
        Command::Updates => Mode::Updates,
        Command::Unit {
            mode,
            output_dir,
            name,
            description,
            print,
        } => {
            let mut unit = UnitSpec::new(
                Mode::from(*mode),
                &cli.game,
                &cli.api_key,
                std::env::current_exe()?,
                std::env::current_dir()?,
            );
            if let Some((token, chat_id)) = telegram {
                unit.bot_token = Some(token);
                unit.chat_id = Some(chat_id);
            }
            unit.thread_id = cli.topic_id.clone();
            unit.hide_adult = cli.hide_adult_content;
            if let Some(secs) = cli.frequency.filter(|s| *s > 0) {
                unit.interval_secs = secs;
            }
            if let Some(name) = name {
                unit.service_name = name.clone();
            }
            if let Some(description) = description {
                unit.description = description.clone();
            }
            return write_units(&unit, output_dir.clone(), *print).await;
        }
    };

    let catalog: Arc<dyn CatalogClient> = Arc::new(NexusClient::new(&config.api, &cli.api_key)?);
    let notifier: Arc<dyn Notifier> = match &telegram {
        Some((token, _)) => Arc::new(TelegramNotifier::new(&config.telegram, token)?),
        None => {
            log::warn!("Telegram token not provided, not sending messages");
            Arc::new(NullNotifier)
        }
    };
    let destination = Destination::new(
        telegram.map(|(_, chat_id)| chat_id).unwrap_or_default(),
        cli.topic_id.clone(),
    );

    let options = WatchOptions::new(&cli.game, cli.hide_adult_content, &config.api.site_url);
    let categories = CategoryCache::new(StateFile::new(&config.paths.categories));

    let interval = cli
        .frequency
        .filter(|s| *s > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.interval_for(mode));
    let run_mode = if cli.once {
        RunMode::Once
    } else {
        RunMode::Loop { interval }
    };

    log::info!("Watching '{}' for {} ({:?})", cli.game, mode, run_mode);

    match mode {
        Mode::Additions => {
            let mut detector = AdditionsDetector::new(
                catalog,
                notifier,
                destination,
                categories,
                StateFile::new(&config.paths.seen_items),
                options,
            );
            pipeline::run_additions(&mut detector, run_mode).await
        }
        Mode::Updates => {
            let detector = UpdatesDetector::load(
                catalog,
                notifier,
                destination,
                categories,
                StateFile::new(&config.paths.update_cache),
                options,
            )
            .await?;
            let mut detector = detector
                .with_period(config.api.updated_period)
                .with_digest_preview(!config.telegram.disable_preview_for_new_tracked);
            pipeline::run_updates(
                &mut detector,
                run_mode,
                config.schedule.max_consecutive_failures,
            )
            .await
        }
    }
}

/// Read the config file (if present) and apply CLI overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if cli.config.exists() {
        log::info!("Loading configuration from {}", cli.config.display());
        Config::load_or_default(&cli.config)
    } else {
        log::debug!("No config at {}, using defaults", cli.config.display());
        Config::default()
    };

    if let Some(path) = &cli.seen_file {
        config.paths.seen_items = path.clone();
    }
    if let Some(path) = &cli.cache_file {
        config.paths.update_cache = path.clone();
    }
    if let Some(path) = &cli.categories_file {
        config.paths.categories = path.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Bot token and chat id must be given together or not at all.
fn telegram_credentials(cli: &Cli) -> Result<Option<(String, String)>> {
    let token = cli.tg_token.clone().filter(|t| !t.is_empty());
    let chat_id = cli.chat_id.clone().filter(|c| !c.is_empty());

    match (token, chat_id) {
        (Some(token), Some(chat_id)) => Ok(Some((token, chat_id))),
        (None, None) => Ok(None),
        _ => Err(AppError::config(
            "Both chat ID and Telegram token must be provided",
        )),
    }
}

async fn write_units(unit: &UnitSpec, output_dir: Option<PathBuf>, print: bool) -> Result<()> {
    if print {
        println!("# {}\n{}", unit.service_file_name(), unit.render_service());
        println!("# {}\n{}", unit.timer_file_name(), unit.render_timer());
        return Ok(());
    }

    let dir = output_dir
        .or_else(systemd::user_unit_dir)
        .ok_or_else(|| AppError::config("No output directory given and no user config directory found"))?;
    unit.write_to(&dir).await?;

    log::info!(
        "Enable with: systemctl --user daemon-reload && systemctl --user enable --now {}",
        unit.timer_file_name()
    );
    Ok(())
}
