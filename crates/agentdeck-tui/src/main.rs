use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use agentdeck_core::{Config, Home, Scheduler};

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::EventHandler;

#[derive(Parser)]
#[command(name = "agentdeck")]
#[command(about = "Twenty echo agents and a mock search tab in your terminal")]
#[command(version)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of agent cards to show
    #[arg(short, long)]
    agents: Option<usize>,

    /// Where to write logs
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write the effective config to the config file and exit
    #[arg(long)]
    write_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load config")?;

    if let Some(agents) = cli.agents {
        config.agent_count = agents;
    }
    config.validate()?;

    if cli.write_config {
        match &cli.config {
            Some(path) => config.save_to(path),
            None => config.save(),
        }
        .context("Failed to write config")?;
        println!("Config written");
        return Ok(());
    }

    let log_path = match cli.log_file {
        Some(path) => path,
        None => default_log_path()?,
    };
    init_logging(&log_path, &config.log_level)?;

    tracing::info!(
        agents = config.agent_count,
        reply_delay_ms = config.reply_delay_ms,
        search_delay_ms = config.search_delay_ms,
        "Starting agentdeck"
    );

    let (scheduler, demo_rx) = Scheduler::channel();
    let mut app = App::new(Home::new(config.settings()), scheduler);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new(demo_rx);

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    tracing::info!("Exiting agentdeck");
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }
    Ok(())
}

fn default_log_path() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow!("Could not determine data directory"))?;
    Ok(data_dir.join("agentdeck").join("agentdeck.log"))
}

/// Log to a file so output never lands on the terminal the UI is drawing to.
/// `AGENTDECK_LOG` overrides the configured level.
fn init_logging(path: &Path, default_level: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    let filter = EnvFilter::try_from_env("AGENTDECK_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
