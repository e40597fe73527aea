use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::Receiver;
use env_logger::Env;
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use tuberemote::dispatcher::forward_frames;
use tuberemote::events::{ClientEvent, NoticeLevel, Notifier};
use tuberemote::history::HistoryStore;
use tuberemote::player::{HeadlessWidget, PlaybackController, WidgetEvent};
use tuberemote::storage::{FileStorage, UiPreferences};
use tuberemote::utils::{load_config, Config};
use tuberemote::{Dispatcher, InboundEvent};

/// TubeRemote - remote-control client for an embedded video player
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Read channel events (one JSON frame per line) from FILE instead of stdin
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Configuration file to use instead of the system/user files
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for persisted history and preferences
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path),
        None => load_config(),
    }
    .context("Failed to load configuration")?;

    if let Some(dir) = args.data_dir {
        config.storage.data_dir = Some(dir);
    }

    let log_level = if args.debug { "debug" } else { config.general.log_level.as_str() };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    info!("Starting TubeRemote v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = config.data_dir();
    let storage = FileStorage::open(&data_dir, config.storage.quota_bytes)
        .with_context(|| format!("Failed to open storage at {:?}", data_dir))?;
    info!("Persisting state in {:?}", storage.dir());

    let (notifier, client_events) = Notifier::channel();
    let renderer = std::thread::Builder::new()
        .name("renderer".to_string())
        .spawn(move || render_events(client_events))
        .context("Failed to start renderer thread")?;

    let (tx, rx) = mpsc::unbounded_channel();

    let widget_tx = tx.clone();
    let widget = HeadlessWidget::new(config.headless.quality_levels.clone(), move |event| {
        let _ = widget_tx.send(InboundEvent::Widget(event));
    });

    let ready_delay = Duration::from_millis(config.headless.ready_delay_ms);
    let ready_tx = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(ready_delay).await;
        debug!("Widget initialized");
        let _ = ready_tx.send(WidgetEvent::Ready.into());
    });

    let controller = PlaybackController::new(Box::new(widget), notifier.clone());
    let history = HistoryStore::new(Box::new(storage.clone()), config.history.clone(), notifier.clone());
    let preferences = UiPreferences::load(Box::new(storage));

    let mut dispatcher = Dispatcher::new(controller, history, preferences, notifier);
    let ready = dispatcher.ready_signal();

    let reader = match args.input {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("Failed to open input {:?}", path))?;
            tokio::spawn(forward_frames(file, tx, ready))
        }
        None => tokio::spawn(forward_frames(tokio::io::stdin(), tx, ready)),
    };

    dispatcher.startup();
    dispatcher.run(rx).await;

    reader.abort();
    drop(dispatcher);
    if renderer.join().is_err() {
        error!("Renderer thread panicked");
    }

    info!("TubeRemote stopped");
    Ok(())
}

/// Log every outbound event; stands in for a page renderer
fn render_events(events: Receiver<ClientEvent>) {
    for event in events {
        match event {
            ClientEvent::HistoryChanged(entries) => {
                info!("History: {} entries", entries.len());
                for entry in &entries {
                    debug!("  {} | {} | {}", entry.display_title(), entry.url(), entry.timestamp());
                }
            }
            ClientEvent::NowShowing { reference, title } => {
                let text = title.or(reference).unwrap_or_else(|| tuberemote::events::NO_VIDEO_LOADED.to_string());
                info!("Now showing: {}", text);
            }
            ClientEvent::Notice(notice) => match notice.level {
                NoticeLevel::Error => error!("{}: {}", notice.title, notice.message),
                NoticeLevel::Warning => warn!("{}: {}", notice.title, notice.message),
                NoticeLevel::Success | NoticeLevel::Info => info!("{}: {}", notice.title, notice.message),
            },
            ClientEvent::ConnectionStatus(connected) => {
                info!("{}", if connected { "Connected" } else { "Disconnected" });
            }
            other => debug!("{:?}", other),
        }
    }
}
