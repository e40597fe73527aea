//! Headless runs fed from a file of wire frames
//!
//! Wired the way the binary wires itself: the simulated widget reports into
//! the shared inbound queue, readiness arrives on a timer and the frame
//! reader only asks for shutdown once the widget is ready.

use anyhow::Result;
use crossbeam_channel::Receiver;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tuberemote::dispatcher::forward_frames;
use tuberemote::events::{ClientEvent, Notifier};
use tuberemote::history::HistoryStore;
use tuberemote::player::{HeadlessWidget, PlaybackController, WidgetEvent};
use tuberemote::storage::UiPreferences;
use tuberemote::utils::HistoryConfig;
use tuberemote::{Dispatcher, InboundEvent};
use tuberemote_integration_tests::{TestFixture, DEFAULT_QUOTA};

const HISTORY_FILE: &str = "videoHistory.json";

/// Run a headless client over `frames` until it shuts itself down
async fn run_headless(
    fixture: &TestFixture,
    frames: &Path,
    ready_delay: Duration,
) -> Result<(Dispatcher, Receiver<ClientEvent>)> {
    let storage = fixture.storage(DEFAULT_QUOTA)?;
    let (notifier, client_events) = Notifier::channel();
    let (tx, rx) = mpsc::unbounded_channel();

    let widget_tx = tx.clone();
    let widget = HeadlessWidget::new(vec!["large".to_string(), "hd720".to_string()], move |event| {
        let _ = widget_tx.send(InboundEvent::Widget(event));
    });

    let ready_tx = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(ready_delay).await;
        let _ = ready_tx.send(WidgetEvent::Ready.into());
    });

    let controller = PlaybackController::new(Box::new(widget), notifier.clone());
    let history = HistoryStore::new(Box::new(storage.clone()), HistoryConfig::default(), notifier.clone());
    let preferences = UiPreferences::load(Box::new(storage));
    let mut dispatcher = Dispatcher::new(controller, history, preferences, notifier);
    let ready = dispatcher.ready_signal();

    let file = tokio::fs::File::open(frames).await?;
    let reader = tokio::spawn(forward_frames(file, tx, ready));

    dispatcher.startup();
    tokio::time::timeout(Duration::from_secs(5), dispatcher.run(rx)).await?;
    reader.await?;

    Ok((dispatcher, client_events))
}

fn titles(events: &Receiver<ClientEvent>) -> Vec<String> {
    events
        .try_iter()
        .filter_map(|e| match e {
            ClientEvent::NowShowing { title: Some(title), .. } => Some(title),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_play_from_file_survives_slow_widget() -> Result<()> {
    let fixture = TestFixture::new()?;
    let frames = fixture.path().join("frames.jsonl");
    std::fs::write(
        &frames,
        concat!(
            r#"{"event":"connect"}"#,
            "\n",
            r#"{"event":"play-video","payload":{"url":"https://www.youtube.com/watch?v=dQw4w9WgXcQ"}}"#,
            "\n"
        ),
    )?;

    // Input ends long before the widget comes up
    let (dispatcher, events) = run_headless(&fixture, &frames, Duration::from_millis(100)).await?;

    assert_eq!(dispatcher.controller().deferred_len(), 0);
    assert_eq!(dispatcher.history().len(), 1);
    assert_eq!(dispatcher.controller().session().current_video_id().map(|id| id.as_str()), Some("dQw4w9WgXcQ"));
    assert!(dispatcher.controller().session().quality_locked());
    assert!(fixture.path().join(HISTORY_FILE).exists());
    assert_eq!(titles(&events), vec!["Video dQw4w9WgXcQ"]);
    Ok(())
}

#[tokio::test]
async fn test_every_play_in_file_completes() -> Result<()> {
    let fixture = TestFixture::new()?;
    let frames = fixture.path().join("frames.jsonl");
    std::fs::write(
        &frames,
        concat!(
            r#"{"event":"play-video","payload":{"url":"vid00000001"}}"#,
            "\n\n",
            "not a frame\n",
            r#"{"event":"play-video","payload":{"url":"https://youtu.be/vid00000002"}}"#,
            "\n"
        ),
    )?;

    let (dispatcher, events) = run_headless(&fixture, &frames, Duration::ZERO).await?;

    let urls: Vec<_> = dispatcher
        .history()
        .entries()
        .iter()
        .map(|e| e.url().to_string())
        .collect();
    assert_eq!(urls, vec!["https://youtu.be/vid00000002", "vid00000001"]);
    assert!(dispatcher.controller().session().quality_locked());
    assert_eq!(titles(&events).last().map(String::as_str), Some("Video vid00000002"));
    Ok(())
}
