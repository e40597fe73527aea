//! End-to-end dispatcher flows
//!
//! These tests drive the client through its single inbound stream the way
//! the binary does: channel frames, widget callbacks and UI actions all go
//! through one queue and are handled in delivery order.

use anyhow::Result;
use tokio::sync::mpsc;
use tuberemote::events::{ClientEvent, NoticeLevel};
use tuberemote::player::{WidgetEvent, WidgetState};
use tuberemote::storage::Section;
use tuberemote::{InboundEvent, UiEvent};
use tuberemote_integration_tests::{frame, RecordingWidget, TestFixture};

#[tokio::test]
async fn test_play_before_ready_runs_after_ready() -> Result<()> {
    let fixture = TestFixture::new()?;
    let mut client = fixture.client(RecordingWidget::default())?;
    let (tx, rx) = mpsc::unbounded_channel::<InboundEvent>();

    tx.send(frame(r#"{"event":"connect"}"#))?;
    tx.send(frame(r#"{"event":"play-video","payload":{"url":"https://www.youtube.com/watch?v=dQw4w9WgXcQ"}}"#))?;
    tx.send(frame(r#"{"event":"control-pause"}"#))?;
    tx.send(WidgetEvent::Ready.into())?;
    tx.send(frame(r#"{"event":"control-pause"}"#))?;
    tx.send(InboundEvent::Shutdown)?;

    client.dispatcher.run(rx).await;

    // The first pause arrived before readiness and is dropped, not queued
    assert_eq!(client.widget.calls(), vec!["load:dQw4w9WgXcQ", "pause"]);
    assert_eq!(client.dispatcher.history().len(), 1);
    assert_eq!(
        client.dispatcher.controller().current_reference(),
        Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
    );

    let events = client.drain();
    assert!(events.contains(&ClientEvent::ConnectionStatus(true)));
    assert!(events.contains(&ClientEvent::PlaceholderVisible(false)));
    Ok(())
}

#[tokio::test]
async fn test_deferred_plays_keep_order() -> Result<()> {
    let fixture = TestFixture::new()?;
    let mut client = fixture.client(RecordingWidget::default())?;
    let (tx, rx) = mpsc::unbounded_channel::<InboundEvent>();

    for id in ["vid00000001", "vid00000002", "vid00000003"] {
        tx.send(frame(&format!(r#"{{"event":"play-video","payload":{{"url":"{}"}}}}"#, id)))?;
    }
    tx.send(WidgetEvent::Ready.into())?;
    drop(tx);

    // Stream closing ends the loop just like a shutdown
    client.dispatcher.run(rx).await;

    assert_eq!(
        client.widget.calls(),
        vec!["load:vid00000001", "load:vid00000002", "load:vid00000003"]
    );
    let urls: Vec<_> = client
        .dispatcher
        .history()
        .entries()
        .iter()
        .map(|e| e.url().to_string())
        .collect();
    assert_eq!(urls, vec!["vid00000003", "vid00000002", "vid00000001"]);
    Ok(())
}

#[tokio::test]
async fn test_invalid_play_payloads() -> Result<()> {
    let fixture = TestFixture::new()?;
    let mut client = fixture.client(RecordingWidget::default())?;
    client.dispatcher.dispatch(WidgetEvent::Ready.into());
    client.drain();

    client.dispatcher.dispatch(frame(r#"{"event":"play-video","payload":{}}"#));
    client.dispatcher.dispatch(frame(r#"{"event":"play-video","payload":{"url":"https://vimeo.com/123"}}"#));
    client.dispatcher.dispatch(frame(r#"{"event":"play-video","payload":{"url":7}}"#));

    let notices = client.notices();
    assert_eq!(notices.len(), 3);
    assert!(notices.iter().all(|n| n.blocking && n.message == "Invalid YouTube URL"));
    assert!(client.widget.calls().is_empty());
    assert!(client.dispatcher.history().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_auth_attempts_surface_as_notices() -> Result<()> {
    let fixture = TestFixture::new()?;
    let mut client = fixture.client(RecordingWidget::default())?;
    client.drain();

    client.dispatcher.dispatch(frame(
        r#"{"event":"auth-attempt","payload":{"success":true,"deviceName":"Kitchen Tablet"}}"#,
    ));
    client.dispatcher.dispatch(frame(
        r#"{"event":"auth-attempt","payload":{"success":false,"reason":"Bad token","ip":"192.168.1.20"}}"#,
    ));

    let notices = client.notices();
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0].level, NoticeLevel::Success);
    assert_eq!(notices[0].title, "Device Connected");
    assert_eq!(notices[0].message, "Kitchen Tablet authenticated successfully");
    assert_eq!(notices[1].level, NoticeLevel::Error);
    assert_eq!(notices[1].title, "Authentication Failed");
    assert_eq!(notices[1].message, "Bad token from 192.168.1.20");
    assert!(client.widget.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_quality_applied_once_per_video() -> Result<()> {
    let fixture = TestFixture::new()?;
    let widget = RecordingWidget::with_levels(&["large", "hd720", "small"]);
    widget.set_title("Test Pattern");
    let mut client = fixture.client(widget)?;
    let (tx, rx) = mpsc::unbounded_channel::<InboundEvent>();

    tx.send(WidgetEvent::Ready.into())?;
    tx.send(frame(r#"{"event":"play-video","payload":{"url":"dQw4w9WgXcQ"}}"#))?;
    tx.send(WidgetEvent::StateChange(WidgetState::Buffering).into())?;
    tx.send(WidgetEvent::StateChange(WidgetState::Playing).into())?;
    tx.send(frame(r#"{"event":"control-pause"}"#))?;
    tx.send(WidgetEvent::StateChange(WidgetState::Paused).into())?;
    tx.send(frame(r#"{"event":"control-resume"}"#))?;
    tx.send(WidgetEvent::StateChange(WidgetState::Playing).into())?;
    tx.send(frame(r#"{"event":"play-video","payload":{"url":"https://youtu.be/vid00000002"}}"#))?;
    tx.send(WidgetEvent::StateChange(WidgetState::Unstarted).into())?;
    tx.send(WidgetEvent::StateChange(WidgetState::Playing).into())?;
    tx.send(InboundEvent::Shutdown)?;

    client.dispatcher.run(rx).await;

    assert_eq!(client.widget.count("quality:"), 2);
    assert!(client.widget.calls().iter().all(|c| !c.starts_with("quality:") || c == "quality:hd720"));

    let titles: Vec<_> = client
        .drain()
        .into_iter()
        .filter_map(|e| match e {
            ClientEvent::NowShowing { title: Some(title), .. } => Some(title),
            _ => None,
        })
        .collect();
    assert_eq!(titles, vec!["Test Pattern", "Test Pattern"]);
    Ok(())
}

#[tokio::test]
async fn test_stop_restores_placeholder() -> Result<()> {
    let fixture = TestFixture::new()?;
    let mut client = fixture.client(RecordingWidget::default())?;
    client.dispatcher.dispatch(WidgetEvent::Ready.into());
    client.dispatcher.dispatch(frame(r#"{"event":"play-video","payload":{"url":"dQw4w9WgXcQ"}}"#));
    client.drain();

    client.dispatcher.dispatch(frame(r#"{"event":"control-stop"}"#));

    assert_eq!(client.dispatcher.controller().current_reference(), None);
    assert!(client.dispatcher.controller().session().current_video_id().is_none());
    assert_eq!(
        client.drain(),
        vec![
            ClientEvent::PlaceholderVisible(true),
            ClientEvent::NowShowing {
                reference: None,
                title: None
            },
        ]
    );
    // History is not touched by stop
    assert_eq!(client.dispatcher.history().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_fullscreen_commands() -> Result<()> {
    let fixture = TestFixture::new()?;
    let mut client = fixture.client(RecordingWidget::default())?;
    client.drain();

    client.dispatcher.dispatch(frame(r#"{"event":"control-fullscreen"}"#));
    client.dispatcher.dispatch(frame(r#"{"event":"control-fullscreen"}"#));
    client.dispatcher.dispatch(UiEvent::FullscreenChanged(false).into());
    client.dispatcher.dispatch(frame(r#"{"event":"control-exitfullscreen"}"#));

    assert_eq!(client.drain(), vec![ClientEvent::FullscreenRequested(true)]);
    assert!(!client.dispatcher.controller().is_fullscreen());
    Ok(())
}

#[tokio::test]
async fn test_ui_actions() -> Result<()> {
    let fixture = TestFixture::new()?;
    let mut client = fixture.client(RecordingWidget::default())?;
    client.dispatcher.dispatch(WidgetEvent::Ready.into());
    client.drain();

    client.dispatcher.dispatch(UiEvent::SubmitUrl("https://youtu.be/dQw4w9WgXcQ".to_string()).into());
    assert_eq!(
        client.drain(),
        vec![ClientEvent::SubmitPlay {
            url: "https://youtu.be/dQw4w9WgXcQ".to_string()
        }]
    );
    // Submitting only posts the url; playback starts when the server echoes it
    assert!(client.widget.calls().is_empty());

    client.dispatcher.dispatch(UiEvent::Replay("dQw4w9WgXcQ".to_string()).into());
    client.dispatcher.dispatch(UiEvent::CopyReference("dQw4w9WgXcQ".to_string()).into());
    client.dispatcher.dispatch(UiEvent::ToggleSection(Section::CurrentVideo).into());

    let events = client.drain();
    assert!(events.contains(&ClientEvent::CopyToClipboard("dQw4w9WgXcQ".to_string())));
    assert!(events.contains(&ClientEvent::SectionCollapsed {
        section: Section::CurrentVideo,
        collapsed: true
    }));
    assert_eq!(client.widget.calls(), vec!["load:dQw4w9WgXcQ"]);

    client.dispatcher.dispatch(UiEvent::ClearHistory { confirmed: true }.into());
    assert!(client.dispatcher.history().is_empty());
    assert!(client.drain().contains(&ClientEvent::HistoryChanged(Vec::new())));
    Ok(())
}
