//! Line-oriented channel input

use log::{error, warn};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

use super::{InboundEvent, WireMessage};

/// Forward wire frames (one JSON object per line) to the dispatcher
///
/// Once the input ends, waits for `ready` before requesting shutdown so
/// plays deferred until the widget came up are still carried out. A
/// dropped `ready` sender counts as ready.
pub async fn forward_frames<R>(input: R, events: UnboundedSender<InboundEvent>, ready: oneshot::Receiver<()>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match WireMessage::parse(line) {
                    Ok(message) => {
                        if let Some(event) = message.channel_event() {
                            if events.send(event.into()).is_err() {
                                return;
                            }
                        }
                    }
                    Err(e) => warn!("Skipping malformed frame: {}", e),
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        }
    }

    let _ = ready.await;
    let _ = events.send(InboundEvent::Shutdown);
}
