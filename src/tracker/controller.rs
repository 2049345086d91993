use anyhow::{bail, Context, Result};
use log::info;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::panel::PanelController;

use super::loop_worker::tracker_loop;

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Owns the debouncing listener task. The embedder bridges the host's
/// selection-change subscription to the sender returned by [`start`];
/// pings carry no payload.
///
/// [`start`]: SelectionTracker::start
pub struct SelectionTracker {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    /// Spawn the listener and hand back the ping channel.
    pub fn start(&mut self, controller: PanelController) -> Result<mpsc::Sender<()>> {
        if self.handle.is_some() {
            bail!("selection tracker already active");
        }

        info!("starting selection tracker");

        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(tracker_loop(controller, events_rx, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(events_tx)
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("selection tracker task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

impl Default for SelectionTracker {
    fn default() -> Self {
        Self::new()
    }
}
