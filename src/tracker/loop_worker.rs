use tokio::sync::mpsc;
use tokio::time::{self, Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::panel::PanelController;

// Set to false to silence this module's diagnostics
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

/// Quiet window for coalescing selection-change bursts: hold the latest
/// ping, fire once after this long with no further pings.
pub const QUIET_WINDOW_MS: u64 = 100;

/// Listener task body: debounce raw selection pings and hand the survivors
/// to the controller's fetch trigger.
///
/// The host pushes no payload with its notifications; the trigger re-reads
/// the current selection itself, so only the *fact* of a change is
/// debounced here.
pub async fn tracker_loop(
    controller: PanelController,
    mut events: mpsc::Receiver<()>,
    cancel_token: CancellationToken,
) {
    let quiet = Duration::from_millis(QUIET_WINDOW_MS);
    let debounce = time::sleep(quiet);
    tokio::pin!(debounce);
    let mut pending = false;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(()) => {
                    pending = true;
                    debounce.as_mut().reset(Instant::now() + quiet);
                }
                None => {
                    log_info!("selection event channel closed, tracker exiting");
                    break;
                }
            },
            () = debounce.as_mut(), if pending => {
                pending = false;
                if let Err(err) = controller.trigger_fetch().await {
                    log_error!("selection-triggered fetch failed: {err:?}");
                }
            }
            () = cancel_token.cancelled() => {
                log_info!("selection tracker shutting down");
                break;
            }
        }
    }
}
