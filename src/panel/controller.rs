use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::{error, info, warn};
use tokio::sync::{watch, Mutex};

use crate::commit::{self, ApplyOutcome};
use crate::compress::compress_working_set;
use crate::error::PanelError;
use crate::fetch;
use crate::host::{AttachmentFetcher, AttachmentField, HostBase};
use crate::models::{FetchMode, RecordImageGroup, SelectionContext};

use super::state::{PanelSnapshot, PanelState, PanelStatus};

/// Orchestrates the panel's three stages (fetch, compress, apply) over one
/// shared working set, with a drop-on-busy guard between them.
///
/// Cloning shares all state; the tracker loop holds one clone, the
/// embedding UI another.
#[derive(Clone)]
pub struct PanelController {
    state: Arc<Mutex<PanelState>>,
    host: Arc<dyn HostBase>,
    fetcher: Arc<dyn AttachmentFetcher>,
    /// Field handle remembered from the last completed fetch; the apply
    /// stage writes through it.
    field: Arc<Mutex<Option<Arc<dyn AttachmentField>>>>,
    events: watch::Sender<PanelSnapshot>,
}

impl PanelController {
    pub fn new(host: Arc<dyn HostBase>, fetcher: Arc<dyn AttachmentFetcher>) -> Self {
        let state = PanelState::new();
        let (events, _) = watch::channel(state.snapshot());

        Self {
            state: Arc::new(Mutex::new(state)),
            host,
            fetcher,
            field: Arc::new(Mutex::new(None)),
            events,
        }
    }

    /// Observe every state change as a fresh snapshot.
    pub fn subscribe(&self) -> watch::Receiver<PanelSnapshot> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> PanelSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Full working set, cloned. The UI and tests read through this; the
    /// panel itself only replaces it wholesale.
    pub async fn working_set(&self) -> Vec<RecordImageGroup> {
        self.state.lock().await.groups.clone()
    }

    pub async fn set_mode(&self, mode: FetchMode) {
        {
            let mut state = self.state.lock().await;
            state.mode = mode;
            // A mode flip may legitimately want to refetch the same field.
            state.last_fetched_field = None;
        }
        self.emit_snapshot().await;
    }

    pub async fn set_intensity(&self, intensity: u8) {
        {
            let mut state = self.state.lock().await;
            state.intensity = intensity.clamp(1, 100);
        }
        self.emit_snapshot().await;
    }

    /// The fetch trigger: reads the ambient selection and mode, applies the
    /// column-mode dedup, then runs the pipeline under the guard.
    ///
    /// Returns whether a pipeline run actually executed. Selection read
    /// failures are logged and swallowed; the next selection change retries
    /// naturally.
    pub async fn trigger_fetch(&self) -> Result<bool> {
        let selection = match self.host.selection().await {
            Ok(selection) => selection,
            Err(err) => {
                warn!("failed to read host selection: {err}");
                return Ok(false);
            }
        };

        // A cleared or partial selection never triggers; existing results
        // stay visible until a real fetch replaces them.
        let (Some(field_id), Some(record_id)) = (selection.field_id, selection.record_id) else {
            return Ok(false);
        };

        let (mode, last_fetched) = {
            let state = self.state.lock().await;
            (state.mode, state.last_fetched_field.clone())
        };

        if mode == FetchMode::Column && last_fetched.as_deref() == Some(field_id.as_str()) {
            info!("column fetch suppressed, field {field_id} already loaded");
            return Ok(false);
        }

        let ctx = SelectionContext {
            field_id,
            record_id,
            mode,
        };

        self.run_pipeline(ctx).await
    }

    /// One guarded pipeline run. A trigger that finds the panel busy is
    /// dropped, never queued; the in-flight run wins.
    async fn run_pipeline(&self, ctx: SelectionContext) -> Result<bool> {
        {
            let mut state = self.state.lock().await;
            if state.status != PanelStatus::Idle {
                info!("fetch trigger dropped, panel busy ({:?})", state.status);
                return Ok(false);
            }
            state.status = PanelStatus::Fetching;
        }
        self.emit_snapshot().await;

        let result = fetch::run_fetch(&self.host, &self.fetcher, &ctx).await;

        match result {
            Ok(outcome) => {
                *self.field.lock().await = Some(outcome.field);
                let mut state = self.state.lock().await;
                state.status = PanelStatus::Idle;
                state.groups = outcome.groups;
                state.last_fetched_field = Some(ctx.field_id);
            }
            Err(PanelError::SelectionUnavailable) => {
                let mut state = self.state.lock().await;
                state.status = PanelStatus::Idle;
                state.groups.clear();
            }
            Err(err) => {
                // Network or host failure mid-batch: degrade to an empty
                // working set, log only.
                error!("fetch pipeline failed: {err}");
                let mut state = self.state.lock().await;
                state.status = PanelStatus::Idle;
                state.groups.clear();
            }
        }

        self.emit_snapshot().await;
        Ok(true)
    }

    /// Apply the lossy transform to the whole working set at the current
    /// intensity. Copy-then-swap: on any codec failure the visible set is
    /// untouched. Returns whether a pass ran and replaced the set.
    pub async fn compress_now(&self) -> Result<bool> {
        let (groups, intensity) = {
            let mut state = self.state.lock().await;
            if state.status != PanelStatus::Idle || state.groups.is_empty() {
                info!("compress skipped, panel busy or working set empty");
                return Ok(false);
            }
            state.status = PanelStatus::Compressing;
            (state.groups.clone(), state.intensity)
        };
        self.emit_snapshot().await;

        let result = tokio::task::spawn_blocking(move || compress_working_set(groups, intensity))
            .await
            .context("compression worker join failed");

        let swapped = {
            let mut state = self.state.lock().await;
            state.status = PanelStatus::Idle;
            match result {
                Ok(Ok(compressed)) => {
                    state.groups = compressed;
                    true
                }
                Ok(Err(err)) => {
                    error!("compression pass aborted: {err}");
                    false
                }
                Err(err) => {
                    error!("compression worker failed: {err}");
                    false
                }
            }
        };

        self.emit_snapshot().await;
        Ok(swapped)
    }

    /// Write the working set back to the host. Per-record failures are
    /// aggregated into the outcome; nothing is rolled back.
    pub async fn apply_now(&self) -> Result<ApplyOutcome> {
        let groups = {
            let mut state = self.state.lock().await;
            if state.status != PanelStatus::Idle {
                bail!("panel busy, cannot apply");
            }
            if state.groups.is_empty() {
                bail!("nothing to apply");
            }
            state.status = PanelStatus::Applying;
            state.groups.clone()
        };
        self.emit_snapshot().await;

        let field = self.field.lock().await.clone();
        let outcome = match field {
            Some(field) => commit::apply_working_set(&field, &groups).await,
            None => {
                // No completed fetch, so nothing to write through.
                warn!("apply requested without a fetched field");
                ApplyOutcome {
                    success: false,
                    records_written: 0,
                    records_failed: groups.len(),
                }
            }
        };

        {
            let mut state = self.state.lock().await;
            state.status = PanelStatus::Idle;
        }
        self.emit_snapshot().await;

        Ok(outcome)
    }

    async fn emit_snapshot(&self) {
        let snapshot = self.state.lock().await.snapshot();
        let _ = self.events.send(snapshot);
    }
}
