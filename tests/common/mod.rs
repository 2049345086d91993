//! In-memory host and fetcher doubles for driving the panel end to end.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use cellpress::{
    AttachmentFetcher, AttachmentField, AttachmentRef, FetchedBytes, FileContents, HostBase,
    HostError, HostTable, PanelError, Selection,
};

pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn image_ref(token: &str, name: &str, size: u64, mime: &str) -> AttachmentRef {
    AttachmentRef {
        token: token.to_string(),
        name: name.to_string(),
        size,
        mime_type: mime.to_string(),
    }
}

pub fn mock_url(token: &str) -> String {
    format!("mock://{token}")
}

/// Two-phase handshake used to hold a fetch mid-flight: the fetcher signals
/// `entered` on its first download, then parks until `release`.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
pub struct MockFetcher {
    responses: Mutex<HashMap<String, FetchedBytes>>,
    failing: Mutex<HashSet<String>>,
    pub calls: AtomicUsize,
    gate: Option<Arc<Gate>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(gate: Arc<Gate>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub async fn respond(&self, token: &str, bytes: Vec<u8>, mime: &str) {
        self.responses.lock().await.insert(
            mock_url(token),
            FetchedBytes {
                bytes,
                mime: Some(mime.to_string()),
            },
        );
    }

    pub async fn fail(&self, token: &str) {
        self.failing.lock().await.insert(mock_url(token));
    }
}

#[async_trait]
impl AttachmentFetcher for MockFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<FetchedBytes, PanelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        if self.failing.lock().await.contains(url) {
            return Err(PanelError::NetworkFetch {
                url: url.to_string(),
                reason: "status 403 Forbidden".to_string(),
            });
        }

        self.responses
            .lock()
            .await
            .get(url)
            .cloned()
            .ok_or_else(|| PanelError::NetworkFetch {
                url: url.to_string(),
                reason: "no canned response".to_string(),
            })
    }
}

#[derive(Default)]
pub struct MockField {
    values: Mutex<HashMap<String, Vec<AttachmentRef>>>,
    write_results: Mutex<HashMap<String, bool>>,
    write_errors: Mutex<HashSet<String>>,
    pub writes: Mutex<Vec<(String, Vec<FileContents>)>>,
    pub value_calls: AtomicUsize,
}

impl MockField {
    pub async fn put(&self, record_id: &str, refs: Vec<AttachmentRef>) {
        self.values.lock().await.insert(record_id.to_string(), refs);
    }

    pub async fn reject_write(&self, record_id: &str) {
        self.write_results
            .lock()
            .await
            .insert(record_id.to_string(), false);
    }

    pub async fn error_write(&self, record_id: &str) {
        self.write_errors.lock().await.insert(record_id.to_string());
    }
}

#[async_trait]
impl AttachmentField for MockField {
    async fn value(&self, record_id: &str) -> Result<Vec<AttachmentRef>, HostError> {
        self.value_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .values
            .lock()
            .await
            .get(record_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_value(
        &self,
        record_id: &str,
        files: Vec<FileContents>,
    ) -> Result<bool, HostError> {
        if self.write_errors.lock().await.contains(record_id) {
            return Err(HostError::Api("write rejected by host".to_string()));
        }

        let accepted = self
            .write_results
            .lock()
            .await
            .get(record_id)
            .copied()
            .unwrap_or(true);

        if accepted {
            self.writes
                .lock()
                .await
                .push((record_id.to_string(), files));
        }

        Ok(accepted)
    }
}

pub struct MockTable {
    pub field_id: String,
    pub records: Vec<String>,
    pub field: Arc<MockField>,
}

#[async_trait]
impl HostTable for MockTable {
    async fn attachment_field(
        &self,
        field_id: &str,
    ) -> Result<Arc<dyn AttachmentField>, HostError> {
        if field_id != self.field_id {
            return Err(HostError::Unavailable(format!("no field {field_id}")));
        }
        Ok(self.field.clone())
    }

    async fn record_ids(&self) -> Result<Vec<String>, HostError> {
        Ok(self.records.clone())
    }

    async fn attachment_url(&self, token: &str) -> Result<String, HostError> {
        Ok(mock_url(token))
    }
}

pub struct MockHost {
    pub selection: Mutex<Selection>,
    pub table: Arc<MockTable>,
    pub active_table_calls: AtomicUsize,
}

impl MockHost {
    pub fn new(field_id: &str, records: &[&str]) -> Self {
        Self {
            selection: Mutex::new(Selection::default()),
            table: Arc::new(MockTable {
                field_id: field_id.to_string(),
                records: records.iter().map(|r| r.to_string()).collect(),
                field: Arc::new(MockField::default()),
            }),
            active_table_calls: AtomicUsize::new(0),
        }
    }

    pub fn field(&self) -> Arc<MockField> {
        self.table.field.clone()
    }

    pub async fn select(&self, field_id: &str, record_id: &str) {
        *self.selection.lock().await = Selection {
            field_id: Some(field_id.to_string()),
            record_id: Some(record_id.to_string()),
        };
    }

    pub async fn clear_selection(&self) {
        *self.selection.lock().await = Selection::default();
    }
}

#[async_trait]
impl HostBase for MockHost {
    async fn active_table(&self) -> Result<Arc<dyn HostTable>, HostError> {
        self.active_table_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.table.clone())
    }

    async fn selection(&self) -> Result<Selection, HostError> {
        Ok(self.selection.lock().await.clone())
    }
}
