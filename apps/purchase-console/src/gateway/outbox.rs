//! # Purchase Outbox
//!
//! Submission collaborator that appends each accepted purchase to a
//! JSON-lines file. A separate uploader forwards the entries to the
//! purchasing backend, which assigns series and number.
//!
//! ## Outbox File
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  purchases.jsonl (append-only, one entry per line)                      │
//! │                                                                         │
//! │  {"id":"6f1c…","entityType":"PURCHASE","payload":{…},"createdAt":"…"}   │
//! │  {"id":"a93e…","entityType":"PURCHASE","payload":{…},"createdAt":"…"}   │
//! │                                                                         │
//! │  submit() ──► serialize entry ──► append line ──► PurchaseReceipt       │
//! │                                                    reference = id       │
//! │  purchases() ──► read all lines ──► PURCHASE entries as receipts        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stockroom_core::{NewPurchase, PurchaseReceipt};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::{GatewayError, PurchaseGateway, PurchaseHistory};

/// Entity type tag written on every purchase entry.
pub const PURCHASE_ENTITY: &str = "PURCHASE";

/// One line of the outbox file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboxEntry {
    pub id: String,
    pub entity_type: String,
    pub payload: NewPurchase,
    pub created_at: DateTime<Utc>,
}

impl From<OutboxEntry> for PurchaseReceipt {
    fn from(entry: OutboxEntry) -> Self {
        PurchaseReceipt {
            reference: entry.id,
            submitted_at: entry.created_at,
            purchase: entry.payload,
        }
    }
}

/// Appends purchases to a JSON-lines outbox file.
#[derive(Debug)]
pub struct OutboxGateway {
    path: PathBuf,
    /// Serializes appends so lines never interleave.
    write_lock: Mutex<()>,
}

impl OutboxGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        OutboxGateway {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads back every entry in the outbox, oldest first.
    ///
    /// A missing file is an empty outbox.
    pub async fn entries(&self) -> Result<Vec<OutboxEntry>, GatewayError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(GatewayError::from))
            .collect()
    }
}

#[async_trait]
impl PurchaseGateway for OutboxGateway {
    async fn submit(&self, purchase: NewPurchase) -> Result<PurchaseReceipt, GatewayError> {
        let entry = OutboxEntry {
            id: Uuid::new_v4().to_string(),
            entity_type: PURCHASE_ENTITY.to_string(),
            payload: purchase,
            created_at: Utc::now(),
        };

        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!(path = ?self.path, bytes = line.len(), "Outbox entry appended");
        info!(
            reference = %entry.id,
            supplier_id = entry.payload.supplier_id,
            total = entry.payload.total,
            "Purchase queued in outbox"
        );

        Ok(entry.into())
    }
}

#[async_trait]
impl PurchaseHistory for OutboxGateway {
    async fn purchases(&self) -> Result<Vec<PurchaseReceipt>, GatewayError> {
        let entries = self.entries().await?;
        debug!(path = ?self.path, entries = entries.len(), "Outbox read");

        Ok(entries
            .into_iter()
            .filter(|e| e.entity_type == PURCHASE_ENTITY)
            .map(PurchaseReceipt::from)
            .collect())
    }
}
