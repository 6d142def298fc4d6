use std::path::PathBuf;

use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

/// One captured inbound webhook request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookRecord {
    pub id: String,
    pub timestamp: String,
    pub headers: Value,
    pub body: Value,
}

impl WebhookRecord {
    /// Build a record for a request captured right now. The id and timestamp
    /// are assigned here, never taken from the caller's payload.
    pub fn new(headers: Value, body: Value) -> Self {
        WebhookRecord {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            headers,
            body,
        }
    }
}

/// Append-only store of webhook records, persisted as a single pretty-printed
/// JSON array on disk. Every operation re-reads the file; nothing is cached
/// across requests. Writes are not crash-atomic, which is acceptable for a
/// single-user local tool.
pub struct WebhookStore {
    dir: PathBuf,
    file_path: PathBuf,
}

impl WebhookStore {
    pub fn new(dir: PathBuf) -> Self {
        let file_path = dir.join("webhooks.json");
        WebhookStore { dir, file_path }
    }

    /// Create the storage directory and seed the backing file with an empty
    /// array if either is missing. Safe to call on every start.
    pub fn init(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create storage directory {}", self.dir.display())
        })?;

        if !self.file_path.exists() {
            std::fs::write(&self.file_path, "[]").with_context(|| {
                format!("Failed to create store file {}", self.file_path.display())
            })?;
        }

        Ok(())
    }

    /// Append one record to the backing file.
    ///
    /// A store file that no longer parses is an error, not a reset: silently
    /// replacing it would destroy the capture history.
    pub fn append(&self, record: WebhookRecord) -> anyhow::Result<()> {
        let content = std::fs::read_to_string(&self.file_path).with_context(|| {
            format!("Failed to read store file {}", self.file_path.display())
        })?;
        let mut records: Vec<WebhookRecord> = serde_json::from_str(&content).with_context(|| {
            format!("Store file {} contains invalid JSON", self.file_path.display())
        })?;

        records.push(record);

        let content = serde_json::to_string_pretty(&records)
            .context("Failed to serialize webhook records")?;
        std::fs::write(&self.file_path, content).with_context(|| {
            format!("Failed to write store file {}", self.file_path.display())
        })?;

        Ok(())
    }

    /// Read the full capture history, oldest first. A missing or corrupt file
    /// degrades to an empty list so the polling viewer keeps working.
    pub fn read_all(&self) -> Vec<WebhookRecord> {
        let content = match std::fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(_) => return vec![],
        };

        match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(err) => {
                warn!("Store file is unreadable, serving empty history: {}", err);
                vec![]
            }
        }
    }
}
