// Round log for asynchronous per-round match logging
//
// Fire-and-forget writes so a slow disk never holds up a match. Each round of
// every match is appended to a JSONL file.

use log::error;
use serde::Serialize;
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::engine::RoundSummary;
use crate::replay::RoundRecord;

#[derive(Debug, Serialize)]
struct RoundLogEntry {
    game_id: String,
    round: u32,
    summary: RoundSummary,
    record: RoundRecord,
    timestamp: String,
}

/// Shared round log handle, cloned into every match task
#[derive(Clone)]
pub struct RoundLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl RoundLogger {
    /// Opens the log file (truncating it). Falls back to disabled on failure.
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Round logging enabled: {}", log_file_path);
                RoundLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create round log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        RoundLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Queues one round for writing without waiting on the file
    pub fn log_round(&self, game_id: &str, summary: RoundSummary, record: &RoundRecord) {
        if !self.enabled {
            return;
        }

        let entry = RoundLogEntry {
            game_id: game_id.to_string(),
            round: record.end_board.round,
            summary,
            record: record.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        let file_handle = self.file.clone();

        tokio::spawn(async move {
            Self::write_entry(file_handle, entry).await;
        });
    }

    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: RoundLogEntry) {
        let mut file_guard = file_handle.lock().await;

        if let Some(file) = file_guard.as_mut() {
            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    let line = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line.as_bytes()).await {
                        error!("Failed to write round log entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush round log: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize round log entry: {}", e);
                }
            }
        }
    }
}
