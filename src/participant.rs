// Remote participant adapter
//
// One outbound call per round per side. The orchestrator owns the deadline;
// this module only knows how to ask a bot for its turns.

use async_trait::async_trait;
use log::debug;
use thiserror::Error;

use crate::types::Turn;
use crate::wire::{TurnRequest, TurnResponse};

/// Why a side ended up with no actions for a round
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("timed out after {0} ms")]
    Timeout(u64),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("bot answered with HTTP {0}")]
    Status(u16),
    #[error("could not decode response: {0}")]
    Decode(String),
}

/// Something that can play one side of a match
#[async_trait]
pub trait Participant: Send + Sync {
    async fn take_turn(&self, request: &TurnRequest) -> Result<Vec<Turn>, TurnError>;
}

/// Bot reachable over HTTP; each round is a POST to `<endpoint>/turn`
pub struct HttpParticipant {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpParticipant {
    pub fn new(endpoint: &str, client: reqwest::Client) -> Self {
        HttpParticipant {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Participant for HttpParticipant {
    async fn take_turn(&self, request: &TurnRequest) -> Result<Vec<Turn>, TurnError> {
        let url = format!("{}/turn", self.endpoint);
        let resp = self.client.post(&url).json(request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TurnError::Status(status.as_u16()));
        }

        let body = resp.bytes().await?;
        let parsed: TurnResponse =
            serde_json::from_slice(&body).map_err(|e| TurnError::Decode(e.to_string()))?;
        debug!(
            "{} returned {} turns for round {}",
            self.endpoint,
            parsed.turns.len(),
            request.board.board.round
        );
        Ok(parsed.turns)
    }
}
