// Persistence collaborator: bot identities, games and their replays
//
// The arena only talks to storage through the Datastore trait. MemoryStore is
// the in-process implementation used by the server and the tests.

use chrono::{DateTime, Utc};
use log::info;
use parking_lot::Mutex;
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::orchestrator::MatchOutcome;
use crate::replay::{Replay, RoundRecord};
use crate::wire::InitialBoard;

const ID_LENGTH: usize = 16;

/// Stored bot identity
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct AiId(pub String);

/// Stored game identity
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct GameId(pub String);

impl fmt::Display for AiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AiInfo {
    pub id: AiId,
    pub name: String,
}

/// Final result of a match as reported by the orchestrator
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub id: GameId,
    pub ai1: AiInfo,
    pub ai2: AiInfo,
    pub ai1_score: usize,
    pub ai2_score: usize,
    pub outcome: MatchOutcome,
    pub rounds: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("game {0} not found")]
    GameNotFound(GameId),
    #[error("bot {0} not found")]
    AiNotFound(AiId),
    #[error("game {0} is already finished")]
    GameFinished(GameId),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Storage interface the arena depends on
pub trait Datastore: Send + Sync {
    fn create_ai(&self, name: &str, token: &str) -> Result<AiId, StoreError>;
    fn ais_for_token(&self, token: &str) -> Result<Vec<AiInfo>, StoreError>;
    fn lookup_ai(&self, id: &AiId) -> Result<AiInfo, StoreError>;

    fn start_game(&self, ai1: &AiId, ai2: &AiId, initial: InitialBoard)
        -> Result<GameId, StoreError>;
    fn add_round(&self, id: &GameId, round: RoundRecord) -> Result<(), StoreError>;
    fn finish_game(&self, id: &GameId, summary: GameSummary) -> Result<(), StoreError>;
    fn lookup_game(&self, id: &GameId) -> Result<Replay, StoreError>;
    fn lookup_game_info(&self, id: &GameId) -> Result<GameSummary, StoreError>;
}

struct StoredGame {
    replay: Replay,
    summary: Option<GameSummary>,
}

#[derive(Default)]
struct Inner {
    ais: HashMap<AiId, (AiInfo, String)>,
    games: HashMap<GameId, StoredGame>,
}

/// In-memory datastore guarded by a single lock
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of games started so far
    pub fn game_count(&self) -> usize {
        self.inner.lock().games.len()
    }
}

fn gen_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LENGTH)
        .map(char::from)
        .collect()
}

impl Datastore for MemoryStore {
    fn create_ai(&self, name: &str, token: &str) -> Result<AiId, StoreError> {
        let id = AiId(gen_id());
        let info = AiInfo {
            id: id.clone(),
            name: name.to_string(),
        };
        self.inner
            .lock()
            .ais
            .insert(id.clone(), (info, token.to_string()));
        info!("Created bot {} ({})", name, id);
        Ok(id)
    }

    fn ais_for_token(&self, token: &str) -> Result<Vec<AiInfo>, StoreError> {
        let inner = self.inner.lock();
        let mut ais: Vec<AiInfo> = inner
            .ais
            .values()
            .filter(|(_, owner)| owner == token)
            .map(|(info, _)| info.clone())
            .collect();
        ais.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(ais)
    }

    fn lookup_ai(&self, id: &AiId) -> Result<AiInfo, StoreError> {
        self.inner
            .lock()
            .ais
            .get(id)
            .map(|(info, _)| info.clone())
            .ok_or_else(|| StoreError::AiNotFound(id.clone()))
    }

    fn start_game(
        &self,
        ai1: &AiId,
        ai2: &AiId,
        initial: InitialBoard,
    ) -> Result<GameId, StoreError> {
        let mut inner = self.inner.lock();
        for ai in [ai1, ai2] {
            if !inner.ais.contains_key(ai) {
                return Err(StoreError::AiNotFound(ai.clone()));
            }
        }
        let id = GameId(gen_id());
        inner.games.insert(
            id.clone(),
            StoredGame {
                replay: Replay::new(initial),
                summary: None,
            },
        );
        Ok(id)
    }

    fn add_round(&self, id: &GameId, round: RoundRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let game = inner
            .games
            .get_mut(id)
            .ok_or_else(|| StoreError::GameNotFound(id.clone()))?;
        if game.summary.is_some() {
            return Err(StoreError::GameFinished(id.clone()));
        }
        game.replay.rounds.push(round);
        Ok(())
    }

    fn finish_game(&self, id: &GameId, summary: GameSummary) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let game = inner
            .games
            .get_mut(id)
            .ok_or_else(|| StoreError::GameNotFound(id.clone()))?;
        if game.summary.is_some() {
            return Err(StoreError::GameFinished(id.clone()));
        }
        game.summary = Some(summary);
        Ok(())
    }

    fn lookup_game(&self, id: &GameId) -> Result<Replay, StoreError> {
        self.inner
            .lock()
            .games
            .get(id)
            .map(|game| game.replay.clone())
            .ok_or_else(|| StoreError::GameNotFound(id.clone()))
    }

    fn lookup_game_info(&self, id: &GameId) -> Result<GameSummary, StoreError> {
        let inner = self.inner.lock();
        let game = inner
            .games
            .get(id)
            .ok_or_else(|| StoreError::GameNotFound(id.clone()))?;
        game.summary
            .clone()
            .ok_or_else(|| StoreError::GameNotFound(id.clone()))
    }
}
