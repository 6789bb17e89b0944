// Arena service: the state the hosting process owns
//
// Holds the registry of online bots, the datastore and the shared HTTP client,
// and exposes one method per HTTP endpoint. Matches run as background tasks.

use log::{error, info};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::oneshot;

use crate::config::Config;
use crate::error::ArenaError;
use crate::orchestrator::Match;
use crate::participant::HttpParticipant;
use crate::registry::Registry;
use crate::replay::Replay;
use crate::round_logger::RoundLogger;
use crate::store::{AiId, AiInfo, Datastore, GameId, GameSummary};

/// Body of POST /register
#[derive(Deserialize, Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub token: String,
    pub endpoint: String,
}

/// Body of POST /unregister
#[derive(Deserialize, Debug, Clone)]
pub struct UnregisterRequest {
    pub name: String,
    pub token: String,
}

/// Body of POST /match
#[derive(Deserialize, Debug, Clone)]
pub struct MatchRequest {
    pub ai1: AiId,
    pub ai2: AiId,
}

pub struct Arena {
    config: Config,
    store: Arc<dyn Datastore>,
    registry: Registry,
    logger: RoundLogger,
    client: reqwest::Client,
}

impl Arena {
    /// # Arguments
    /// * `config` - Static configuration shared by every match
    /// * `store` - Persistence for bots and games
    /// * `logger` - Round log handle, possibly disabled
    pub fn new(config: Config, store: Arc<dyn Datastore>, logger: RoundLogger) -> Self {
        let registry = Registry::new(store.clone(), config.registry.max_name_length);
        Arena {
            config,
            store,
            registry,
            logger,
            client: reqwest::Client::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Service metadata and the bots currently online
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        let online = self.registry.list_online();
        json!({
            "service": "robot-arena",
            "version": env!("CARGO_PKG_VERSION"),
            "board": {
                "width": self.config.board.width,
                "height": self.config.board.height,
            },
            "round_limit": self.config.rules.round_limit,
            "online": online,
        })
    }

    /// Corresponds to POST /register endpoint
    pub fn register(&self, req: &RegisterRequest) -> Result<AiInfo, ArenaError> {
        if req.endpoint.trim().is_empty() {
            return Err(ArenaError::BadRequest("missing endpoint".to_string()));
        }
        let client = Arc::new(HttpParticipant::new(&req.endpoint, self.client.clone()));
        self.registry.register(&req.name, &req.token, client)
    }

    /// Corresponds to POST /unregister endpoint
    pub fn unregister(&self, req: &UnregisterRequest) -> Result<AiInfo, ArenaError> {
        self.registry.unregister(&req.name, &req.token)
    }

    /// Starts a match between two online bots in the background and returns
    /// its game id once the game has been created.
    /// Corresponds to POST /match endpoint
    pub async fn start_match(&self, req: &MatchRequest) -> Result<GameId, ArenaError> {
        if req.ai1 == req.ai2 {
            return Err(ArenaError::BadRequest(
                "a bot cannot play against itself".to_string(),
            ));
        }
        let p1 = self
            .registry
            .lookup_online(&req.ai1)
            .ok_or_else(|| ArenaError::NotOnline(req.ai1.to_string()))?;
        let p2 = self
            .registry
            .lookup_online(&req.ai2)
            .ok_or_else(|| ArenaError::NotOnline(req.ai2.to_string()))?;

        info!("Starting match {} vs {}", p1.info.name, p2.info.name);
        let mut game = Match::new(
            &self.config,
            p1,
            p2,
            self.store.clone(),
            self.logger.clone(),
        );
        let (tx, rx) = oneshot::channel();
        let handle = tokio::spawn(async move { game.run(Some(tx)).await });

        match rx.await {
            Ok(game_id) => Ok(game_id),
            // The sender is only dropped unsent when the match failed to start
            Err(_) => match handle.await {
                Ok(Err(e)) => Err(e),
                Ok(Ok(_)) => Err(ArenaError::MatchNotStarted),
                Err(e) => {
                    error!("Match task failed: {}", e);
                    Err(ArenaError::MatchNotStarted)
                }
            },
        }
    }

    /// Corresponds to GET /game/<id> endpoint
    pub fn lookup_game(&self, id: &GameId) -> Result<Replay, ArenaError> {
        Ok(self.store.lookup_game(id)?)
    }

    /// Corresponds to GET /game/<id>/info endpoint
    pub fn lookup_game_info(&self, id: &GameId) -> Result<GameSummary, ArenaError> {
        Ok(self.store.lookup_game_info(id)?)
    }
}
