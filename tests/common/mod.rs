// Shared fixtures for the match-level integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;

use robot_arena::config::Config;
use robot_arena::engine::spawner::SpawnerKind;
use robot_arena::engine::typer::TyperKind;
use robot_arena::participant::{Participant, TurnError};
use robot_arena::types::Turn;
use robot_arena::wire::{RelativeFaction, TurnRequest};

/// Small, fast, fully deterministic configuration
pub fn test_config(round_limit: u32, turn_timeout_ms: u64) -> Config {
    let mut config = Config::default_hardcoded();
    config.board.width = 7;
    config.board.height = 7;
    config.board.typer = TyperKind::Circle;
    config.board.spawner = SpawnerKind::All;
    config.rules.round_limit = round_limit;
    config.rules.spawn_spacing = 0;
    config.orchestrator.turn_timeout_ms = turn_timeout_ms;
    config
}

/// How a scripted participant behaves every round
pub enum Behaviour {
    /// Answers with no turns
    Idle,
    /// Guards with every robot it owns
    GuardAll,
    /// Sleeps past any reasonable deadline
    Stall(Duration),
    /// Fails every call
    Broken,
}

/// Participant driven by a fixed behaviour that remembers every request
pub struct ScriptedBot {
    behaviour: Behaviour,
    pub requests: Mutex<Vec<TurnRequest>>,
}

impl ScriptedBot {
    pub fn new(behaviour: Behaviour) -> Self {
        ScriptedBot {
            behaviour,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Participant for ScriptedBot {
    async fn take_turn(&self, request: &TurnRequest) -> Result<Vec<Turn>, TurnError> {
        self.requests.lock().push(request.clone());
        match &self.behaviour {
            Behaviour::Idle => Ok(Vec::new()),
            Behaviour::GuardAll => Ok(request
                .board
                .board
                .robots
                .iter()
                .filter(|r| r.faction == RelativeFaction::Mine)
                .map(|r| Turn {
                    id: r.id,
                    action: robot_arena::types::Action::Guard,
                })
                .collect()),
            Behaviour::Stall(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(Vec::new())
            }
            Behaviour::Broken => Err(TurnError::Status(500)),
        }
    }
}
