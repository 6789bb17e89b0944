// Configuration module for reading Arena.toml
// This module provides OOP-style configuration management for the arena server

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::engine::spawner::SpawnerKind;
use crate::engine::typer::TyperKind;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub board: BoardConfig,
    pub rules: RulesConfig,
    pub orchestrator: OrchestratorConfig,
    pub registry: RegistryConfig,
    pub round_log: RoundLogConfig,
}

/// Board geometry and the strategies used to lay it out
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BoardConfig {
    pub width: i32,
    pub height: i32,
    pub typer: TyperKind,
    pub spawner: SpawnerKind,
    /// 1-in-n odds used by the random spawner
    pub spawn_odds: u32,
    /// Fixed seed for the random spawner. Unset means a fresh seed per board.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Damage table and pacing of a match
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct RulesConfig {
    pub initial_health: i32,
    pub collision_damage: i32,
    pub attack_damage: i32,
    pub destruct_damage: i32,
    pub round_limit: u32,
    /// Rounds between respawn waves; 0 disables respawning
    pub spawn_spacing: u32,
}

/// Match orchestration timing
#[derive(Debug, Deserialize, Clone)]
pub struct OrchestratorConfig {
    pub turn_timeout_ms: u64,
}

impl OrchestratorConfig {
    pub fn turn_timeout(&self) -> Duration {
        Duration::from_millis(self.turn_timeout_ms)
    }
}

/// Participant registration limits
#[derive(Debug, Deserialize, Clone)]
pub struct RegistryConfig {
    pub max_name_length: usize,
}

/// Round log configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RoundLogConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            initial_health: 50,
            collision_damage: 5,
            attack_damage: 10,
            destruct_damage: 15,
            round_limit: 100,
            spawn_spacing: 10,
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads configuration from the default location (Arena.toml in the working directory)
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Arena.toml")
    }

    /// Built-in defaults, kept in sync with Arena.toml
    pub fn default_hardcoded() -> Self {
        Config {
            board: BoardConfig {
                width: 17,
                height: 17,
                typer: TyperKind::Circle,
                spawner: SpawnerKind::Random,
                spawn_odds: 2,
                seed: None,
            },
            rules: RulesConfig::default(),
            orchestrator: OrchestratorConfig {
                turn_timeout_ms: 30_000,
            },
            registry: RegistryConfig {
                max_name_length: 64,
            },
            round_log: RoundLogConfig {
                enabled: false,
                log_file_path: "arena_rounds.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!(
                "Could not load Arena.toml ({}), using hardcoded defaults",
                e
            );
            Self::default_hardcoded()
        })
    }
}
