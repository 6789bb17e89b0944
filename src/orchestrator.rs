// Match orchestrator
//
// Drives one board from creation to the round limit. Every round both sides
// are asked for their turns concurrently, each under its own deadline, and
// whatever came back is fed to Board::update. A side that fails or times out
// simply does nothing that round.

use chrono::Utc;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

use crate::config::{BoardConfig, Config, RulesConfig};
use crate::engine::Board;
use crate::error::ArenaError;
use crate::participant::TurnError;
use crate::registry::OnlineAi;
use crate::replay::RoundRecord;
use crate::round_logger::RoundLogger;
use crate::store::{Datastore, GameId, GameSummary};
use crate::types::{Faction, Turn};
use crate::wire::{initial_snapshot, snapshot, turn_request, TurnRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    Created,
    Running,
    Completed,
    Aborted,
}

/// Winner by robot count once the round limit is reached
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    P1Win,
    P2Win,
    Tie,
}

impl MatchOutcome {
    pub fn from_counts(p1: usize, p2: usize) -> Self {
        match p1.cmp(&p2) {
            std::cmp::Ordering::Greater => MatchOutcome::P1Win,
            std::cmp::Ordering::Less => MatchOutcome::P2Win,
            std::cmp::Ordering::Equal => MatchOutcome::Tie,
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchOutcome::P1Win => "Player 1 wins",
            MatchOutcome::P2Win => "Player 2 wins",
            MatchOutcome::Tie => "Tie",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub game_id: GameId,
    pub p1_score: usize,
    pub p2_score: usize,
    pub outcome: MatchOutcome,
    pub rounds: u32,
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P1: {} P2: {} - {}",
            self.p1_score, self.p2_score, self.outcome
        )
    }
}

/// One match between two connected bots
pub struct Match {
    state: MatchState,
    board_config: BoardConfig,
    rules: RulesConfig,
    turn_timeout: Duration,
    p1: OnlineAi,
    p2: OnlineAi,
    store: Arc<dyn Datastore>,
    logger: RoundLogger,
}

impl Match {
    pub fn new(
        config: &Config,
        p1: OnlineAi,
        p2: OnlineAi,
        store: Arc<dyn Datastore>,
        logger: RoundLogger,
    ) -> Self {
        Match {
            state: MatchState::Created,
            board_config: config.board.clone(),
            rules: config.rules,
            turn_timeout: config.orchestrator.turn_timeout(),
            p1,
            p2,
            store,
            logger,
        }
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    /// Runs the match to completion. The game id is sent on `started` as
    /// soon as the game exists in the store.
    pub async fn run(
        &mut self,
        started: Option<oneshot::Sender<GameId>>,
    ) -> Result<MatchResult, ArenaError> {
        let result = self.run_inner(started).await;
        self.state = match &result {
            Ok(_) => MatchState::Completed,
            Err(e) => {
                error!(
                    "Match between {} and {} aborted: {}",
                    self.p1.info.name, self.p2.info.name, e
                );
                MatchState::Aborted
            }
        };
        result
    }

    async fn run_inner(
        &mut self,
        started: Option<oneshot::Sender<GameId>>,
    ) -> Result<MatchResult, ArenaError> {
        let start_time = Utc::now();
        let mut board = Board::new(&self.board_config, self.rules)?;
        let game_id = self.store.start_game(
            &self.p1.info.id,
            &self.p2.info.id,
            initial_snapshot(&board, Faction::P1),
        )?;

        if let Some(tx) = started {
            // The caller may have stopped waiting; the match goes on regardless
            let _ = tx.send(game_id.clone());
        }
        self.state = MatchState::Running;
        info!(
            "Game {} started: {} vs {}",
            game_id, self.p1.info.name, self.p2.info.name
        );

        while !board.is_finished() {
            self.play_round(&game_id, &mut board).await?;
        }

        let p1_score = board.robot_count(Faction::P1);
        let p2_score = board.robot_count(Faction::P2);
        let outcome = MatchOutcome::from_counts(p1_score, p2_score);
        self.store.finish_game(
            &game_id,
            GameSummary {
                id: game_id.clone(),
                ai1: self.p1.info.clone(),
                ai2: self.p2.info.clone(),
                ai1_score: p1_score,
                ai2_score: p2_score,
                outcome,
                rounds: board.round(),
                start_time,
                end_time: Utc::now(),
            },
        )?;

        let result = MatchResult {
            game_id,
            p1_score,
            p2_score,
            outcome,
            rounds: board.round(),
        };
        info!("Game {} finished: {}", result.game_id, result);
        Ok(result)
    }

    async fn play_round(&self, game_id: &GameId, board: &mut Board) -> Result<(), ArenaError> {
        let request_a = turn_request(&game_id.0, board, Faction::P1);
        let request_b = turn_request(&game_id.0, board, Faction::P2);

        let (turns_a, turns_b) = tokio::join!(
            fetch_turns(&self.p1, &request_a, self.turn_timeout),
            fetch_turns(&self.p2, &request_b, self.turn_timeout),
        );

        let summary = board.update(&turns_a, &turns_b);
        let record = RoundRecord {
            end_board: snapshot(board, Faction::P1),
            moves: turns_a.into_iter().chain(turns_b).collect(),
        };
        debug!(
            "Game {} round {}: {} moved, {} collisions, {} deaths, {} spawned",
            game_id,
            board.round(),
            summary.moved,
            summary.collisions,
            summary.deaths,
            summary.spawned
        );

        self.logger.log_round(&game_id.0, summary, &record);
        self.store.add_round(game_id, record)?;
        Ok(())
    }
}

/// Asks one side for its turns. Any failure is logged and yields no turns.
async fn fetch_turns(side: &OnlineAi, request: &TurnRequest, deadline: Duration) -> Vec<Turn> {
    let result = match tokio::time::timeout(deadline, side.client.take_turn(request)).await {
        Ok(result) => result,
        Err(_) => Err(TurnError::Timeout(deadline.as_millis() as u64)),
    };

    match result {
        Ok(turns) => turns,
        Err(e) => {
            warn!(
                "{} gave no turns for round {}: {}",
                side.info.name, request.board.board.round, e
            );
            Vec::new()
        }
    }
}
