// Wire types exchanged with participants and stored in replays
// See the turn request/response shapes in README.md

use serde::{Deserialize, Serialize};

use crate::engine::Board;
use crate::types::{CellType, Faction, Loc, RobotId, Turn};

/// Faction as seen by the recipient of a snapshot
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RelativeFaction {
    Mine,
    Opponent,
}

/// One robot in a snapshot
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RobotSnapshot {
    pub id: RobotId,
    pub x: i32,
    pub y: i32,
    pub health: i32,
    pub faction: RelativeFaction,
}

impl RobotSnapshot {
    pub fn loc(&self) -> Loc {
        Loc::new(self.x, self.y)
    }
}

/// Board state relative to one faction
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    pub width: i32,
    pub height: i32,
    pub round: u32,
    pub robots: Vec<RobotSnapshot>,
}

/// Snapshot plus the full cell grid, row-major
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct InitialBoard {
    pub board: BoardSnapshot,
    pub cells: Vec<CellType>,
}

impl InitialBoard {
    /// Cell type at (x, y), invalid when off the grid or when the grid is short
    pub fn cell_type(&self, x: i32, y: i32) -> CellType {
        let (w, h) = (self.board.width, self.board.height);
        if x < 0 || y < 0 || x >= w || y >= h {
            return CellType::Invalid;
        }
        self.cells
            .get((y * w + x) as usize)
            .copied()
            .unwrap_or(CellType::Invalid)
    }
}

/// Body POSTed to a participant's `/turn` endpoint each round
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TurnRequest {
    pub game_id: String,
    pub board: InitialBoard,
}

/// A participant's answer: one action per robot it wants to command
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct TurnResponse {
    #[serde(default)]
    pub turns: Vec<Turn>,
}

/// Converts the board to the wire representation with respect to the given
/// faction, since the wire only knows "mine" and "opponent"
pub fn snapshot(board: &Board, viewer: Faction) -> BoardSnapshot {
    let robots = board
        .robots()
        .map(|(loc, robot)| RobotSnapshot {
            id: robot.id,
            x: loc.x,
            y: loc.y,
            health: robot.health,
            faction: if robot.faction == viewer {
                RelativeFaction::Mine
            } else {
                RelativeFaction::Opponent
            },
        })
        .collect();

    BoardSnapshot {
        game_id: None,
        width: board.width(),
        height: board.height(),
        round: board.round(),
        robots,
    }
}

/// Snapshot carrying the cell grid as well
pub fn initial_snapshot(board: &Board, viewer: Faction) -> InitialBoard {
    InitialBoard {
        board: snapshot(board, viewer),
        cells: board.cells().to_vec(),
    }
}

/// Builds the per-round request for one side
pub fn turn_request(game_id: &str, board: &Board, viewer: Faction) -> TurnRequest {
    let mut initial = initial_snapshot(board, viewer);
    initial.board.game_id = Some(game_id.to_string());
    TurnRequest {
        game_id: game_id.to_string(),
        board: initial,
    }
}
