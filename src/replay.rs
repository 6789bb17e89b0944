// Replay module: the persisted record of a match and its playback
//
// This module provides functionality to:
// 1. Describe replays (initial board + one record per round)
// 2. Load and save replays as JSON
// 3. Rebuild per-round board views for rendering and analysis

use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::types::{CellType, Loc, Turn};
use crate::wire::{BoardSnapshot, InitialBoard, RelativeFaction, RobotSnapshot};

/// One round's end state plus every action submitted for it
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RoundRecord {
    pub end_board: BoardSnapshot,
    pub moves: Vec<Turn>,
}

/// Initial board followed by an append-only list of rounds.
/// Snapshots are relative to P1, so "mine" means P1.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Replay {
    pub initial: InitialBoard,
    pub rounds: Vec<RoundRecord>,
}

impl Replay {
    pub fn new(initial: InitialBoard) -> Self {
        Replay {
            initial,
            rounds: Vec::new(),
        }
    }

    /// Loads a replay from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let file = File::open(path.as_ref())
            .map_err(|e| format!("Failed to open replay file: {}", e))?;
        let replay: Replay = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| format!("Failed to parse replay: {}", e))?;
        info!("Loaded replay with {} rounds", replay.rounds.len());
        Ok(replay)
    }

    /// Writes the replay as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let file = File::create(path.as_ref())
            .map_err(|e| format!("Failed to create replay file: {}", e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .map_err(|e| format!("Failed to write replay: {}", e))
    }
}

/// Board state at one point of a replay
#[derive(Debug, Clone)]
pub struct Frame {
    pub round: u32,
    pub width: i32,
    pub height: i32,
    pub robots: Vec<RobotSnapshot>,
}

impl Frame {
    fn from_snapshot(snapshot: &BoardSnapshot) -> Self {
        Frame {
            round: snapshot.round,
            width: snapshot.width,
            height: snapshot.height,
            robots: snapshot.robots.clone(),
        }
    }

    pub fn robot_at(&self, loc: Loc) -> Option<&RobotSnapshot> {
        self.robots.iter().find(|r| r.loc() == loc)
    }

    /// (P1 robots, P2 robots)
    pub fn counts(&self) -> (usize, usize) {
        let p1 = self
            .robots
            .iter()
            .filter(|r| r.faction == RelativeFaction::Mine)
            .count();
        (p1, self.robots.len() - p1)
    }
}

/// Every board of a replay in order, sharing the initial cell grid
#[derive(Debug, Clone)]
pub struct Playback {
    cells: InitialBoard,
    frames: Vec<Frame>,
}

impl Playback {
    pub fn new(replay: &Replay) -> Self {
        let mut frames = Vec::with_capacity(replay.rounds.len() + 1);
        frames.push(Frame::from_snapshot(&replay.initial.board));
        frames.extend(
            replay
                .rounds
                .iter()
                .map(|round| Frame::from_snapshot(&round.end_board)),
        );
        Playback {
            cells: replay.initial.clone(),
            frames,
        }
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, idx: usize) -> Option<&Frame> {
        self.frames.get(idx)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn cell_type(&self, loc: Loc) -> CellType {
        self.cells.cell_type(loc.x, loc.y)
    }

    /// ASCII rendering: '#' invalid, '.' valid, ':' spawn, 'A'/'B' for P1/P2
    pub fn render(&self, idx: usize) -> Option<String> {
        let frame = self.frame(idx)?;
        let mut out = String::with_capacity(((frame.width + 1) * frame.height) as usize);
        for y in 0..frame.height {
            for x in 0..frame.width {
                let loc = Loc::new(x, y);
                let ch = match frame.robot_at(loc) {
                    Some(r) if r.faction == RelativeFaction::Mine => 'A',
                    Some(_) => 'B',
                    None => match self.cell_type(loc) {
                        CellType::Invalid => '#',
                        CellType::Valid => '.',
                        CellType::Spawn => ':',
                    },
                };
                out.push(ch);
            }
            out.push('\n');
        }
        Some(out)
    }
}
