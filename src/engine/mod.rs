//! Turn resolution engine.
//!
//! [`Board`] owns the grid, the robots and the round counter. [`Board::update`]
//! advances exactly one round: movement, then attacks, then self-destructs,
//! each followed by removal of the dead, then the round counter and respawns.
//! Nothing in here blocks or performs I/O, and no participant input can make
//! it panic.

pub mod resolve;
pub mod spawner;
pub mod typer;

use log::trace;
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::config::{BoardConfig, RulesConfig};
use crate::types::{Action, CellType, Faction, Loc, Robot, RobotId, Turn};
use resolve::{resolve_moves, MoveStatus, Mover};
use spawner::Spawner;
use typer::CellTyper;

/// Board construction and seeding errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board dimensions must be positive, got {width}x{height}")]
    InvalidSize { width: i32, height: i32 },
    #[error("cell {0} cannot hold a robot")]
    NotOccupiable(Loc),
    #[error("cell {0} is already occupied")]
    Occupied(Loc),
    #[error("robot {0} is already on the board")]
    DuplicateRobot(RobotId),
}

/// What happened during one call to [`Board::update`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    pub moved: usize,
    pub collisions: usize,
    pub deaths: usize,
    pub spawned: usize,
}

/// The authoritative state of one match
pub struct Board {
    width: i32,
    height: i32,
    /// Row-major cell types, `y * width + x`
    cells: Vec<CellType>,
    /// Row-major occupancy, parallel to `cells`
    occupants: Vec<Option<Robot>>,
    /// Derived id -> location index, kept in step with `occupants`
    locations: BTreeMap<RobotId, Loc>,
    /// Left-half spawn cells in column-major order; P2 uses their mirrors
    spawn_points: Vec<Loc>,
    round: u32,
    next_id: u32,
    rules: RulesConfig,
    spawner: Box<dyn Spawner>,
}

impl Board {
    /// Builds a board from configuration and spawns the first wave
    pub fn new(config: &BoardConfig, rules: RulesConfig) -> Result<Self, BoardError> {
        let typer = config.typer.build(config.width, config.height);
        let spawner = config.spawner.build(config.spawn_odds, config.seed);
        let mut board = Self::empty(config.width, config.height, rules, typer.as_ref(), spawner)?;
        board.init();
        Ok(board)
    }

    /// Builds a typed board with no robots on it
    pub fn empty(
        width: i32,
        height: i32,
        rules: RulesConfig,
        typer: &dyn CellTyper,
        spawner: Box<dyn Spawner>,
    ) -> Result<Self, BoardError> {
        if width <= 0 || height <= 0 {
            return Err(BoardError::InvalidSize { width, height });
        }

        let size = (width * height) as usize;
        let mut cells = Vec::with_capacity(size);
        for y in 0..height {
            for x in 0..width {
                cells.push(typer.cell_type(x, y));
            }
        }

        let mut board = Board {
            width,
            height,
            cells,
            occupants: vec![None; size],
            locations: BTreeMap::new(),
            spawn_points: Vec::new(),
            round: 0,
            next_id: 0,
            rules,
            spawner,
        };
        board.spawn_points = board.left_spawn_points();
        Ok(board)
    }

    /// Populates the opening wave
    pub fn init(&mut self) {
        let spawned = self.spawn_wave();
        trace!("Initial wave placed {} robots", spawned);
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// True once the round limit has been reached
    pub fn is_finished(&self) -> bool {
        self.round >= self.rules.round_limit
    }

    /// Cell type at `loc`; anything off the board is invalid
    pub fn cell_type(&self, loc: Loc) -> CellType {
        self.index(loc)
            .map(|idx| self.cells[idx])
            .unwrap_or(CellType::Invalid)
    }

    /// Row-major cell types, `width * height` entries
    pub fn cells(&self) -> &[CellType] {
        &self.cells
    }

    /// The robot standing at `loc`, if any
    pub fn at(&self, loc: Loc) -> Option<&Robot> {
        self.index(loc).and_then(|idx| self.occupants[idx].as_ref())
    }

    pub fn location(&self, id: RobotId) -> Option<Loc> {
        self.locations.get(&id).copied()
    }

    pub fn robot(&self, id: RobotId) -> Option<&Robot> {
        self.location(id).and_then(|loc| self.at(loc))
    }

    /// All robots with their locations, ordered by id
    pub fn robots(&self) -> impl Iterator<Item = (Loc, &Robot)> + '_ {
        self.locations
            .values()
            .filter_map(move |&loc| self.at(loc).map(|robot| (loc, robot)))
    }

    pub fn robot_count(&self, faction: Faction) -> usize {
        self.robots().filter(|(_, r)| r.faction == faction).count()
    }

    /// Places a robot directly, bypassing spawn waves. Used to seed boards for
    /// tests and fixtures.
    pub fn place_robot(&mut self, robot: Robot, loc: Loc) -> Result<(), BoardError> {
        let idx = match self.index(loc) {
            Some(idx) if self.cells[idx].is_occupiable() => idx,
            _ => return Err(BoardError::NotOccupiable(loc)),
        };
        if self.occupants[idx].is_some() {
            return Err(BoardError::Occupied(loc));
        }
        if self.locations.contains_key(&robot.id) {
            return Err(BoardError::DuplicateRobot(robot.id));
        }
        self.next_id = self.next_id.max(robot.id.0);
        self.occupants[idx] = Some(robot);
        self.locations.insert(robot.id, loc);
        Ok(())
    }

    /// Advances the board by exactly one round
    pub fn update(&mut self, turns_a: &[Turn], turns_b: &[Turn]) -> RoundSummary {
        let mut summary = RoundSummary::default();

        let mut actions = BTreeMap::new();
        self.collect_actions(Faction::P1, turns_a, &mut actions);
        self.collect_actions(Faction::P2, turns_b, &mut actions);

        let (moved, collisions) = self.apply_movement(&actions);
        summary.moved = moved;
        summary.collisions = collisions;
        summary.deaths += self.clear_the_dead();

        self.issue_attacks(&actions);
        summary.deaths += self.clear_the_dead();

        self.issue_self_destructs(&actions);
        summary.deaths += self.clear_the_dead();

        self.round += 1;
        let spacing = self.rules.spawn_spacing;
        if spacing > 0 && self.round % spacing == 0 && self.round < self.rules.round_limit {
            summary.spawned = self.spawn_wave();
        }

        summary
    }

    /// Keeps the first action per robot, and only for robots the submitting
    /// faction actually owns
    fn collect_actions(
        &self,
        faction: Faction,
        turns: &[Turn],
        actions: &mut BTreeMap<RobotId, Action>,
    ) {
        for turn in turns {
            match self.robot(turn.id) {
                Some(robot) if robot.faction == faction => match actions.entry(turn.id) {
                    Entry::Vacant(slot) => {
                        slot.insert(turn.action);
                    }
                    Entry::Occupied(_) => {
                        trace!("Dropping repeated action for robot {}", turn.id);
                    }
                },
                Some(_) => trace!("Dropping {:?} action for foreign robot {}", faction, turn.id),
                None => trace!("Dropping action for unknown robot {}", turn.id),
            }
        }
    }

    /// Where a robot at `current` ends up if its action goes unopposed
    fn desired_location(&self, current: Loc, action: Action) -> Loc {
        match action {
            Action::Move(dir) => {
                let target = current.step(dir);
                if self.cell_type(target).is_occupiable() {
                    target
                } else {
                    current
                }
            }
            _ => current,
        }
    }

    /// Resolves and applies every move. Returns (moved, collided).
    fn apply_movement(&mut self, actions: &BTreeMap<RobotId, Action>) -> (usize, usize) {
        let movers: Vec<Mover> = self
            .locations
            .iter()
            .map(|(&id, &current)| {
                let action = actions.get(&id).copied().unwrap_or_default();
                Mover {
                    id,
                    current,
                    next: self.desired_location(current, action),
                }
            })
            .collect();
        let statuses = resolve_moves(&movers);

        // Lift every successful mover off the grid before placing any, so a
        // robot leaving a cell never clobbers the one arriving in it
        let mut arriving = Vec::new();
        let mut collided = 0;
        for (mover, status) in movers.iter().zip(statuses) {
            match status {
                MoveStatus::Successful if mover.is_relocating() => {
                    if let Some(robot) = self.take(mover.current) {
                        arriving.push((robot, mover.next));
                    }
                }
                MoveStatus::Failed if actions.get(&mover.id).is_some_and(Action::is_move) => {
                    collided += 1;
                    let damage = self.rules.collision_damage;
                    self.hurt(mover.current, damage);
                }
                _ => {}
            }
        }

        let moved = arriving.len();
        for (robot, loc) in arriving {
            self.put(robot, loc);
        }
        (moved, collided)
    }

    fn issue_attacks(&mut self, actions: &BTreeMap<RobotId, Action>) {
        for (&id, action) in actions {
            let Action::Attack(dir) = *action else {
                continue;
            };
            // Attackers killed during movement don't get to swing
            let Some(loc) = self.location(id) else {
                continue;
            };
            let target = loc.step(dir);
            let damage = self.guarded_damage(target, self.rules.attack_damage, actions);
            self.hurt(target, damage);
        }
    }

    fn issue_self_destructs(&mut self, actions: &BTreeMap<RobotId, Action>) {
        for (&id, action) in actions {
            if *action != Action::SelfDestruct {
                continue;
            }
            let Some(loc) = self.location(id) else {
                continue;
            };
            for victim in loc.surrounding() {
                let damage = self.guarded_damage(victim, self.rules.destruct_damage, actions);
                self.hurt(victim, damage);
            }
            // Instant death, guard or not
            if let Some(bomber) = self.at_mut(loc) {
                bomber.health = 0;
            }
        }
    }

    /// Halves (rounding down) damage dealt to a guarding robot
    fn guarded_damage(&self, loc: Loc, damage: i32, actions: &BTreeMap<RobotId, Action>) -> i32 {
        let guarding = self
            .at(loc)
            .and_then(|robot| actions.get(&robot.id))
            .is_some_and(|action| *action == Action::Guard);
        if guarding {
            damage / 2
        } else {
            damage
        }
    }

    fn hurt(&mut self, loc: Loc, damage: i32) {
        if let Some(robot) = self.at_mut(loc) {
            robot.health -= damage;
        }
    }

    /// Removes every robot at or below zero health. Returns how many died.
    fn clear_the_dead(&mut self) -> usize {
        let dead: Vec<Loc> = self
            .robots()
            .filter(|(_, robot)| robot.health <= 0)
            .map(|(loc, _)| loc)
            .collect();
        for &loc in &dead {
            let _ = self.take(loc);
        }
        dead.len()
    }

    /// Clears every spawn cell on both halves, then places the spawner's picks
    /// and their mirrors. Returns the number of robots created.
    fn spawn_wave(&mut self) -> usize {
        let candidates = self.spawn_points.clone();
        for &loc in &candidates {
            let _ = self.take(loc);
            let _ = self.take(self.mirror(loc));
        }

        let mut spawned = 0;
        for loc in self.spawner.spawn(&candidates) {
            if !candidates.contains(&loc) || self.at(loc).is_some() {
                continue;
            }
            let mirror = self.mirror(loc);
            for (faction, cell) in [(Faction::P1, loc), (Faction::P2, mirror)] {
                if !self.cell_type(cell).is_occupiable() || self.at(cell).is_some() {
                    continue;
                }
                let robot = Robot {
                    id: self.new_id(),
                    health: self.rules.initial_health,
                    faction,
                };
                self.put(robot, cell);
                spawned += 1;
            }
        }
        spawned
    }

    fn left_spawn_points(&self) -> Vec<Loc> {
        let mut points = Vec::new();
        for x in 0..self.width / 2 {
            for y in 0..self.height {
                let loc = Loc::new(x, y);
                if self.cell_type(loc) == CellType::Spawn {
                    points.push(loc);
                }
            }
        }
        points
    }

    fn mirror(&self, loc: Loc) -> Loc {
        Loc::new(self.width - 1 - loc.x, loc.y)
    }

    fn new_id(&mut self) -> RobotId {
        self.next_id += 1;
        RobotId(self.next_id)
    }

    fn index(&self, loc: Loc) -> Option<usize> {
        if loc.x < 0 || loc.y < 0 || loc.x >= self.width || loc.y >= self.height {
            return None;
        }
        Some((loc.y * self.width + loc.x) as usize)
    }

    fn at_mut(&mut self, loc: Loc) -> Option<&mut Robot> {
        let idx = self.index(loc)?;
        self.occupants[idx].as_mut()
    }

    fn take(&mut self, loc: Loc) -> Option<Robot> {
        let idx = self.index(loc)?;
        let robot = self.occupants[idx].take()?;
        self.locations.remove(&robot.id);
        Some(robot)
    }

    fn put(&mut self, robot: Robot, loc: Loc) {
        if let Some(idx) = self.index(loc) {
            debug_assert!(self.occupants[idx].is_none(), "cell {} already occupied", loc);
            self.locations.insert(robot.id, loc);
            self.occupants[idx] = Some(robot);
        }
    }
}
