//! Simultaneous movement resolution.
//!
//! Whether a robot can enter a cell depends on whether the cell's occupant
//! leaves it, which in turn depends on the occupant's own target. Every robot
//! gets a status that starts `Pending` and ends `Successful` or `Failed`.
//! `Checking` marks robots on the current dependency path so that a walk that
//! arrives back at one of them has found a closed rotation.
//!
//! The walk uses an explicit stack over a flat table, so adversarial boards
//! cannot blow the call stack and each robot is resolved at most once.

use std::collections::HashMap;

use crate::types::{Loc, RobotId};

/// A robot's movement intent for this round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mover {
    pub id: RobotId,
    pub current: Loc,
    /// Equal to `current` for non-movers and rejected moves
    pub next: Loc,
}

impl Mover {
    pub fn is_relocating(&self) -> bool {
        self.current != self.next
    }

    /// Identical for two robots trying to swap cells directly
    fn intersection_key(&self) -> Loc {
        self.current.sum(self.next)
    }
}

/// Movement resolution state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStatus {
    Pending,
    Checking,
    Successful,
    Failed,
}

impl MoveStatus {
    fn is_terminal(&self) -> bool {
        matches!(self, MoveStatus::Successful | MoveStatus::Failed)
    }
}

/// Resolves a round's worth of movers. The returned statuses are indexed like
/// the input and are all terminal.
pub fn resolve_moves(movers: &[Mover]) -> Vec<MoveStatus> {
    MoveResolver::new(movers).run()
}

struct MoveResolver<'a> {
    movers: &'a [Mover],
    status: Vec<MoveStatus>,
    /// Current location -> mover index
    occupants: HashMap<Loc, usize>,
    /// Desired location -> number of robots targeting it
    collisions: HashMap<Loc, usize>,
    /// current + next -> number of robots sharing the key
    intersections: HashMap<Loc, usize>,
}

impl<'a> MoveResolver<'a> {
    fn new(movers: &'a [Mover]) -> Self {
        let mut occupants = HashMap::with_capacity(movers.len());
        let mut collisions: HashMap<Loc, usize> = HashMap::with_capacity(movers.len());
        let mut intersections: HashMap<Loc, usize> = HashMap::with_capacity(movers.len());

        for (idx, mover) in movers.iter().enumerate() {
            occupants.insert(mover.current, idx);
            *collisions.entry(mover.next).or_insert(0) += 1;
            *intersections.entry(mover.intersection_key()).or_insert(0) += 1;
        }

        MoveResolver {
            movers,
            status: vec![MoveStatus::Pending; movers.len()],
            occupants,
            collisions,
            intersections,
        }
    }

    fn run(mut self) -> Vec<MoveStatus> {
        let mut stack = Vec::new();
        for start in 0..self.movers.len() {
            if self.status[start] != MoveStatus::Pending {
                continue;
            }
            stack.push(start);
            self.walk(&mut stack);
        }
        self.status
    }

    /// Drains the stack, resolving every robot pushed on it
    fn walk(&mut self, stack: &mut Vec<usize>) {
        while let Some(&idx) = stack.last() {
            match self.status[idx] {
                MoveStatus::Pending => {
                    if let Some(status) = self.settle_locally(idx) {
                        self.status[idx] = status;
                        stack.pop();
                        continue;
                    }

                    match self.blocker(idx) {
                        None => {
                            self.status[idx] = MoveStatus::Successful;
                            stack.pop();
                        }
                        Some(occupant) => match self.status[occupant] {
                            MoveStatus::Successful | MoveStatus::Failed => {
                                self.status[idx] = self.status[occupant];
                                stack.pop();
                            }
                            // Looped back onto the current path: a closed rotation
                            MoveStatus::Checking => {
                                self.status[idx] = MoveStatus::Successful;
                                stack.pop();
                            }
                            MoveStatus::Pending => {
                                self.status[idx] = MoveStatus::Checking;
                                stack.push(occupant);
                            }
                        },
                    }
                }
                // The occupant pushed above has been resolved; inherit its outcome
                MoveStatus::Checking => {
                    let inherited = match self.blocker(idx) {
                        Some(occupant) if self.status[occupant].is_terminal() => {
                            self.status[occupant]
                        }
                        _ => MoveStatus::Successful,
                    };
                    self.status[idx] = inherited;
                    stack.pop();
                }
                MoveStatus::Successful | MoveStatus::Failed => {
                    stack.pop();
                }
            }
        }
    }

    /// Outcomes that don't depend on any other robot
    fn settle_locally(&self, idx: usize) -> Option<MoveStatus> {
        let mover = &self.movers[idx];
        if !mover.is_relocating() {
            return Some(MoveStatus::Failed);
        }
        let contested = self.collisions.get(&mover.next).copied().unwrap_or(0) > 1;
        let swapping = self
            .intersections
            .get(&mover.intersection_key())
            .copied()
            .unwrap_or(0)
            > 1;
        if contested || swapping {
            return Some(MoveStatus::Failed);
        }
        None
    }

    /// The robot currently standing on this mover's target, if any
    fn blocker(&self, idx: usize) -> Option<usize> {
        let target = self.movers[idx].next;
        self.occupants
            .get(&target)
            .copied()
            .filter(|&occupant| occupant != idx)
    }
}
