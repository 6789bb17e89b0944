//! Spawn wave selection strategies.
//!
//! A spawner only ever sees the P1 (left half) candidate cells. The board
//! mirrors every chosen cell for P2.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::types::Loc;

/// Picks which candidate spawn cells receive a robot this wave
pub trait Spawner: Send {
    fn spawn(&mut self, candidates: &[Loc]) -> Vec<Loc>;
}

/// Named spawners selectable from configuration
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpawnerKind {
    None,
    All,
    EveryOther,
    Random,
}

impl SpawnerKind {
    /// Builds the spawner. `odds` and `seed` only matter for `Random`.
    pub fn build(&self, odds: u32, seed: Option<u64>) -> Box<dyn Spawner> {
        match self {
            SpawnerKind::None => Box::new(NoSpawn),
            SpawnerKind::All => Box::new(AllSpawn),
            SpawnerKind::EveryOther => Box::new(EveryOtherSpawn),
            SpawnerKind::Random => Box::new(match seed {
                Some(seed) => RandomSpawn::seeded(odds, seed),
                None => RandomSpawn::new(odds),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NoSpawn;

impl Spawner for NoSpawn {
    fn spawn(&mut self, _candidates: &[Loc]) -> Vec<Loc> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AllSpawn;

impl Spawner for AllSpawn {
    fn spawn(&mut self, candidates: &[Loc]) -> Vec<Loc> {
        candidates.to_vec()
    }
}

/// Takes the first, third, fifth... candidate
#[derive(Debug, Clone, Copy)]
pub struct EveryOtherSpawn;

impl Spawner for EveryOtherSpawn {
    fn spawn(&mut self, candidates: &[Loc]) -> Vec<Loc> {
        candidates.iter().step_by(2).copied().collect()
    }
}

/// Spawns on each candidate independently with 1-in-n odds
#[derive(Debug, Clone)]
pub struct RandomSpawn {
    odds: u32,
    rng: StdRng,
}

impl RandomSpawn {
    pub fn new(odds: u32) -> Self {
        RandomSpawn {
            odds: odds.max(1),
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(odds: u32, seed: u64) -> Self {
        RandomSpawn {
            odds: odds.max(1),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Spawner for RandomSpawn {
    fn spawn(&mut self, candidates: &[Loc]) -> Vec<Loc> {
        candidates
            .iter()
            .filter(|_| self.rng.random_range(0..self.odds) == 0)
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(n: i32) -> Vec<Loc> {
        (0..n).map(|y| Loc::new(0, y)).collect()
    }

    #[test]
    fn test_none_and_all() {
        let candidates = column(5);
        assert!(NoSpawn.spawn(&candidates).is_empty());
        assert_eq!(AllSpawn.spawn(&candidates), candidates);
    }

    #[test]
    fn test_every_other_keeps_even_positions() {
        let chosen = EveryOtherSpawn.spawn(&column(5));
        assert_eq!(chosen, vec![Loc::new(0, 0), Loc::new(0, 2), Loc::new(0, 4)]);
    }

    #[test]
    fn test_random_is_reproducible_with_seed() {
        let candidates = column(40);
        let mut a = RandomSpawn::seeded(3, 99);
        let mut b = RandomSpawn::seeded(3, 99);
        for _ in 0..5 {
            assert_eq!(a.spawn(&candidates), b.spawn(&candidates));
        }
    }

    #[test]
    fn test_random_with_odds_one_takes_everything() {
        let candidates = column(12);
        let mut spawner = RandomSpawn::seeded(1, 7);
        assert_eq!(spawner.spawn(&candidates), candidates);
    }

    #[test]
    fn test_random_only_returns_candidates() {
        let candidates = column(30);
        let mut spawner = RandomSpawn::seeded(2, 1234);
        let chosen = spawner.spawn(&candidates);
        assert!(chosen.len() <= candidates.len());
        assert!(chosen.iter().all(|loc| candidates.contains(loc)));
    }
}
