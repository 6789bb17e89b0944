// Tests for replay loading and playback
//
// Uses a hand-written two-round duel stored under tests/fixtures.

use robot_arena::replay::{Playback, Replay};
use robot_arena::types::{Action, CellType, Direction, Loc, RobotId};
use std::path::PathBuf;

/// Helper function to get the path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn duel() -> Replay {
    Replay::load(fixture_path("duel.json")).expect("Failed to load duel.json")
}

#[test]
fn test_load_fixture() {
    let replay = duel();
    assert_eq!(replay.rounds.len(), 2);
    assert_eq!(replay.initial.cells.len(), 15);
    assert_eq!(
        replay.rounds[0].moves[0].action,
        Action::Move(Direction::East)
    );
    assert_eq!(replay.rounds[1].moves[1].action, Action::SelfDestruct);
}

#[test]
fn test_playback_has_one_frame_per_round_plus_initial() {
    let playback = Playback::new(&duel());
    assert_eq!(playback.num_frames(), 3);
    let rounds: Vec<u32> = playback.frames().iter().map(|f| f.round).collect();
    assert_eq!(rounds, vec![0, 1, 2]);
    assert!(playback.frame(3).is_none());
    assert!(playback.render(3).is_none());
}

#[test]
fn test_frame_queries() {
    let playback = Playback::new(&duel());
    let counts: Vec<(usize, usize)> = playback.frames().iter().map(|f| f.counts()).collect();
    assert_eq!(counts, vec![(1, 1), (1, 1), (1, 0)]);

    let last = playback.frame(2).unwrap();
    let survivor = last.robot_at(Loc::new(2, 1)).unwrap();
    assert_eq!(survivor.id, RobotId(1));
    assert_eq!(survivor.health, 35);
    assert!(last.robot_at(Loc::new(3, 1)).is_none());

    assert_eq!(playback.cell_type(Loc::new(0, 0)), CellType::Invalid);
    assert_eq!(playback.cell_type(Loc::new(0, 1)), CellType::Spawn);
    assert_eq!(playback.cell_type(Loc::new(9, 9)), CellType::Invalid);
}

#[test]
fn test_render() {
    let playback = Playback::new(&duel());
    assert_eq!(playback.render(0).unwrap(), "#:.:#\n:A.B:\n#:.:#\n");
    assert_eq!(playback.render(2).unwrap(), "#:.:#\n:.A.:\n#:.:#\n");
}

#[test]
fn test_save_and_reload() {
    let replay = duel();
    let path = std::env::temp_dir().join(format!("robot_arena_replay_{}.json", std::process::id()));
    replay.save(&path).unwrap();
    let reloaded = Replay::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(reloaded, replay);
}

#[test]
fn test_missing_file_is_an_error() {
    let err = Replay::load(fixture_path("does_not_exist.json")).unwrap_err();
    assert!(err.contains("Failed to open replay file"));
}
