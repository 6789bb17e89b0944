// Round resolution scenarios for Board::update
//
// Each case seeds an open 5x5 board, applies one round of actions and checks
// every robot that should remain.

use robot_arena::config::RulesConfig;
use robot_arena::engine::spawner::{AllSpawn, NoSpawn};
use robot_arena::engine::typer::{CircleTyper, OpenTyper};
use robot_arena::engine::Board;
use robot_arena::types::{Action, Direction, Faction, Loc, Robot, RobotId, Turn};

const P1: Faction = Faction::P1;
const P2: Faction = Faction::P2;

fn robot(id: u32, health: i32, faction: Faction) -> Robot {
    Robot {
        id: RobotId(id),
        health,
        faction,
    }
}

fn board_with(width: i32, height: i32, robots: &[(Loc, Robot)]) -> Board {
    let mut board = Board::empty(
        width,
        height,
        RulesConfig::default(),
        &OpenTyper,
        Box::new(NoSpawn),
    )
    .unwrap();
    for (loc, r) in robots {
        board.place_robot(*r, *loc).unwrap();
    }
    board
}

/// Parses the compact "id:action" list used by the scenarios below,
/// e.g. "1:ME,2:AW,3:G,4:D,5:W"
fn turns(list: &str) -> Vec<Turn> {
    let dir = |c: char| match c {
        'N' => Direction::North,
        'S' => Direction::South,
        'E' => Direction::East,
        'W' => Direction::West,
        other => panic!("bad direction {}", other),
    };
    list.split(',')
        .filter(|s| !s.is_empty())
        .map(|entry| {
            let (id, action) = entry.split_once(':').unwrap();
            let mut chars = action.chars();
            let action = match chars.next().unwrap() {
                'W' => Action::Wait,
                'M' => Action::Move(dir(chars.next().unwrap())),
                'A' => Action::Attack(dir(chars.next().unwrap())),
                'D' => Action::SelfDestruct,
                'G' => Action::Guard,
                other => panic!("bad action {}", other),
            };
            Turn::new(id.parse().unwrap(), action)
        })
        .collect()
}

fn assert_robots(board: &Board, want: &[(Loc, Robot)]) {
    for (loc, expected) in want {
        assert_eq!(board.at(*loc), Some(expected), "robot at {}", loc);
    }
    assert_eq!(
        board.robots().count(),
        want.len(),
        "unexpected robots left on the board"
    );
}

#[test]
fn test_noop_update() {
    let start = [
        (Loc::new(1, 1), robot(123, 10, P1)),
        (Loc::new(2, 2), robot(456, 10, P2)),
    ];
    let mut board = board_with(5, 5, &start);
    board.update(&turns("123:W"), &turns("456:W"));
    assert_eq!(board.round(), 1);
    assert_robots(&board, &start);
}

#[test]
fn test_simple_collision() {
    let mut board = board_with(
        5,
        5,
        &[
            (Loc::new(0, 1), robot(123, 20, P1)),
            (Loc::new(2, 1), robot(456, 20, P2)),
        ],
    );
    let summary = board.update(&turns("123:ME"), &turns("456:MW"));
    assert_eq!(summary.collisions, 2);
    assert_robots(
        &board,
        &[
            (Loc::new(0, 1), robot(123, 15, P1)),
            (Loc::new(2, 1), robot(456, 15, P2)),
        ],
    );
}

#[test]
fn test_out_of_bounds_moves_stay_and_take_damage() {
    let mut board = board_with(
        5,
        5,
        &[
            (Loc::new(0, 0), robot(123, 20, P1)),
            (Loc::new(4, 4), robot(456, 20, P2)),
        ],
    );
    board.update(&turns("123:MW"), &turns("456:MS"));
    assert_robots(
        &board,
        &[
            (Loc::new(0, 0), robot(123, 15, P1)),
            (Loc::new(4, 4), robot(456, 15, P2)),
        ],
    );
}

#[test]
fn test_move_into_invalid_cell_is_rejected() {
    let mut board = Board::empty(
        7,
        7,
        RulesConfig::default(),
        &CircleTyper::new(7, 7),
        Box::new(NoSpawn),
    )
    .unwrap();
    // (0, 0) is outside the circle
    board.place_robot(robot(1, 20, P1), Loc::new(1, 0)).unwrap();
    board.update(&turns("1:MW"), &[]);
    assert_eq!(board.location(RobotId(1)), Some(Loc::new(1, 0)));
    assert_eq!(board.robot(RobotId(1)).map(|r| r.health), Some(15));
}

#[test]
fn test_dependency_chain_unravels() {
    let mut board = board_with(
        5,
        5,
        &[
            (Loc::new(1, 1), robot(1, 20, P1)),
            (Loc::new(3, 1), robot(2, 20, P1)),
            (Loc::new(2, 0), robot(3, 20, P1)),
            (Loc::new(1, 2), robot(4, 20, P1)),
            (Loc::new(0, 2), robot(5, 20, P1)),
            (Loc::new(0, 1), robot(6, 20, P1)),
            (Loc::new(3, 2), robot(7, 20, P1)),
        ],
    );
    board.update(&turns("1:ME,2:MW,3:MS,4:MN,5:ME,6:MS,7:ME"), &[]);
    assert_robots(
        &board,
        &[
            (Loc::new(1, 1), robot(1, 15, P1)),
            (Loc::new(3, 1), robot(2, 15, P1)),
            (Loc::new(2, 0), robot(3, 15, P1)),
            (Loc::new(1, 2), robot(4, 15, P1)),
            (Loc::new(0, 2), robot(5, 15, P1)),
            (Loc::new(0, 1), robot(6, 15, P1)),
            (Loc::new(4, 2), robot(7, 20, P1)),
        ],
    );
}

#[test]
fn test_conga_line_windmills_around_the_edge() {
    let ring = [
        Loc::new(0, 0),
        Loc::new(0, 1),
        Loc::new(0, 2),
        Loc::new(0, 3),
        Loc::new(1, 3),
        Loc::new(2, 3),
        Loc::new(3, 3),
        Loc::new(3, 2),
        Loc::new(3, 1),
        Loc::new(3, 0),
        Loc::new(2, 0),
        Loc::new(1, 0),
    ];
    let start: Vec<(Loc, Robot)> = ring
        .iter()
        .enumerate()
        .map(|(i, &loc)| (loc, robot(i as u32 + 1, 20, P1)))
        .collect();
    let mut board = board_with(4, 4, &start);

    let summary = board.update(
        &turns("1:MS,2:MS,3:MS,4:ME,5:ME,6:ME,7:MN,8:MN,9:MN,10:MW,11:MW,12:MW"),
        &[],
    );
    assert_eq!(summary.moved, 12);
    assert_eq!(summary.collisions, 0);

    let want: Vec<(Loc, Robot)> = (0..ring.len())
        .map(|i| (ring[(i + 1) % ring.len()], robot(i as u32 + 1, 20, P1)))
        .collect();
    assert_robots(&board, &want);
}

#[test]
fn test_four_robot_windmill_across_factions() {
    let mut board = board_with(
        5,
        5,
        &[
            (Loc::new(0, 1), robot(123, 20, P1)),
            (Loc::new(1, 0), robot(124, 20, P1)),
            (Loc::new(1, 1), robot(456, 20, P2)),
            (Loc::new(0, 0), robot(457, 20, P2)),
        ],
    );
    board.update(&turns("123:MN,124:MS"), &turns("456:MW,457:ME"));
    assert_robots(
        &board,
        &[
            (Loc::new(0, 0), robot(123, 20, P1)),
            (Loc::new(1, 1), robot(124, 20, P1)),
            (Loc::new(0, 1), robot(456, 20, P2)),
            (Loc::new(1, 0), robot(457, 20, P2)),
        ],
    );
}

#[test]
fn test_direct_swap_collides() {
    let mut board = board_with(
        5,
        5,
        &[
            (Loc::new(1, 1), robot(123, 20, P1)),
            (Loc::new(2, 1), robot(456, 20, P2)),
        ],
    );
    board.update(&turns("123:ME"), &turns("456:MW"));
    assert_robots(
        &board,
        &[
            (Loc::new(1, 1), robot(123, 15, P1)),
            (Loc::new(2, 1), robot(456, 15, P2)),
        ],
    );
}

#[test]
fn test_follow_the_leader_moves_into_vacated_cell() {
    let mut board = board_with(
        5,
        5,
        &[
            (Loc::new(1, 1), robot(1, 20, P1)),
            (Loc::new(2, 1), robot(2, 20, P1)),
        ],
    );
    board.update(&turns("1:ME,2:ME"), &[]);
    assert_robots(
        &board,
        &[
            (Loc::new(2, 1), robot(1, 20, P1)),
            (Loc::new(3, 1), robot(2, 20, P1)),
        ],
    );
}

#[test]
fn test_basic_attack() {
    let mut board = board_with(
        5,
        5,
        &[
            (Loc::new(1, 1), robot(123, 20, P1)),
            (Loc::new(2, 1), robot(456, 20, P2)),
        ],
    );
    board.update(&turns("123:W"), &turns("456:AW"));
    assert_robots(
        &board,
        &[
            (Loc::new(1, 1), robot(123, 10, P1)),
            (Loc::new(2, 1), robot(456, 20, P2)),
        ],
    );
}

#[test]
fn test_friendly_fire_is_allowed() {
    let mut board = board_with(
        5,
        5,
        &[
            (Loc::new(1, 1), robot(1, 20, P1)),
            (Loc::new(1, 2), robot(2, 20, P1)),
        ],
    );
    board.update(&turns("1:AS"), &[]);
    assert_eq!(board.robot(RobotId(2)).map(|r| r.health), Some(10));
}

#[test]
fn test_guard_halves_attack() {
    let mut board = board_with(
        5,
        5,
        &[
            (Loc::new(1, 1), robot(123, 20, P1)),
            (Loc::new(2, 1), robot(456, 20, P2)),
        ],
    );
    board.update(&turns("123:G"), &turns("456:AW"));
    assert_robots(
        &board,
        &[
            (Loc::new(1, 1), robot(123, 15, P1)),
            (Loc::new(2, 1), robot(456, 20, P2)),
        ],
    );
}

#[test]
fn test_guard_halves_self_destruct() {
    let mut board = board_with(
        5,
        5,
        &[
            (Loc::new(1, 1), robot(123, 20, P1)),
            (Loc::new(2, 1), robot(456, 20, P2)),
        ],
    );
    board.update(&turns("123:G"), &turns("456:D"));
    // 15 / 2 rounds down to 7
    assert_robots(&board, &[(Loc::new(1, 1), robot(123, 13, P1))]);
}

#[test]
fn test_guard_ignores_collision() {
    let mut board = board_with(
        5,
        5,
        &[
            (Loc::new(1, 1), robot(123, 20, P1)),
            (Loc::new(2, 1), robot(456, 20, P2)),
        ],
    );
    board.update(&turns("123:G"), &turns("456:MW"));
    assert_robots(
        &board,
        &[
            (Loc::new(1, 1), robot(123, 20, P1)),
            (Loc::new(2, 1), robot(456, 15, P2)),
        ],
    );
}

#[test]
fn test_repeated_entries_keep_the_first() {
    let mut board = board_with(5, 5, &[(Loc::new(2, 2), robot(1, 50, P1))]);
    board.update(&turns("1:D,1:G"), &[]);
    assert!(board.robot(RobotId(1)).is_none());
}

#[test]
fn test_self_destruct_hits_the_whole_neighbourhood() {
    let mut start = vec![
        (Loc::new(4, 1), robot(123, 20, P1)),
        (Loc::new(2, 1), robot(456, 20, P2)),
    ];
    let blast = [
        (1, 0),
        (2, 0),
        (3, 0),
        (1, 1),
        (3, 1),
        (1, 2),
        (2, 2),
        (3, 2),
    ];
    for (i, &(x, y)) in blast.iter().enumerate() {
        start.push((Loc::new(x, y), robot(124 + i as u32, 20, P1)));
    }
    let mut board = board_with(5, 5, &start);

    let summary = board.update(
        &turns("123:W,124:W,125:W,126:W,127:W,128:W,129:W,130:W,131:W"),
        &turns("456:D"),
    );
    assert_eq!(summary.deaths, 1);

    let mut want = vec![(Loc::new(4, 1), robot(123, 20, P1))];
    for (i, &(x, y)) in blast.iter().enumerate() {
        want.push((Loc::new(x, y), robot(124 + i as u32, 5, P1)));
    }
    assert_robots(&board, &want);
}

#[test]
fn test_attack_kills_bomber_before_it_detonates() {
    let mut board = board_with(
        5,
        5,
        &[
            (Loc::new(0, 0), robot(1, 10, P1)),
            (Loc::new(1, 0), robot(2, 20, P2)),
            (Loc::new(0, 1), robot(3, 20, P1)),
        ],
    );
    board.update(&turns("1:D"), &turns("2:AW"));
    assert_robots(
        &board,
        &[
            (Loc::new(1, 0), robot(2, 20, P2)),
            (Loc::new(0, 1), robot(3, 20, P1)),
        ],
    );
}

#[test]
fn test_collision_damage_kills_before_attacks() {
    let mut board = board_with(
        5,
        5,
        &[
            (Loc::new(0, 0), robot(1, 5, P1)),
            (Loc::new(2, 0), robot(2, 20, P2)),
            (Loc::new(1, 1), robot(3, 20, P2)),
        ],
    );
    // Robot 1 dies bumping the wall and robot 2's attack finds an empty cell
    board.update(&turns("1:MN"), &turns("2:AW,3:W"));
    assert_robots(
        &board,
        &[
            (Loc::new(2, 0), robot(2, 20, P2)),
            (Loc::new(1, 1), robot(3, 20, P2)),
        ],
    );
}

#[test]
fn test_malformed_turns_are_ignored() {
    let start = [
        (Loc::new(1, 1), robot(1, 20, P1)),
        (Loc::new(3, 3), robot(2, 20, P2)),
    ];
    let mut board = board_with(5, 5, &start);
    // Unknown id, enemy robot, and a repeat after the first (wait) entry
    board.update(&turns("99:ME,2:MN,1:W,1:ME"), &turns("1:AW"));
    assert_robots(&board, &start);
}

#[test]
fn test_termination() {
    let mut board = board_with(3, 3, &[]);
    for _ in 0..99 {
        board.update(&[], &[]);
        assert!(!board.is_finished());
    }
    board.update(&[], &[]);
    assert_eq!(board.round(), 100);
    assert!(board.is_finished());

    board.update(&[], &[]);
    assert_eq!(board.round(), 101);
    assert!(board.is_finished());
}

#[test]
fn test_update_is_deterministic() {
    let build = || {
        let mut board = Board::empty(
            7,
            7,
            RulesConfig::default(),
            &CircleTyper::new(7, 7),
            Box::new(AllSpawn),
        )
        .unwrap();
        board.init();
        board
    };
    let script = [
        turns("1:ME,3:MS,5:AE,7:G"),
        turns("2:MW,4:D,6:MN,8:AW"),
        turns("1:ME,3:ME,5:ME"),
    ];

    let mut a = build();
    let mut b = build();
    for round in 0..script.len() {
        let (ta, tb) = (&script[round], &script[(round + 1) % script.len()]);
        assert_eq!(a.update(ta, tb), b.update(ta, tb));
    }
    let left: Vec<(Loc, Robot)> = a.robots().map(|(l, r)| (l, *r)).collect();
    let right: Vec<(Loc, Robot)> = b.robots().map(|(l, r)| (l, *r)).collect();
    assert_eq!(left, right);
}
