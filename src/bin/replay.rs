// Standalone replay viewer for stored matches
//
// Usage:
//   cargo run --bin replay -- <replay_file> [options]
//
// The replay file is the JSON served by GET /game/<id>.
//
// Options:
//   --round <N>     Render only the board after round N (0 is the initial board)
//   --summary       Print robot counts per round instead of boards

use std::env;
use std::process;

use robot_arena::replay::{Playback, Replay};

fn print_usage() {
    eprintln!("Robot Arena Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <replay_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --round <N>     Render the board after round N (0 = initial board)");
    eprintln!("  --summary       Print robot counts per round");
    eprintln!("  --help          Show this help message");
    eprintln!();
    eprintln!("LEGEND:");
    eprintln!("  '#' invalid  '.' valid  ':' spawn  'A' player 1  'B' player 2");
}

fn print_frame(playback: &Playback, idx: usize) {
    let Some(frame) = playback.frame(idx) else {
        return;
    };
    let (p1, p2) = frame.counts();
    println!("Round {} (P1: {} P2: {})", frame.round, p1, p2);
    if let Some(rendered) = playback.render(idx) {
        println!("{}", rendered);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let replay_file = &args[1];
    let mut round: Option<usize> = None;
    let mut summary = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--round" => {
                let Some(value) = args.get(i + 1) else {
                    eprintln!("Error: --round requires an argument");
                    process::exit(1);
                };
                round = match value.parse::<usize>() {
                    Ok(n) => Some(n),
                    Err(e) => {
                        eprintln!("Error: invalid round '{}': {}", value, e);
                        process::exit(1);
                    }
                };
                i += 1;
            }
            "--summary" => {
                summary = true;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let replay = match Replay::load(replay_file) {
        Ok(replay) => replay,
        Err(e) => {
            eprintln!("Error loading replay: {}", e);
            process::exit(1);
        }
    };
    let playback = Playback::new(&replay);
    println!(
        "Loaded {} ({} rounds, {}x{})\n",
        replay_file,
        replay.rounds.len(),
        replay.initial.board.width,
        replay.initial.board.height
    );

    if summary {
        for frame in playback.frames() {
            let (p1, p2) = frame.counts();
            println!("Round {:>4}: P1 {:>3}  P2 {:>3}", frame.round, p1, p2);
        }
        return;
    }

    match round {
        Some(idx) if idx >= playback.num_frames() => {
            eprintln!(
                "Error: round {} out of range (0..{})",
                idx,
                playback.num_frames()
            );
            process::exit(1);
        }
        Some(idx) => print_frame(&playback, idx),
        None => {
            for idx in 0..playback.num_frames() {
                print_frame(&playback, idx);
            }
        }
    }
}
