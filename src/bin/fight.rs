// Local match runner: pits two HTTP bots against each other without the server
//
// Usage:
//   cargo run --bin fight -- <endpoint_a> <endpoint_b> [options]
//
// Options:
//   --matches <N>     Number of matches to play (default: 1)
//   --config <path>   Path to Arena.toml (default: Arena.toml)
//   --save <prefix>   Write each replay to <prefix>-<n>.json

use std::env;
use std::process;
use std::sync::Arc;

use robot_arena::config::Config;
use robot_arena::orchestrator::{Match, MatchOutcome};
use robot_arena::participant::HttpParticipant;
use robot_arena::registry::OnlineAi;
use robot_arena::round_logger::RoundLogger;
use robot_arena::store::{Datastore, MemoryStore};

fn print_usage() {
    eprintln!("Robot Arena Fight Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  fight <endpoint_a> <endpoint_b> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --matches <N>       Number of matches to play (default: 1)");
    eprintln!("  --config <path>     Path to Arena.toml (default: Arena.toml)");
    eprintln!("  --save <prefix>     Write each replay to <prefix>-<n>.json");
    eprintln!("  --help              Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  fight http://localhost:8001 http://localhost:8002 --matches 10");
}

fn option_value<'a>(args: &'a [String], i: usize, name: &str) -> &'a str {
    match args.get(i + 1) {
        Some(v) => v,
        None => {
            eprintln!("Error: {} requires an argument", name);
            process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "warn");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let endpoint_a = &args[1];
    let endpoint_b = &args[2];
    let mut matches: u32 = 1;
    let mut config_path = "Arena.toml".to_string();
    let mut save_prefix: Option<String> = None;

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--matches" => {
                let value = option_value(&args, i, "--matches");
                matches = match value.parse::<u32>() {
                    Ok(n) if n > 0 => n,
                    _ => {
                        eprintln!("Error: invalid match count '{}'", value);
                        process::exit(1);
                    }
                };
                i += 1;
            }
            "--config" => {
                config_path = option_value(&args, i, "--config").to_string();
                i += 1;
            }
            "--save" => {
                save_prefix = Some(option_value(&args, i, "--save").to_string());
                i += 1;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    let store = Arc::new(MemoryStore::new());
    let client = reqwest::Client::new();
    let side = |name: &str, endpoint: &str| -> Result<OnlineAi, String> {
        let id = store.create_ai(name, "local").map_err(|e| e.to_string())?;
        let info = store.lookup_ai(&id).map_err(|e| e.to_string())?;
        Ok(OnlineAi {
            info,
            client: Arc::new(HttpParticipant::new(endpoint, client.clone())),
        })
    };
    let (p1, p2) = match (side("A", endpoint_a), side("B", endpoint_b)) {
        (Ok(p1), Ok(p2)) => (p1, p2),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error setting up bots: {}", e);
            process::exit(1);
        }
    };
    let logger = RoundLogger::new(config.round_log.enabled, &config.round_log.log_file_path).await;

    println!("{} vs {}, {} match(es)\n", endpoint_a, endpoint_b, matches);

    let (mut p1_wins, mut p2_wins, mut ties) = (0u32, 0u32, 0u32);
    for n in 1..=matches {
        let mut game = Match::new(
            &config,
            p1.clone(),
            p2.clone(),
            store.clone(),
            logger.clone(),
        );
        let result = match game.run(None).await {
            Ok(result) => result,
            Err(e) => {
                eprintln!("Match {} aborted: {}", n, e);
                process::exit(1);
            }
        };
        println!("{}", result);

        match result.outcome {
            MatchOutcome::P1Win => p1_wins += 1,
            MatchOutcome::P2Win => p2_wins += 1,
            MatchOutcome::Tie => ties += 1,
        }

        if let Some(prefix) = &save_prefix {
            let path = format!("{}-{}.json", prefix, n);
            let saved = store
                .lookup_game(&result.game_id)
                .map_err(|e| e.to_string())
                .and_then(|replay| replay.save(&path));
            match saved {
                Ok(()) => println!("  replay written to {}", path),
                Err(e) => eprintln!("  could not write {}: {}", path, e),
            }
        }
    }

    if matches > 1 {
        println!();
        println!("Player 1 wins: {}", p1_wins);
        println!("Player 2 wins: {}", p2_wins);
        println!("Ties:          {}", ties);
    }
}
