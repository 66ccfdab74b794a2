use plum_position::game_state::chess_types::Position;
use plum_position::move_generation::legal_move_generator::LegalMoveGenerator;
use plum_position::move_generation::perft::{divide, run_perft, PerftConfig};
use std::env;
use std::process::ExitCode;

fn parse_arg<T: std::str::FromStr>(args: &[String], idx: usize, default: T) -> T {
    args.get(idx)
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}

/// Usage: `plum_perft [depth] [fen fields...]`
///
/// `PLUM_PERFT_HASH_ENTRIES` enables the memo table with that many entries,
/// `PLUM_PERFT_THREADS` splits the root moves, and `PLUM_PERFT_DIVIDE=1`
/// prints per-move counts.
fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let depth: u8 = parse_arg(&args, 1, 5u8);
    let fen = if args.len() > 2 {
        args[2..].join(" ")
    } else {
        Position::starting_fen().to_owned()
    };

    plum_position::init_tables();
    let mut position = match Position::from_fen(&fen) {
        Ok(position) => position,
        Err(err) => {
            eprintln!("invalid FEN '{fen}': {err}");
            return ExitCode::FAILURE;
        }
    };

    let hash_entries: usize = env_or("PLUM_PERFT_HASH_ENTRIES", 0);
    let config = PerftConfig {
        use_hash: hash_entries > 0,
        hash_entries: hash_entries.max(1),
        threads: env_or("PLUM_PERFT_THREADS", 1usize).max(1),
    };

    println!("{position}");
    println!("fen={fen} depth={depth} hash_entries={hash_entries} threads={}", config.threads);

    if env_or("PLUM_PERFT_DIVIDE", 0u8) == 1 {
        match divide(&LegalMoveGenerator, &mut position, depth) {
            Ok(split) => {
                for (mv, nodes) in &split {
                    println!("{mv}: {nodes}");
                }
            }
            Err(err) => {
                eprintln!("divide failed: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    let start = chrono::Utc::now();
    let nodes = match run_perft(&LegalMoveGenerator, &mut position, depth, &config) {
        Ok(nodes) => nodes,
        Err(err) => {
            eprintln!("perft failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    let elapsed = chrono::Utc::now() - start;

    let millis = elapsed.num_milliseconds().max(1);
    let nps = nodes as f64 * 1000.0 / millis as f64;
    println!("nodes={nodes} time_ms={millis} nps={nps:.0}");
    ExitCode::SUCCESS
}
