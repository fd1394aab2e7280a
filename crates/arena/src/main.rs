//! Arena CLI
//!
//! Play any two bots against each other and report the outcome.

use std::env;
use std::path::PathBuf;

use arena::{MatchConfig, MatchRunner};
use concurrent_bot::{ConcurrentAlphaBetaBot, ConcurrentMinimaxBot, MultiDepthBot, StreamingBot};
use minimax_bot::{AlphaBetaBot, MinimaxBot, NaiveMinimaxBot};
use persistent_bot::PersistentMinimaxBot;
use qubic_core::{Bot, Dims, Player};
use random_bot::RandomBot;

fn print_usage() {
    println!("3D connect arena");
    println!();
    println!("Usage:");
    println!("  arena match <bot1> <bot2> [--games N] [--depth D] [--size S] [--out FILE]");
    println!();
    println!("Bots:");
    println!("  random        - uniform random legal moves");
    println!("  naive         - minimax, full evaluation at every leaf");
    println!("  minimax       - minimax over the incrementally scored board");
    println!("  alphabeta     - single-threshold pruning");
    println!("  parallel      - one worker per root move");
    println!("  deep          - recursive fork with cooperative cancellation");
    println!("  stream        - streaming candidates, plays the final one");
    println!("  multidepth    - merged streaming searches at depths 3..=7");
    println!("  persistent    - background tree that survives between moves");
    println!();
    println!("Examples:");
    println!("  arena match alphabeta random --games 20 --depth 4");
    println!("  arena match persistent minimax --games 2 --size 4");
}

fn create_bot(spec: &str, symbol: Player, depth: u8) -> Box<dyn Bot> {
    match spec.to_lowercase().as_str() {
        "random" => Box::new(RandomBot::new(symbol)),
        "naive" => Box::new(NaiveMinimaxBot::new(symbol, depth.min(3))),
        "minimax" => Box::new(MinimaxBot::new(symbol, depth)),
        "alphabeta" | "ab" => Box::new(AlphaBetaBot::new(symbol, depth)),
        "parallel" => Box::new(ConcurrentMinimaxBot::new(symbol, depth)),
        "deep" => Box::new(ConcurrentAlphaBetaBot::new(symbol, depth)),
        "stream" => Box::new(StreamingBot::new(symbol, depth)),
        "multidepth" => Box::new(MultiDepthBot::new(symbol, vec![3, 4, 5, 6, 7])),
        "persistent" => Box::new(PersistentMinimaxBot::new(symbol)),
        _ => {
            eprintln!("Unknown bot: {}, falling back to alphabeta", spec);
            Box::new(AlphaBetaBot::new(symbol, depth))
        }
    }
}

fn run_match(args: &[String]) {
    if args.len() < 2 {
        eprintln!("Error: match requires two bot specifications");
        print_usage();
        return;
    }

    let first_spec = args[0].clone();
    let second_spec = args[1].clone();

    let mut num_games: u32 = 10;
    let mut depth: u8 = 4;
    let mut size: usize = 3;
    let mut out: Option<PathBuf> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--games" | "-g" => {
                if i + 1 < args.len() {
                    num_games = args[i + 1].parse().unwrap_or(10);
                    i += 1;
                }
            }
            "--depth" | "-d" => {
                if i + 1 < args.len() {
                    depth = args[i + 1].parse().unwrap_or(4);
                    i += 1;
                }
            }
            "--size" | "-s" => {
                if i + 1 < args.len() {
                    size = args[i + 1].parse().unwrap_or(3);
                    i += 1;
                }
            }
            "--out" | "-o" => {
                if i + 1 < args.len() {
                    out = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!(
        "{} vs {} - {} games on a {size}^3 board, depth {depth}",
        first_spec, second_spec, num_games
    );

    let config = MatchConfig {
        num_games,
        board: Dims::cube(size),
        ..Default::default()
    };
    let runner = MatchRunner::new(config);
    let record = runner.run_match(
        &|symbol| create_bot(&first_spec, symbol, depth),
        &|symbol| create_bot(&second_spec, symbol, depth),
    );

    println!();
    print!("{}", record.summary());

    if let Some(path) = out {
        match record.save(&path) {
            Ok(()) => println!("Saved session to {}", path.display()),
            Err(e) => eprintln!("Could not save session: {}", e),
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "match" => run_match(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
        }
    }
}
