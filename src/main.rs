//! Terminal demo runner (default binary).
//!
//! Self-plays a session: finds the first match-producing swap, resolves it,
//! and renders the board with crossterm colors after each move. `--json`
//! switches to the adapter's line-delimited JSON event stream so the output
//! can be piped into other tools.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};
use crossterm::style::{Color, Stylize};

use gem_cascade::adapter::protocol::{encode_move_events, ErrorMessage, ObservationMessage};
use gem_cascade::core::{find_first_legal_move, Engine, EngineConfig};
use gem_cascade::types::GemKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DemoConfig {
    seed: u32,
    moves: u32,
    json: bool,
}

fn parse_args(args: &[String]) -> Result<DemoConfig> {
    let mut seed: Option<u32> = None;
    let mut moves: u32 = 10;
    let mut json = false;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --seed"))?;
                seed = Some(
                    v.parse::<u32>()
                        .map_err(|_| anyhow!("invalid --seed value: {}", v))?,
                );
            }
            "--moves" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --moves"))?;
                moves = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("invalid --moves value: {}", v))?;
            }
            "--json" => {
                json = true;
            }
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }

    let seed = seed.unwrap_or_else(clock_seed);
    Ok(DemoConfig { seed, moves, json })
}

/// Unseeded runs draw from the clock; every printed session still shows
/// its seed so it can be replayed.
fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u32)
        .unwrap_or(1)
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_args(&args)?;
    run(config)
}

fn run(config: DemoConfig) -> Result<()> {
    let mut engine = Engine::new(EngineConfig::new(config.seed))?;
    let mut seq: u64 = 1;

    if config.json {
        let observation = ObservationMessage::from_engine(&engine, 0);
        println!("{}", serde_json::to_string(&observation)?);
    } else {
        println!("seed {}", engine.seed());
        print_grid(&engine);
    }

    for _ in 0..config.moves {
        let Some((a, b)) = find_first_legal_move(engine.grid()) else {
            if !config.json {
                println!("no legal moves left");
            }
            break;
        };

        match engine.try_swap(a, b) {
            Ok(result) => {
                if config.json {
                    let lines = encode_move_events(seq, &result)?;
                    seq += lines.len() as u64;
                    for line in lines {
                        println!("{}", line);
                    }
                } else {
                    println!(
                        "swap ({},{}) <-> ({},{}): +{} points, {} cascades",
                        a.col, a.row, b.col, b.row, result.score, result.cascades
                    );
                    print_grid(&engine);
                }
            }
            Err(error) => {
                if config.json {
                    let message = ErrorMessage::from_swap_error(seq, error);
                    println!("{}", serde_json::to_string(&message)?);
                    seq += 1;
                    break;
                }
                return Err(anyhow!("swap rejected: {}", error));
            }
        }
    }

    if !config.json {
        println!("total score {} over {} moves", engine.score(), engine.moves());
    }
    Ok(())
}

fn kind_color(kind: GemKind) -> Color {
    match kind {
        GemKind::Red => Color::Red,
        GemKind::Blue => Color::Blue,
        GemKind::Green => Color::Green,
        GemKind::Yellow => Color::Yellow,
        GemKind::Purple => Color::Magenta,
        GemKind::Orange => Color::DarkYellow,
    }
}

fn print_grid(engine: &Engine) {
    let grid = engine.grid();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            match grid.gem_at(col as i16, row as i16) {
                Some(gem) => print!("{} ", "●".with(kind_color(gem.kind))),
                None => print!("· "),
            }
        }
        println!();
    }
    println!("score {}", engine.score());
}
