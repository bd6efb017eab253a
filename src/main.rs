//! Headless autoplay runner (default binary).
//!
//! Drives the simulation at a fixed tick cadence on a virtual clock with the
//! background search planner or a remote agent selecting moves, then prints
//! the finished session record. Board size, pacing, and the agent address
//! come from the environment (GRIDFALL_WIDTH, GRIDFALL_HEIGHT,
//! GRIDFALL_BASE_DROP_MS, GRIDFALL_START_LEVEL, GRIDFALL_AGENT_HOST,
//! GRIDFALL_AGENT_PORT).

use anyhow::{anyhow, Result};

use gridfall::ai::Weights;
use gridfall::config::GameConfig;
use gridfall::control::{MoveSource, RemoteConfig, RemoteControl, SearchControl};
use gridfall::core::Game;
use gridfall::types::{ControlMode, LOOKAHEAD_DISCOUNT, TICK_MS};

#[derive(Debug, Clone)]
struct RunnerArgs {
    mode: ControlMode,
    seed: u32,
    piece_limit: u32,
    name: String,
}

fn parse_args(args: &[String]) -> Result<RunnerArgs> {
    let mut parsed = RunnerArgs {
        mode: ControlMode::Search,
        seed: 1,
        piece_limit: 500,
        name: "autoplay".to_string(),
    };

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--remote" => {
                parsed.mode = ControlMode::Remote;
            }
            "--seed" => {
                i += 1;
                let v = args.get(i).ok_or_else(|| anyhow!("missing value for --seed"))?;
                parsed.seed = v
                    .parse()
                    .map_err(|_| anyhow!("invalid --seed value: {}", v))?;
            }
            "--pieces" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --pieces"))?;
                parsed.piece_limit = v
                    .parse()
                    .map_err(|_| anyhow!("invalid --pieces value: {}", v))?;
            }
            "--name" => {
                i += 1;
                let v = args.get(i).ok_or_else(|| anyhow!("missing value for --name"))?;
                parsed.name = v.clone();
            }
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }

    Ok(parsed)
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let runner = parse_args(&args)?;

    let config = GameConfig::from_env();
    let mut game = Game::new(config, runner.seed)?;
    game.start();

    let mut source: Box<dyn MoveSource> = match runner.mode {
        ControlMode::Remote => {
            let remote = RemoteConfig::from_env();
            println!("[runner] delegating moves to agent at {}", remote.addr());
            Box::new(RemoteControl::new(remote))
        }
        _ => Box::new(SearchControl::new(Weights::default(), LOOKAHEAD_DISCOUNT)),
    };

    println!(
        "[runner] board {}x{}, seed {}, up to {} pieces",
        config.width, config.height, runner.seed, runner.piece_limit
    );

    let mut now_ms: u64 = 0;
    let mut requested_piece: Option<u32> = None;
    let mut pieces_locked: u32 = 0;

    while !game.game_over() && pieces_locked < runner.piece_limit {
        // One move request per freshly spawned piece.
        if game.active().is_some() && requested_piece != Some(game.piece_id()) {
            if let Some(snapshot) = game.request_plan_snapshot() {
                requested_piece = Some(snapshot.piece_id);
                source.request_move(snapshot);
            }
        }

        // Replies are applied here, on the authoritative timeline.
        while let Some(reply) = source.try_recv() {
            match reply.result {
                Ok(plan) => {
                    game.deliver_plan(reply.piece_id, plan);
                }
                Err(err) => {
                    eprintln!("[runner] move request failed ({}): {}", err.code(), err);
                    game.plan_failed(reply.piece_id);
                }
            }
        }

        now_ms += TICK_MS;
        game.tick(now_ms, false);

        for event in game.take_events() {
            pieces_locked += 1;
            if event.lines_cleared > 0 {
                println!(
                    "[runner] piece {}: cleared {} line(s) for {} points (score {})",
                    event.piece_id,
                    event.lines_cleared,
                    event.points,
                    game.score()
                );
            }
            if event.game_over {
                println!("[runner] game over after {} pieces", pieces_locked);
            }
        }
    }

    let record = game.session_record(&runner.name, runner.mode);
    println!(
        "[runner] session: name={} mode={} score={} lines={} level={} board={}x{}",
        record.name,
        record.mode.as_str(),
        record.score,
        game.lines(),
        record.level,
        record.width,
        record.height
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args_defaults() {
        let parsed = parse_args(&[]).unwrap();
        assert_eq!(parsed.mode, ControlMode::Search);
        assert_eq!(parsed.seed, 1);
        assert_eq!(parsed.piece_limit, 500);
    }

    #[test]
    fn test_parse_args_remote_and_values() {
        let args: Vec<String> = ["--remote", "--seed", "42", "--pieces", "10", "--name", "bot"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let parsed = parse_args(&args).unwrap();
        assert_eq!(parsed.mode, ControlMode::Remote);
        assert_eq!(parsed.seed, 42);
        assert_eq!(parsed.piece_limit, 10);
        assert_eq!(parsed.name, "bot");
    }

    #[test]
    fn test_parse_args_rejects_unknown() {
        assert!(parse_args(&["--bogus".to_string()]).is_err());
        assert!(parse_args(&["--seed".to_string()]).is_err());
        assert!(parse_args(&["--seed".to_string(), "abc".to_string()]).is_err());
    }
}
