//! Ravine Runner headless driver
//!
//! Runs the simulation natively with a small autopilot standing in for a
//! player, then submits the result to the local score store. Useful for
//! balance runs and soak testing:
//!
//! ```text
//! ravine-runner [seed] [max_ticks] [player_name]
//! ```

use std::env;
use std::path::Path;

use ravine_runner::consts::*;
use ravine_runner::sim::{GamePhase, ObstacleKind, PlayerState, Session, TickInput, tick};
use ravine_runner::{Leaderboard, Tuning};

const SCORE_STORE: &str = "ravine_scores.json";

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or(0x5eed_cafe);
    let max_ticks: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(50_000);
    let player_name = args.next().unwrap_or_else(|| "autopilot".to_string());

    let tuning = Tuning::load_or_default(Path::new("tuning.json"));
    let mut session = Session::with_tuning(seed, tuning);
    session.start();

    let mut input = TickInput::default();
    while session.phase == GamePhase::Playing && session.time_ticks < max_ticks {
        autopilot(&session, &mut input);
        tick(&mut session, &input);
        for event in session.take_events() {
            log::debug!("event: {event:?}");
        }
    }

    let score = session.score();
    let distance = session.distance as u32;
    let coins = session.coins_collected;
    println!(
        "seed {seed}: {} after {} ticks - distance {distance}, coins {coins}, score {score}",
        if session.phase == GamePhase::GameOver {
            "run ended"
        } else {
            "tick limit reached"
        },
        session.time_ticks,
    );

    // Best-effort submission: a store failure is logged, never fatal
    let store = Path::new(SCORE_STORE);
    let mut board = Leaderboard::load_or_default(store);
    match board.submit(&player_name, score, distance, coins) {
        Ok(entry) => {
            if let Err(err) = board.save(store) {
                log::warn!("score store save failed: {err}");
            }
            println!("best for {}: {}", entry.player_name, entry.score);
        }
        Err(err) => log::warn!("score rejected: {err}"),
    }

    println!("top scores:");
    for (rank, entry) in board.top(5).iter().enumerate() {
        println!(
            "  {}. {:<12} {:>8}  ({}m, {} coins)",
            rank + 1,
            entry.player_name,
            entry.score,
            entry.distance,
            entry.coins
        );
    }
}

/// A minimal reactive player: jump over ground hazards, slide under
/// walls and onto ramps, hold on to ropes until they swing forward
fn autopilot(session: &Session, input: &mut TickInput) {
    let p = &session.player;
    input.jump_held = false;
    input.slide_held = false;

    if p.state == PlayerState::Swinging {
        let release = p
            .grip
            .and_then(|g| {
                session
                    .world
                    .swing_points
                    .iter()
                    .find(|s| s.id == g.swing_id)
            })
            .map(|s| s.angle > 0.35 && s.angular_vel > 0.0)
            .unwrap_or(true);
        input.jump_held = !release;
        return;
    }

    if p.is_airborne() {
        // Over a hole: glide, and keep the hand out for a rope
        let no_ground_ahead = session
            .world
            .terrain
            .height_at(p.pos.x + 60.0)
            .is_none();
        let rope_close = session
            .world
            .swing_points
            .iter()
            .any(|s| !s.held && p.center().distance(s.tip()) < GRAB_RADIUS * 2.0);
        input.jump_held = no_ground_ahead || rope_close;
        return;
    }

    for ob in &session.world.obstacles {
        let dist = ob.x - p.pos.x;
        if dist < -ob.width() || dist > 150.0 {
            continue;
        }
        match ob.kind {
            ObstacleKind::Spike { .. } | ObstacleKind::Log { .. } => {
                input.jump_held = dist < 90.0;
            }
            ObstacleKind::Gap { width } => {
                if width >= CHASM_WIDTH_MIN {
                    // Jump late and grab the guaranteed rope over the span
                    input.jump_held = dist < 60.0;
                } else {
                    input.jump_held = dist < 90.0;
                }
            }
            ObstacleKind::LowWall { .. } => {
                input.slide_held = dist < 120.0;
            }
            ObstacleKind::Ramp { .. } => {
                input.slide_held = dist < 40.0;
            }
        }
        break;
    }
}
