//! Per-tick orchestration
//!
//! One call advances the whole simulation by one frame, in a fixed order:
//! window manager, terrain/spawner refill, actor physics, collision
//! resolution, pursuer, session aggregates and terminal checks. All
//! mutation happens synchronously inside the tick; the presentation layer
//! reads state and drains events afterward.

use super::collision;
use super::player::Intent;
use super::state::{AudioCue, GameEvent, GamePhase, PlayerState, Session, SessionOutcome};
use crate::consts::*;

/// Input sampled for a single tick. `jump_held`/`slide_held` are level
/// intents; edges are derived against the previous tick inside the
/// session. `pause` and `restart` are one-shot commands the driver clears
/// after each tick.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub jump_held: bool,
    pub slide_held: bool,
    pub pause: bool,
    pub restart: bool,
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut Session, input: &TickInput) {
    if input.restart {
        session.restart();
        return;
    }

    if input.pause {
        match session.phase {
            GamePhase::Playing => {
                session.pause();
                return;
            }
            GamePhase::Paused => session.resume(),
            _ => {}
        }
    }

    // No physics or time accrual outside active play
    match session.phase {
        GamePhase::Ready | GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::Playing => {}
    }

    session.time_ticks += 1;

    session.screen_shake *= 0.9;
    if session.screen_shake < 0.01 {
        session.screen_shake = 0.0;
    }

    // Edge-triggered cues derive from comparing against last tick's sample
    let intent = Intent {
        jump_held: input.jump_held,
        slide_held: input.slide_held,
        jump_pressed: input.jump_held && !session.prev_jump_held,
        slide_pressed: input.slide_held && !session.prev_slide_held,
    };
    session.prev_jump_held = input.jump_held;
    session.prev_slide_held = input.slide_held;

    let prev_x = session.player.pos.x;
    let mut events = Vec::new();

    // 1. Window manager: camera, frontier refill, culling
    session
        .world
        .advance(session.player.pos.x, &mut session.rng, &session.tuning);

    // Unheld ropes keep swinging; coin spin is purely cosmetic
    for swing in session.world.swing_points.iter_mut() {
        if !swing.held {
            swing.swing_free();
        }
    }
    for coin in session.world.coins.iter_mut() {
        coin.spin += 0.2;
    }

    // 2. Actor physics
    session.player.integrate(
        &intent,
        &session.world.terrain,
        &session.world.obstacles,
        &mut session.world.swing_points,
        &mut events,
        &session.tuning,
    );

    // 3. Collision and interaction resolution
    let outcome = collision::resolve(
        &mut session.player,
        input.jump_held,
        &mut session.world.obstacles,
        &mut session.world.coins,
        &mut session.world.swing_points,
        &mut events,
        &session.tuning,
    );
    session.coins_collected += outcome.coins_picked;

    // 4. Pursuer
    session.pursuer.advance(session.distance, &session.tuning);
    let gap = session.player.pos.x - session.pursuer.x;
    let caught = gap <= (PLAYER_WIDTH + PURSUER_WIDTH) / 2.0;

    // 5. Session aggregates: distance integrates actual horizontal travel
    let was_armed = session.checkpoint_armed();
    session.distance += (session.player.pos.x - prev_x).max(0.0);
    if !was_armed && session.checkpoint_armed() {
        events.push(GameEvent::CheckpointArmed);
        log::info!("checkpoint armed at distance {:.0}", session.distance);
    }

    // Terminal conditions, in stable priority order
    if let Some(fatal) = outcome.fatal {
        terminal(session, fatal, &mut events);
    } else if session.player.pos.y > FALL_LIMIT_Y {
        terminal(session, SessionOutcome::Fell, &mut events);
    } else if caught && session.player.invincibility == 0 {
        terminal(session, SessionOutcome::Caught, &mut events);
    }

    for event in &events {
        if let GameEvent::ScreenShake { magnitude } = event {
            session.screen_shake = session.screen_shake.max(*magnitude);
        }
    }
    session.events.extend(events);
}

/// Apply a terminal condition: consumed by the one-shot checkpoint
/// respawn if armed, otherwise the session ends
fn terminal(session: &mut Session, outcome: SessionOutcome, events: &mut Vec<GameEvent>) {
    if session.checkpoint_armed() {
        session.checkpoint_used = true;

        // Let go of any held rope so it returns to free swinging
        if let Some(grip) = session.player.grip.take() {
            if let Some(swing) = session
                .world
                .swing_points
                .iter_mut()
                .find(|s| s.id == grip.swing_id)
            {
                swing.held = false;
            }
        }

        // Safe airborne reset above solid ground, past any chasm span
        let x = session.world.terrain.nearest_ground_after(session.player.pos.x) + 20.0;
        let ground = session.world.terrain.visual_height_at(x);
        session.player.pos = glam::Vec2::new(x, ground - 150.0);
        session.player.vel = glam::Vec2::new(session.tuning.run_speed, 0.0);
        session.player.state = PlayerState::Falling;
        session.player.invincibility = INVINCIBILITY_TICKS * 2;

        session.pursuer.x =
            (session.pursuer.x - CHECKPOINT_PUSHBACK).min(x - PURSUER_START_GAP);

        events.push(GameEvent::CheckpointRespawn);
        events.push(GameEvent::Audio(AudioCue::Checkpoint));
        events.push(GameEvent::ScreenShake { magnitude: 0.4 });
        log::info!("checkpoint consumed ({outcome:?} intercepted)");
        return;
    }

    session.phase = GamePhase::GameOver;
    events.push(GameEvent::Audio(AudioCue::Death));
    events.push(GameEvent::SessionOver {
        outcome,
        score: session.score(),
        distance: session.distance as u32,
        coins: session.coins_collected,
    });
    log::info!(
        "session over: {outcome:?}, score {}, distance {:.0}, coins {}",
        session.score(),
        session.distance,
        session.coins_collected
    );
}
