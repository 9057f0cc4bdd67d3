//! Collision detection and interaction outcomes
//!
//! Runs once per tick after physics integration. Obstacles are tested in
//! ascending x so overlapping outcomes resolve deterministically. Each
//! obstacle kind has its own geometry: narrowed AABBs for spikes, radial
//! tests for logs, an inverted clearance band for low walls, and a ground
//! override for ramps.

use glam::Vec2;

use super::player::{Player, SwingGrip};
use super::state::{
    AudioCue, Coin, GameEvent, Obstacle, ObstacleKind, PlayerState, SessionOutcome, SwingPoint,
};
use super::terrain::Terrain;
use crate::consts::*;
use crate::inv_lerp;
use crate::tuning::Tuning;

/// Standing surface under an x-position: terrain, possibly overridden by
/// a ramp whose sloped top sits above it
#[derive(Debug, Clone, Copy)]
pub struct GroundInfo {
    pub height: f32,
    /// dy/dx; positive slopes downhill (y grows downward)
    pub slope: f32,
    /// `(obstacle id, rise)` when the surface is a ramp top
    pub ramp: Option<(u32, f32)>,
}

/// Ground height for physics callers; `None` over a carved chasm with no
/// ramp bridging it
pub fn ground_height_at(terrain: &Terrain, obstacles: &[Obstacle], x: f32) -> Option<f32> {
    ground_info_at(terrain, obstacles, x).map(|g| g.height)
}

pub fn ground_info_at(terrain: &Terrain, obstacles: &[Obstacle], x: f32) -> Option<GroundInfo> {
    let mut best = terrain.height_at(x).map(|h| GroundInfo {
        height: h,
        slope: terrain.slope_at(x),
        ramp: None,
    });

    for ob in obstacles {
        if let ObstacleKind::Ramp { width, rise } = ob.kind {
            if x >= ob.x && x < ob.x + width {
                let surface = ob.base_y - rise * inv_lerp(ob.x, ob.x + width, x);
                // Smaller y is higher: the ramp wins when its top is above
                // the terrain line
                if best.map(|b| surface < b.height).unwrap_or(true) {
                    best = Some(GroundInfo {
                        height: surface,
                        slope: -(rise / width),
                        ramp: Some((ob.id, rise)),
                    });
                }
            }
        }
    }
    best
}

/// What the resolver did this tick
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOutcome {
    /// A lethal collision ends the session (checkpoint permitting)
    pub fatal: Option<SessionOutcome>,
    /// Coins collected this tick
    pub coins_picked: u32,
}

fn aabb_overlap(min_a: Vec2, max_a: Vec2, min_b: Vec2, max_b: Vec2) -> bool {
    min_a.x < max_b.x && max_a.x > min_b.x && min_a.y < max_b.y && max_a.y > min_b.y
}

/// Spike AABB, narrowed inward from its nominal width
fn spike_hitbox(ob: &Obstacle, width: f32, height: f32) -> (Vec2, Vec2) {
    (
        Vec2::new(ob.x + SPIKE_INSET, ob.base_y - height),
        Vec2::new(ob.x + width - SPIKE_INSET, ob.base_y),
    )
}

/// The blocking band of a low wall: everything above the clearance gap
fn wall_band(ob: &Obstacle, width: f32, height: f32, clearance: f32) -> (Vec2, Vec2) {
    (
        Vec2::new(ob.x, ob.base_y - height),
        Vec2::new(ob.x + width, ob.base_y - clearance),
    )
}

fn log_center(ob: &Obstacle, radius: f32) -> Vec2 {
    Vec2::new(ob.x + radius, ob.base_y - radius)
}

/// Test the actor against every live obstacle, collectible, and
/// swing-point, applying outcomes in stable (ascending x) order.
#[allow(clippy::too_many_arguments)]
pub fn resolve(
    player: &mut Player,
    jump_held: bool,
    obstacles: &mut [Obstacle],
    coins: &mut [Coin],
    swings: &mut [SwingPoint],
    events: &mut Vec<GameEvent>,
    tuning: &Tuning,
) -> ResolveOutcome {
    debug_assert!(
        obstacles.windows(2).all(|p| p[0].x <= p[1].x),
        "obstacles must stay in ascending x"
    );

    let mut outcome = ResolveOutcome::default();
    let (p_min, p_max) = player.hitbox();

    for ob in obstacles.iter_mut() {
        if !ob.passed && player.pos.x > ob.right_edge() {
            ob.passed = true;
        }

        match ob.kind {
            ObstacleKind::Spike { width, height } => {
                if player.invincibility > 0 {
                    continue;
                }
                let (s_min, s_max) = spike_hitbox(ob, width, height);
                if aabb_overlap(p_min, p_max, s_min, s_max) {
                    events.push(GameEvent::ParticleBurst {
                        pos: player.center(),
                        color: 0xE04040,
                        count: 24,
                    });
                    outcome.fatal = Some(SessionOutcome::Struck);
                    return outcome;
                }
            }
            ObstacleKind::Log { radius } => {
                let center = log_center(ob, radius);
                let combined = radius + player.half_width();
                if player.center().distance(center) < combined && player.vel.y > 0.0 {
                    // Descending contact: bounce instead of damage
                    player.vel.y = LOG_BOUNCE_VY;
                    player.vel.x = (player.vel.x + LOG_BOUNCE_VX).min(tuning.run_speed_max + 2.0);
                    player.state = PlayerState::Jumping;
                    player.invincibility = player.invincibility.max(30);
                    events.push(GameEvent::Bounced { pos: center });
                    events.push(GameEvent::Audio(AudioCue::Bounce));
                    events.push(GameEvent::ParticleBurst {
                        pos: center,
                        color: 0x9C6B30,
                        count: 10,
                    });
                }
            }
            // Never directly collided: falling past the world floor over
            // its span is what kills
            ObstacleKind::Gap { .. } => {}
            // Ground override only (see ground_info_at)
            ObstacleKind::Ramp { .. } => {}
            ObstacleKind::LowWall {
                width,
                height,
                clearance,
            } => {
                if player.invincibility > 0 {
                    continue;
                }
                let (w_min, w_max) = wall_band(ob, width, height, clearance);
                if aabb_overlap(p_min, p_max, w_min, w_max) {
                    // Hard deceleration and knockback; the wall persists
                    player.pos.x -= WALL_KNOCKBACK;
                    player.vel.x = tuning.run_speed_min;
                    if player.is_airborne() {
                        player.state = PlayerState::Falling;
                        player.vel.y = player.vel.y.max(0.0);
                    }
                    player.invincibility = INVINCIBILITY_TICKS;
                    events.push(GameEvent::WallImpact { pos: player.center() });
                    events.push(GameEvent::Audio(AudioCue::Impact));
                    events.push(GameEvent::ScreenShake { magnitude: 0.6 });
                }
            }
        }
    }

    // Collectibles: immunity never suppresses pickups
    for coin in coins.iter_mut() {
        if coin.collected {
            continue;
        }
        if player.center().distance(coin.pos) < COIN_RADIUS + player.half_width() {
            coin.collected = true;
            outcome.coins_picked += 1;
            events.push(GameEvent::CoinPickup { pos: coin.pos });
            events.push(GameEvent::Audio(AudioCue::Coin));
            events.push(GameEvent::ParticleBurst {
                pos: coin.pos,
                color: 0xF5C542,
                count: 6,
            });
        }
    }

    try_grab(player, jump_held, swings, events);

    outcome
}

/// Grab eligibility: any non-swinging state, grounded or airborne, while
/// jump intent is held, within the grab radius of a free rope end, once
/// the re-grab cooldown has expired.
fn try_grab(
    player: &mut Player,
    jump_held: bool,
    swings: &mut [SwingPoint],
    events: &mut Vec<GameEvent>,
) {
    if player.state == PlayerState::Swinging || !jump_held || player.grab_cooldown > 0 {
        return;
    }

    let center = player.center();
    let Some(swing) = swings
        .iter_mut()
        .filter(|s| !s.held && center.distance(s.tip()) <= GRAB_RADIUS)
        .min_by(|a, b| {
            center
                .distance(a.tip())
                .total_cmp(&center.distance(b.tip()))
        })
    else {
        return;
    };

    // Bind to the point along the rope nearest the actor: grip length
    // is the anchor distance at grab time, held fixed until release
    let to_player = center - swing.anchor;
    let grip_len = to_player.length().clamp(MIN_GRIP_LENGTH, swing.rope_len);
    let angle = to_player.x.atan2(to_player.y);
    // Carry the actor's momentum into the swing as angular velocity
    let tangent = Vec2::new(angle.cos(), -angle.sin());
    swing.angle = angle;
    swing.angular_vel = player.vel.dot(tangent) / grip_len;
    swing.held = true;

    player.grip = Some(SwingGrip {
        swing_id: swing.id,
        grip_len,
    });
    player.state = PlayerState::Swinging;
    player.hold_ticks = 0;
    player.vel = Vec2::ZERO;
    events.push(GameEvent::SwingGrabbed { id: swing.id });
    events.push(GameEvent::Audio(AudioCue::Grab));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spike_at(x: f32) -> Obstacle {
        Obstacle {
            id: 1,
            x,
            base_y: 360.0,
            kind: ObstacleKind::Spike {
                width: SPIKE_WIDTH,
                height: SPIKE_HEIGHT,
            },
            passed: false,
        }
    }

    fn wall_at(x: f32) -> Obstacle {
        Obstacle {
            id: 2,
            x,
            base_y: 360.0,
            kind: ObstacleKind::LowWall {
                width: WALL_WIDTH,
                height: WALL_HEIGHT,
                clearance: WALL_CLEARANCE,
            },
            passed: false,
        }
    }

    fn grounded_player(x: f32) -> Player {
        Player::new(Vec2::new(x, 360.0), RUN_SPEED)
    }

    fn run_resolve(
        player: &mut Player,
        jump_held: bool,
        obstacles: &mut [Obstacle],
        coins: &mut [Coin],
        swings: &mut [SwingPoint],
    ) -> ResolveOutcome {
        let mut events = Vec::new();
        resolve(
            player,
            jump_held,
            obstacles,
            coins,
            swings,
            &mut events,
            &Tuning::default(),
        )
    }

    #[test]
    fn test_spike_overlap_is_fatal() {
        let mut p = grounded_player(400.0);
        let mut obs = vec![spike_at(390.0)];
        let out = run_resolve(&mut p, false, &mut obs, &mut [], &mut []);
        assert_eq!(out.fatal, Some(SessionOutcome::Struck));
    }

    #[test]
    fn test_spike_inset_narrows_hitbox() {
        // Player's right edge grazes the spike's nominal left edge but not
        // the narrowed box
        let mut p = grounded_player(400.0);
        let mut obs = vec![spike_at(400.0 + PLAYER_WIDTH / 2.0 - SPIKE_INSET + 1.0)];
        let out = run_resolve(&mut p, false, &mut obs, &mut [], &mut []);
        assert_eq!(out.fatal, None);
    }

    #[test]
    fn test_invincibility_suppresses_death_not_pickup() {
        let mut p = grounded_player(400.0);
        p.invincibility = 10;
        let mut obs = vec![spike_at(390.0)];
        let mut coins = vec![Coin {
            id: 9,
            pos: p.center(),
            collected: false,
            spin: 0.0,
        }];
        let out = run_resolve(&mut p, false, &mut obs, &mut coins, &mut []);
        assert_eq!(out.fatal, None);
        assert_eq!(out.coins_picked, 1);
        assert!(coins[0].collected);
    }

    #[test]
    fn test_log_bounces_only_descending() {
        let log = Obstacle {
            id: 3,
            x: 400.0,
            base_y: 360.0,
            kind: ObstacleKind::Log { radius: LOG_RADIUS },
            passed: false,
        };

        // Descending onto the log: bounce
        let mut p = grounded_player(400.0 + LOG_RADIUS);
        p.state = PlayerState::Falling;
        p.pos.y = 360.0 - LOG_RADIUS;
        p.vel.y = 5.0;
        let mut obs = vec![log.clone()];
        let out = run_resolve(&mut p, false, &mut obs, &mut [], &mut []);
        assert_eq!(out.fatal, None);
        assert_eq!(p.vel.y, LOG_BOUNCE_VY);
        assert_eq!(p.state, PlayerState::Jumping);

        // Ascending through the same spot: no bounce
        let mut p = grounded_player(400.0 + LOG_RADIUS);
        p.state = PlayerState::Jumping;
        p.pos.y = 360.0 - LOG_RADIUS;
        p.vel.y = -5.0;
        let mut obs = vec![log];
        run_resolve(&mut p, false, &mut obs, &mut [], &mut []);
        assert_eq!(p.vel.y, -5.0);
    }

    #[test]
    fn test_sliding_clears_low_wall() {
        let mut p = grounded_player(400.0 + WALL_WIDTH / 2.0);
        p.state = PlayerState::Sliding;
        let mut obs = vec![wall_at(400.0)];
        let x_before = p.pos.x;
        run_resolve(&mut p, false, &mut obs, &mut [], &mut []);
        assert_eq!(p.pos.x, x_before, "sliding under the wall must not impact");
    }

    #[test]
    fn test_standing_wall_contact_knocks_back() {
        let mut p = grounded_player(400.0 + WALL_WIDTH / 2.0);
        let x_before = p.pos.x;
        let mut obs = vec![wall_at(400.0)];
        let out = run_resolve(&mut p, false, &mut obs, &mut [], &mut []);
        assert_eq!(out.fatal, None, "wall impact is never lethal");
        assert!(p.pos.x < x_before);
        assert_eq!(p.vel.x, RUN_SPEED_MIN);
        assert!(p.invincibility > 0);
    }

    #[test]
    fn test_grab_requires_hold_and_cooldown() {
        let swing = SwingPoint {
            id: 7,
            anchor: Vec2::new(420.0, 140.0),
            rope_len: 150.0,
            angle: 0.0,
            angular_vel: 0.0,
            held: false,
        };
        // Tip at (420, 290); put the actor's center on it
        let mut p = Player::new(Vec2::new(420.0, 290.0 + PLAYER_HEIGHT / 2.0), RUN_SPEED);
        p.state = PlayerState::Jumping;
        p.vel = Vec2::new(6.0, 2.0);

        // Without jump held: no grab
        let mut swings = vec![swing.clone()];
        run_resolve(&mut p, false, &mut [], &mut [], &mut swings);
        assert_eq!(p.state, PlayerState::Jumping);

        // Cooldown pending: no grab
        p.grab_cooldown = 5;
        let mut swings = vec![swing.clone()];
        run_resolve(&mut p, true, &mut [], &mut [], &mut swings);
        assert_eq!(p.state, PlayerState::Jumping);

        // Held and cooled down: grab binds at the actual anchor distance
        p.grab_cooldown = 0;
        let mut swings = vec![swing];
        run_resolve(&mut p, true, &mut [], &mut [], &mut swings);
        assert_eq!(p.state, PlayerState::Swinging);
        let grip = p.grip.expect("grip recorded");
        assert!(grip.grip_len <= 150.0);
        assert!(swings[0].held);
    }

    #[test]
    fn test_ramp_overrides_ground() {
        let terrain = Terrain::flat(360.0, 0.0, 2000.0);
        let ramp = Obstacle {
            id: 4,
            x: 500.0,
            base_y: 360.0,
            kind: ObstacleKind::Ramp {
                width: 100.0,
                rise: 50.0,
            },
            passed: false,
        };
        let obs = vec![ramp];
        let mid = ground_info_at(&terrain, &obs, 550.0).unwrap();
        assert!((mid.height - 335.0).abs() < 0.01);
        assert!(mid.slope < 0.0);
        assert!(mid.ramp.is_some());
        // Off the ramp: plain terrain
        let off = ground_info_at(&terrain, &obs, 700.0).unwrap();
        assert_eq!(off.height, 360.0);
        assert!(off.ramp.is_none());
    }
}
