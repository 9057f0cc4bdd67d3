//! Actor physics and state machine
//!
//! The actor is the only fully dynamic body in the simulation: gravity,
//! slope-based speed transfer, jump/slide/fall kinematics, and pendulum
//! swinging on grabbed swing-points. Grab initiation lives in the
//! collision resolver; everything else about the actor moves through
//! `Player::integrate`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::ground_info_at;
use super::state::{AudioCue, GameEvent, Obstacle, PlayerState, SwingPoint};
use super::terrain::Terrain;
use crate::consts::*;
use crate::tuning::Tuning;

/// Intent sample for one tick, with edges derived by the session from the
/// previous tick's sample
#[derive(Debug, Clone, Copy, Default)]
pub struct Intent {
    pub jump_held: bool,
    pub slide_held: bool,
    pub jump_pressed: bool,
    pub slide_pressed: bool,
}

/// A held swing-point: which one, and the anchor-to-grab distance
/// recorded at grab time (not the rope's nominal length)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingGrip {
    pub swing_id: u32,
    pub grip_len: f32,
}

/// The player-controlled actor. `pos` is the feet midpoint.
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub state: PlayerState,
    /// Frames of immunity left; suppresses lethal checks, never pickups
    pub invincibility: u32,
    pub grip: Option<SwingGrip>,
    /// Ticks until another grab is allowed after a release
    pub grab_cooldown: u32,
    /// Ticks spent holding the current swing
    pub hold_ticks: u32,
    /// Glide reserve, accrued with forward travel
    pub glide_charge: f32,
    /// True on ticks where glide is actively reducing gravity
    pub gliding: bool,
    /// Rise banked while sliding on a ramp, spent as a launch off its top
    ramp_charge: Option<f32>,
}

impl Player {
    pub fn new(pos: Vec2, run_speed: f32) -> Self {
        Self {
            pos,
            vel: Vec2::new(run_speed, 0.0),
            state: PlayerState::Running,
            invincibility: 0,
            grip: None,
            grab_cooldown: 0,
            hold_ticks: 0,
            glide_charge: 0.0,
            gliding: false,
            ramp_charge: None,
        }
    }

    /// Bounding height varies by state: sliding crouches, everything else
    /// stands tall
    pub fn height(&self) -> f32 {
        match self.state {
            PlayerState::Sliding => PLAYER_SLIDE_HEIGHT,
            _ => PLAYER_HEIGHT,
        }
    }

    pub fn half_width(&self) -> f32 {
        PLAYER_WIDTH / 2.0
    }

    /// Geometric center of the bounding box
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y - self.height() / 2.0)
    }

    /// AABB as (min, max) corners
    pub fn hitbox(&self) -> (Vec2, Vec2) {
        (
            Vec2::new(self.pos.x - self.half_width(), self.pos.y - self.height()),
            Vec2::new(self.pos.x + self.half_width(), self.pos.y),
        )
    }

    pub fn is_grounded(&self) -> bool {
        matches!(self.state, PlayerState::Running | PlayerState::Sliding)
    }

    pub fn is_airborne(&self) -> bool {
        matches!(self.state, PlayerState::Jumping | PlayerState::Falling)
    }

    /// Advance the actor one tick (everything except grab initiation and
    /// obstacle outcomes, which the collision resolver applies afterward)
    pub fn integrate(
        &mut self,
        intent: &Intent,
        terrain: &Terrain,
        obstacles: &[Obstacle],
        swings: &mut [SwingPoint],
        events: &mut Vec<GameEvent>,
        tuning: &Tuning,
    ) {
        self.invincibility = self.invincibility.saturating_sub(1);
        self.grab_cooldown = self.grab_cooldown.saturating_sub(1);

        if self.state == PlayerState::Swinging {
            self.integrate_swing(intent, swings, events);
            return;
        }

        // Exactly one of grounded/airborne holds here; swinging returned above
        debug_assert!(self.is_grounded() || self.is_airborne());
        debug_assert!(!self.is_grounded() || self.vel.y == 0.0);

        // Discrete intent transitions first
        match self.state {
            PlayerState::Running if intent.jump_pressed => {
                self.vel.y = tuning.jump_impulse;
                self.state = PlayerState::Jumping;
                self.ramp_charge = None;
                events.push(GameEvent::Jumped);
                events.push(GameEvent::Audio(AudioCue::Jump));
            }
            PlayerState::Running if intent.slide_held => {
                self.state = PlayerState::Sliding;
                if intent.slide_pressed {
                    events.push(GameEvent::SlideStarted);
                    events.push(GameEvent::Audio(AudioCue::Slide));
                }
            }
            PlayerState::Sliding if intent.jump_pressed => {
                self.vel.y = tuning.jump_impulse;
                self.state = PlayerState::Jumping;
                self.ramp_charge = None;
                events.push(GameEvent::Jumped);
                events.push(GameEvent::Audio(AudioCue::Jump));
            }
            PlayerState::Sliding if !intent.slide_held => {
                self.state = PlayerState::Running;
            }
            _ => {}
        }

        let ground = ground_info_at(terrain, obstacles, self.pos.x);

        // Horizontal speed: slope transfer while grounded, inertia in the air
        if self.is_grounded() {
            let slope = ground.as_ref().map(|g| g.slope).unwrap_or(0.0);
            if slope.abs() > 0.01 {
                // Downhill (+slope, y grows downward) accelerates toward the
                // cap, uphill decelerates toward the floor
                self.vel.x += slope * SLOPE_ACCEL;
            } else {
                self.vel.x += (tuning.run_speed - self.vel.x) * SPEED_RELAX;
            }
            self.vel.x = self.vel.x.clamp(tuning.run_speed_min, tuning.run_speed_max);
        }

        // Vertical: gravity, with glide reducing it while held and charged
        if self.is_airborne() {
            let mut g = tuning.gravity;
            self.gliding =
                intent.jump_held && self.vel.y > 0.0 && self.glide_charge >= 1.0;
            if self.gliding {
                g *= GLIDE_GRAVITY_SCALE;
                self.glide_charge -= 1.0;
            }
            self.vel.y = (self.vel.y + g).min(MAX_FALL_SPEED);
        } else {
            self.gliding = false;
        }

        self.pos.x += self.vel.x;
        self.glide_charge =
            (self.glide_charge + self.vel.x * GLIDE_CHARGE_PER_PX).min(GLIDE_MAX_CHARGE);

        let ground = ground_info_at(terrain, obstacles, self.pos.x);
        match self.state {
            PlayerState::Running | PlayerState::Sliding => match &ground {
                // Follow the ground line, banking ramp rise while sliding
                Some(g) => match (g.ramp, self.ramp_charge) {
                    // Past the ramp's top edge: spend the banked rise from
                    // up here instead of snapping to the ground line
                    (None, Some(rise)) => {
                        self.ramp_charge = None;
                        self.launch_off_ramp(rise, events, tuning);
                    }
                    _ => {
                        self.pos.y = g.height;
                        // The bank only holds while the slide is held
                        self.ramp_charge = match g.ramp {
                            Some((_, rise)) if self.state == PlayerState::Sliding => Some(rise),
                            _ => None,
                        };
                    }
                },
                // Ground vanished underfoot (gap edge): freefall
                None => {
                    self.state = PlayerState::Falling;
                    self.ramp_charge = None;
                }
            },
            PlayerState::Jumping | PlayerState::Falling => {
                let y_before = self.pos.y;
                self.pos.y += self.vel.y;
                if self.vel.y >= 0.0 {
                    if let Some(g) = &ground {
                        // Land only when crossing the ground line from
                        // above; an actor already below it (deep in a
                        // pit) keeps falling
                        if self.pos.y >= g.height && y_before <= g.height {
                            self.pos.y = g.height;
                            self.vel.y = 0.0;
                            self.state = if intent.slide_held {
                                PlayerState::Sliding
                            } else {
                                PlayerState::Running
                            };
                            self.gliding = false;
                            events.push(GameEvent::Landed);
                            events.push(GameEvent::Audio(AudioCue::Land));
                        }
                    }
                }
            }
            PlayerState::Swinging => unreachable!("handled above"),
        }
    }

    /// Pendulum dynamics while holding a swing-point, and release handling
    fn integrate_swing(
        &mut self,
        intent: &Intent,
        swings: &mut [SwingPoint],
        events: &mut Vec<GameEvent>,
    ) {
        let grip = match self.grip {
            Some(g) => g,
            None => {
                debug_assert!(false, "swinging without a grip");
                self.state = PlayerState::Falling;
                return;
            }
        };
        let Some(swing) = swings.iter_mut().find(|s| s.id == grip.swing_id) else {
            // Swing culled out from under us (shouldn't happen inside the
            // window); fall free
            self.grip = None;
            self.state = PlayerState::Falling;
            return;
        };

        swing.angular_vel += -(GRAVITY / grip.grip_len) * swing.angle.sin();
        swing.angular_vel *= SWING_DAMPING;
        swing.angle += swing.angular_vel;
        self.hold_ticks += 1;

        // Bob velocity: d/dt of anchor + grip_len * (sin a, cos a)
        let bob_vel = Vec2::new(swing.angle.cos(), -swing.angle.sin())
            * (swing.angular_vel * grip.grip_len);
        self.vel = bob_vel;

        let grab_point = swing.point_at(grip.grip_len);
        self.pos = Vec2::new(grab_point.x, grab_point.y + self.height() / 2.0);

        // Release on jump-intent release, after the minimum hold
        if !intent.jump_held && self.hold_ticks >= SWING_MIN_HOLD_TICKS {
            self.vel = Vec2::new(
                bob_vel.x.clamp(RELEASE_VX_MIN, RELEASE_VX_MAX),
                bob_vel.y.clamp(RELEASE_VY_MIN, RELEASE_VY_MAX),
            );
            self.state = PlayerState::Jumping;
            self.grip = None;
            self.grab_cooldown = GRAB_COOLDOWN_TICKS;
            swing.held = false;
            events.push(GameEvent::SwingReleased { id: swing.id });
            events.push(GameEvent::Audio(AudioCue::Release));
        }
    }

    /// Convert banked ramp rise into a forward+upward boost
    fn launch_off_ramp(&mut self, rise: f32, events: &mut Vec<GameEvent>, tuning: &Tuning) {
        self.vel.y = -(rise * RAMP_LAUNCH_SCALE);
        self.vel.x = (self.vel.x + 2.0).min(tuning.run_speed_max + 3.0);
        self.state = PlayerState::Jumping;
        events.push(GameEvent::RampLaunch { pos: self.pos });
        events.push(GameEvent::Audio(AudioCue::Jump));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleKind;

    fn flat_terrain() -> Terrain {
        Terrain::flat(360.0, -500.0, 100_000.0)
    }

    fn no_obstacles() -> Vec<Obstacle> {
        Vec::new()
    }

    fn tick_player(p: &mut Player, intent: Intent, terrain: &Terrain, obstacles: &[Obstacle]) {
        let mut swings = Vec::new();
        let mut events = Vec::new();
        p.integrate(
            &intent,
            terrain,
            obstacles,
            &mut swings,
            &mut events,
            &Tuning::default(),
        );
    }

    #[test]
    fn test_running_holds_ground() {
        let terrain = flat_terrain();
        let obstacles = no_obstacles();
        let mut p = Player::new(Vec2::new(320.0, 360.0), RUN_SPEED);
        for _ in 0..50 {
            tick_player(&mut p, Intent::default(), &terrain, &obstacles);
        }
        assert_eq!(p.state, PlayerState::Running);
        assert_eq!(p.pos.y, 360.0);
        assert!((p.pos.x - (320.0 + 50.0 * RUN_SPEED)).abs() < 0.01);
    }

    #[test]
    fn test_jump_arc_returns_to_ground() {
        let terrain = flat_terrain();
        let obstacles = no_obstacles();
        let mut p = Player::new(Vec2::new(320.0, 360.0), RUN_SPEED);

        let press = Intent {
            jump_held: true,
            jump_pressed: true,
            ..Default::default()
        };
        tick_player(&mut p, press, &terrain, &obstacles);
        assert_eq!(p.state, PlayerState::Jumping);
        assert_eq!(p.vel.y, JUMP_IMPULSE + GRAVITY);

        // Symmetric parabolic arc: back on the ground within ceil(2*14/0.6)
        let max_ticks = (2.0 * JUMP_IMPULSE.abs() / GRAVITY).ceil() as u32;
        let mut landed_at = None;
        for t in 1..=max_ticks {
            tick_player(&mut p, Intent::default(), &terrain, &obstacles);
            if p.state == PlayerState::Running {
                landed_at = Some(t);
                break;
            }
        }
        assert!(landed_at.is_some(), "actor never landed");
        assert_eq!(p.pos.y, 360.0);
        assert_eq!(p.vel.y, 0.0);
    }

    #[test]
    fn test_landing_with_slide_held_lands_sliding() {
        let terrain = flat_terrain();
        let obstacles = no_obstacles();
        let mut p = Player::new(Vec2::new(320.0, 360.0), RUN_SPEED);
        let press = Intent {
            jump_held: true,
            jump_pressed: true,
            ..Default::default()
        };
        tick_player(&mut p, press, &terrain, &obstacles);
        let slide = Intent {
            slide_held: true,
            ..Default::default()
        };
        for _ in 0..60 {
            tick_player(&mut p, slide, &terrain, &obstacles);
            if p.is_grounded() {
                break;
            }
        }
        assert_eq!(p.state, PlayerState::Sliding);
        assert_eq!(p.height(), PLAYER_SLIDE_HEIGHT);
    }

    #[test]
    fn test_slide_toggle() {
        let terrain = flat_terrain();
        let obstacles = no_obstacles();
        let mut p = Player::new(Vec2::new(320.0, 360.0), RUN_SPEED);
        let slide = Intent {
            slide_held: true,
            slide_pressed: true,
            ..Default::default()
        };
        tick_player(&mut p, slide, &terrain, &obstacles);
        assert_eq!(p.state, PlayerState::Sliding);
        tick_player(&mut p, Intent::default(), &terrain, &obstacles);
        assert_eq!(p.state, PlayerState::Running);
        assert_eq!(p.height(), PLAYER_HEIGHT);
    }

    #[test]
    fn test_walking_off_edge_falls() {
        let mut terrain = Terrain::flat(360.0, -500.0, 100_000.0);
        terrain.carve_gap(350.0, 1000.0);
        let obstacles = no_obstacles();
        let mut p = Player::new(Vec2::new(320.0, 360.0), RUN_SPEED);
        for _ in 0..10 {
            tick_player(&mut p, Intent::default(), &terrain, &obstacles);
        }
        assert_eq!(p.state, PlayerState::Falling);
        assert!(p.pos.y > 360.0);
    }

    #[test]
    fn test_downhill_accelerates_uphill_decelerates() {
        use crate::sim::terrain::Segment;
        let obstacles = no_obstacles();
        // One long linear slope from y0 at x=0 to y1 far right
        let sloped = |y0: f32, y1: f32| {
            Terrain::from_segments(vec![Segment {
                start: Vec2::new(-500.0, y0),
                end: Vec2::new(5_000.0, y1),
            }])
        };

        // Downhill: ground y grows with x
        let t = sloped(300.0, 400.0);
        let mut p = Player::new(Vec2::new(320.0, t.visual_height_at(320.0)), RUN_SPEED);
        for _ in 0..100 {
            tick_player(&mut p, Intent::default(), &t, &obstacles);
        }
        assert!(p.vel.x > RUN_SPEED);

        let t = sloped(400.0, 300.0);
        let mut p = Player::new(Vec2::new(320.0, t.visual_height_at(320.0)), RUN_SPEED);
        for _ in 0..100 {
            tick_player(&mut p, Intent::default(), &t, &obstacles);
        }
        assert!(p.vel.x < RUN_SPEED);
    }

    #[test]
    fn test_glide_halves_gravity_and_drains() {
        let terrain = flat_terrain();
        let obstacles = no_obstacles();
        let mut p = Player::new(Vec2::new(320.0, 360.0), RUN_SPEED);
        p.glide_charge = GLIDE_MAX_CHARGE;
        p.state = PlayerState::Falling;
        p.pos.y = 100.0;
        p.vel.y = 1.0;

        let hold = Intent {
            jump_held: true,
            ..Default::default()
        };
        let vy_before = p.vel.y;
        tick_player(&mut p, hold, &terrain, &obstacles);
        assert!(p.gliding);
        assert!((p.vel.y - (vy_before + GRAVITY * GLIDE_GRAVITY_SCALE)).abs() < 1e-4);
        assert!(p.glide_charge < GLIDE_MAX_CHARGE);
    }

    #[test]
    fn test_state_machine_totality() {
        // Every (state, input) combination maps to exactly one defined
        // next state, with kinematics consistent with it
        let terrain = flat_terrain();
        let obstacles = no_obstacles();
        let combos = [(false, false), (true, false), (false, true), (true, true)];
        let states = [
            PlayerState::Running,
            PlayerState::Sliding,
            PlayerState::Jumping,
            PlayerState::Falling,
        ];
        for state in states {
            for (jump, slide) in combos {
                let mut p = Player::new(Vec2::new(320.0, 360.0), RUN_SPEED);
                p.state = state;
                if p.is_airborne() {
                    p.pos.y = 250.0;
                    p.vel.y = if state == PlayerState::Jumping { -5.0 } else { 2.0 };
                }
                let intent = Intent {
                    jump_held: jump,
                    slide_held: slide,
                    jump_pressed: jump,
                    slide_pressed: slide,
                };
                tick_player(&mut p, intent, &terrain, &obstacles);
                if p.is_grounded() {
                    assert_eq!(p.vel.y, 0.0, "{state:?} with jump={jump} slide={slide}");
                }
                if p.state == PlayerState::Sliding {
                    assert_eq!(p.height(), PLAYER_SLIDE_HEIGHT);
                } else {
                    assert_eq!(p.height(), PLAYER_HEIGHT);
                }
            }
        }
    }

    #[test]
    fn test_swing_hold_then_release() {
        let terrain = flat_terrain();
        let obstacles = no_obstacles();
        let mut swings = vec![SwingPoint {
            id: 1,
            anchor: Vec2::new(420.0, 140.0),
            rope_len: 150.0,
            angle: -0.5,
            angular_vel: 0.2,
            held: true,
        }];
        let mut p = Player::new(Vec2::new(380.0, 300.0), RUN_SPEED);
        p.state = PlayerState::Swinging;
        p.grip = Some(SwingGrip {
            swing_id: 1,
            grip_len: 150.0,
        });

        // Holding jump keeps the actor pinned to the rope
        let hold = Intent {
            jump_held: true,
            ..Default::default()
        };
        for _ in 0..SWING_MIN_HOLD_TICKS + 4 {
            let mut events = Vec::new();
            p.integrate(
                &hold,
                &terrain,
                &obstacles,
                &mut swings,
                &mut events,
                &Tuning::default(),
            );
            assert_eq!(p.state, PlayerState::Swinging);
            let grab_point = swings[0].point_at(150.0);
            assert!((p.pos.x - grab_point.x).abs() < 0.01);
        }
        assert!(p.hold_ticks >= SWING_MIN_HOLD_TICKS);

        // Releasing jump past the minimum hold launches forward
        let mut events = Vec::new();
        p.integrate(
            &Intent::default(),
            &terrain,
            &obstacles,
            &mut swings,
            &mut events,
            &Tuning::default(),
        );
        assert_eq!(p.state, PlayerState::Jumping);
        assert!(p.grip.is_none());
        assert!(!swings[0].held);
        assert!(p.grab_cooldown > 0);
        assert!((RELEASE_VX_MIN..=RELEASE_VX_MAX).contains(&p.vel.x));
        assert!(events.iter().any(|e| matches!(e, GameEvent::SwingReleased { id: 1 })));
    }

    #[test]
    fn test_release_before_min_hold_is_ignored() {
        let terrain = flat_terrain();
        let obstacles = no_obstacles();
        let mut swings = vec![SwingPoint {
            id: 1,
            anchor: Vec2::new(420.0, 140.0),
            rope_len: 150.0,
            angle: -0.5,
            angular_vel: 0.2,
            held: true,
        }];
        let mut p = Player::new(Vec2::new(380.0, 300.0), RUN_SPEED);
        p.state = PlayerState::Swinging;
        p.grip = Some(SwingGrip {
            swing_id: 1,
            grip_len: 150.0,
        });

        let mut events = Vec::new();
        p.integrate(
            &Intent::default(),
            &terrain,
            &obstacles,
            &mut swings,
            &mut events,
            &Tuning::default(),
        );
        assert_eq!(p.state, PlayerState::Swinging, "instant release is absorbed");
    }

    #[test]
    fn test_ramp_slide_launches_at_top() {
        let terrain = flat_terrain();
        let ramp = Obstacle {
            id: 1,
            x: 330.0,
            base_y: 360.0,
            kind: ObstacleKind::Ramp {
                width: 150.0,
                rise: 50.0,
            },
            passed: false,
        };
        let obstacles = vec![ramp];
        let mut p = Player::new(Vec2::new(320.0, 360.0), RUN_SPEED);
        let slide = Intent {
            slide_held: true,
            ..Default::default()
        };
        let mut launched = false;
        for _ in 0..60 {
            tick_player(&mut p, slide, &terrain, &obstacles);
            if p.state == PlayerState::Jumping {
                launched = true;
                break;
            }
        }
        assert!(launched, "sliding over the ramp should launch the actor");
        assert!(p.vel.y < 0.0);
    }
}
