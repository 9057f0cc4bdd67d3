//! Session state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::player::Player;
use super::world::World;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created but not started
    Ready,
    /// Active gameplay
    Playing,
    /// Tick advancement halted, resumable without state loss
    Paused,
    /// Run ended (caught or fell)
    GameOver,
}

/// Discrete actor state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Running,
    Jumping,
    Sliding,
    Swinging,
    /// Airborne without having jumped (ran off an edge, knocked back)
    Falling,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    /// Pursuer reached the actor
    Caught,
    /// Fell below the world floor
    Fell,
    /// Fatal obstacle hit
    Struck,
}

/// Obstacle geometry variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Lethal AABB, narrowed inward from nominal width
    Spike { width: f32, height: f32 },
    /// Radial bounce pad: descending contact bounces the actor up
    Log { radius: f32 },
    /// No-ground span; wide variants ("chasms") are carved with a
    /// guaranteed swing-point and a preceding warning sign
    Gap { width: f32 },
    /// Sloped landing surface; sliding off the top edge launches the actor
    Ramp { width: f32, rise: f32 },
    /// Blocking band above a clearance height: slide under, or eat a
    /// hard deceleration and knockback
    LowWall { width: f32, height: f32, clearance: f32 },
}

/// A world obstacle. `x` is the left edge, `base_y` the ground height
/// recorded at spawn time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub x: f32,
    pub base_y: f32,
    pub kind: ObstacleKind,
    /// Scoring/analytics only, never collision-relevant
    pub passed: bool,
}

impl Obstacle {
    pub fn width(&self) -> f32 {
        match self.kind {
            ObstacleKind::Spike { width, .. } => width,
            ObstacleKind::Log { radius } => radius * 2.0,
            ObstacleKind::Gap { width } => width,
            ObstacleKind::Ramp { width, .. } => width,
            ObstacleKind::LowWall { width, .. } => width,
        }
    }

    pub fn right_edge(&self) -> f32 {
        self.x + self.width()
    }

    /// A gap wide enough that a plain jump cannot clear it
    pub fn is_chasm(&self) -> bool {
        matches!(self.kind, ObstacleKind::Gap { width } if width >= CHASM_WIDTH_MIN)
    }
}

/// An anchored pendulum traversal aid (rope/vine)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwingPoint {
    pub id: u32,
    pub anchor: Vec2,
    pub rope_len: f32,
    /// Radians from vertical; positive swings forward (+x)
    pub angle: f32,
    pub angular_vel: f32,
    pub held: bool,
}

impl SwingPoint {
    /// World position of the point `dist` down the rope from the anchor
    pub fn point_at(&self, dist: f32) -> Vec2 {
        self.anchor + Vec2::new(self.angle.sin(), self.angle.cos()) * dist
    }

    /// World position of the rope's free end
    pub fn tip(&self) -> Vec2 {
        self.point_at(self.rope_len)
    }

    /// Pendulum step for an unheld rope
    pub fn swing_free(&mut self) {
        self.angular_vel += -(GRAVITY / self.rope_len) * self.angle.sin();
        self.angular_vel *= SWING_DAMPING;
        self.angle += self.angular_vel;
    }
}

/// A collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub pos: Vec2,
    pub collected: bool,
    /// Cosmetic rotation phase
    pub spin: f32,
}

/// Marker placed ahead of a chasm so the player gets a visible lead
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarningSign {
    pub id: u32,
    pub x: f32,
}

/// The catching agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pursuer {
    pub x: f32,
    pub speed: f32,
}

impl Pursuer {
    pub fn new(x: f32, base_speed: f32) -> Self {
        Self {
            x,
            speed: base_speed,
        }
    }

    /// Advance one tick. Speed scales with total distance and never
    /// decreases within a session.
    pub fn advance(&mut self, distance: f32, tuning: &Tuning) {
        let scaled = tuning.pursuer_base_speed * (1.0 + distance / tuning.pursuer_scaling);
        self.speed = self.speed.max(scaled);
        self.x += self.speed;
    }

    /// Proximity warning on a 0-100 scale, inverse-linear in the gap
    pub fn warning(&self, player_x: f32) -> u8 {
        let gap = player_x - self.x;
        if gap >= PURSUER_WARNING_GAP {
            0
        } else {
            (((PURSUER_WARNING_GAP - gap) / PURSUER_WARNING_GAP) * 100.0).clamp(0.0, 100.0) as u8
        }
    }
}

/// Audio cue identifiers for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    Jump,
    Land,
    Slide,
    Coin,
    Bounce,
    Grab,
    Release,
    Impact,
    Checkpoint,
    Death,
}

/// Effect/outcome notifications emitted during a tick.
///
/// The core owns no long-lived particles; it emits burst events and the
/// presentation layer animates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    Landed,
    SlideStarted,
    CoinPickup { pos: Vec2 },
    Bounced { pos: Vec2 },
    WallImpact { pos: Vec2 },
    SwingGrabbed { id: u32 },
    SwingReleased { id: u32 },
    RampLaunch { pos: Vec2 },
    CheckpointArmed,
    CheckpointRespawn,
    ParticleBurst { pos: Vec2, color: u32, count: u32 },
    ScreenShake { magnitude: f32 },
    Audio(AudioCue),
    SessionOver {
        outcome: SessionOutcome,
        score: u64,
        distance: u32,
        coins: u32,
    },
}

/// The explicit simulation context: every component works on this (or the
/// parts of it that it owns), never on ambient state.
#[derive(Debug, Clone)]
pub struct Session {
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub time_ticks: u64,
    pub player: Player,
    pub pursuer: Pursuer,
    pub world: World,
    /// Integrated horizontal travel, in world units
    pub distance: f32,
    pub coins_collected: u32,
    /// One-shot respawn, consumed at most once per session
    pub checkpoint_used: bool,
    pub screen_shake: f32,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) prev_jump_held: bool,
    pub(crate) prev_slide_held: bool,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let player = Player::new(Vec2::new(CAMERA_OFFSET, GROUND_START_Y), tuning.run_speed);
        let pursuer = Pursuer::new(CAMERA_OFFSET - PURSUER_START_GAP, tuning.pursuer_base_speed);
        let world = World::new(&mut rng, &tuning);
        log::info!("session created, seed {seed}");
        Self {
            seed,
            rng,
            tuning,
            phase: GamePhase::Ready,
            time_ticks: 0,
            player,
            pursuer,
            world,
            distance: 0.0,
            coins_collected: 0,
            checkpoint_used: false,
            screen_shake: 0.0,
            events: Vec::new(),
            prev_jump_held: false,
            prev_slide_held: false,
        }
    }

    /// Derived score: distance-weighted plus coin bonus. Non-decreasing
    /// within a session.
    pub fn score(&self) -> u64 {
        (self.distance * DISTANCE_WEIGHT).floor() as u64
            + self.coins_collected as u64 * COIN_WEIGHT
    }

    /// Pursuer proximity warning for the presentation layer (0-100)
    pub fn pursuer_warning(&self) -> u8 {
        self.pursuer.warning(self.player.pos.x)
    }

    /// Whether the one-shot checkpoint respawn is currently armed
    pub fn checkpoint_armed(&self) -> bool {
        !self.checkpoint_used && self.distance >= self.tuning.checkpoint_distance
    }

    /// Drain the effect events accumulated since the last call.
    /// The presentation layer calls this once after each tick.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ready -> Playing
    pub fn start(&mut self) {
        if self.phase == GamePhase::Ready {
            self.phase = GamePhase::Playing;
            log::info!("session started");
        }
    }

    /// Halt tick advancement; no physics or time accrues while paused
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
        }
    }

    /// Resume from pause without state loss
    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
        }
    }

    /// Reinitialize every owned collection and both agents from the seed
    pub fn restart(&mut self) {
        let seed = self.seed;
        let tuning = self.tuning.clone();
        *self = Self::with_tuning(seed, tuning);
        self.phase = GamePhase::Playing;
        log::info!("session restarted, seed {seed}");
    }
}
