//! Ravine Runner - an endless side-scrolling runner simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, spawning, physics, collisions)
//! - `leaderboard`: Best-score-per-player store with top-N queries
//! - `tuning`: Data-driven game balance

pub mod leaderboard;
pub mod sim;
pub mod tuning;

pub use leaderboard::{Entry, Leaderboard};
pub use tuning::Tuning;

/// Game configuration constants
///
/// World coordinates are screen-style: x grows rightward, y grows downward.
/// Speeds and accelerations are per simulation tick.
pub mod consts {
    /// Logical viewport dimensions
    pub const CANVAS_WIDTH: f32 = 960.0;
    pub const CANVAS_HEIGHT: f32 = 540.0;

    /// Actor held this far from the camera's left edge
    pub const CAMERA_OFFSET: f32 = CANVAS_WIDTH / 3.0;
    /// Eased camera follow factor per tick
    pub const CAMERA_SMOOTHING: f32 = 0.15;
    /// Entities whose right edge falls behind camera_x - CULL_MARGIN are dropped
    pub const CULL_MARGIN: f32 = 200.0;
    /// Terrain/spawns must exist at least this far past the camera's right edge
    pub const SPAWN_LOOKAHEAD: f32 = CANVAS_WIDTH + 400.0;

    /// Actor defaults
    pub const PLAYER_WIDTH: f32 = 28.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;
    /// Height while sliding
    pub const PLAYER_SLIDE_HEIGHT: f32 = 26.0;
    pub const RUN_SPEED: f32 = 6.0;
    pub const RUN_SPEED_MIN: f32 = 4.0;
    pub const RUN_SPEED_MAX: f32 = 9.0;
    /// Downward acceleration (y grows downward)
    pub const GRAVITY: f32 = 0.6;
    pub const JUMP_IMPULSE: f32 = -14.0;
    /// Terminal fall speed
    pub const MAX_FALL_SPEED: f32 = 20.0;
    /// Slope-to-speed transfer rate (downhill accelerates, uphill decelerates)
    pub const SLOPE_ACCEL: f32 = 0.12;
    /// Relaxation toward RUN_SPEED on flat ground
    pub const SPEED_RELAX: f32 = 0.04;
    /// Immunity window after a non-lethal impact
    pub const INVINCIBILITY_TICKS: u32 = 60;
    /// Actor dies after falling past this y
    pub const FALL_LIMIT_Y: f32 = CANVAS_HEIGHT + 80.0;

    /// Glide: holding jump while falling halves gravity, draining charge
    pub const GLIDE_GRAVITY_SCALE: f32 = 0.5;
    /// Charge gained per pixel of forward travel
    pub const GLIDE_CHARGE_PER_PX: f32 = 0.02;
    /// Charge cap, in ticks of glide time
    pub const GLIDE_MAX_CHARGE: f32 = 120.0;

    /// Terrain height band (ground y, screen-down)
    pub const GROUND_MIN_Y: f32 = 280.0;
    pub const GROUND_MAX_Y: f32 = 400.0;
    pub const GROUND_START_Y: f32 = 360.0;
    pub const SEGMENT_WIDTH_MIN: f32 = 150.0;
    pub const SEGMENT_WIDTH_MAX: f32 = 350.0;
    pub const SEGMENT_DELTA_MAX: f32 = 40.0;

    /// Swing-points
    pub const GRAB_RADIUS: f32 = 40.0;
    /// Ticks before another grab is allowed after a release
    pub const GRAB_COOLDOWN_TICKS: u32 = 20;
    /// Minimum hold before a release is honored
    pub const SWING_MIN_HOLD_TICKS: u32 = 8;
    /// Multiplicative angular velocity decay per tick
    pub const SWING_DAMPING: f32 = 0.995;
    pub const ROPE_LENGTH_MIN: f32 = 110.0;
    pub const ROPE_LENGTH_MAX: f32 = 160.0;
    /// Shortest usable grip distance from the anchor
    pub const MIN_GRIP_LENGTH: f32 = 40.0;
    pub const RELEASE_VX_MIN: f32 = 6.0;
    pub const RELEASE_VX_MAX: f32 = 16.0;
    pub const RELEASE_VY_MIN: f32 = -16.0;
    pub const RELEASE_VY_MAX: f32 = 8.0;

    /// Pursuer
    pub const PURSUER_BASE_SPEED: f32 = 6.8;
    pub const PURSUER_SCALING: f32 = 20_000.0;
    pub const PURSUER_START_GAP: f32 = 200.0;
    pub const PURSUER_WIDTH: f32 = 40.0;
    /// Gap below which the proximity warning ramps from 0 to 100
    pub const PURSUER_WARNING_GAP: f32 = 300.0;

    /// Obstacles
    pub const SPIKE_WIDTH: f32 = 30.0;
    pub const SPIKE_HEIGHT: f32 = 30.0;
    /// AABB narrowed inward on each side for spike tests
    pub const SPIKE_INSET: f32 = 4.0;
    pub const LOG_RADIUS: f32 = 18.0;
    pub const LOG_BOUNCE_VY: f32 = -11.0;
    pub const LOG_BOUNCE_VX: f32 = 1.5;
    pub const WALL_WIDTH: f32 = 20.0;
    pub const WALL_HEIGHT: f32 = 70.0;
    /// Open band above the ground under a low wall (slide under it)
    pub const WALL_CLEARANCE: f32 = 30.0;
    pub const WALL_KNOCKBACK: f32 = 12.0;
    pub const RAMP_WIDTH_MIN: f32 = 120.0;
    pub const RAMP_WIDTH_MAX: f32 = 180.0;
    pub const RAMP_RISE_MIN: f32 = 40.0;
    pub const RAMP_RISE_MAX: f32 = 60.0;
    pub const RAMP_LAUNCH_SCALE: f32 = 0.22;
    pub const GAP_WIDTH_MIN: f32 = 80.0;
    pub const GAP_WIDTH_MAX: f32 = 180.0;
    pub const CHASM_WIDTH_MIN: f32 = 260.0;
    pub const CHASM_WIDTH_MAX: f32 = 420.0;
    /// Chasms wider than this get a second, mid-span swing-point
    pub const CHASM_MID_SWING_WIDTH: f32 = 340.0;
    /// Warning sign placed this far before a chasm's near edge
    pub const CHASM_WARNING_LEAD: f32 = 350.0;

    /// Spawn spacing
    pub const OBSTACLE_MIN_GAP: f32 = 260.0;
    pub const OBSTACLE_EXTRA_GAP: f32 = 240.0;
    pub const COIN_MIN_GAP: f32 = 180.0;
    pub const COIN_EXTRA_GAP: f32 = 200.0;
    pub const SWING_MIN_GAP: f32 = 500.0;
    pub const SWING_EXTRA_GAP: f32 = 400.0;
    /// Minimum distance between a swing-point and any wall/spike
    pub const SWING_CLEARANCE: f32 = 120.0;

    /// Coins
    pub const COIN_RADIUS: f32 = 10.0;
    pub const COIN_SPACING: f32 = 34.0;

    /// Scoring
    pub const DISTANCE_WEIGHT: f32 = 10.0;
    pub const COIN_WEIGHT: u64 = 100;

    /// Checkpoint: one respawn is armed past this distance
    pub const CHECKPOINT_DISTANCE: f32 = 3000.0;
    /// Pursuer pushback on checkpoint respawn
    pub const CHECKPOINT_PUSHBACK: f32 = 400.0;
}

/// Linear interpolation between a and b
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Where x sits between a and b, clamped to [0, 1]
#[inline]
pub fn inv_lerp(a: f32, b: f32, x: f32) -> f32 {
    if (b - a).abs() < f32::EPSILON {
        0.0
    } else {
        ((x - a) / (b - a)).clamp(0.0, 1.0)
    }
}
