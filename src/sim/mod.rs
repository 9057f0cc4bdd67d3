//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per rendered frame)
//! - Seeded RNG only
//! - Stable iteration order (entities kept in ascending world x)
//! - No rendering or platform dependencies

pub mod collision;
pub mod player;
pub mod spawner;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod world;

pub use collision::ground_height_at;
pub use player::Player;
pub use spawner::Spawner;
pub use state::{
    AudioCue, Coin, GameEvent, GamePhase, Obstacle, ObstacleKind, PlayerState, Pursuer, Session,
    SessionOutcome, SwingPoint, WarningSign,
};
pub use terrain::{Segment, Terrain};
pub use tick::{TickInput, tick};
pub use world::World;
