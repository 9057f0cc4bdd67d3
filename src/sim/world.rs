//! World window management: camera follow, culling, frontier refill
//!
//! The window manager owns the authoritative entity collections. Entities
//! are created only by the spawner/terrain generator ahead of the camera
//! and destroyed only by falling out of the cull window (or by explicit
//! collection/collision outcomes).

use rand_pcg::Pcg32;

use super::spawner::Spawner;
use super::state::{Coin, Obstacle, SwingPoint, WarningSign};
use super::terrain::Terrain;
use crate::consts::*;
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct World {
    pub camera_x: f32,
    pub terrain: Terrain,
    pub obstacles: Vec<Obstacle>,
    pub swing_points: Vec<SwingPoint>,
    pub coins: Vec<Coin>,
    pub signs: Vec<WarningSign>,
    pub spawner: Spawner,
}

impl World {
    /// Build the opening window: flat lead-in terrain, entity classes
    /// prefilled out to the spawn frontier
    pub fn new(rng: &mut Pcg32, tuning: &Tuning) -> Self {
        let mut world = Self {
            camera_x: 0.0,
            terrain: Terrain::new(-400.0, GROUND_START_Y),
            obstacles: Vec::new(),
            swing_points: Vec::new(),
            coins: Vec::new(),
            signs: Vec::new(),
            spawner: Spawner::new(0.0),
        };
        world.refill(rng, tuning);
        world
    }

    /// One window tick: ease the camera toward the actor, refill the
    /// frontier, cull everything behind the window
    pub fn advance(&mut self, player_x: f32, rng: &mut Pcg32, tuning: &Tuning) {
        let target = player_x - CAMERA_OFFSET;
        self.camera_x += (target - self.camera_x) * CAMERA_SMOOTHING;

        self.refill(rng, tuning);

        let cull_x = self.camera_x - CULL_MARGIN;
        self.obstacles.retain(|o| o.right_edge() >= cull_x);
        self.swing_points
            .retain(|s| s.anchor.x + s.rope_len >= cull_x);
        self.coins
            .retain(|c| !c.collected && c.pos.x + COIN_RADIUS >= cull_x);
        self.signs.retain(|s| s.x + 60.0 >= cull_x);
        self.terrain.cull_before(cull_x - 100.0);
    }

    fn refill(&mut self, rng: &mut Pcg32, tuning: &Tuning) {
        let frontier = self.camera_x + SPAWN_LOOKAHEAD;
        // Terrain runs a little past the spawn frontier so spawn-time
        // height queries land inside generated ground
        self.terrain.extend_if_needed(frontier + 600.0, rng);
        self.spawner.refill(
            frontier,
            &mut self.terrain,
            &mut self.obstacles,
            &mut self.swing_points,
            &mut self.coins,
            &mut self.signs,
            rng,
            tuning,
        );
    }
}
