//! Entity spawning ahead of the camera
//!
//! Each entity class tracks its own forward spawn cursor; a new entity is
//! placed only once the frontier advances past the cursor, which then
//! jumps ahead by the class minimum gap plus a random extra. Obstacle
//! kinds are weighted roughly evenly, with wide chasms rarer and always
//! announced by a warning sign and bridged by a guaranteed swing-point.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Coin, Obstacle, ObstacleKind, SwingPoint, WarningSign};
use super::terrain::Terrain;
use crate::consts::*;
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct Spawner {
    next_id: u32,
    next_obstacle_x: f32,
    next_coin_x: f32,
    next_swing_x: f32,
}

impl Spawner {
    /// Cursors start with a grace runway so a fresh session never opens
    /// onto an obstacle
    pub fn new(start_x: f32) -> Self {
        Self {
            next_id: 1,
            next_obstacle_x: start_x + 1000.0,
            next_coin_x: start_x + 500.0,
            next_swing_x: start_x + 1400.0,
        }
    }

    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Populate every entity class up to the spawn frontier
    #[allow(clippy::too_many_arguments)]
    pub fn refill(
        &mut self,
        frontier: f32,
        terrain: &mut Terrain,
        obstacles: &mut Vec<Obstacle>,
        swings: &mut Vec<SwingPoint>,
        coins: &mut Vec<Coin>,
        signs: &mut Vec<WarningSign>,
        rng: &mut Pcg32,
        tuning: &Tuning,
    ) {
        while self.next_obstacle_x < frontier {
            let x = self.next_obstacle_x;
            let width = self.spawn_obstacle(x, terrain, obstacles, swings, signs, rng);
            self.next_obstacle_x = x
                + width
                + tuning.obstacle_min_gap
                + rng.random_range(0.0..tuning.obstacle_extra_gap);
        }

        while self.next_coin_x < frontier {
            let x = self.next_coin_x;
            let run_len = self.spawn_coin_run(x, terrain, coins, rng);
            self.next_coin_x =
                x + run_len + COIN_MIN_GAP + rng.random_range(0.0..COIN_EXTRA_GAP);
        }

        while self.next_swing_x < frontier {
            let x = self.next_swing_x;
            if !swing_placement_clear(x, obstacles) {
                // Reachability rule: never hang a rope inside the clearance
                // buffer of a wall or spike; try again a little further on
                self.next_swing_x += 80.0;
                continue;
            }
            self.spawn_swing(x, terrain.visual_height_at(x), swings, rng);
            self.next_swing_x =
                x + tuning.swing_min_gap + rng.random_range(0.0..tuning.swing_extra_gap);
        }
    }

    /// Place one weighted-random obstacle at x; returns its width so the
    /// cursor can skip past it
    fn spawn_obstacle(
        &mut self,
        x: f32,
        terrain: &mut Terrain,
        obstacles: &mut Vec<Obstacle>,
        swings: &mut Vec<SwingPoint>,
        signs: &mut Vec<WarningSign>,
        rng: &mut Pcg32,
    ) -> f32 {
        let base_y = terrain.visual_height_at(x);
        let roll: u32 = rng.random_range(0..100);

        let mut kind = if roll < 20 {
            ObstacleKind::Spike {
                width: SPIKE_WIDTH,
                height: SPIKE_HEIGHT,
            }
        } else if roll < 40 {
            ObstacleKind::LowWall {
                width: WALL_WIDTH,
                height: WALL_HEIGHT,
                clearance: WALL_CLEARANCE,
            }
        } else if roll < 58 {
            ObstacleKind::Gap {
                width: rng.random_range(GAP_WIDTH_MIN..GAP_WIDTH_MAX),
            }
        } else if roll < 76 {
            ObstacleKind::Ramp {
                width: rng.random_range(RAMP_WIDTH_MIN..RAMP_WIDTH_MAX),
                rise: rng.random_range(RAMP_RISE_MIN..RAMP_RISE_MAX),
            }
        } else if roll < 92 {
            ObstacleKind::Log { radius: LOG_RADIUS }
        } else {
            ObstacleKind::Gap {
                width: rng.random_range(CHASM_WIDTH_MIN..CHASM_WIDTH_MAX),
            }
        };

        // Clearance works both ways: a rope may already hang near this
        // cursor, so hazardous kinds downgrade to a harmless log there
        let near_swing = swings
            .iter()
            .any(|s| (s.anchor.x - x).abs() < SWING_CLEARANCE + 40.0);
        if near_swing
            && matches!(
                kind,
                ObstacleKind::Spike { .. } | ObstacleKind::LowWall { .. }
            )
        {
            kind = ObstacleKind::Log { radius: LOG_RADIUS };
        }

        if let ObstacleKind::Gap { width } = kind {
            // Pin the cliff edges to the near-edge height so the visual
            // line is well-defined, then carve the physics hole
            terrain.flatten_range(x - 40.0, x + width + 40.0, base_y);
            terrain.carve_gap(x, x + width);

            if width >= CHASM_WIDTH_MIN {
                log::info!("chasm at {x:.0}, width {width:.0}");
                signs.push(WarningSign {
                    id: self.next_entity_id(),
                    x: x - CHASM_WARNING_LEAD,
                });
                // Traversal guarantee: a rope over the first third, and a
                // second one mid-span when one swing cannot carry across
                self.spawn_chasm_swing(x + width * 0.3, base_y, swings, rng);
                if width > CHASM_MID_SWING_WIDTH {
                    self.spawn_chasm_swing(x + width * 0.62, base_y, swings, rng);
                }
            }
        }

        let ob = Obstacle {
            id: self.next_entity_id(),
            x,
            base_y,
            kind,
            passed: false,
        };
        log::debug!("spawned {:?} at {x:.0}", ob.kind);
        let width = ob.width();
        obstacles.push(ob);
        width
    }

    /// A guaranteed chasm rope. The tip hangs inside the actor's jump arc
    /// off the near edge, starting on a backswing toward the player.
    fn spawn_chasm_swing(
        &mut self,
        x: f32,
        base_y: f32,
        swings: &mut Vec<SwingPoint>,
        rng: &mut Pcg32,
    ) {
        let rope_len = rng.random_range(130.0..ROPE_LENGTH_MAX);
        swings.push(SwingPoint {
            id: self.next_entity_id(),
            anchor: Vec2::new(x, base_y - rope_len - 140.0),
            rope_len,
            angle: -0.3,
            angular_vel: 0.0,
            held: false,
        });
    }

    fn spawn_swing(&mut self, x: f32, base_y: f32, swings: &mut Vec<SwingPoint>, rng: &mut Pcg32) {
        let rope_len = rng.random_range(ROPE_LENGTH_MIN..ROPE_LENGTH_MAX);
        let hang = rng.random_range(40.0..90.0);
        swings.push(SwingPoint {
            id: self.next_entity_id(),
            anchor: Vec2::new(x, base_y - rope_len - hang),
            rope_len,
            angle: rng.random_range(-0.4..0.4),
            angular_vel: 0.0,
            held: false,
        });
    }

    /// A short row of coins at a jump-reachable height; returns the row's
    /// x-extent
    fn spawn_coin_run(
        &mut self,
        x: f32,
        terrain: &Terrain,
        coins: &mut Vec<Coin>,
        rng: &mut Pcg32,
    ) -> f32 {
        let count = rng.random_range(3..=6u32);
        let lift = rng.random_range(40.0..130.0);
        for i in 0..count {
            let cx = x + i as f32 * COIN_SPACING;
            coins.push(Coin {
                id: self.next_entity_id(),
                pos: Vec2::new(cx, terrain.visual_height_at(cx) - lift),
                collected: false,
                spin: i as f32 * 0.4,
            });
        }
        count as f32 * COIN_SPACING
    }
}

/// No wall or spike may sit within the clearance buffer of a prospective
/// swing x-position
fn swing_placement_clear(x: f32, obstacles: &[Obstacle]) -> bool {
    obstacles.iter().all(|ob| {
        let hazardous = matches!(
            ob.kind,
            ObstacleKind::Spike { .. } | ObstacleKind::LowWall { .. }
        );
        !hazardous
            || ob.right_edge() < x - SWING_CLEARANCE
            || ob.x > x + SWING_CLEARANCE
    })
}
