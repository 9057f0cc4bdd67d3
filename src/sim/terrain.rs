//! Procedural terrain: a contiguous sequence of linear height segments
//!
//! Segments are generated strictly left to right with no x-gaps between
//! them. Chasms are carved as explicit "no ground" spans on top of the
//! segment data: physics queries see a hole, visual queries see the
//! flattened, continuous line.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::{inv_lerp, lerp};

/// One linear terrain piece. Covers the half-open x-range
/// `[start.x, end.x)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn covers(&self, x: f32) -> bool {
        x >= self.start.x && x < self.end.x
    }

    /// Interpolated ground height at x (caller guarantees coverage)
    pub fn height_at(&self, x: f32) -> f32 {
        lerp(self.start.y, self.end.y, inv_lerp(self.start.x, self.end.x, x))
    }

    /// dy/dx across the segment; positive slopes downhill (y grows downward)
    pub fn slope(&self) -> f32 {
        let dx = self.end.x - self.start.x;
        if dx <= f32::EPSILON {
            0.0
        } else {
            (self.end.y - self.start.y) / dx
        }
    }
}

/// The generated height-field plus carved no-ground spans
#[derive(Debug, Clone)]
pub struct Terrain {
    segments: Vec<Segment>,
    /// No-ground x-spans (chasms), sorted by start
    gaps: Vec<(f32, f32)>,
}

impl Terrain {
    /// Start a terrain at the given x with a flat lead-in segment
    pub fn new(start_x: f32, start_y: f32) -> Self {
        let lead_in = Segment {
            start: Vec2::new(start_x, start_y),
            end: Vec2::new(start_x + 800.0, start_y),
        };
        Self {
            segments: vec![lead_in],
            gaps: Vec::new(),
        }
    }

    /// Flat ground from `from_x` to at least `until_x` (demo warmup, tests)
    pub fn flat(height: f32, from_x: f32, until_x: f32) -> Self {
        Self {
            segments: vec![Segment {
                start: Vec2::new(from_x, height),
                end: Vec2::new(until_x.max(from_x + 1.0), height),
            }],
            gaps: Vec::new(),
        }
    }

    /// Build a terrain from explicit segments (callers guarantee
    /// contiguity and left-to-right order)
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        debug_assert!(!segments.is_empty());
        debug_assert!(segments.windows(2).all(|p| p[0].end == p[1].start));
        Self {
            segments,
            gaps: Vec::new(),
        }
    }

    /// Rightmost generated x
    pub fn frontier_x(&self) -> f32 {
        self.segments.last().map(|s| s.end.x).unwrap_or(0.0)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Append random segments until the frontier reaches `target_x`
    pub fn extend_if_needed(&mut self, target_x: f32, rng: &mut Pcg32) {
        while self.frontier_x() < target_x {
            let last = *self.segments.last().expect("terrain never empty");
            let width = rng.random_range(SEGMENT_WIDTH_MIN..SEGMENT_WIDTH_MAX);
            let delta = rng.random_range(-SEGMENT_DELTA_MAX..=SEGMENT_DELTA_MAX);
            let end_y = (last.end.y + delta).clamp(GROUND_MIN_Y, GROUND_MAX_Y);
            self.segments.push(Segment {
                start: last.end,
                end: Vec2::new(last.end.x + width, end_y),
            });
        }
    }

    /// Ground height for physics: `None` inside a carved chasm.
    /// Queries outside the generated range clamp to the nearest edge value.
    pub fn height_at(&self, x: f32) -> Option<f32> {
        if self.in_gap(x) {
            None
        } else {
            Some(self.visual_height_at(x))
        }
    }

    /// Ground line for rendering: continuous across chasms
    pub fn visual_height_at(&self, x: f32) -> f32 {
        let first = self.segments.first().expect("terrain never empty");
        if x < first.start.x {
            return first.start.y;
        }
        let idx = self.segments.partition_point(|s| s.end.x <= x);
        match self.segments.get(idx) {
            Some(seg) => seg.height_at(x),
            None => self.segments.last().expect("terrain never empty").end.y,
        }
    }

    /// Local ground slope for speed transfer; 0 outside the generated
    /// range and over chasms
    pub fn slope_at(&self, x: f32) -> f32 {
        if self.in_gap(x) {
            return 0.0;
        }
        let first = self.segments.first().expect("terrain never empty");
        if x < first.start.x {
            return 0.0;
        }
        let idx = self.segments.partition_point(|s| s.end.x <= x);
        self.segments.get(idx).map(|s| s.slope()).unwrap_or(0.0)
    }

    pub fn in_gap(&self, x: f32) -> bool {
        self.gaps.iter().any(|&(x0, x1)| x >= x0 && x < x1)
    }

    /// Register a no-ground span (a chasm)
    pub fn carve_gap(&mut self, x0: f32, x1: f32) {
        debug_assert!(x1 > x0);
        self.gaps.push((x0, x1));
        self.gaps.sort_by(|a, b| a.0.total_cmp(&b.0));
    }

    /// Pin every segment boundary inside `[x0, x1]` to `to_height`.
    ///
    /// Shared boundary points are updated on both adjacent segments, so
    /// the no-discontinuity invariant is preserved; the edges of the range
    /// slope naturally into the flattened span.
    pub fn flatten_range(&mut self, x0: f32, x1: f32, to_height: f32) {
        for seg in &mut self.segments {
            if seg.start.x >= x0 && seg.start.x <= x1 {
                seg.start.y = to_height;
            }
            if seg.end.x >= x0 && seg.end.x <= x1 {
                seg.end.y = to_height;
            }
        }
    }

    /// The first x at or after `x` with solid ground (skips chasm spans)
    pub fn nearest_ground_after(&self, x: f32) -> f32 {
        let mut x = x;
        for &(x0, x1) in &self.gaps {
            if x >= x0 && x < x1 {
                x = x1;
            }
        }
        x
    }

    /// Drop segments and gap spans fully behind `x` (keeps at least one
    /// segment so edge-clamped queries stay defined)
    pub fn cull_before(&mut self, x: f32) {
        while self.segments.len() > 1 && self.segments[0].end.x < x {
            self.segments.remove(0);
        }
        self.gaps.retain(|&(_, x1)| x1 >= x);
    }
}
