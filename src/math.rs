//! Math types for RetroSonic
//!
//! World coordinates are screen-style: x grows to the right and y grows
//! downward, so angles from `atan2(dy, dx)` increase clockwise.

pub use glam::Vec2;

/// Position and facing of the listener in the 2D world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListenerPose {
    pub position: Vec2,
    /// Facing direction in radians
    pub angle: f32,
}

impl ListenerPose {
    pub fn new(position: Vec2, angle: f32) -> Self {
        Self { position, angle }
    }

    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            angle: 0.0,
        }
    }

    /// Unit vector the listener is facing.
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    /// Unit vector pointing to the listener's right.
    pub fn right(&self) -> Vec2 {
        // y-down: rotating forward by +90 degrees turns clockwise on screen
        Vec2::from_angle(self.angle + std::f32::consts::FRAC_PI_2)
    }

    /// Turn the listener to face `target`. Does nothing if `target` is the
    /// listener's own position.
    pub fn look_at(&mut self, target: Vec2) {
        let delta = target - self.position;
        if delta != Vec2::ZERO {
            self.angle = delta.y.atan2(delta.x);
        }
    }
}

impl Default for ListenerPose {
    fn default() -> Self {
        Self::from_position(Vec2::ZERO)
    }
}

/// How listener-to-source distance is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DistanceModel {
    /// Square-root-free [`approx_distance`]
    #[default]
    Approx,
    /// True euclidean length
    Exact,
}

impl DistanceModel {
    pub fn distance(self, dx: f32, dy: f32) -> f32 {
        match self {
            Self::Approx => approx_distance(dx, dy),
            Self::Exact => dx.hypot(dy),
        }
    }
}

/// Approximate euclidean distance without a square root.
///
/// Computes `max + min - floor(min / 2)` over the absolute deltas. The floor
/// halving matches an integer `>> 1` of the truncated value, so integral
/// inputs give the same answer as [`approx_distance_fixed`]. Overestimates the
/// true distance by up to roughly 12%. NaN propagates.
pub fn approx_distance(dx: f32, dy: f32) -> f32 {
    let dx = dx.abs();
    let dy = dy.abs();
    let (larger, smaller) = if dx < dy { (dy, dx) } else { (dx, dy) };
    larger + smaller - (smaller * 0.5).floor()
}

/// Integer form of [`approx_distance`] for fixed-point coordinates.
///
/// Works on the unsigned magnitudes so every `i32`, `i32::MIN` included, is
/// accepted; the result always fits in a `u32`.
pub fn approx_distance_fixed(dx: i32, dy: i32) -> u32 {
    let dx = dx.unsigned_abs();
    let dy = dy.unsigned_abs();
    let larger = dx.max(dy);
    let smaller = dx.min(dy);
    larger + (smaller - (smaller >> 1))
}
