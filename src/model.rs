//! Distance falloff and stereo pan for a 2D source relative to a listener.

use crate::config::FalloffConfig;
use crate::math::{self, DistanceModel, ListenerPose, Vec2};
use std::fmt;

/// Parameters computed for one sound event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioResult {
    /// Distance from listener to source under the model's [`DistanceModel`]
    pub distance: f32,
    /// Linear volume in `[0, 1]`
    pub volume: f32,
    /// Stereo pan in `[-1, 1]`, -1 = left, +1 = right
    pub pan: f32,
}

impl fmt::Display for AudioResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dist: {:.2}, Vol: {:.2}, Pan: {:.2}",
            self.distance, self.volume, self.pan
        )
    }
}

/// Stateless positional audio calculator.
///
/// Holds only an immutable [`FalloffConfig`] and [`DistanceModel`]; every
/// method is pure, so one model can be shared freely between callers and
/// threads.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionalAudioModel {
    falloff: FalloffConfig,
    distance_model: DistanceModel,
}

impl PositionalAudioModel {
    pub fn new(falloff: FalloffConfig) -> Self {
        Self {
            falloff,
            distance_model: DistanceModel::Approx,
        }
    }

    /// Measure distances with `distance_model` instead of the approximation.
    pub fn with_distance_model(mut self, distance_model: DistanceModel) -> Self {
        self.distance_model = distance_model;
        self
    }

    pub fn falloff(&self) -> &FalloffConfig {
        &self.falloff
    }

    pub fn distance_model(&self) -> DistanceModel {
        self.distance_model
    }

    /// See [`math::approx_distance`].
    pub fn approx_distance(&self, dx: f32, dy: f32) -> f32 {
        math::approx_distance(dx, dy)
    }

    /// Distance for the given deltas under the configured [`DistanceModel`].
    pub fn distance(&self, dx: f32, dy: f32) -> f32 {
        self.distance_model.distance(dx, dy)
    }

    /// Map a distance to a linear volume.
    ///
    /// Below the close distance (negative distances included) the volume is
    /// 1.0, past the clipping distance it is 0.0, and in between it falls off
    /// linearly. Monotonically non-increasing. NaN propagates.
    pub fn calculate_volume(&self, distance: f32) -> f32 {
        if distance < self.falloff.close_distance() {
            return 1.0;
        }
        if distance > self.falloff.clipping_distance() {
            return 0.0;
        }

        let volume =
            (self.falloff.clipping_distance() - distance) / self.falloff.attenuator_range();
        volume.clamp(0.0, 1.0)
    }

    /// Map the angle to the source and the listener's facing to a stereo pan.
    ///
    /// A source dead ahead or behind is centred. With y-down world
    /// coordinates, a relative angle of +90 degrees is on the listener's right
    /// and pans to +1.
    pub fn calculate_panning(&self, angle_to_source: f32, listener_angle: f32) -> f32 {
        (angle_to_source - listener_angle).sin()
    }

    /// Compute distance, volume and pan for a source heard by `listener`.
    pub fn compute(&self, source: Vec2, listener: &ListenerPose) -> AudioResult {
        let delta = source - listener.position;
        let distance = self.distance(delta.x, delta.y);
        let volume = self.calculate_volume(distance);
        let angle_to_source = delta.y.atan2(delta.x);
        let pan = self.calculate_panning(angle_to_source, listener.angle);

        AudioResult {
            distance,
            volume,
            pan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPSILON: f32 = 1e-6;

    fn model() -> PositionalAudioModel {
        PositionalAudioModel::default()
    }

    #[test]
    fn test_volume_known_values() {
        let model = model();
        assert_eq!(model.calculate_volume(0.0), 1.0);
        assert_eq!(model.calculate_volume(100.0), 1.0);
        assert_eq!(model.calculate_volume(680.0), 0.5);
        assert_eq!(model.calculate_volume(1200.0), 0.0);
        assert_eq!(model.calculate_volume(5000.0), 0.0);
    }

    #[test]
    fn test_volume_at_close_distance() {
        // Equal to the close distance takes the linear branch: (1200-160)/1040
        assert_eq!(model().calculate_volume(160.0), 1.0);
        assert!(model().calculate_volume(160.5) < 1.0);
    }

    #[test]
    fn test_volume_negative_distance() {
        assert_eq!(model().calculate_volume(-50.0), 1.0);
    }

    #[test]
    fn test_volume_bounded_and_monotonic() {
        let model = model();
        let mut previous = f32::INFINITY;
        let mut distance = -100.0;
        while distance <= 1500.0 {
            let volume = model.calculate_volume(distance);
            assert!((0.0..=1.0).contains(&volume), "distance {}", distance);
            assert!(volume <= previous, "distance {}", distance);
            previous = volume;
            distance += 7.5;
        }
    }

    #[test]
    fn test_volume_nan() {
        assert!(model().calculate_volume(f32::NAN).is_nan());
    }

    #[test]
    fn test_volume_custom_falloff() {
        let model = PositionalAudioModel::new(FalloffConfig::new(10.0, 20.0).unwrap());
        assert_eq!(model.calculate_volume(5.0), 1.0);
        assert_eq!(model.calculate_volume(15.0), 0.5);
        assert_eq!(model.calculate_volume(25.0), 0.0);
    }

    #[test]
    fn test_panning_centred_when_aligned() {
        let model = model();
        for theta in [0.0, 0.5, -2.0, PI, 10.0] {
            assert!(model.calculate_panning(theta, theta).abs() < EPSILON);
        }
    }

    #[test]
    fn test_panning_quarter_turn() {
        let model = model();
        for listener_angle in [0.0, 1.0, -2.5] {
            let pan = model.calculate_panning(listener_angle + FRAC_PI_2, listener_angle);
            assert!((pan - 1.0).abs() < EPSILON);
            let pan = model.calculate_panning(listener_angle - FRAC_PI_2, listener_angle);
            assert!((pan + 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_panning_bounded() {
        let model = model();
        let mut angle = -20.0;
        while angle < 20.0 {
            let pan = model.calculate_panning(angle, 0.3);
            assert!((-1.0..=1.0).contains(&pan));
            angle += 0.37;
        }
    }

    #[test]
    fn test_compute_at_close_distance() {
        let result = model().compute(Vec2::new(160.0, 0.0), &ListenerPose::default());
        assert_eq!(result.distance, 160.0);
        assert_eq!(result.volume, 1.0);
        assert_eq!(result.pan, 0.0);
    }

    #[test]
    fn test_compute_source_east_of_listener_facing_north() {
        let listener = ListenerPose::new(Vec2::ZERO, -FRAC_PI_2);
        let result = model().compute(Vec2::new(100.0, 0.0), &listener);
        assert!((result.pan - 1.0).abs() < EPSILON);

        let result = model().compute(Vec2::new(-100.0, 0.0), &listener);
        assert!((result.pan + 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_compute_with_exact_distance() {
        let exact = model().with_distance_model(DistanceModel::Exact);
        assert_eq!(exact.distance_model(), DistanceModel::Exact);

        // (624, 832) is exactly 1040 away; the approximation reads
        // 832 + 624 - 312 = 1144 and comes out quieter
        let source = Vec2::new(624.0, 832.0);
        let result = exact.compute(source, &ListenerPose::default());
        assert!((result.distance - 1040.0).abs() < 1e-3);
        assert!((result.volume - 160.0 / 1040.0).abs() < 1e-6);

        let result = model().compute(source, &ListenerPose::default());
        assert_eq!(result.distance, 1144.0);
        assert!((result.volume - 56.0 / 1040.0).abs() < 1e-6);
    }

    #[test]
    fn test_compute_nan_propagates() {
        let result = model().compute(Vec2::new(f32::NAN, 0.0), &ListenerPose::default());
        assert!(result.distance.is_nan());
        assert!(result.volume.is_nan());
        assert!(result.pan.is_nan());
    }

    #[test]
    fn test_display() {
        let result = AudioResult {
            distance: 680.0,
            volume: 0.5,
            pan: -0.123,
        };
        assert_eq!(result.to_string(), "Dist: 680.00, Vol: 0.50, Pan: -0.12");
    }
}
