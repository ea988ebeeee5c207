//! Configuration for RetroSonic

use crate::error::{Result, RetroSonicError};
use crate::tone::Waveform;
use std::time::Duration;

/// Distance falloff curve: full volume inside `close_distance`, silence past
/// `clipping_distance`, linear in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FalloffConfig {
    close_distance: f32,
    clipping_distance: f32,
}

impl FalloffConfig {
    /// The classic curve: full volume up to 160 units, silent beyond 1200.
    pub const DOOM: Self = Self {
        close_distance: 160.0,
        clipping_distance: 1200.0,
    };

    /// Create a falloff curve.
    ///
    /// # Errors
    ///
    /// Returns [`RetroSonicError::Configuration`] if either distance is not
    /// finite or if `clipping_distance` is not strictly greater than
    /// `close_distance`.
    pub fn new(close_distance: f32, clipping_distance: f32) -> Result<Self> {
        if !close_distance.is_finite() || !clipping_distance.is_finite() {
            return Err(RetroSonicError::Configuration(format!(
                "Falloff distances must be finite (close: {}, clipping: {})",
                close_distance, clipping_distance
            )));
        }

        if clipping_distance <= close_distance {
            return Err(RetroSonicError::Configuration(format!(
                "Clipping distance {} must be greater than close distance {}",
                clipping_distance, close_distance
            )));
        }

        Ok(Self {
            close_distance,
            clipping_distance,
        })
    }

    pub fn close_distance(&self) -> f32 {
        self.close_distance
    }

    pub fn clipping_distance(&self) -> f32 {
        self.clipping_distance
    }

    /// Width of the linear falloff band. Always positive.
    pub fn attenuator_range(&self) -> f32 {
        self.clipping_distance - self.close_distance
    }
}

impl Default for FalloffConfig {
    fn default() -> Self {
        Self::DOOM
    }
}

/// Shape of the tone `play_sound` asks the emitter for.
#[derive(Debug, Clone)]
pub struct ToneDesc {
    pub waveform: Waveform,
    pub frequency_hz: f32,
    pub duration: Duration,
    /// Multiplier applied to the computed volume to get the output gain
    pub gain_scale: f32,
}

impl Default for ToneDesc {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            frequency_hz: 220.0,
            duration: Duration::from_millis(100),
            gain_scale: 0.2,
        }
    }
}

impl ToneDesc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn frequency_hz(mut self, frequency_hz: f32) -> Self {
        self.frequency_hz = frequency_hz;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn gain_scale(mut self, gain_scale: f32) -> Self {
        self.gain_scale = gain_scale;
        self
    }
}

/// Output stream settings for the [`ToneEngine`](crate::engine::ToneEngine)
#[derive(Debug, Clone)]
pub struct EngineDesc {
    /// Requested sample rate (None = device default)
    pub sample_rate: Option<u32>,
    /// Requested channel count (None = device default)
    pub channels: Option<u16>,
    /// Frames per device callback (None = device default)
    pub block_size: Option<u32>,
    /// Maximum number of tones rendered at once; extra tones are dropped
    pub max_voices: usize,
    /// Events kept for `poll_events`; newer events are dropped while full
    pub event_capacity: usize,
}

impl Default for EngineDesc {
    fn default() -> Self {
        Self {
            sample_rate: None,
            channels: None,
            block_size: None,
            max_voices: 32,
            event_capacity: 256,
        }
    }
}

impl EngineDesc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = Some(rate);
        self
    }

    pub fn channels(mut self, channels: u16) -> Self {
        self.channels = Some(channels);
        self
    }

    pub fn block_size(mut self, size: u32) -> Self {
        self.block_size = Some(size);
        self
    }

    pub fn max_voices(mut self, max: usize) -> Self {
        self.max_voices = max;
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}
