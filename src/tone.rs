//! Tones and the tone emitter seam.
//!
//! A [`ToneEmitter`] is anything that can play a short fixed-pitch tone at a
//! given gain and pan. [`ToneEngine`](crate::engine::ToneEngine) plays them on
//! the default output device; [`NullToneEmitter`] discards them.

use crate::error::{Result, RetroSonicError};
use std::f32::consts::{FRAC_PI_2, TAU};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Handle identifying one emitted tone
pub type ToneId = Uuid;

/// Oscillator shape. Shapes other than `Sine` are naive, not band-limited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// Sample the waveform at `phase` in `[0, 1)`. Output is in `[-1, 1]`.
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Self::Sine => (phase * TAU).sin(),
            Self::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Self::Sawtooth => 2.0 * phase - 1.0,
            Self::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        }
    }
}

/// Everything needed to render one tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneParams {
    pub waveform: Waveform,
    pub frequency_hz: f32,
    pub duration: Duration,
    /// Linear output gain
    pub gain: f32,
    /// Stereo pan in `[-1, 1]`
    pub pan: f32,
}

impl ToneParams {
    /// Check that the tone can be rendered.
    ///
    /// # Errors
    ///
    /// Returns [`RetroSonicError::Emitter`] for a non-positive or non-finite
    /// frequency, or a non-finite gain or pan.
    pub fn validate(&self) -> Result<()> {
        if !self.frequency_hz.is_finite() || self.frequency_hz <= 0.0 {
            return Err(RetroSonicError::Emitter(format!(
                "Invalid tone frequency: {} Hz",
                self.frequency_hz
            )));
        }
        if !self.gain.is_finite() {
            return Err(RetroSonicError::Emitter(format!(
                "Invalid tone gain: {}",
                self.gain
            )));
        }
        if !self.pan.is_finite() {
            return Err(RetroSonicError::Emitter(format!(
                "Invalid tone pan: {}",
                self.pan
            )));
        }
        Ok(())
    }

    /// Number of frames the tone lasts at `sample_rate`.
    pub fn total_frames(&self, sample_rate: u32) -> usize {
        (self.duration.as_secs_f64() * sample_rate as f64).round() as usize
    }

    /// Constant-power left/right gains for the pan position.
    pub fn stereo_gains(&self) -> [f32; 2] {
        let x = (self.pan.clamp(-1.0, 1.0) + 1.0) * 0.5;
        [(x * FRAC_PI_2).cos(), (x * FRAC_PI_2).sin()]
    }
}

/// Capability to play a short tone.
///
/// Implementations start the tone and return without waiting for it to end.
pub trait ToneEmitter {
    fn play_tone(&self, params: ToneParams) -> Result<ToneId>;
}

impl<T: ToneEmitter + ?Sized> ToneEmitter for &T {
    fn play_tone(&self, params: ToneParams) -> Result<ToneId> {
        (**self).play_tone(params)
    }
}

impl<T: ToneEmitter + ?Sized> ToneEmitter for Arc<T> {
    fn play_tone(&self, params: ToneParams) -> Result<ToneId> {
        (**self).play_tone(params)
    }
}

/// Emitter that validates and then drops every tone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullToneEmitter;

impl ToneEmitter for NullToneEmitter {
    fn play_tone(&self, params: ToneParams) -> Result<ToneId> {
        params.validate()?;
        let tone_id = Uuid::new_v4();
        log::debug!("NullToneEmitter: discarding tone {} ({:?})", tone_id, params);
        Ok(tone_id)
    }
}

/// One tone being rendered at a fixed sample rate.
#[derive(Debug)]
pub struct ToneVoice {
    pub tone_id: ToneId,
    params: ToneParams,
    phase: f32,
    phase_step: f32,
    frames_remaining: usize,
    gains: [f32; 2],
}

impl ToneVoice {
    pub fn new(tone_id: ToneId, params: ToneParams, sample_rate: u32) -> Self {
        Self {
            tone_id,
            params,
            phase: 0.0,
            phase_step: params.frequency_hz / sample_rate as f32,
            frames_remaining: params.total_frames(sample_rate),
            gains: params.stereo_gains(),
        }
    }

    pub fn params(&self) -> &ToneParams {
        &self.params
    }

    pub fn is_finished(&self) -> bool {
        self.frames_remaining == 0
    }

    /// Stop the voice at the next buffer.
    pub fn silence(&mut self) {
        self.frames_remaining = 0;
    }

    /// Mix this voice into an interleaved buffer.
    /// Returns the number of frames actually filled.
    pub fn fill_buffer(&mut self, buffer: &mut [f32], channels: u16) -> usize {
        let channels_usize = channels as usize;
        if channels_usize == 0 {
            return 0;
        }

        let mut frames_filled = 0;
        for frame in buffer.chunks_exact_mut(channels_usize) {
            if self.frames_remaining == 0 {
                break;
            }

            let sample = self.params.waveform.sample(self.phase) * self.params.gain;

            if channels_usize == 1 {
                frame[0] += sample;
            } else {
                frame[0] += sample * self.gains[0];
                frame[1] += sample * self.gains[1];
            }

            self.phase += self.phase_step;
            if self.phase >= 1.0 {
                self.phase -= self.phase.floor();
            }
            self.frames_remaining -= 1;
            frames_filled += 1;
        }

        frames_filled
    }
}

/// Render a complete tone into a new interleaved buffer.
pub fn render_tone(params: ToneParams, sample_rate: u32, channels: u16) -> Result<Vec<f32>> {
    params.validate()?;
    if sample_rate == 0 || channels == 0 {
        return Err(RetroSonicError::Configuration(format!(
            "Cannot render at {} Hz with {} channels",
            sample_rate, channels
        )));
    }

    let len = params
        .total_frames(sample_rate)
        .checked_mul(channels as usize)
        .filter(|len| *len <= isize::MAX as usize / std::mem::size_of::<f32>())
        .ok_or_else(|| {
            RetroSonicError::Configuration(format!(
                "Tone of {:?} is too long to render at {} Hz",
                params.duration, sample_rate
            ))
        })?;

    let mut voice = ToneVoice::new(Uuid::new_v4(), params, sample_rate);
    let mut buffer = vec![0.0f32; len];
    voice.fill_buffer(&mut buffer, channels);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blip(pan: f32) -> ToneParams {
        ToneParams {
            waveform: Waveform::Sine,
            frequency_hz: 220.0,
            duration: Duration::from_millis(100),
            gain: 0.2,
            pan,
        }
    }

    #[test]
    fn test_total_frames() {
        assert_eq!(blip(0.0).total_frames(48000), 4800);
        assert_eq!(blip(0.0).total_frames(44100), 4410);
    }

    #[test]
    fn test_stereo_gains() {
        let [left, right] = blip(0.0).stereo_gains();
        assert!((left - right).abs() < 1e-6);
        assert!((left * left + right * right - 1.0).abs() < 1e-6);

        let [left, right] = blip(1.0).stereo_gains();
        assert!(left.abs() < 1e-6);
        assert!((right - 1.0).abs() < 1e-6);

        let [left, right] = blip(-1.0).stereo_gains();
        assert!((left - 1.0).abs() < 1e-6);
        assert!(right.abs() < 1e-6);
    }

    #[test]
    fn test_validate() {
        assert!(blip(0.5).validate().is_ok());
        assert!(blip(f32::NAN).validate().is_err());
        assert!(ToneParams { gain: f32::NAN, ..blip(0.0) }.validate().is_err());
        assert!(ToneParams { frequency_hz: 0.0, ..blip(0.0) }.validate().is_err());
    }

    #[test]
    fn test_render_tone_length_and_level() {
        let buffer = render_tone(blip(0.0), 48000, 2).unwrap();
        assert_eq!(buffer.len(), 4800 * 2);

        let peak = buffer.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        // Centre pan puts cos(pi/4) of the gain on each side
        assert!(peak <= 0.2 * std::f32::consts::FRAC_1_SQRT_2 + 1e-4);
        assert!(peak > 0.13);
    }

    #[test]
    fn test_render_tone_hard_right() {
        let buffer = render_tone(blip(1.0), 48000, 2).unwrap();
        let left_peak = buffer
            .chunks(2)
            .fold(0.0f32, |acc, frame| acc.max(frame[0].abs()));
        let right_peak = buffer
            .chunks(2)
            .fold(0.0f32, |acc, frame| acc.max(frame[1].abs()));
        assert!(left_peak < 1e-6);
        assert!(right_peak > 0.19);
    }

    #[test]
    fn test_render_tone_rejects_overlong_duration() {
        let params = ToneParams {
            duration: Duration::MAX,
            ..blip(0.0)
        };
        assert_eq!(params.total_frames(48000), usize::MAX);
        let err = render_tone(params, 48000, 2).unwrap_err();
        assert!(matches!(err, RetroSonicError::Configuration(_)));
        let err = render_tone(params, 48000, 1).unwrap_err();
        assert!(matches!(err, RetroSonicError::Configuration(_)));
    }

    #[test]
    fn test_render_tone_mono() {
        let buffer = render_tone(blip(1.0), 8000, 1).unwrap();
        assert_eq!(buffer.len(), 800);
        assert!(buffer.iter().any(|s| s.abs() > 0.1));
    }

    #[test]
    fn test_fill_buffer_stops_after_duration() {
        let mut voice = ToneVoice::new(Uuid::new_v4(), blip(0.0), 1000);
        let mut buffer = vec![0.0f32; 64 * 2];
        let mut total = 0;
        while !voice.is_finished() {
            buffer.iter_mut().for_each(|s| *s = 0.0);
            total += voice.fill_buffer(&mut buffer, 2);
        }
        assert_eq!(total, 100);
        assert_eq!(voice.fill_buffer(&mut buffer, 2), 0);
    }

    #[test]
    fn test_fill_buffer_leaves_extra_channels() {
        let mut voice = ToneVoice::new(Uuid::new_v4(), blip(0.0), 1000);
        let mut buffer = vec![0.0f32; 16 * 4];
        voice.fill_buffer(&mut buffer, 4);
        assert!(buffer.chunks(4).all(|frame| frame[2] == 0.0 && frame[3] == 0.0));
    }

    #[test]
    fn test_waveform_shapes() {
        assert_eq!(Waveform::Square.sample(0.25), 1.0);
        assert_eq!(Waveform::Square.sample(0.75), -1.0);
        assert_eq!(Waveform::Sawtooth.sample(0.0), -1.0);
        assert_eq!(Waveform::Triangle.sample(0.5), 1.0);
        assert_eq!(Waveform::Triangle.sample(0.0), -1.0);
        assert!((Waveform::Sine.sample(0.25) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_null_emitter() {
        assert!(NullToneEmitter.play_tone(blip(0.0)).is_ok());
        assert!(NullToneEmitter.play_tone(blip(f32::NAN)).is_err());
    }
}
