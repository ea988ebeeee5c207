//! `play_sound`: compute positional parameters and emit a tone.

use crate::config::ToneDesc;
use crate::error::Result;
use crate::math::{ListenerPose, Vec2};
use crate::model::{AudioResult, PositionalAudioModel};
use crate::tone::{ToneEmitter, ToneParams};

/// Log target for the per-sound diagnostic line
pub const AUDIO_LOG_TARGET: &str = "retrosonic::audio";

/// Plays positional blips through a [`ToneEmitter`].
///
/// Holds no mutable state: each call is independent, and a failed call
/// leaves the player usable for the next one.
pub struct PositionalAudio<E: ToneEmitter> {
    model: PositionalAudioModel,
    tone: ToneDesc,
    emitter: E,
}

impl<E: ToneEmitter> PositionalAudio<E> {
    /// Player with the default falloff curve and a 100 ms 220 Hz sine blip.
    pub fn new(emitter: E) -> Self {
        Self::with_config(emitter, PositionalAudioModel::default(), ToneDesc::default())
    }

    pub fn with_config(emitter: E, model: PositionalAudioModel, tone: ToneDesc) -> Self {
        Self {
            model,
            tone,
            emitter,
        }
    }

    pub fn model(&self) -> &PositionalAudioModel {
        &self.model
    }

    pub fn tone(&self) -> &ToneDesc {
        &self.tone
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    /// Play a blip from `(source_x, source_y)` as heard by a listener at
    /// `(listener_x, listener_y)` facing `listener_angle` radians.
    ///
    /// Returns the computed parameters once the tone has been handed to the
    /// emitter. The emitter's error, if any, is returned unchanged.
    pub fn play_sound(
        &self,
        source_x: f32,
        source_y: f32,
        listener_x: f32,
        listener_y: f32,
        listener_angle: f32,
    ) -> Result<AudioResult> {
        self.play_sound_at(
            Vec2::new(source_x, source_y),
            &ListenerPose::new(Vec2::new(listener_x, listener_y), listener_angle),
        )
    }

    /// Typed form of [`play_sound`](Self::play_sound).
    pub fn play_sound_at(&self, source: Vec2, listener: &ListenerPose) -> Result<AudioResult> {
        let result = self.model.compute(source, listener);

        log::info!(target: AUDIO_LOG_TARGET, "[AUDIO] {}", result);

        let params = ToneParams {
            waveform: self.tone.waveform,
            frequency_hz: self.tone.frequency_hz,
            duration: self.tone.duration,
            gain: result.volume * self.tone.gain_scale,
            pan: result.pan,
        };

        if let Err(e) = self.emitter.play_tone(params) {
            log::warn!(target: AUDIO_LOG_TARGET, "Failed to emit tone: {}", e);
            return Err(e);
        }

        Ok(result)
    }
}
