//! 8-bit channel parameters for retro sound hardware.
//!
//! Old sound cards take a 7-bit volume and an 8-bit stereo separation where
//! 128 is centre, lower values favour the left speaker and higher values the
//! right.

use crate::model::AudioResult;

pub const MAX_VOLUME: u8 = 127;
pub const CENTER_SEPARATION: u8 = 128;
/// How far a fully panned sound moves the separation away from centre
pub const STEREO_SWING: f32 = 96.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelParams {
    /// 0..=127
    pub volume: u8,
    /// 0..=255, 128 = centre
    pub separation: u8,
}

impl ChannelParams {
    /// Quantize a computed result. NaN volume is silent, NaN pan is centred.
    pub fn from_result(result: &AudioResult) -> Self {
        let volume = if result.volume.is_nan() {
            0
        } else {
            (result.volume.clamp(0.0, 1.0) * MAX_VOLUME as f32).round() as u8
        };

        let separation = if result.pan.is_nan() {
            CENTER_SEPARATION
        } else {
            (CENTER_SEPARATION as f32 + STEREO_SWING * result.pan.clamp(-1.0, 1.0))
                .round()
                .clamp(0.0, 255.0) as u8
        };

        Self { volume, separation }
    }

    /// Left and right channel levels, 0..=127 each.
    ///
    /// Uses the quadratic separation curve of the classic mixer: each side
    /// loses `volume * s^2 / 65536`, where `s` is the distance of the
    /// separation from that side.
    pub fn channel_volumes(&self) -> (u8, u8) {
        let volume = self.volume as i32;
        let sep = self.separation as i32 + 1;
        let left = volume - ((volume * sep * sep) >> 16);
        let sep = sep - 257;
        let right = volume - ((volume * sep * sep) >> 16);
        (left.clamp(0, 127) as u8, right.clamp(0, 127) as u8)
    }
}

impl From<AudioResult> for ChannelParams {
    fn from(result: AudioResult) -> Self {
        Self::from_result(&result)
    }
}
