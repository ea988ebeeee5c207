// Mixer module - renders every active tone voice into the output buffer

use crate::tone::{ToneId, ToneVoice};

/// Result of mixing - the number of frames and the voices that ended
pub struct MixResult {
    pub frames_filled: usize,
    pub completed_tones: Vec<ToneId>,
}

/// Mix all active voices into the buffer, then retire the ones that finished.
///
/// # Arguments
/// * `buffer` - Interleaved output buffer; voices are added on top of its contents
/// * `channels` - Number of audio channels in `buffer`
/// * `voices` - Active voices, finished voices are removed in place
pub fn mix_voices(buffer: &mut [f32], channels: u16, voices: &mut Vec<ToneVoice>) -> MixResult {
    let mut frames_filled_max = 0;

    for voice in voices.iter_mut() {
        let frames_filled = voice.fill_buffer(buffer, channels);
        frames_filled_max = frames_filled_max.max(frames_filled);
    }

    let mut completed_tones = Vec::new();
    voices.retain(|voice| {
        if voice.is_finished() {
            log::debug!("Mixer: Tone {} completed", voice.tone_id);
            completed_tones.push(voice.tone_id);
            false
        } else {
            true
        }
    });

    MixResult {
        frames_filled: frames_filled_max,
        completed_tones,
    }
}
