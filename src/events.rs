//! Event types for RetroSonic

use crate::tone::ToneId;

#[derive(Debug, Clone, PartialEq)]
pub enum RetroSonicEvent {
    ToneStarted { tone_id: ToneId },
    ToneCompleted { tone_id: ToneId },
    /// A tone was dropped because every voice slot was busy
    ToneDropped { tone_id: ToneId },
    EngineStarted,
    EngineStopped,
    EngineError { error: String },
}

impl RetroSonicEvent {
    pub fn tone_id(&self) -> Option<ToneId> {
        match self {
            Self::ToneStarted { tone_id }
            | Self::ToneCompleted { tone_id }
            | Self::ToneDropped { tone_id } => Some(*tone_id),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::ToneDropped { .. } | Self::EngineError { .. })
    }
}
