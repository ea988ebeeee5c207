//! Error types for RetroSonic

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetroSonicError {
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Audio format error: {0}")]
    AudioFormat(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Tone emitter error: {0}")]
    Emitter(String),
}

pub type Result<T> = std::result::Result<T, RetroSonicError>;
