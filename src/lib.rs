//! # RetroSonic
//!
//! Retro positional audio for 2D games. RetroSonic turns a source position
//! and a listener pose into a distance, a volume and a stereo pan using the
//! classic square-root-free distance approximation and a linear falloff band,
//! then plays a short blip with those parameters.
//!
//! ## Quick Start
//!
//! ```no_run
//! use retrosonic::*;
//!
//! let mut engine = ToneEngine::new(EngineDesc::default())?;
//! engine.start()?;
//!
//! let audio = PositionalAudio::new(engine.handle());
//!
//! // Source 300 units east of a listener facing north: heard on the right
//! let result = audio.play_sound(300.0, 0.0, 0.0, 0.0, -std::f32::consts::FRAC_PI_2)?;
//! assert!(result.pan > 0.99);
//!
//! for event in engine.poll_events() {
//!     if let RetroSonicEvent::ToneCompleted { tone_id } = event {
//!         println!("Blip {} finished", tone_id);
//!     }
//! }
//! # Ok::<(), RetroSonicError>(())
//! ```
//!
//! ## Coordinates
//!
//! World coordinates are screen-style: x grows to the right, y grows
//! downward, and angles from `atan2(dy, dx)` increase clockwise. A source a
//! quarter turn clockwise from the listener's facing pans hard right (+1).
//!
//! ## Key Components
//!
//! - **[`PositionalAudioModel`]**: pure distance / volume / pan calculations
//! - **[`PositionalAudio`]**: `play_sound` entry point over any [`ToneEmitter`]
//! - **[`ToneEngine`]**: shared cpal output stream rendering tones
//! - **[`ChannelParams`]**: 8-bit volume and separation for retro hardware

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod hardware;
pub mod math;
pub mod mixer;
pub mod model;
pub mod player;
pub mod tone;

pub use config::{EngineDesc, FalloffConfig, ToneDesc};
pub use engine::{ToneEngine, ToneEngineHandle, ToneRenderer};
pub use error::{Result, RetroSonicError};
pub use events::RetroSonicEvent;
pub use hardware::ChannelParams;
pub use math::{DistanceModel, ListenerPose, Vec2, approx_distance, approx_distance_fixed};
pub use model::{AudioResult, PositionalAudioModel};
pub use player::PositionalAudio;
pub use tone::{NullToneEmitter, ToneEmitter, ToneId, ToneParams, Waveform, render_tone};
