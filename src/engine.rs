use crate::config::EngineDesc;
use crate::error::{Result, RetroSonicError};
use crate::events::RetroSonicEvent;
use crate::mixer::mix_voices;
use crate::tone::{ToneEmitter, ToneId, ToneParams, ToneVoice};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded, unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use uuid::Uuid;

/// Commands sent from the caller's thread to the audio callback
#[derive(Debug)]
pub enum ToneCommand {
    Play { tone_id: ToneId, params: ToneParams },
    StopAll,
}

/// Audio engine that owns one output stream and renders tones on it.
///
/// Tones are queued with [`ToneEmitter::play_tone`] and start at the next
/// device callback. Keep one engine per process and share it (or its
/// [`ToneEngineHandle`]) rather than opening a stream per sound.
pub struct ToneEngine {
    desc: EngineDesc,
    stream: Option<cpal::Stream>,
    sample_rate: Option<u32>,
    is_running: Arc<AtomicBool>,
    frames_processed: Arc<AtomicUsize>,
    command_sender: Sender<ToneCommand>,
    command_receiver: Receiver<ToneCommand>,
    event_sender: Sender<RetroSonicEvent>,
    event_receiver: Receiver<RetroSonicEvent>,
}

/// Cloneable, thread-safe sender for tones played by a [`ToneEngine`].
#[derive(Clone)]
pub struct ToneEngineHandle {
    is_running: Arc<AtomicBool>,
    command_sender: Sender<ToneCommand>,
}

impl ToneEngine {
    /// Create a new engine. No device is opened until [`start`](Self::start).
    pub fn new(desc: EngineDesc) -> Result<Self> {
        if desc.max_voices == 0 {
            return Err(RetroSonicError::Configuration(
                "max_voices must be at least 1".into(),
            ));
        }
        if desc.event_capacity == 0 {
            return Err(RetroSonicError::Configuration(
                "event_capacity must be at least 1".into(),
            ));
        }

        let (command_sender, command_receiver) = unbounded();
        let (event_sender, event_receiver) = bounded(desc.event_capacity);
        Ok(Self {
            desc,
            stream: None,
            sample_rate: None,
            is_running: Arc::new(AtomicBool::new(false)),
            frames_processed: Arc::new(AtomicUsize::new(0)),
            command_sender,
            command_receiver,
            event_sender,
            event_receiver,
        })
    }

    /// Open the default output device and start rendering
    pub fn start(&mut self) -> Result<()> {
        if self.is_running.load(Ordering::Relaxed) {
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host.default_output_device().ok_or_else(|| {
            RetroSonicError::AudioDevice("No default output device available".into())
        })?;

        let default_config = device.default_output_config().map_err(|e| {
            RetroSonicError::AudioDevice(format!("Failed to get default config: {}", e))
        })?;

        let config = cpal::StreamConfig {
            channels: self.desc.channels.unwrap_or(default_config.channels()),
            sample_rate: cpal::SampleRate(
                self.desc
                    .sample_rate
                    .unwrap_or(default_config.sample_rate().0),
            ),
            buffer_size: match self.desc.block_size {
                Some(size) => cpal::BufferSize::Fixed(size),
                None => cpal::BufferSize::Default,
            },
        };

        log::info!(
            "Starting tone engine on '{}': {} Hz, {} channels, {:?}",
            device.name().unwrap_or_else(|_| "Unknown Device".to_string()),
            config.sample_rate.0,
            config.channels,
            default_config.sample_format()
        );

        // Drop anything queued while the engine was stopped
        while self.command_receiver.try_recv().is_ok() {}

        let stream = match default_config.sample_format() {
            cpal::SampleFormat::F32 => self.create_stream::<f32>(&device, &config)?,
            cpal::SampleFormat::I16 => self.create_stream::<i16>(&device, &config)?,
            cpal::SampleFormat::U16 => self.create_stream::<u16>(&device, &config)?,
            other => {
                return Err(RetroSonicError::AudioFormat(format!(
                    "Unsupported sample format: {:?}",
                    other
                )));
            }
        };

        stream.play().map_err(|e| {
            RetroSonicError::AudioDevice(format!("Failed to start stream: {}", e))
        })?;

        self.stream = Some(stream);
        self.sample_rate = Some(config.sample_rate.0);
        self.is_running.store(true, Ordering::Relaxed);
        publish(&self.event_sender, RetroSonicEvent::EngineStarted);

        Ok(())
    }

    /// Stop the engine. Tones still playing are cut off.
    pub fn stop(&mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            self.is_running.store(false, Ordering::Relaxed);
            drop(stream);
            publish(&self.event_sender, RetroSonicEvent::EngineStopped);
            log::info!("Tone engine stopped");
        }
        Ok(())
    }

    /// Silence every tone currently playing
    pub fn stop_all(&self) -> Result<()> {
        self.command_sender
            .send(ToneCommand::StopAll)
            .map_err(|e| RetroSonicError::Engine(format!("Failed to send stop all command: {}", e)))
    }

    /// Check if the engine is currently running
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    /// Get the number of audio frames rendered since start
    pub fn frames_processed(&self) -> usize {
        self.frames_processed.load(Ordering::Relaxed)
    }

    /// Sample rate of the running stream, if started
    pub fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    pub fn config(&self) -> &EngineDesc {
        &self.desc
    }

    /// A `Send` handle that can queue tones from other threads
    pub fn handle(&self) -> ToneEngineHandle {
        ToneEngineHandle {
            is_running: self.is_running.clone(),
            command_sender: self.command_sender.clone(),
        }
    }

    /// Drain all events published since the last poll.
    ///
    /// The queue holds at most `EngineDesc::event_capacity` events; newer
    /// events are dropped while it is full.
    pub fn poll_events(&self) -> Vec<RetroSonicEvent> {
        self.event_receiver.try_iter().collect()
    }

    fn create_stream<T>(
        &self,
        device: &cpal::Device,
        config: &cpal::StreamConfig,
    ) -> Result<cpal::Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let channels = config.channels;
        let is_running = self.is_running.clone();
        let frames_processed = self.frames_processed.clone();
        let error_sender = self.event_sender.clone();

        let mut renderer = ToneRenderer::new(
            config.sample_rate.0,
            self.desc.max_voices,
            self.command_receiver.clone(),
            self.event_sender.clone(),
        );
        let mut mix_buffer: Vec<f32> = Vec::new();

        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    if !is_running.load(Ordering::Relaxed) {
                        for sample in data.iter_mut() {
                            *sample = T::from_sample(0.0f32);
                        }
                        return;
                    }

                    mix_buffer.clear();
                    mix_buffer.resize(data.len(), 0.0);
                    renderer.process(&mut mix_buffer, channels);

                    for (sample, value) in data.iter_mut().zip(mix_buffer.iter()) {
                        *sample = T::from_sample(*value);
                    }

                    frames_processed.fetch_add(data.len() / channels as usize, Ordering::Relaxed);
                },
                move |err| {
                    log::error!("Audio stream error: {}", err);
                    let _ = error_sender.try_send(RetroSonicEvent::EngineError {
                        error: err.to_string(),
                    });
                },
                None,
            )
            .map_err(|e| RetroSonicError::AudioDevice(format!("Failed to build stream: {}", e)))?;

        Ok(stream)
    }
}

/// Device-independent half of the audio callback.
///
/// Applies queued [`ToneCommand`]s, mixes the active voices and publishes
/// tone events. Events are dropped when the event queue is full so the
/// callback never blocks or grows the queue.
pub struct ToneRenderer {
    sample_rate: u32,
    max_voices: usize,
    voices: Vec<ToneVoice>,
    command_receiver: Receiver<ToneCommand>,
    event_sender: Sender<RetroSonicEvent>,
}

impl ToneRenderer {
    pub fn new(
        sample_rate: u32,
        max_voices: usize,
        command_receiver: Receiver<ToneCommand>,
        event_sender: Sender<RetroSonicEvent>,
    ) -> Self {
        Self {
            sample_rate,
            max_voices,
            voices: Vec::with_capacity(max_voices),
            command_receiver,
            event_sender,
        }
    }

    /// Number of voices currently rendering
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Render one block into `out`, which is mixed into, not overwritten.
    /// Returns the number of frames filled by the longest voice.
    pub fn process(&mut self, out: &mut [f32], channels: u16) -> usize {
        for command in self.command_receiver.try_iter() {
            match command {
                ToneCommand::Play { tone_id, params } => {
                    if self.voices.len() >= self.max_voices {
                        log::warn!(
                            "All {} voices busy, dropping tone {}",
                            self.max_voices,
                            tone_id
                        );
                        publish(&self.event_sender, RetroSonicEvent::ToneDropped { tone_id });
                        continue;
                    }
                    self.voices
                        .push(ToneVoice::new(tone_id, params, self.sample_rate));
                    publish(&self.event_sender, RetroSonicEvent::ToneStarted { tone_id });
                }
                ToneCommand::StopAll => {
                    self.voices.iter_mut().for_each(ToneVoice::silence);
                }
            }
        }

        let result = mix_voices(out, channels, &mut self.voices);
        for tone_id in result.completed_tones {
            publish(&self.event_sender, RetroSonicEvent::ToneCompleted { tone_id });
        }

        result.frames_filled
    }
}

fn publish(sender: &Sender<RetroSonicEvent>, event: RetroSonicEvent) {
    if let Err(TrySendError::Full(event)) = sender.try_send(event) {
        log::debug!("Event queue full, dropping {:?}", event);
    }
}

impl ToneEmitter for ToneEngineHandle {
    fn play_tone(&self, params: ToneParams) -> Result<ToneId> {
        if !self.is_running.load(Ordering::Relaxed) {
            return Err(RetroSonicError::Engine("Tone engine is not running".into()));
        }
        params
            .validate()
            .map_err(|e| RetroSonicError::Engine(format!("Rejected tone: {}", e)))?;

        let tone_id = Uuid::new_v4();
        self.command_sender
            .send(ToneCommand::Play { tone_id, params })
            .map_err(|e| RetroSonicError::Engine(format!("Failed to send play command: {}", e)))?;

        log::debug!("Queued tone {}", tone_id);
        Ok(tone_id)
    }
}

impl ToneEmitter for ToneEngine {
    fn play_tone(&self, params: ToneParams) -> Result<ToneId> {
        self.handle().play_tone(params)
    }
}

impl Drop for ToneEngine {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
