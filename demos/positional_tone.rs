use anyhow::Result;
use retrosonic::{
    ChannelParams, EngineDesc, ListenerPose, PositionalAudio, RetroSonicEvent, ToneEngine, Vec2,
};
use std::f32::consts::{FRAC_PI_2, TAU};
use std::time::Duration;

/// Walks a blipping source around a listener facing north, then away from it.
fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut engine = ToneEngine::new(EngineDesc::default())?;
    engine.start()?;
    log::info!(
        "Engine running at {} Hz",
        engine.sample_rate().unwrap_or_default()
    );

    let audio = PositionalAudio::new(engine.handle());
    let listener = ListenerPose::new(Vec2::ZERO, -FRAC_PI_2);

    log::info!("Circling the listener at 300 units...");
    for step in 0..16 {
        let angle = step as f32 / 16.0 * TAU;
        let source = Vec2::from_angle(angle) * 300.0;
        let result = audio.play_sound_at(source, &listener)?;
        let hardware = ChannelParams::from(result);
        log::info!(
            "  angle {:>5.1} deg -> volume {:>3}, separation {:>3}",
            angle.to_degrees(),
            hardware.volume,
            hardware.separation
        );
        std::thread::sleep(Duration::from_millis(250));
    }

    log::info!("Walking away to the east...");
    for step in 0..14 {
        let source = Vec2::new(step as f32 * 100.0, 0.0);
        audio.play_sound_at(source, &listener)?;
        std::thread::sleep(Duration::from_millis(250));
    }

    std::thread::sleep(Duration::from_millis(200));

    let completed = engine
        .poll_events()
        .into_iter()
        .filter(|event| matches!(event, RetroSonicEvent::ToneCompleted { .. }))
        .count();
    log::info!(
        "{} tones completed, {} frames rendered",
        completed,
        engine.frames_processed()
    );

    engine.stop()?;
    Ok(())
}
