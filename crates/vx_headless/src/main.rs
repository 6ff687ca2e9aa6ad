//! ViewportX headless driver
//!
//! Loads a scene description into the in-memory host, previews one asset for
//! a number of frames and logs the resulting framing.
//!
//! Run with: cargo run -p vx_headless -- <scene.json> [asset] [frames]
//!
//! Preferences are read from and written to `Library/` in the working
//! directory. `RUST_LOG=debug` shows framing and grid details.

use std::env;
use std::error::Error;
use std::process::ExitCode;

use vx_viewport::memory::{MemoryRenderer, MemoryScene, SceneDescription};
use vx_viewport::{
    AssetRef, DrawOutput, JsonPreferenceStore, LogStatusSink, ViewRect, ViewportConfig,
    ViewportSession,
};

const DEFAULT_FRAMES: u32 = 120;
const FRAME_TIME: f32 = 1.0 / 60.0;
const PREVIEW_SIZE: f32 = 512.0;

struct Args {
    scene: String,
    asset: Option<String>,
    frames: u32,
}

impl Args {
    fn parse() -> Result<Self, String> {
        let mut args = env::args().skip(1);
        let scene = args
            .next()
            .ok_or_else(|| "usage: vx_headless <scene.json> [asset] [frames]".to_string())?;
        let asset = args.next();
        let frames = match args.next() {
            Some(raw) => raw
                .parse()
                .map_err(|_| format!("frame count must be a positive integer, got '{}'", raw))?,
            None => DEFAULT_FRAMES,
        };

        Ok(Self { scene, asset, frames })
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse()?;

    let description = SceneDescription::from_file(&args.scene)?;
    let scene = MemoryScene::from_description(description);

    // Default to the first asset by name so runs are reproducible
    let asset = match args.asset {
        Some(name) => name,
        None => {
            let mut names: Vec<_> = scene.asset_names().map(str::to_owned).collect();
            names.sort();
            names
                .into_iter()
                .next()
                .ok_or("scene description contains no assets")?
        }
    };

    let store = JsonPreferenceStore::new("Library");
    let preferences = store.load_or_create();

    let mut session = ViewportSession::new(
        scene,
        MemoryRenderer::new(),
        ViewportConfig::default(),
        preferences,
    )
    .with_preference_sink(store)
    .with_status_sink(LogStatusSink);

    session.resize(PREVIEW_SIZE, PREVIEW_SIZE);
    session.load(Some(&AssetRef::new(asset)));
    session.set_auto_rotate(true);

    let rect = ViewRect::sized(PREVIEW_SIZE, PREVIEW_SIZE);
    let mut rendered = 0u32;
    for _ in 0..args.frames {
        session.tick(FRAME_TIME);
        match session.draw(rect) {
            DrawOutput::Texture(_) => rendered += 1,
            DrawOutput::Placeholder(message) => {
                log::info!("Placeholder: {}", message);
                break;
            }
            DrawOutput::Skipped => {}
        }
    }

    let camera = session.camera();
    let state = camera.state();
    let frame = camera.compose_pose();
    log::info!("Content type: {}", session.content_type());
    log::info!("Frames rendered: {}/{}", rendered, args.frames);
    log::info!(
        "Bounds: center {:?}, extents {:?}",
        camera.bounds().center,
        camera.bounds().extents
    );
    log::info!(
        "Camera: orbit ({:.1}, {:.1}), distance {:.3}, position {:?}",
        state.pitch(),
        state.yaw(),
        state.distance,
        frame.position
    );
    log::info!("Clip planes: [{:.3}, {:.3}]", state.near_clip, state.far_clip);
    if let Some(spec) = session.grid().spec() {
        log::info!(
            "Grid: spacing {:.3}, {} lines per side",
            spec.spacing,
            spec.line_count
        );
    }

    session.shutdown();
    Ok(())
}
