//! Lux - render a built-in scene to an image file

mod scenes;

use anyhow::{Context, Result};
use clap::Parser;
use lux_renderer::{render, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scenes::ScenePreset;
use std::path::{Path, PathBuf};

/// Command line options.
#[derive(Parser, Debug)]
#[command(author, version, about = "Offline Monte Carlo path tracer", long_about = None)]
struct Options {
    /// Scene to render.
    #[arg(long, short = 's', value_enum, default_value_t = ScenePreset::CornellBox)]
    scene: ScenePreset,

    /// Path to the output image; the format follows the extension.
    #[arg(long, short = 'o', value_name = "FILE", default_value = "render.png")]
    output: PathBuf,

    /// JSON render settings. Flags below override its values.
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "NUM", help = "Samples per pixel.")]
    spp: Option<u32>,

    #[arg(long, value_name = "NUM", help = "Maximum bounces per path.")]
    depth: Option<u32>,

    /// Image width; height follows the scene's aspect ratio.
    #[arg(long, short = 'w', value_name = "PIXELS", default_value_t = 400)]
    width: u32,

    #[arg(long, value_name = "NUM", help = "Seed for scene layout and sampling.")]
    seed: Option<u64>,

    /// Image used by texture-mapped objects.
    #[arg(long, short = 't', value_name = "FILE")]
    texture: Option<PathBuf>,

    /// Worker threads; defaults to one per core.
    #[arg(long = "nthreads", short = 'n', value_name = "NUM")]
    threads: Option<usize>,

    #[arg(long, short = 'q', help = "Only log warnings and errors.")]
    quiet: bool,
}

/// Settings read from `--config`, and whether the file chose a background.
fn load_config(path: &Path) -> Result<(RenderConfig, bool)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    let has_background = value.get("background").is_some();
    let config: RenderConfig = serde_json::from_value(value)
        .with_context(|| format!("Invalid render settings in {}", path.display()))?;
    Ok((config, has_background))
}

fn main() -> Result<()> {
    let options = Options::parse();

    let level = if options.quiet {
        log::LevelFilter::Warn
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    if let Some(threads) = options.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the worker pool")?;
    }

    let (mut config, explicit_background) = match &options.config {
        Some(path) => load_config(path)?,
        None => (RenderConfig::default(), false),
    };
    if let Some(spp) = options.spp {
        config.samples_per_pixel = spp;
    }
    if let Some(depth) = options.depth {
        config.max_depth = depth;
    }
    if let Some(seed) = options.seed {
        config.seed = seed;
    }

    log::info!("Building scene {:?}", options.scene);
    let mut rng = StdRng::seed_from_u64(config.seed);
    let preset = options
        .scene
        .build(options.texture.as_deref(), &mut rng)?;

    if !explicit_background {
        config.background = preset.background;
    }
    log::debug!("Render settings: {}", serde_json::to_string(&config)?);

    let width = options.width.max(1);
    let height = ((width as f32 / preset.aspect_ratio) as u32).max(1);
    let mut camera = preset.camera.with_resolution(width, height);
    camera.initialize();

    let image = render(&camera, &preset.scene, &config);
    image
        .save(&options.output)
        .with_context(|| format!("Failed to write {}", options.output.display()))?;

    Ok(())
}
