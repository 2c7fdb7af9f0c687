use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use orb_core::{BackgroundDescription, ColorRef, Palette, SceneDescription};
use orb_renderer::{render_with_hooks, Camera, RenderConfig, RenderHooks, RenderProgress, Scene};

mod cli;

use cli::Args;

/// Load the scene file, or build the showcase, then apply command line overrides.
fn load_scene(args: &Args) -> Result<SceneDescription> {
    let mut desc = match &args.scene {
        Some(path) => SceneDescription::from_json_file(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => orb_core::showcase(args.seed.unwrap_or(0)),
    };

    let render = &mut desc.render;
    if let Some(width) = args.width {
        render.width = width;
    }
    if let Some(height) = args.height {
        render.height = height;
    }
    if let Some(samples) = args.samples {
        render.samples_per_pixel = samples;
    }
    if let Some(max_depth) = args.max_depth {
        render.max_depth = max_depth;
    }
    if let Some(seed) = args.seed {
        render.seed = seed;
    }
    if args.sky {
        render.background = BackgroundDescription::Gradient {
            horizon: ColorRef::named(Palette::WHITE),
            zenith: ColorRef::Rgb([0.5, 0.7, 1.0]),
        };
    }

    Ok(desc)
}

/// Build the runtime scene, settings and camera. Settings are checked before
/// the camera, which needs a valid aspect ratio.
fn prepare(args: &Args, desc: &SceneDescription) -> Result<(Scene, RenderConfig, Camera)> {
    let base_dir = args.scene.as_deref().and_then(Path::parent);
    let scene = Scene::from_description(desc, base_dir).context("Failed to build scene")?;
    let config = RenderConfig::from_description(&desc.render, &desc.palette)
        .context("Invalid render settings")?;
    config.validate().context("Invalid render settings")?;
    let camera = Camera::from_description(&desc.camera, config.aspect_ratio())
        .context("Invalid camera")?;
    Ok((scene, config, camera))
}

fn run(args: &Args) -> Result<()> {
    let desc = load_scene(args)?;

    if args.dump_scene {
        println!("{}", desc.to_json_string()?);
        return Ok(());
    }

    let (scene, config, camera) = prepare(args, &desc)?;

    info!(
        "Rendering {} spheres at {}x{}, {} spp, depth {}",
        scene.len(),
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth
    );

    // Log roughly every 10%
    let last_decile = AtomicUsize::new(0);
    let report = |progress: RenderProgress| {
        let decile = progress.completed * 10 / progress.total.max(1);
        if decile > last_decile.fetch_max(decile, Ordering::Relaxed) {
            info!(
                "Progress: {:.0}% ({}/{} buckets)",
                progress.percent(),
                progress.completed,
                progress.total
            );
        }
    };
    let hooks = RenderHooks {
        progress: Some(&report),
        ..Default::default()
    };

    let start = Instant::now();
    let image = match args.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Failed to start worker threads")?
            .install(|| render_with_hooks(&camera, &scene, &config, &hooks)),
        None => render_with_hooks(&camera, &scene, &config, &hooks),
    }?;
    info!("Render finished in {:.2?}", start.elapsed());

    orb_renderer::save(&image, &args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    info!("Wrote {}", args.output.display());

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if let Some(level) = args.log_level {
        logger.filter_level(level.into());
    } else if std::env::var_os("RUST_LOG").is_none() {
        logger.filter_level(LevelFilter::Info);
    }
    logger.init();

    run(&args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orb_renderer::RenderError;

    #[test]
    fn test_showcase_with_overrides() {
        let args = Args::parse_from(["orb", "--width", "64", "--height", "32", "-s", "4", "--seed", "9"]);
        let desc = load_scene(&args).unwrap();

        assert_eq!(desc, {
            let mut expected = orb_core::showcase(9);
            expected.render.width = 64;
            expected.render.height = 32;
            expected.render.samples_per_pixel = 4;
            expected
        });
    }

    #[test]
    fn test_sky_flag_sets_gradient() {
        let args = Args::parse_from(["orb", "--sky"]);
        let desc = load_scene(&args).unwrap();
        assert!(matches!(
            desc.render.background,
            BackgroundDescription::Gradient { .. }
        ));
    }

    #[test]
    fn test_empty_image_reported_as_settings_error() {
        let args = Args::parse_from(["orb", "--width", "8", "--height", "0"]);
        let desc = load_scene(&args).unwrap();

        let err = prepare(&args, &desc).err().unwrap();
        assert_eq!(err.to_string(), "Invalid render settings");
        assert!(matches!(
            err.root_cause().downcast_ref::<RenderError>(),
            Some(RenderError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_sky_with_partial_scene_palette() {
        let path = std::env::temp_dir().join(format!("orb_sky_palette_{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{
                "render": { "width": 8, "height": 4, "samples_per_pixel": 1 },
                "palette": { "red": [1, 0, 0] },
                "spheres": [{ "center": [0, 0, -1], "radius": 0.5, "color": "red" }]
            }"#,
        )
        .unwrap();

        let scene_arg = path.to_string_lossy().into_owned();
        let args = Args::parse_from(["orb", "--scene", scene_arg.as_str(), "--sky"]);
        let desc = load_scene(&args).unwrap();
        let prepared = prepare(&args, &desc);
        std::fs::remove_file(&path).unwrap();

        assert!(prepared.is_ok());
    }

    #[test]
    fn test_missing_scene_file() {
        let args = Args::parse_from(["orb", "--scene", "/nonexistent/scene.json"]);
        assert!(load_scene(&args).is_err());
    }
}
