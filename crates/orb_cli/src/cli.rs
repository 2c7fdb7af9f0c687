use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "orb")]
#[command(about = "Offline Monte Carlo path tracer for sphere scenes")]
pub struct Args {
    /// Scene description (JSON). Renders the built-in showcase when omitted.
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Output file (.ppm for ASCII PPM, .png and others via the image crate)
    #[arg(short, long, default_value = "out.ppm")]
    pub output: PathBuf,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum number of bounces per path
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Seed for scene scattering and sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Logging level; RUST_LOG is used when not given
    #[arg(long)]
    pub log_level: Option<LogLevel>,

    /// Light escaping rays with a white-to-blue sky instead of the scene background
    #[arg(long)]
    pub sky: bool,

    /// Print the effective scene description as JSON and exit
    #[arg(long)]
    pub dump_scene: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["orb"]);
        assert!(args.scene.is_none());
        assert_eq!(args.output, PathBuf::from("out.ppm"));
        assert!(args.samples.is_none());
        assert!(!args.sky);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "orb",
            "--scene",
            "scene.json",
            "--width",
            "320",
            "-s",
            "16",
            "--log-level",
            "debug",
            "--sky",
        ]);
        assert_eq!(args.scene, Some(PathBuf::from("scene.json")));
        assert_eq!(args.width, Some(320));
        assert_eq!(args.samples, Some(16));
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
        assert!(args.sky);
    }
}
