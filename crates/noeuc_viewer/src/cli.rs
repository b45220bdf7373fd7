use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use noeuc_renderer::Shader;

/// Log levels selectable on the command line
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

#[derive(Debug, Parser)]
#[command(name = "noeuc_viewer")]
#[command(about = "CPU ray caster: renders a scene to a sequence of PNG frames")]
pub struct Args {
    /// Scene description (JSON). The built-in demo scene is used when omitted
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long, default_value = "640")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "480")]
    pub height: u32,

    /// Number of frames to render
    #[arg(long, short = 'n', default_value = "1")]
    pub frames: u32,

    /// Simulated frame rate driving the camera fly-through
    #[arg(long, default_value = "30")]
    pub fps: f32,

    /// Camera yaw in degrees per second during the fly-through
    #[arg(long, default_value = "15")]
    pub yaw_rate: f32,

    /// Directory the frames are written to
    #[arg(short, long, default_value = "frames")]
    pub output: PathBuf,

    /// Shader used for the first frame
    #[arg(long, default_value = "lambertian")]
    pub shader: Shader,

    /// Switch to the next shader after every frame
    #[arg(long)]
    pub cycle_shaders: bool,

    /// Render on the calling thread only
    #[arg(long)]
    pub single_threaded: bool,

    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Seconds of simulated time between two frames.
    pub fn frame_time(&self) -> f32 {
        if self.fps > 0.0 {
            1.0 / self.fps
        } else {
            0.0
        }
    }
}
