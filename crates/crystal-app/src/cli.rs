use std::path::PathBuf;

use clap::Parser;

/// Crystal: a real-time refractive crystal renderer.
#[derive(Parser, Debug)]
#[command(name = "crystal", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error) or a full
    /// `tracing` filter directive.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Wavefront OBJ model to render instead of the built-in gem.
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Directory of `<effect>/<stage>.glsl` files replacing the built-in shaders.
    #[arg(long)]
    pub shader_dir: Option<PathBuf>,

    /// Print the effective config as JSON and exit.
    #[arg(long)]
    pub print_config: bool,

    /// Render without a window and print the final uniform values.
    #[arg(long)]
    pub headless: bool,

    /// Frames to render in headless mode.
    #[arg(long, default_value_t = 60, requires = "headless")]
    pub frames: u32,

    /// Print the composed GLSL of both programs and exit.
    #[arg(long)]
    pub dump_shaders: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
