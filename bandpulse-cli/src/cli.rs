use std::path::PathBuf;

use bandpulse_audio::config::WindowFunction;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// The width of each band bar.
    #[arg(short, long, default_value_t = 5)]
    pub bar_width: u16,

    /// How many frames per second should be analysed and drawn.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u16).range(1..=240))]
    pub fps: u16,

    /// The window which is applied to the samples before the FFT.
    #[arg(short, long, value_enum, default_value_t = Window::Blackman)]
    pub window: Window,

    /// How fast the band objects bounce.
    #[arg(long, default_value_t = 2.)]
    pub bounce_speed: f32,

    /// How much the amplitude stretches the band objects.
    #[arg(long, default_value_t = 2.)]
    pub scale_sensitivity: f32,

    /// Where the logs should be written to (the terminal is used by the visualizer).
    ///
    /// Defaults to `bandpulse-cli.log` in the temp directory. Set `RUST_LOG` to control the log level.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum Window {
    Blackman,
    Hanning,
    Hamming,
    Nuttall,
    Rectangular,
}

impl From<Window> for WindowFunction {
    fn from(window: Window) -> Self {
        match window {
            Window::Blackman => Self::Blackman,
            Window::Hanning => Self::Hanning,
            Window::Hamming => Self::Hamming,
            Window::Nuttall => Self::Nuttall,
            Window::Rectangular => Self::Rectangular,
        }
    }
}

impl Args {
    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("bandpulse-cli.log"))
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["bandpulse-cli"]).unwrap();

        assert_eq!(args.fps, 60);
        assert_eq!(WindowFunction::from(args.window), WindowFunction::Blackman);
        assert!(args.log_file().ends_with("bandpulse-cli.log"));
    }

    #[test]
    fn zero_fps_is_rejected() {
        assert!(Args::try_parse_from(["bandpulse-cli", "--fps", "0"]).is_err());
    }
}
