use anyhow::{anyhow, Context, Result};
use bandpulse_audio::{
    config::AnalyzerConfig,
    cpal::{
        self,
        traits::{DeviceTrait, HostTrait},
        SampleFormat, SupportedStreamConfigRange,
    },
    fetcher::{default_output_config, Fetcher, SystemAudioFetcher},
    nalgebra::Vector3,
    visual::{AnalysisConsumer, Presentation, Rgb, VisualConfig, VisualMapper},
    AudioAnalyser, FrameClock,
};
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Paragraph},
    Frame,
};
use tracing::{debug, warn};

use crate::{cli::Args, Action, Model};

/// Bar heights are the band values times this factor.
const BAR_RESOLUTION: f32 = 100.;

const BAND_LABELS: [&str; 8] = [
    "sub", "bass", "low", "low-mid", "mid", "high-mid", "presence", "air",
];

#[derive(Debug, Clone)]
pub struct DeviceChoice {
    pub device_name: String,
    pub is_output_device: bool,
}

pub struct Visualizer {
    analyser: AudioAnalyser,
    clock: FrameClock,

    bass: VisualMapper,
    treble: VisualMapper,
    presentations: [Presentation; 2],

    bar_width: u16,
}

impl Visualizer {
    /// Listens to the given device or to the default device if `None` is given.
    pub fn boxed(device: Option<&DeviceChoice>, args: &Args) -> Result<Box<Self>> {
        let fetcher = match device {
            Some(choice) => fetcher_of(choice)?,
            None => SystemAudioFetcher::default(|err| warn!("Audio stream error: {}", err))?
                as Box<dyn Fetcher>,
        };

        let analyser = AudioAnalyser::new(
            fetcher,
            AnalyzerConfig {
                window: args.window.into(),
                ..Default::default()
            },
        )?;

        let mapper_config = VisualConfig {
            bounce_speed: args.bounce_speed,
            scale_sensitivity: args.scale_sensitivity,
            ..Default::default()
        };

        let bass = VisualMapper::new(mapper_config.clone(), Vector3::zeros());
        let treble = VisualMapper::new(
            VisualConfig {
                react_to_low_band: false,
                ..mapper_config
            },
            Vector3::zeros(),
        );
        let presentations = [bass.presentation().clone(), treble.presentation().clone()];

        Ok(Box::new(Self {
            analyser,
            clock: FrameClock::new(),
            bass,
            treble,
            presentations,
            bar_width: args.bar_width,
        }))
    }

    fn band_chart(&self) -> BarChart<'_> {
        let analysis = self.analyser.latest();

        let bars: Vec<Bar> = analysis
            .bands
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                Bar::default()
                    .label(Line::from(BAND_LABELS.get(index).copied().unwrap_or("")))
                    .text_value(format!("{:.1}", value))
                    .value((value * BAR_RESOLUTION) as u64)
            })
            .collect();

        BarChart::default()
            .block(Block::bordered().title(format!(
                "Bands (amplitude {:.2}) | q: quit, d: devices, +/-: bar width",
                analysis.amplitude
            )))
            .data(BarGroup::default().bars(&bars))
            .bar_width(self.bar_width)
            .bar_gap(1)
            .bar_style(Style::new().fg(Color::LightBlue))
    }
}

impl Model for Visualizer {
    fn tick(&mut self) {
        let time = self.clock.tick();

        // on failure the previous frame is shown again
        if let Err(err) = self.analyser.on_tick() {
            warn!("Couldn't analyse the frame: {}", err);
        }
        let analysis = self.analyser.latest();

        self.presentations = [
            self.bass.on_tick(analysis, time),
            self.treble.on_tick(analysis, time),
        ];
    }

    fn draw(&mut self, frame: &mut Frame) {
        let [chart_area, objects_area] =
            Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(frame.area());

        frame.render_widget(self.band_chart(), chart_area);

        let [bass_area, treble_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(objects_area);

        draw_object(frame, bass_area, "bass", &self.presentations[0]);
        draw_object(frame, treble_area, "treble", &self.presentations[1]);
    }

    fn handle_event(&mut self, event: Event) -> Action {
        if let Event::Key(KeyEvent { code, .. }) = event {
            match code {
                KeyCode::Char('q') => return Action::Quit,
                KeyCode::Char('d') => return Action::StartDeviceMenu,
                KeyCode::Char('+') => self.bar_width = (self.bar_width + 1).min(300),
                KeyCode::Char('-') => self.bar_width = self.bar_width.saturating_sub(1).max(1),
                _ => {}
            }
        }

        Action::None
    }
}

/// Draws the object of a mapper as a colored box which bounces around the middle of `area`.
fn draw_object(frame: &mut Frame, area: Rect, title: &str, presentation: &Presentation) {
    let block = Block::bordered().title(format!(
        "{} | y {:+.2} | height {:.2} | rotation {:+.0}°",
        title,
        presentation.position.y,
        presentation.scale.y,
        presentation.rotation.scaled_axis().y.to_degrees(),
    ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let height = (presentation.scale.y.max(1.).round() as u16).min(inner.height);
    let width = (inner.width / 3).max(1);

    let center = inner.y as f32 + inner.height as f32 / 2.;
    let top = (center - presentation.position.y - height as f32 / 2.)
        .clamp(inner.y as f32, (inner.y + inner.height - height) as f32) as u16;

    let object = Rect {
        x: inner.x + (inner.width - width) / 2,
        y: top,
        width,
        height,
    };

    frame.render_widget(
        Paragraph::new("").style(Style::new().bg(terminal_color(presentation.color))),
        object,
    );
}

fn terminal_color(color: Rgb) -> Color {
    let [r, g, b] = color.to_rgb8();
    Color::Rgb(r, g, b)
}

fn fetcher_of(choice: &DeviceChoice) -> Result<Box<dyn Fetcher>> {
    let host = cpal::default_host();

    let mut devices = if choice.is_output_device {
        host.output_devices()?.collect::<Vec<_>>()
    } else {
        host.input_devices()?.collect::<Vec<_>>()
    };

    let index = devices
        .iter()
        .position(|device| device.name().is_ok_and(|name| name == choice.device_name))
        .ok_or_else(|| anyhow!("Device {:?} vanished", choice.device_name))?;
    let device = devices.swap_remove(index);

    let config = if choice.is_output_device {
        default_output_config(&device)?
    } else {
        default_input_config(&device)?
    };
    debug!("Using {:?} with {:?}", choice, config);

    let fetcher: Box<dyn Fetcher> =
        SystemAudioFetcher::new(&device, &config, |err| warn!("Audio stream error: {}", err))
            .with_context(|| format!("Listening to {:?}", choice.device_name))?;

    Ok(fetcher)
}

fn default_input_config(device: &cpal::Device) -> Result<SupportedStreamConfigRange> {
    let mut matching_configs: Vec<_> = device
        .supported_input_configs()?
        .filter(|config| config.sample_format() == SampleFormat::F32)
        .collect();

    matching_configs.sort_by(|a, b| a.cmp_default_heuristics(b));
    matching_configs
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("The input device doesn't deliver f32 samples"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_saturate() {
        assert_eq!(terminal_color(Rgb::new(0., 0., 3.)), Color::Rgb(0, 0, 255));
    }

    #[test]
    fn one_label_per_band() {
        assert_eq!(BAND_LABELS.len(), bandpulse_audio::AMOUNT_BANDS);
    }
}
