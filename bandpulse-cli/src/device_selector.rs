use bandpulse_audio::cpal::{
    self,
    traits::{DeviceTrait, HostTrait},
    Device, SampleFormat, SupportedStreamConfigRange,
};
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, List, ListState},
};
use tracing::warn;

use crate::{Action, Model};

pub struct DeviceChooser {
    input_devices: Vec<String>,
    output_devices: Vec<String>,

    input_state: ListState,
    output_state: ListState,
}

impl DeviceChooser {
    pub fn boxed() -> Box<Self> {
        let host = cpal::default_host();

        let input_devices = match host.input_devices() {
            Ok(devices) => device_names(devices, |device| device.supported_input_configs().ok()),
            Err(err) => {
                warn!("Couldn't retrieve input devices from host: {}", err);
                Vec::new()
            }
        };

        let output_devices = match host.output_devices() {
            Ok(devices) => device_names(devices, |device| device.supported_output_configs().ok()),
            Err(err) => {
                warn!("Couldn't retrieve output devices from host: {}", err);
                Vec::new()
            }
        };

        Box::new(Self::new(input_devices, output_devices))
    }

    fn new(input_devices: Vec<String>, output_devices: Vec<String>) -> Self {
        Self {
            input_devices,
            output_devices,
            input_state: ListState::default(),
            output_state: ListState::default(),
        }
    }

    /// Moves down the output list first, then the input list and wraps around.
    fn select_next(&mut self) {
        let at_bottom = |state: &ListState, len: usize| state.selected() == len.checked_sub(1);

        if self.output_state.selected().is_some() {
            if at_bottom(&self.output_state, self.output_devices.len()) {
                self.output_state.select(None);
                self.select_first_available(false);
            } else {
                self.output_state.select_next();
            }
        } else if self.input_state.selected().is_some() {
            if at_bottom(&self.input_state, self.input_devices.len()) {
                self.input_state.select(None);
                self.select_first_available(true);
            } else {
                self.input_state.select_next();
            }
        } else {
            self.select_first_available(true);
        }
    }

    fn select_previous(&mut self) {
        if let Some(index) = self.output_state.selected() {
            if index == 0 {
                self.output_state.select(None);
                self.select_last_available(false);
            } else {
                self.output_state.select_previous();
            }
        } else if let Some(index) = self.input_state.selected() {
            if index == 0 {
                self.input_state.select(None);
                self.select_last_available(true);
            } else {
                self.input_state.select_previous();
            }
        } else {
            self.select_first_available(true);
        }
    }

    fn select_first_available(&mut self, prefer_output: bool) {
        let output =
            (prefer_output || self.input_devices.is_empty()) && !self.output_devices.is_empty();

        if output {
            self.output_state.select(Some(0));
        } else if !self.input_devices.is_empty() {
            self.input_state.select(Some(0));
        }
    }

    fn select_last_available(&mut self, prefer_output: bool) {
        let output =
            (prefer_output || self.input_devices.is_empty()) && !self.output_devices.is_empty();

        if output {
            self.output_state.select(Some(self.output_devices.len() - 1));
        } else if let Some(last) = self.input_devices.len().checked_sub(1) {
            self.input_state.select(Some(last));
        }
    }

    fn selected(&self) -> Option<(String, bool)> {
        if let Some(name) = self
            .output_state
            .selected()
            .and_then(|index| self.output_devices.get(index))
        {
            return Some((name.clone(), true));
        }

        self.input_state
            .selected()
            .and_then(|index| self.input_devices.get(index))
            .map(|name| (name.clone(), false))
    }
}

impl Model for DeviceChooser {
    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let column = Layout::horizontal([
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ])
        .split(frame.area())[1];

        let rows = Layout::vertical([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(column);

        let title_layout = rows[0];
        let layout = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        let output_devices_list = List::new(self.output_devices.clone())
            .block(Block::bordered().title("Output devices"))
            .highlight_symbol(">> ")
            .highlight_style(Style::new().fg(Color::Blue));

        let input_devices_list = List::new(self.input_devices.clone())
            .block(Block::bordered().title("Input devices"))
            .highlight_symbol(">> ")
            .highlight_style(Style::new().fg(Color::Blue));

        let title = Line::styled(
            "Select an audio device for the audio source (j/k, enter)",
            (Modifier::BOLD, Modifier::UNDERLINED),
        )
        .alignment(ratatui::layout::Alignment::Center);

        frame.render_widget(title, title_layout);
        frame.render_stateful_widget(output_devices_list, layout[0], &mut self.output_state);
        frame.render_stateful_widget(input_devices_list, layout[1], &mut self.input_state);
    }

    fn handle_event(&mut self, event: Event) -> Action {
        if let Event::Key(KeyEvent { code, .. }) = event {
            match code {
                KeyCode::Char('q') => return Action::Quit,
                KeyCode::Char('j') | KeyCode::Down => self.select_next(),
                KeyCode::Char('k') | KeyCode::Up => self.select_previous(),
                KeyCode::Enter => {
                    if let Some((device_name, is_output_device)) = self.selected() {
                        return Action::StartVisualizer {
                            device_name,
                            is_output_device,
                        };
                    }
                }
                _ => {}
            };
        }

        Action::None
    }
}

/// Names of the devices which can deliver `f32` samples.
fn device_names<I>(
    devices: impl Iterator<Item = Device>,
    configs: impl Fn(&Device) -> Option<I>,
) -> Vec<String>
where
    I: Iterator<Item = SupportedStreamConfigRange>,
{
    devices
        .filter(|device| {
            configs(device)
                .map(|mut configs| configs.any(|config| config.sample_format() == SampleFormat::F32))
                .unwrap_or(false)
        })
        .filter_map(|device| device.name().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chooser() -> DeviceChooser {
        DeviceChooser::new(
            vec!["mic".into()],
            vec!["speakers".into(), "hdmi".into()],
        )
    }

    #[test]
    fn walks_through_both_lists() {
        let mut chooser = chooser();
        assert_eq!(chooser.selected(), None);

        chooser.select_next();
        assert_eq!(chooser.selected(), Some(("speakers".into(), true)));

        chooser.select_next();
        assert_eq!(chooser.selected(), Some(("hdmi".into(), true)));

        chooser.select_next();
        assert_eq!(chooser.selected(), Some(("mic".into(), false)));

        chooser.select_next();
        assert_eq!(chooser.selected(), Some(("speakers".into(), true)));
    }

    #[test]
    fn previous_wraps_around() {
        let mut chooser = chooser();

        chooser.select_next();
        chooser.select_previous();
        assert_eq!(chooser.selected(), Some(("mic".into(), false)));

        chooser.select_previous();
        assert_eq!(chooser.selected(), Some(("hdmi".into(), true)));
    }

    #[test]
    fn nothing_to_select() {
        let mut chooser = DeviceChooser::new(Vec::new(), Vec::new());

        chooser.select_next();
        chooser.select_previous();
        assert_eq!(chooser.selected(), None);
    }
}
