mod cli;
mod device_selector;
mod logger;
mod visualizer;

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::{DefaultTerminal, Frame};
use tracing::{error, warn};

use cli::Args;
use device_selector::DeviceChooser;
use visualizer::{DeviceChoice, Visualizer};

/// What the app should do after a model handled an event.
pub enum Action {
    None,
    Quit,
    StartDeviceMenu,
    StartVisualizer {
        device_name: String,
        is_output_device: bool,
    },
}

/// A screen of the app.
pub trait Model {
    /// Called once per frame before drawing.
    fn tick(&mut self) {}

    fn draw(&mut self, frame: &mut Frame);

    fn handle_event(&mut self, event: Event) -> Action;
}

fn main() -> Result<()> {
    let args = cli::parse();
    logger::init(&args.log_file())?;

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &args);
    ratatui::restore();

    result
}

fn run(terminal: &mut DefaultTerminal, args: &Args) -> Result<()> {
    let mut model: Box<dyn Model> = match Visualizer::boxed(None, args) {
        Ok(visualizer) => visualizer,
        Err(err) => {
            warn!("Couldn't listen to the default device: {:#}", err);
            DeviceChooser::boxed()
        }
    };

    let frame_duration = Duration::from_secs_f32(1. / f32::from(args.fps));

    loop {
        model.tick();
        terminal.draw(|frame| model.draw(frame))?;

        if event::poll(frame_duration)? {
            match model.handle_event(event::read()?) {
                Action::None => {}
                Action::Quit => break,
                Action::StartDeviceMenu => model = DeviceChooser::boxed(),
                Action::StartVisualizer {
                    device_name,
                    is_output_device,
                } => {
                    let choice = DeviceChoice {
                        device_name,
                        is_output_device,
                    };

                    match Visualizer::boxed(Some(&choice), args) {
                        Ok(visualizer) => model = visualizer,
                        Err(err) => error!("Couldn't listen to {:?}: {:#}", choice, err),
                    }
                }
            }
        }
    }

    Ok(())
}
