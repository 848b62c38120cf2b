//! Maps the analysed audio onto simple presentation values of an object.
use std::ops::Mul;

use nalgebra::{UnitQuaternion, Vector3};

use crate::{AnalysisResult, BandSelector, FrameTime};

/// Degrees per second.
pub const DEFAULT_ROTATION_SPEED: f32 = 30.;

/// Anything which reacts to the analysis of each frame.
pub trait AnalysisConsumer {
    type Output;

    /// Called once per frame after the analysis of the frame has been published.
    fn on_tick(&mut self, analysis: &AnalysisResult, time: FrameTime) -> Self::Output;
}

/// A linear RGB color. The components aren't clamped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLUE: Self = Self::new(0., 0., 1.);
    pub const RED: Self = Self::new(1., 0., 0.);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation towards `target`. `t` is clamped to `[0, 1]`.
    pub fn lerp(self, target: Self, t: f32) -> Self {
        let t = t.clamp(0., 1.);

        Self {
            r: self.r + (target.r - self.r) * t,
            g: self.g + (target.g - self.g) * t,
            b: self.b + (target.b - self.b) * t,
        }
    }

    /// Converts the color into 8 bit channels, saturating at `1.0`.
    pub fn to_rgb8(self) -> [u8; 3] {
        let channel = |value: f32| (value.clamp(0., 1.) * 255.).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b)]
    }
}

impl Mul<f32> for Rgb {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

/// The config options for [VisualMapper].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisualConfig {
    /// React to the lowest band (bass) or to the highest band (treble).
    pub react_to_low_band: bool,

    /// How fast the object bounces up and down.
    pub bounce_speed: f32,

    /// How much the amplitude stretches the object.
    pub scale_sensitivity: f32,

    /// Base color if the mapper reacts to the low band.
    pub color_when_low_band: Rgb,

    /// Base color if the mapper reacts to the high band.
    pub color_when_high_band: Rgb,

    /// Degrees per second around the up axis.
    /// Low band mappers turn counter-clockwise, high band mappers clockwise.
    pub rotation_speed: f32,
}

impl VisualConfig {
    pub fn selector(&self) -> BandSelector {
        if self.react_to_low_band {
            BandSelector::Low
        } else {
            BandSelector::High
        }
    }

    pub fn base_color(&self) -> Rgb {
        if self.react_to_low_band {
            self.color_when_low_band
        } else {
            self.color_when_high_band
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            react_to_low_band: true,
            bounce_speed: 2.,
            scale_sensitivity: 2.,
            color_when_low_band: Rgb::BLUE,
            color_when_high_band: Rgb::RED,
            rotation_speed: DEFAULT_ROTATION_SPEED,
        }
    }
}

/// Where and how the object should be drawn in the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub position: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub color: Rgb,
}

/// Bounces, stretches, rotates and colors an object according to the analysed audio.
#[derive(Debug, Clone)]
pub struct VisualMapper {
    config: VisualConfig,
    origin: Vector3<f32>,

    presentation: Presentation,
}

impl VisualMapper {
    /// Creates a mapper for an object which rests at `origin`.
    pub fn new(config: VisualConfig, origin: Vector3<f32>) -> Self {
        let presentation = Presentation {
            position: origin,
            scale: Vector3::new(1., 1., 1.),
            rotation: UnitQuaternion::identity(),
            color: config.base_color(),
        };

        Self {
            config,
            origin,
            presentation,
        }
    }

    fn bounce(&mut self, amplitude: f32, elapsed: f32) {
        let offset = (elapsed * self.config.bounce_speed).sin() * amplitude;
        self.presentation.position = Vector3::new(
            self.origin.x,
            self.origin.y + offset,
            self.origin.z,
        );
    }

    fn stretch(&mut self, amplitude: f32) {
        let height = amplitude * self.config.scale_sensitivity + 1.;
        self.presentation.scale = Vector3::new(1., height, 1.);
    }

    fn rotate(&mut self, delta: f32) {
        let direction = if self.config.react_to_low_band { 1. } else { -1. };
        let angle = (delta * self.config.rotation_speed * direction).to_radians();

        self.presentation.rotation =
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), angle) * self.presentation.rotation;
    }

    fn recolor(&mut self, amplitude: f32, band_value: f32, delta: f32) {
        let target = self.config.base_color() * (1. + band_value * amplitude);
        self.presentation.color = self.presentation.color.lerp(target, delta);
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn config(&self) -> &VisualConfig {
        &self.config
    }
}

impl AnalysisConsumer for VisualMapper {
    type Output = Presentation;

    fn on_tick(&mut self, analysis: &AnalysisResult, time: FrameTime) -> Presentation {
        let band_value = analysis.bands.get_selected(self.config.selector());
        let amplitude = analysis.amplitude;

        self.bounce(amplitude, time.elapsed);
        self.stretch(amplitude);
        self.rotate(time.delta);
        self.recolor(amplitude, band_value, time.delta);

        self.presentation.clone()
    }
}
