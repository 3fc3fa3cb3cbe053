//! Output brightness
//!
//! Applied as a uniform post-multiply on the finished frame, after the
//! effect and any overlays.

use heapless::Vec;

use crate::{
    color::Rgb,
    error::ConfigError,
    math::{scale8, unit_to_u8},
};

pub const MAX_BRIGHTNESS_STEPS: usize = 8;

/// Brightness configuration
#[derive(Debug, Clone)]
pub struct BrightnessConfig {
    /// Levels cycled through by [`Brightness::cycle`] (0.0-1.0)
    pub steps: Vec<f32, MAX_BRIGHTNESS_STEPS>,
    /// Index of the level used at startup
    pub initial_step: usize,
}

impl Default for BrightnessConfig {
    fn default() -> Self {
        Self {
            steps: Vec::from_slice(&[0.0, 0.01, 0.03, 0.1, 0.3, 1.0]).unwrap_or_default(),
            initial_step: 3,
        }
    }
}

/// Stepped brightness with an 8-bit output scale
#[derive(Debug, Clone)]
pub struct Brightness {
    steps: Vec<f32, MAX_BRIGHTNESS_STEPS>,
    step: usize,
    level: f32,
    scale: u8,
}

impl Brightness {
    pub fn new(config: &BrightnessConfig) -> Result<Self, ConfigError> {
        if config.steps.is_empty() {
            return Err(ConfigError::NoBrightnessSteps);
        }
        let step = config.initial_step.min(config.steps.len() - 1);
        let mut brightness = Self {
            steps: config.steps.clone(),
            step,
            level: 0.0,
            scale: 0,
        };
        brightness.set(config.steps[step]);
        Ok(brightness)
    }

    /// Set a continuous level, clamped to 0.0-1.0
    pub fn set(&mut self, level: f32) {
        self.level = if level.is_finite() {
            level.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.scale = unit_to_u8(self.level);
    }

    /// Move to the next configured step, wrapping around
    ///
    /// Returns the new level.
    pub fn cycle(&mut self) -> f32 {
        self.step = (self.step + 1) % self.steps.len();
        self.set(self.steps[self.step]);
        self.level
    }

    pub const fn level(&self) -> f32 {
        self.level
    }

    pub const fn step(&self) -> usize {
        self.step
    }

    /// Scale every pixel of the frame
    pub fn apply(&self, frame: &mut [Rgb]) {
        match self.scale {
            255 => {}
            0 => frame.fill(Rgb::default()),
            scale => {
                for pixel in frame {
                    pixel.r = scale8(pixel.r, scale);
                    pixel.g = scale8(pixel.g, scale);
                    pixel.b = scale8(pixel.b, scale);
                }
            }
        }
    }
}
