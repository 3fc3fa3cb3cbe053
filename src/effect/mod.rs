//! Animated effects
//!
//! Effects render into a frame once per tick. Knob-driven parameters reach
//! them through [`Effect::apply`].

mod firefly;
mod rainbow;

use embassy_time::Instant;
pub use firefly::{FireflyConfig, FireflyEffect, Flicker};
pub use rainbow::{
    HueRange, HueWindow, RainbowAnimator, RainbowConfig, SATURATION_LEVELS,
};

use crate::{color::Rgb, control::Parameter};

pub trait Effect {
    /// Render a single frame
    fn render(&mut self, now: Instant, leds: &mut [Rgb]);

    /// Apply a controller-reported parameter value
    ///
    /// Parameters the effect does not understand are ignored.
    fn apply(&mut self, _parameter: Parameter, _value: f32) {}

    /// Reset effect state
    fn reset(&mut self) {}
}
