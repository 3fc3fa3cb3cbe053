#![no_std]

pub mod brightness;
pub mod color;
pub mod control;
pub mod effect;
pub mod error;
pub mod frame_scheduler;
pub mod math;
pub mod renderer;
pub mod sensor;

pub use brightness::{Brightness, BrightnessConfig};
pub use control::{
    AnalogController, Binding, ChangeDetection, ControlEvent, ControllerConfig, EventQueue,
    IndicatorConfig, Mode, ModeSequencer, Parameter, ParameterSink, ResponseProfile,
};
pub use effect::{
    Effect, FireflyConfig, FireflyEffect, Flicker, HueRange, HueWindow, RainbowAnimator,
    RainbowConfig,
};
pub use error::{ConfigError, LockError, RootError};
pub use frame_scheduler::FrameScheduler;
pub use renderer::{Renderer, RendererConfig};
pub use sensor::OutlierDetector;

pub use color::{ColorTable, HueBias, HueCurve, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract LED strip
///
/// Implement this trait to support different hardware platforms.
/// Writes are buffered until [`PixelSink::flush`].
pub trait PixelSink {
    /// Write colors to the strip buffer
    fn write(&mut self, colors: &[Rgb]);

    /// Make buffered colors visible
    fn flush(&mut self);
}

/// Abstract analog inputs (knobs)
pub trait AnalogSource {
    /// Fill `samples` with one raw reading per input
    fn sample(&mut self, samples: &mut [u16]);
}
