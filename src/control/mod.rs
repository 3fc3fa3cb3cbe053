//! Knob and button control
//!
//! Analog controllers turn raw samples into parameter values, the mode
//! sequencer decides which controllers are live, and control events carry
//! button presses into the render loop.

mod analog;
mod debounce;
mod event;
mod profile;
mod sequencer;

pub use analog::{AnalogController, ChangeDetection, ControllerConfig, MAX_WINDOW};
pub use debounce::ClickDebouncer;
pub use event::{ControlEvent, EventQueue, EventReceiver, EventSender};
pub use profile::ResponseProfile;
pub use sequencer::{
    Binding, IndicatorConfig, MAX_CONTROLLERS_PER_MODE, MAX_MODES, Mode, ModeSequencer,
};

/// Values a controller can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    /// Signed animation speed
    Speed,
    /// Start of the hue window (0.0-1.0)
    HueLower,
    /// Extent of the hue window (0.0-1.0)
    HueSpan,
    /// Hue spacing across the strip
    ColorDelta,
    /// Color table resolution
    Steps,
    /// Color saturation (0.0-1.0)
    Saturation,
    /// Output brightness (0.0-1.0)
    Brightness,
}

/// Receives parameter values reported by controllers
pub trait ParameterSink {
    fn apply(&mut self, parameter: Parameter, value: f32);
}
