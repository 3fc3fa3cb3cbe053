//! Mode sequencing
//!
//! A few knobs drive many parameters by grouping controllers into modes.
//! Only the active mode listens to the knobs. Leaving a mode locks its
//! controllers, so coming back to it later does not make values jump.

use embassy_time::{Duration, Instant};
use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::{AnalogController, ControllerConfig, Parameter, ParameterSink};
use crate::{
    color::Rgb,
    error::ConfigError,
    math::{scale8, unit_to_u8},
};

pub const MAX_MODES: usize = 4;
pub const MAX_CONTROLLERS_PER_MODE: usize = 4;

const DEFAULT_INDICATOR_TIMEOUT: Duration = Duration::from_millis(1500);

/// A controller reading one analog input and driving one parameter
#[derive(Debug, Clone)]
pub struct Binding {
    /// Index into the analog samples passed to [`ModeSequencer::update`]
    pub input: usize,
    pub parameter: Parameter,
    pub controller: AnalogController,
}

impl Binding {
    pub fn new(
        input: usize,
        parameter: Parameter,
        config: ControllerConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            input,
            parameter,
            controller: AnalogController::new(config)?,
        })
    }
}

/// A set of controllers that are active together
#[derive(Debug, Clone, Default)]
pub struct Mode {
    bindings: Vec<Binding, MAX_CONTROLLERS_PER_MODE>,
    indicator: Option<Rgb>,
}

impl Mode {
    pub const fn new() -> Self {
        Self {
            bindings: Vec::new(),
            indicator: None,
        }
    }

    /// Color shown on the status pixels while this mode is active
    #[must_use]
    pub fn with_indicator(mut self, color: Rgb) -> Self {
        self.indicator = Some(color);
        self
    }

    pub fn bind(mut self, binding: Binding) -> Result<Self, ConfigError> {
        self.bindings
            .push(binding)
            .map_err(|_| ConfigError::CapacityExceeded)?;
        Ok(self)
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub const fn indicator(&self) -> Option<Rgb> {
        self.indicator
    }
}

/// Status pixel overlay settings
///
/// The first pixel shows the mode color, the following ones show each
/// controller's position as a dimmed mode color.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorConfig {
    /// First status pixel
    pub start: usize,
    /// How long the overlay stays after a change
    pub timeout: Duration,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            start: 0,
            timeout: DEFAULT_INDICATOR_TIMEOUT,
        }
    }
}

/// Cycles through modes, one active at a time
#[derive(Debug, Clone)]
pub struct ModeSequencer {
    modes: Vec<Mode, MAX_MODES>,
    current: usize,
    indicator: Option<IndicatorConfig>,
    indicator_deadline: Option<Instant>,
}

impl ModeSequencer {
    pub fn new<I>(modes: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = Mode>,
    {
        let mut collected = Vec::new();
        for mode in modes {
            collected
                .push(mode)
                .map_err(|_| ConfigError::CapacityExceeded)?;
        }
        if collected.is_empty() {
            return Err(ConfigError::NoModes);
        }

        Ok(Self {
            modes: collected,
            current: 0,
            indicator: None,
            indicator_deadline: None,
        })
    }

    /// Enable the status pixel overlay
    #[must_use]
    pub fn with_indicator(mut self, config: IndicatorConfig) -> Self {
        self.indicator = Some(config);
        self
    }

    pub const fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_mode(&self) -> &Mode {
        &self.modes[self.current]
    }

    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    /// Feed analog samples to the active mode
    ///
    /// Reported values are applied to `sink`. Bindings whose input has no
    /// sample are skipped. Returns the number of values reported.
    pub fn update<S>(&mut self, samples: &[u16], now: Instant, sink: &mut S) -> usize
    where
        S: ParameterSink + ?Sized,
    {
        let mut reported = 0;
        for binding in &mut self.modes[self.current].bindings {
            let Some(&raw) = samples.get(binding.input) else {
                continue;
            };
            if let Some(value) = binding.controller.update(raw) {
                sink.apply(binding.parameter, value);
                reported += 1;
            }
        }
        if reported > 0 {
            self.touch(now);
        }
        reported
    }

    /// Lock the active controllers and activate the next mode
    ///
    /// Returns the new mode index.
    pub fn advance(&mut self, now: Instant) -> usize {
        for binding in &mut self.modes[self.current].bindings {
            // On failure the controller keeps its previous lock position
            let _ = binding.controller.lock();
        }
        self.current = (self.current + 1) % self.modes.len();
        #[cfg(feature = "esp32-log")]
        println!("[ModeSequencer.advance] switched to mode {}", self.current);
        self.touch(now);
        self.current
    }

    /// Return every controller to its initial value
    ///
    /// Each controller is locked at its initial value, which is applied to
    /// `sink` right away. The first mode becomes active.
    pub fn reset<S>(&mut self, now: Instant, sink: &mut S)
    where
        S: ParameterSink + ?Sized,
    {
        for mode in &mut self.modes {
            for binding in &mut mode.bindings {
                if let Ok(value) = binding.controller.reset() {
                    sink.apply(binding.parameter, value);
                }
            }
        }
        self.current = 0;
        #[cfg(feature = "esp32-log")]
        println!("[ModeSequencer.reset] controllers back to initial values");
        self.touch(now);
    }

    /// Apply every controller's current value to `sink`, without changing
    /// any lock state
    pub fn sync<S>(&self, sink: &mut S)
    where
        S: ParameterSink + ?Sized,
    {
        for binding in self.modes.iter().flat_map(|mode| mode.bindings.iter()) {
            sink.apply(binding.parameter, binding.controller.value());
        }
    }

    /// Whether the indicator overlay is showing at `now`
    pub fn indicator_visible(&self, now: Instant) -> bool {
        self.indicator.is_some() && self.indicator_deadline.is_some_and(|deadline| now < deadline)
    }

    /// Draw the indicator overlay onto the frame, if it is showing
    pub fn render_indicator(&self, now: Instant, leds: &mut [Rgb]) {
        let Some(config) = self.indicator else {
            return;
        };
        if !self.indicator_visible(now) {
            return;
        }
        let mode = self.current_mode();
        let Some(color) = mode.indicator else {
            return;
        };

        if let Some(led) = leds.get_mut(config.start) {
            *led = color;
        }
        for (i, binding) in mode.bindings.iter().enumerate() {
            if let Some(led) = leds.get_mut(config.start + 1 + i) {
                let level = unit_to_u8(binding.controller.position());
                *led = Rgb {
                    r: scale8(color.r, level),
                    g: scale8(color.g, level),
                    b: scale8(color.b, level),
                };
            }
        }
    }

    fn touch(&mut self, now: Instant) {
        if let Some(config) = self.indicator {
            self.indicator_deadline = Some(now + config.timeout);
        }
    }
}
