//! Analog knob controller
//!
//! Maps raw samples to a parameter value through a [`ResponseProfile`] and
//! reports only changes larger than a hysteresis threshold.
//!
//! A controller can be locked at a value. It then remembers the virtual raw
//! position that would produce that value and ignores the knob until the
//! knob comes close to that position. This keeps the value continuous when a
//! knob is shared between modes.

use heapless::Deque;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::ResponseProfile;
use crate::{
    error::{ConfigError, LockError},
    math::Bisection,
};

/// Largest moving-average window
pub const MAX_WINDOW: usize = 16;

const DEFAULT_RAW_MIN: f32 = 9_000.0;
const DEFAULT_RAW_MAX: f32 = 64_000.0;
const DEFAULT_CHANGE_THRESHOLD: f32 = 800.0;
const UNLOCK_WINDOW_FACTOR: f32 = 5.0;

/// How raw samples are filtered before change detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeDetection {
    /// Compare each sample against the last reported one
    #[default]
    Previous,
    /// Compare the mean of the last `window` samples against the last
    /// reported mean. Silent until the window has filled once.
    MovingAverage { window: usize },
}

impl ChangeDetection {
    const fn window(self) -> usize {
        match self {
            Self::Previous => 1,
            Self::MovingAverage { window } => window,
        }
    }
}

/// Analog controller configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    /// Raw sample at the low end of the knob travel
    pub raw_min: f32,
    /// Raw sample at the high end of the knob travel
    pub raw_max: f32,
    pub out_min: f32,
    pub out_max: f32,
    pub profile: ResponseProfile,
    /// Value reported at startup and after a reset
    pub initial: f32,
    /// Minimum raw change that is reported
    pub change_threshold: f32,
    /// Raw distance from the locked position at which the knob takes over
    pub unlock_window: f32,
    pub detection: ChangeDetection,
    /// Settings for inverting the transform when locking
    pub bisection: Bisection,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            raw_min: DEFAULT_RAW_MIN,
            raw_max: DEFAULT_RAW_MAX,
            out_min: 0.0,
            out_max: 1.0,
            profile: ResponseProfile::Linear,
            initial: 0.0,
            change_threshold: DEFAULT_CHANGE_THRESHOLD,
            unlock_window: UNLOCK_WINDOW_FACTOR * DEFAULT_CHANGE_THRESHOLD,
            detection: ChangeDetection::Previous,
            bisection: Bisection::default(),
        }
    }
}

impl ControllerConfig {
    /// Controller for values in `[out_min, out_max]` starting at `initial`
    pub fn new(out_min: f32, out_max: f32, initial: f32) -> Self {
        Self {
            out_min,
            out_max,
            initial,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_profile(mut self, profile: ResponseProfile) -> Self {
        self.profile = profile;
        self
    }

    #[must_use]
    pub fn with_raw_range(mut self, raw_min: f32, raw_max: f32) -> Self {
        self.raw_min = raw_min;
        self.raw_max = raw_max;
        self
    }

    /// Set the change threshold; the unlock window follows at five times it
    #[must_use]
    pub fn with_threshold(mut self, change_threshold: f32) -> Self {
        self.change_threshold = change_threshold;
        self.unlock_window = UNLOCK_WINDOW_FACTOR * change_threshold;
        self
    }

    #[must_use]
    pub fn with_unlock_window(mut self, unlock_window: f32) -> Self {
        self.unlock_window = unlock_window;
        self
    }

    #[must_use]
    pub fn with_detection(mut self, detection: ChangeDetection) -> Self {
        self.detection = detection;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.raw_min.is_finite() || !self.raw_max.is_finite() || self.raw_max <= self.raw_min {
            return Err(ConfigError::EmptyRawRange);
        }
        if !self.out_min.is_finite() || !self.out_max.is_finite() || self.out_max < self.out_min {
            return Err(ConfigError::InvalidOutputRange);
        }
        let window = self.detection.window();
        if window == 0 || window > MAX_WINDOW {
            return Err(ConfigError::InvalidWindow);
        }
        if !(self.out_min..=self.out_max).contains(&self.initial) {
            return Err(ConfigError::UnreachableInitialValue);
        }
        Ok(())
    }
}

/// One knob bound to one parameter
#[derive(Debug, Clone)]
pub struct AnalogController {
    config: ControllerConfig,
    samples: Deque<u16, MAX_WINDOW>,
    /// Latest filtered raw position
    live: f32,
    /// Raw position of the last reported value
    baseline: f32,
    locked: bool,
    /// Virtual raw position reported while locked
    locked_raw: f32,
}

impl AnalogController {
    /// Create a controller locked at its initial value
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut controller = Self {
            config,
            samples: Deque::new(),
            live: config.raw_min,
            baseline: config.raw_min,
            locked: true,
            locked_raw: config.raw_min,
        };
        controller
            .lock_at(config.initial)
            .map_err(|_| ConfigError::UnreachableInitialValue)?;
        controller.live = controller.locked_raw;
        controller.baseline = controller.locked_raw;
        Ok(controller)
    }

    /// Map a raw sample to a value in the output range
    pub fn transform(&self, raw: f32) -> f32 {
        let config = &self.config;
        let u = ((raw - config.raw_min) / (config.raw_max - config.raw_min)).clamp(0.0, 1.0);
        let value = config.profile.apply(u) * (config.out_max - config.out_min) + config.out_min;
        value.clamp(config.out_min, config.out_max)
    }

    /// Feed one raw sample
    ///
    /// Returns the new value when it should be reported: while unlocked when
    /// the filtered sample moved by at least the change threshold, while
    /// locked when the knob reached the locked position (which also unlocks).
    pub fn update(&mut self, raw: u16) -> Option<f32> {
        let window = self.config.detection.window();
        while self.samples.len() >= window {
            self.samples.pop_front();
        }
        // Room was made above
        let _ = self.samples.push_back(raw);
        if self.samples.len() < window {
            return None;
        }

        let sum: u32 = self.samples.iter().map(|&sample| u32::from(sample)).sum();
        self.live = sum as f32 / self.samples.len() as f32;

        if self.locked {
            if libm::fabsf(self.live - self.locked_raw) < self.config.unlock_window {
                #[cfg(feature = "esp32-log")]
                println!(
                    "[AnalogController.update] knob reached locked position {:?}",
                    self.locked_raw
                );
                self.locked = false;
                self.baseline = self.live;
                return Some(self.transform(self.live));
            }
            return None;
        }

        if libm::fabsf(self.live - self.baseline) >= self.config.change_threshold {
            self.baseline = self.live;
            return Some(self.transform(self.live));
        }
        None
    }

    /// Last reported value
    pub fn value(&self) -> f32 {
        if self.locked {
            self.transform(self.locked_raw)
        } else {
            self.transform(self.baseline)
        }
    }

    /// Last reported value scaled to `[0, 1]` across the output range
    pub fn position(&self) -> f32 {
        let span = self.config.out_max - self.config.out_min;
        if span <= 0.0 {
            return 0.0;
        }
        ((self.value() - self.config.out_min) / span).clamp(0.0, 1.0)
    }

    /// Lock at the last reported value
    pub fn lock(&mut self) -> Result<(), LockError> {
        self.lock_at(self.value())
    }

    /// Lock at `target`
    ///
    /// Finds the raw position whose transform equals `target`. If there is
    /// none the controller is still locked, at its previous virtual position.
    pub fn lock_at(&mut self, target: f32) -> Result<(), LockError> {
        self.locked = true;
        let solved = self.config.bisection.solve(
            |raw| self.transform(raw) - target,
            self.config.raw_min,
            self.config.raw_max,
        );
        match solved {
            Ok(raw) => {
                self.locked_raw = raw;
                Ok(())
            }
            Err(err) => {
                #[cfg(feature = "esp32-log")]
                println!(
                    "[AnalogController.lock_at] cannot lock at {:?}: {}",
                    target, err
                );
                Err(LockError(err))
            }
        }
    }

    /// Report live values immediately, skipping the proximity check
    ///
    /// Returns the value at the current knob position.
    pub fn unlock(&mut self) -> f32 {
        self.locked = false;
        self.baseline = self.live;
        self.transform(self.live)
    }

    /// Lock at the initial value, returning it
    pub fn reset(&mut self) -> Result<f32, LockError> {
        self.lock_at(self.config.initial)?;
        Ok(self.config.initial)
    }

    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Virtual raw position used while locked
    pub const fn locked_raw(&self) -> f32 {
        self.locked_raw
    }

    pub const fn initial(&self) -> f32 {
        self.config.initial
    }

    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }
}
