//! Table-driven rainbow animation
//!
//! Each pixel looks up a color from a precomputed [`ColorTable`]. The index
//! pattern rotates every tick by a fractional speed accumulator. When the hue
//! window covers (almost) the whole table the pattern wraps around; when it
//! is a strict sub-range, the pattern bounces between the window edges as a
//! triangle wave so the hue never jumps from the upper edge back to the lower.

use embassy_time::Instant;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::Effect;
use crate::{
    color::{ColorTable, HueCurve, Rgb},
    control::Parameter,
    error::ConfigError,
    math::sigmoid,
};

/// Number of discrete saturation levels the table is built at
pub const SATURATION_LEVELS: u8 = 20;

/// Fraction of the table above which the hue window wraps instead of bouncing
const LOOP_THRESHOLD: f32 = 0.99;

/// Hue window as fractions of the color table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueRange {
    /// Start of the window (0.0-1.0)
    pub lower: f32,
    /// Extent of the window (0.0-1.0)
    pub span: f32,
}

impl HueRange {
    pub const FULL: Self = Self {
        lower: 0.0,
        span: 1.0,
    };

    pub const fn new(lower: f32, span: f32) -> Self {
        Self { lower, span }
    }
}

/// Hue window resolved against the current table resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HueWindow {
    /// First table index of the window
    pub lower: usize,
    /// Number of table steps in the window, at least 1
    pub steps: usize,
    /// Window spans (almost) the whole table
    pub looped: bool,
}

impl HueWindow {
    fn derive(range: HueRange, table_steps: usize) -> Self {
        let total = table_steps as f32;
        let lower = libm::roundf(range.lower.clamp(0.0, 1.0) * total) as usize;
        let steps = (libm::roundf(range.span.clamp(0.0, 1.0) * total) as usize).max(1);
        Self {
            lower,
            steps,
            looped: steps as f32 > LOOP_THRESHOLD * total,
        }
    }
}

/// Rainbow animator configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainbowConfig {
    /// Color table resolution
    pub steps: usize,
    /// Saturation (0.0-1.0)
    pub saturation: f32,
    /// Active hue window
    pub hue_range: HueRange,
    /// Signed animation speed; 0 is static
    pub speed: f32,
    /// Hue spacing between the first and the last pixel, in windows
    pub color_delta: f32,
    /// Hue sampling curve
    pub curve: HueCurve,
}

impl Default for RainbowConfig {
    fn default() -> Self {
        Self {
            steps: 256,
            saturation: 1.0,
            hue_range: HueRange::FULL,
            speed: 1.0,
            color_delta: 1.0,
            curve: HueCurve::Linear,
        }
    }
}

/// Rainbow animator
///
/// `N` is the maximum color table resolution.
#[derive(Debug, Clone)]
pub struct RainbowAnimator<const N: usize> {
    table: ColorTable<N>,
    curve: HueCurve,
    saturation_level: u8,
    hue_range: HueRange,
    window: HueWindow,
    speed: f32,
    normalized_speed: f32,
    color_delta: f32,
    base_idx: usize,
    speed_acc: f32,
}

impl<const N: usize> RainbowAnimator<N> {
    /// Create an animator, building its first color table
    pub fn new(config: &RainbowConfig) -> Result<Self, ConfigError> {
        let saturation_level = saturation_level(config.saturation);
        let table = ColorTable::build(
            config.steps,
            level_saturation(saturation_level),
            config.curve,
        )?;
        let window = HueWindow::derive(config.hue_range, table.steps());

        let mut animator = Self {
            table,
            curve: config.curve,
            saturation_level,
            hue_range: config.hue_range,
            window,
            speed: 0.0,
            normalized_speed: 0.0,
            color_delta: config.color_delta,
            base_idx: 0,
            speed_acc: 0.0,
        };
        animator.set_speed(config.speed);
        Ok(animator)
    }

    /// Change the table resolution
    ///
    /// Rebuilds the table and re-derives the hue window and speed. On error
    /// the animator is left unchanged.
    pub fn set_steps(&mut self, steps: usize) -> Result<HueWindow, ConfigError> {
        self.table = ColorTable::build(steps, level_saturation(self.saturation_level), self.curve)?;
        #[cfg(feature = "esp32-log")]
        println!("[RainbowAnimator.set_steps] rebuilt color table with {} steps", steps);
        Ok(self.rederive_window())
    }

    /// Change the hue window
    ///
    /// `lower` is the window start and `span` its extent, both as fractions
    /// of the table.
    pub fn set_hue_range(&mut self, lower: f32, span: f32) -> HueWindow {
        self.hue_range = HueRange::new(lower, span);
        self.rederive_window()
    }

    /// Change the speed, returning the per-tick index advance
    ///
    /// The signed speed is squashed through a sigmoid. Negative speeds fold
    /// into the upper half of the bounce period, which walks the pattern
    /// backwards once the index wraps.
    pub fn set_speed(&mut self, speed: f32) -> f32 {
        self.speed = if speed.is_finite() { speed } else { 0.0 };
        self.normalized_speed = self.normalize_speed();
        self.normalized_speed
    }

    pub fn set_color_delta(&mut self, color_delta: f32) {
        if color_delta.is_finite() {
            self.color_delta = color_delta;
        }
    }

    /// Change the saturation
    ///
    /// Saturation is quantized to [`SATURATION_LEVELS`]; the table is only
    /// rebuilt when the level changes. Returns whether it was rebuilt.
    pub fn set_saturation(&mut self, saturation: f32) -> bool {
        let level = saturation_level(saturation);
        if level == self.saturation_level {
            return false;
        }
        match ColorTable::build(self.table.steps(), level_saturation(level), self.curve) {
            Ok(table) => {
                self.table = table;
                self.saturation_level = level;
                true
            }
            Err(_) => false,
        }
    }

    /// Table index shown at `position` on a strip of `pixel_count` pixels
    pub fn index_at(&self, position: usize, pixel_count: usize) -> usize {
        let steps = self.table.steps() as i64;
        let hue_steps = self.window.steps as i64;
        let lower = self.window.lower as i64;
        let base = self.base_idx as i64;
        let spacing =
            self.window.steps as f32 * self.color_delta / pixel_count.max(1) as f32;
        let offset = position as f32 * spacing;

        let index = if self.window.looped {
            (lower + base + libm::roundf(offset) as i64).rem_euclid(steps)
        } else {
            let mut raw = (libm::roundf(base as f32 + offset) as i64).rem_euclid(2 * hue_steps);
            if raw > hue_steps {
                raw = hue_steps - raw % hue_steps;
            }
            (lower + raw).rem_euclid(steps)
        };
        index as usize
    }

    /// Render one tick and advance the animation
    pub fn update(&mut self, leds: &mut [Rgb]) {
        let pixel_count = leds.len();
        for (i, led) in leds.iter_mut().enumerate() {
            *led = self.table.get(self.index_at(i, pixel_count));
        }
        self.advance();
    }

    /// Advance the rotation by the fractional speed
    fn advance(&mut self) {
        self.speed_acc += self.normalized_speed;
        if self.speed_acc >= 1.0 {
            let whole = libm::floorf(self.speed_acc);
            let period = 2 * self.window.steps;
            self.base_idx = (self.base_idx + whole as usize % period) % period;
            self.speed_acc -= whole;
        }
    }

    fn rederive_window(&mut self) -> HueWindow {
        self.window = HueWindow::derive(self.hue_range, self.table.steps());
        self.base_idx %= 2 * self.window.steps;
        self.normalized_speed = self.normalize_speed();
        self.window
    }

    fn normalize_speed(&self) -> f32 {
        let mut factor = sigmoid(self.speed / 100.0) - 0.5;
        if factor < 0.0 {
            factor += 1.0;
        }
        factor * 2.0 * self.window.steps as f32
    }

    pub fn table(&self) -> &ColorTable<N> {
        &self.table
    }

    pub fn steps(&self) -> usize {
        self.table.steps()
    }

    pub const fn window(&self) -> HueWindow {
        self.window
    }

    pub const fn hue_range(&self) -> HueRange {
        self.hue_range
    }

    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Table steps advanced per tick
    pub const fn normalized_speed(&self) -> f32 {
        self.normalized_speed
    }

    pub const fn color_delta(&self) -> f32 {
        self.color_delta
    }

    pub fn saturation(&self) -> f32 {
        level_saturation(self.saturation_level)
    }

    pub const fn base_index(&self) -> usize {
        self.base_idx
    }

    pub const fn speed_accumulator(&self) -> f32 {
        self.speed_acc
    }
}

impl<const N: usize> Effect for RainbowAnimator<N> {
    fn render(&mut self, _now: Instant, leds: &mut [Rgb]) {
        self.update(leds);
    }

    fn apply(&mut self, parameter: Parameter, value: f32) {
        match parameter {
            Parameter::Speed => {
                self.set_speed(value);
            }
            Parameter::HueLower => {
                self.set_hue_range(value, self.hue_range.span);
            }
            Parameter::HueSpan => {
                self.set_hue_range(self.hue_range.lower, value);
            }
            Parameter::ColorDelta => self.set_color_delta(value),
            Parameter::Steps if value.is_finite() => {
                let steps = libm::roundf(value).clamp(1.0, N as f32) as usize;
                if steps != self.table.steps() {
                    if let Err(err) = self.set_steps(steps) {
                        #[cfg(feature = "esp32-log")]
                        println!("[RainbowAnimator.apply] steps {} rejected: {}", steps, err);
                        #[cfg(not(feature = "esp32-log"))]
                        let _ = err;
                    }
                }
            }
            Parameter::Steps => {}
            Parameter::Saturation => {
                self.set_saturation(value);
            }
            Parameter::Brightness => {}
        }
    }

    fn reset(&mut self) {
        self.base_idx = 0;
        self.speed_acc = 0.0;
    }
}

fn saturation_level(saturation: f32) -> u8 {
    let saturation = if saturation.is_finite() { saturation } else { 1.0 };
    libm::roundf(saturation.clamp(0.0, 1.0) * f32::from(SATURATION_LEVELS)) as u8
}

fn level_saturation(level: u8) -> f32 {
    f32::from(level) / f32::from(SATURATION_LEVELS)
}
