//! Firefly flicker effect
//!
//! Pixels light up at a random color and fade linearly to a final color
//! over a random number of ticks. Nothing moves until [`FireflyEffect::flicker`]
//! is called; the caller decides when fireflies appear.

use core::ops::RangeInclusive;

use embassy_time::Instant;
use nanorand::{Rng, WyRand};

use super::Effect;
use crate::{
    color::{BLACK, Rgb},
    error::ConfigError,
};

/// Shortest fade, a fade needs a start and an end
const MIN_FADE_STEPS: u16 = 2;

/// Firefly effect configuration
#[derive(Debug, Clone)]
pub struct FireflyConfig {
    /// Pixels on the strip, the whole capacity when unset
    pub pixel_count: Option<usize>,
    /// Minimum fade duration in ticks
    pub min_steps: u16,
    /// Maximum fade duration in ticks
    pub max_steps: u16,
    pub red: RangeInclusive<u8>,
    pub green: RangeInclusive<u8>,
    pub blue: RangeInclusive<u8>,
    /// Random generator seed
    pub seed: u64,
}

impl Default for FireflyConfig {
    fn default() -> Self {
        Self {
            pixel_count: None,
            min_steps: 8,
            max_steps: 256,
            red: 0..=255,
            green: 0..=255,
            blue: 0..=255,
            seed: 0x5eed,
        }
    }
}

/// A flicker request; unset fields are chosen at random
#[derive(Debug, Clone, Copy, Default)]
pub struct Flicker {
    pub pixel: Option<usize>,
    pub steps: Option<u16>,
    pub initial: Option<Rgb>,
    /// Color the fade ends at, black when unset
    pub end: Option<Rgb>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Fade {
    total: u16,
    current: u16,
    initial: [f32; 3],
    delta: [f32; 3],
}

impl Fade {
    fn new(steps: u16, initial: Rgb, end: Rgb) -> Self {
        let span = f32::from(steps - 1);
        let channel_delta = |from: u8, to: u8| (f32::from(to) - f32::from(from)) / span;
        Self {
            total: steps,
            current: 0,
            initial: [f32::from(initial.r), f32::from(initial.g), f32::from(initial.b)],
            delta: [
                channel_delta(initial.r, end.r),
                channel_delta(initial.g, end.g),
                channel_delta(initial.b, end.b),
            ],
        }
    }

    const fn is_active(&self) -> bool {
        self.current < self.total
    }

    /// Color at the current step, then move to the next one
    fn step(&mut self) -> Rgb {
        let step = f32::from(self.current);
        let channel = |i: usize| {
            libm::roundf(self.initial[i] + step * self.delta[i]).clamp(0.0, 255.0) as u8
        };
        self.current += 1;
        Rgb {
            r: channel(0),
            g: channel(1),
            b: channel(2),
        }
    }
}

/// Firefly effect
///
/// `N` is the maximum number of pixels.
pub struct FireflyEffect<const N: usize> {
    fades: [Fade; N],
    pixel_count: usize,
    min_steps: u16,
    max_steps: u16,
    red: RangeInclusive<u8>,
    green: RangeInclusive<u8>,
    blue: RangeInclusive<u8>,
    rng: WyRand,
}

impl<const N: usize> FireflyEffect<N> {
    /// Create the effect
    ///
    /// Fails when the configured pixel count is zero or above `N`.
    pub fn new(config: &FireflyConfig) -> Result<Self, ConfigError> {
        let mut effect = Self {
            fades: [Fade::default(); N],
            pixel_count: N,
            min_steps: MIN_FADE_STEPS,
            max_steps: MIN_FADE_STEPS,
            red: config.red.clone(),
            green: config.green.clone(),
            blue: config.blue.clone(),
            rng: WyRand::new_seed(config.seed),
        };
        if let Some(pixel_count) = config.pixel_count {
            effect.set_pixel_count(pixel_count)?;
        }
        effect.set_steps_range(config.min_steps, config.max_steps);
        Ok(effect)
    }

    /// Change the strip length
    ///
    /// Fades beyond the new length are dropped.
    pub fn set_pixel_count(&mut self, pixel_count: usize) -> Result<(), ConfigError> {
        if pixel_count == 0 || pixel_count > N {
            return Err(ConfigError::InvalidPixelCount);
        }
        self.pixel_count = pixel_count;
        for fade in &mut self.fades[pixel_count..] {
            *fade = Fade::default();
        }
        Ok(())
    }

    pub const fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    /// Set the fade duration bounds, keeping `min <= max`
    pub fn set_steps_range(&mut self, min_steps: u16, max_steps: u16) {
        self.min_steps = min_steps.max(MIN_FADE_STEPS);
        self.max_steps = max_steps.max(self.min_steps);
    }

    pub fn set_max_steps(&mut self, max_steps: u16) {
        self.max_steps = max_steps.max(self.min_steps);
    }

    pub fn set_color_ranges(
        &mut self,
        red: RangeInclusive<u8>,
        green: RangeInclusive<u8>,
        blue: RangeInclusive<u8>,
    ) {
        self.red = red;
        self.green = green;
        self.blue = blue;
    }

    /// Start a fade on one pixel
    ///
    /// Returns the pixel index, or `None` if the requested pixel is past
    /// the strip or the effect has no pixels.
    pub fn flicker(&mut self, request: Flicker) -> Option<usize> {
        if self.pixel_count == 0 {
            return None;
        }
        let pixel = match request.pixel {
            Some(pixel) if pixel >= self.pixel_count => return None,
            Some(pixel) => pixel,
            None => self.rng.generate_range(0..self.pixel_count),
        };
        let steps = match request.steps {
            Some(steps) => steps.max(MIN_FADE_STEPS),
            None => self.rng.generate_range(self.min_steps..=self.max_steps),
        };
        let initial = match request.initial {
            Some(color) => color,
            None => self.random_color(),
        };

        self.fades[pixel] = Fade::new(steps, initial, request.end.unwrap_or(BLACK));
        Some(pixel)
    }

    /// Number of pixels currently fading
    pub fn active(&self) -> usize {
        self.fades.iter().filter(|fade| fade.is_active()).count()
    }

    fn random_color(&mut self) -> Rgb {
        let (red, green, blue) = (self.red.clone(), self.green.clone(), self.blue.clone());
        Rgb {
            r: self.sample(red),
            g: self.sample(green),
            b: self.sample(blue),
        }
    }

    fn sample(&mut self, range: RangeInclusive<u8>) -> u8 {
        if range.is_empty() {
            return *range.start();
        }
        self.rng.generate_range(range)
    }
}

impl<const N: usize> core::fmt::Debug for FireflyEffect<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FireflyEffect")
            .field("pixel_count", &self.pixel_count)
            .field("active", &self.active())
            .field("min_steps", &self.min_steps)
            .field("max_steps", &self.max_steps)
            .finish_non_exhaustive()
    }
}

impl<const N: usize> Effect for FireflyEffect<N> {
    /// Advance every active fade by one step
    ///
    /// Pixels that are not fading keep their previous color.
    fn render(&mut self, _now: Instant, leds: &mut [Rgb]) {
        for (led, fade) in leds.iter_mut().zip(self.fades.iter_mut()) {
            if fade.is_active() {
                *led = fade.step();
            }
        }
    }

    fn reset(&mut self) {
        self.fades = [Fade::default(); N];
    }
}
