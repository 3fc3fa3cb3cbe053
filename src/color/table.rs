use heapless::Vec;

use crate::{
    color::{HueCurve, Rgb, hsv_to_rgb},
    error::ConfigError,
};

/// Precomputed rainbow colors
///
/// Holds `steps` entries sampled evenly through a [`HueCurve`] at a fixed
/// saturation and full value. `N` is the maximum number of steps.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTable<const N: usize> {
    colors: Vec<Rgb, N>,
    saturation: f32,
}

impl<const N: usize> ColorTable<N> {
    /// Build a table
    pub fn build(steps: usize, saturation: f32, curve: HueCurve) -> Result<Self, ConfigError> {
        if steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        if steps > N {
            return Err(ConfigError::StepsExceedCapacity {
                requested: steps,
                capacity: N,
            });
        }

        let saturation = saturation.clamp(0.0, 1.0);
        let mut colors = Vec::new();
        for i in 0..steps {
            let hue = curve.apply(i as f32 / steps as f32);
            // Capacity was checked above
            let _ = colors.push(hsv_to_rgb(hue, saturation, 1.0));
        }

        Ok(Self { colors, saturation })
    }

    /// Number of entries
    pub fn steps(&self) -> usize {
        self.colors.len()
    }

    pub const fn saturation(&self) -> f32 {
        self.saturation
    }

    /// Color at `index`, wrapping past the end
    #[inline]
    pub fn get(&self, index: usize) -> Rgb {
        self.colors[index % self.colors.len()]
    }

    pub fn as_slice(&self) -> &[Rgb] {
        &self.colors
    }
}
