//! Perceptual hue remapping
//!
//! LED hue response is not linear, so the color table samples hue through a
//! logistic curve pinned to (0, 0) and (1, 1). `a` shifts the bias toward
//! low or high hues, `b` sets the steepness:
//!
//! - `a = 0.5, b = 1`: close to linear
//! - `a = 3, b = 4`: biased toward red
//! - `a = 1, b = 4`: biased toward blue

use crate::error::ConfigError;

/// Logistic hue bias with pinned endpoints
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueBias {
    a: f32,
    b: f32,
    k: f32,
    offset: f32,
}

impl HueBias {
    /// Create a bias curve, rejecting parameters that make it undefined
    #[allow(clippy::float_cmp)]
    pub fn new(a: f32, b: f32) -> Result<Self, ConfigError> {
        if !a.is_finite() || !b.is_finite() || a == b || b == 0.0 {
            return Err(ConfigError::DegenerateHueBias);
        }

        let bias = Self::pinned(a, b);
        if !bias.k.is_finite() || !bias.offset.is_finite() {
            return Err(ConfigError::DegenerateHueBias);
        }
        Ok(bias)
    }

    fn pinned(a: f32, b: f32) -> Self {
        let ea = libm::expf(a);
        let eab = libm::expf(a - b);
        let k = (1.0 + ea) * (1.0 + eab) / (ea - eab);
        Self {
            a,
            b,
            k,
            offset: -k / (1.0 + ea),
        }
    }

    pub const fn a(&self) -> f32 {
        self.a
    }

    pub const fn b(&self) -> f32 {
        self.b
    }

    /// Remap `x` in `[0, 1]`
    #[inline]
    pub fn apply(&self, x: f32) -> f32 {
        self.k / (1.0 + libm::expf(self.a - self.b * x)) + self.offset
    }
}

impl Default for HueBias {
    /// Red-leaning bias used by the reference strips (`a = 3, b = 5`)
    fn default() -> Self {
        Self::pinned(3.0, 5.0)
    }
}

/// Hue sampling curve used when building a color table
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum HueCurve {
    /// Hue is sampled evenly
    #[default]
    Linear,
    /// Hue is sampled through a [`HueBias`]
    Biased(HueBias),
}

impl HueCurve {
    #[inline]
    pub fn apply(&self, x: f32) -> f32 {
        match self {
            Self::Linear => x,
            Self::Biased(bias) => bias.apply(x),
        }
    }
}

impl From<HueBias> for HueCurve {
    fn from(bias: HueBias) -> Self {
        Self::Biased(bias)
    }
}
