//! Numeric helpers shared by the animator and the controllers

use crate::error::RootError;

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// Uses integer math for efficiency on embedded systems.
#[inline]
#[allow(clippy::cast_lossless)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Convert a unit value (0.0-1.0) to an 8-bit scale, clamping out-of-range input
#[inline]
pub fn unit_to_u8(value: f32) -> u8 {
    libm::roundf(value.clamp(0.0, 1.0) * 255.0) as u8
}

/// Logistic function `1 / (1 + e^-x)`
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + libm::expf(-x))
}

/// Fractional part, always in `[0, 1)`
#[inline]
pub fn fract(x: f32) -> f32 {
    x - libm::floorf(x)
}

/// Bisection search settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bisection {
    /// Maximum number of halvings
    pub iterations: u32,
    /// Interval half-width at which the midpoint is accepted
    pub tolerance: f32,
}

impl Default for Bisection {
    fn default() -> Self {
        Self {
            iterations: 100,
            tolerance: 1.0,
        }
    }
}

impl Bisection {
    /// Find `x` in `[a, b]` with `f(x) == 0`
    ///
    /// A root lying exactly on a bound is returned as is. Otherwise
    /// `f(a)` and `f(b)` must have opposite signs.
    #[allow(clippy::float_cmp)]
    pub fn solve<F>(&self, f: F, a: f32, b: f32) -> Result<f32, RootError>
    where
        F: Fn(f32) -> f32,
    {
        let (mut lo, mut hi) = if a <= b { (a, b) } else { (b, a) };
        let mut f_lo = f(lo);
        let f_hi = f(hi);

        if f_lo == 0.0 {
            return Ok(lo);
        }
        if f_hi == 0.0 {
            return Ok(hi);
        }
        if f_lo.is_nan() || f_hi.is_nan() || (f_lo < 0.0) == (f_hi < 0.0) {
            return Err(RootError::NoSignChange);
        }

        for _ in 0..self.iterations {
            let mid = lo + (hi - lo) / 2.0;
            let f_mid = f(mid);
            if f_mid == 0.0 || (hi - lo) / 2.0 <= self.tolerance {
                return Ok(mid);
            }
            if (f_lo < 0.0) == (f_mid < 0.0) {
                lo = mid;
                f_lo = f_mid;
            } else {
                hi = mid;
            }
        }

        Err(RootError::NotConverged)
    }
}
