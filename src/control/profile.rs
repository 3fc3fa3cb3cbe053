const PROFILE_NAME_LINEAR: &str = "linear";
const PROFILE_NAME_QUADRATIC: &str = "quadratic";
const PROFILE_NAME_CUBIC: &str = "cubic";
const PROFILE_NAME_SYMMETRIC_CUBIC: &str = "symmetric_cubic";
const PROFILE_NAME_SYMMETRIC_FIFTH: &str = "symmetric_fifth";

/// Monotonic shaping applied to a normalized knob position
///
/// Symmetric profiles flatten the response around the center, giving fine
/// control near the midpoint (e.g. near zero speed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseProfile {
    #[default]
    Linear,
    Quadratic,
    Cubic,
    SymmetricCubic,
    SymmetricFifth,
}

impl ResponseProfile {
    /// Shape `u` in `[0, 1]`
    #[inline]
    pub fn apply(self, u: f32) -> f32 {
        match self {
            Self::Linear => u,
            Self::Quadratic => u * u,
            Self::Cubic => u * u * u,
            Self::SymmetricCubic => {
                let c = 2.0 * u - 1.0;
                (c * c * c + 1.0) / 2.0
            }
            Self::SymmetricFifth => {
                let c = 2.0 * u - 1.0;
                let c2 = c * c;
                (c2 * c2 * c + 1.0) / 2.0
            }
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => PROFILE_NAME_LINEAR,
            Self::Quadratic => PROFILE_NAME_QUADRATIC,
            Self::Cubic => PROFILE_NAME_CUBIC,
            Self::SymmetricCubic => PROFILE_NAME_SYMMETRIC_CUBIC,
            Self::SymmetricFifth => PROFILE_NAME_SYMMETRIC_FIFTH,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            PROFILE_NAME_LINEAR => Some(Self::Linear),
            PROFILE_NAME_QUADRATIC => Some(Self::Quadratic),
            PROFILE_NAME_CUBIC => Some(Self::Cubic),
            PROFILE_NAME_SYMMETRIC_CUBIC => Some(Self::SymmetricCubic),
            PROFILE_NAME_SYMMETRIC_FIFTH => Some(Self::SymmetricFifth),
            _ => None,
        }
    }
}
