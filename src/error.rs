//! Error types
//!
//! Configuration errors are fatal at startup. Root-finding and lock errors
//! are recoverable: the caller keeps its last good state.

use core::fmt;

/// Invalid static configuration, rejected at construction time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Hue bias parameters make the curve undefined
    DegenerateHueBias,
    /// Raw input range is empty or inverted
    EmptyRawRange,
    /// Output range is inverted or not finite
    InvalidOutputRange,
    /// Color table needs at least one step
    ZeroSteps,
    /// Requested steps exceed the table capacity
    StepsExceedCapacity { requested: usize, capacity: usize },
    /// Pixel count is zero or exceeds the frame buffer
    InvalidPixelCount,
    /// Moving-average window is zero or too large
    InvalidWindow,
    /// Too many modes, controllers or brightness steps
    CapacityExceeded,
    /// A mode sequencer needs at least one mode
    NoModes,
    /// Brightness needs at least one step
    NoBrightnessSteps,
    /// Initial value cannot be produced by the controller transform
    UnreachableInitialValue,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateHueBias => {
                write!(f, "hue bias requires finite a != b and b != 0")
            }
            Self::EmptyRawRange => write!(f, "raw_max must be greater than raw_min"),
            Self::InvalidOutputRange => {
                write!(f, "output range must be finite with min <= max")
            }
            Self::ZeroSteps => write!(f, "color table must have at least one step"),
            Self::StepsExceedCapacity {
                requested,
                capacity,
            } => write!(
                f,
                "{} color steps requested, table holds at most {}",
                requested, capacity
            ),
            Self::InvalidPixelCount => {
                write!(f, "pixel count must be between 1 and the frame capacity")
            }
            Self::InvalidWindow => write!(f, "moving-average window out of range"),
            Self::CapacityExceeded => write!(f, "capacity exceeded"),
            Self::NoModes => write!(f, "at least one mode is required"),
            Self::NoBrightnessSteps => write!(f, "at least one brightness step is required"),
            Self::UnreachableInitialValue => {
                write!(f, "initial value is outside the controller output range")
            }
        }
    }
}

/// Bisection failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootError {
    /// `f(a)` and `f(b)` have the same sign
    NoSignChange,
    /// Iteration budget exhausted before reaching the tolerance
    NotConverged,
}

impl fmt::Display for RootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSignChange => write!(f, "search bounds do not bracket a root"),
            Self::NotConverged => write!(f, "bisection did not converge"),
        }
    }
}

/// A controller could not be locked at the requested value
///
/// The controller keeps its previous virtual position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockError(pub RootError);

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lock target unreachable: {}", self.0)
    }
}

impl From<RootError> for LockError {
    fn from(err: RootError) -> Self {
        Self(err)
    }
}
