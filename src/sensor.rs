//! Vibration sensing
//!
//! Counts samples that rise noticeably above a calibrated baseline within a
//! sliding window. The count is a cheap measure of how hard the sensor is
//! being shaken, used to spawn fireflies.

use heapless::HistoryBuffer;

/// Sliding-window outlier counter
///
/// `W` is the window length in samples.
#[derive(Debug, Clone)]
pub struct OutlierDetector<const W: usize> {
    threshold: f32,
    window: HistoryBuffer<bool, W>,
}

impl<const W: usize> OutlierDetector<W> {
    /// Calibrate from baseline samples
    ///
    /// The threshold sits `min_deviation` (a fraction, e.g. 0.06) above the
    /// baseline mean. An empty baseline puts the threshold at zero.
    pub fn calibrate<I>(baseline: I, min_deviation: f32) -> Self
    where
        I: IntoIterator<Item = u16>,
    {
        let (sum, count) = baseline
            .into_iter()
            .fold((0u64, 0u32), |(sum, count), sample| {
                (sum + u64::from(sample), count + 1)
            });
        let mean = if count == 0 {
            0.0
        } else {
            sum as f32 / count as f32
        };
        Self::with_threshold(mean + mean * min_deviation)
    }

    pub const fn with_threshold(threshold: f32) -> Self {
        Self {
            threshold,
            window: HistoryBuffer::new(),
        }
    }

    /// Record a sample, returning whether it is an outlier
    pub fn push(&mut self, sample: u16) -> bool {
        let outlier = f32::from(sample) > self.threshold;
        self.window.write(outlier);
        outlier
    }

    /// Outliers in the current window
    pub fn outliers(&self) -> usize {
        self.window.as_slice().iter().filter(|&&outlier| outlier).count()
    }

    /// Outliers above `min_outliers`, scaled so a full window gives 1.0
    ///
    /// Negative while below `min_outliers`.
    pub fn intensity(&self, min_outliers: usize) -> f32 {
        let span = W.saturating_sub(min_outliers).max(1) as f32;
        (self.outliers() as f32 - min_outliers as f32) / span
    }

    pub const fn threshold(&self) -> f32 {
        self.threshold
    }
}
