use embassy_time::{Duration, Instant};

/// Default time a press blocks further presses
const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Turns a sampled button level into single clicks
///
/// A click is reported when the level is high and the previous click is at
/// least `debounce` old. Holding the button repeats the click once per
/// debounce period.
#[derive(Debug, Clone, Copy)]
pub struct ClickDebouncer {
    debounce: Duration,
    deadline: Instant,
}

impl Default for ClickDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl ClickDebouncer {
    pub const fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            deadline: Instant::from_millis(0),
        }
    }

    /// Sample the button level
    pub fn pressed(&mut self, level: bool, now: Instant) -> bool {
        if level && now > self.deadline {
            self.deadline = now + self.debounce;
            return true;
        }
        false
    }
}
