//! Frame scheduling and timing utilities.
//!
//! Runs the tick loop body: sample the knobs, render, write and flush the
//! strip. The caller is responsible for sleeping/waiting between frames.

use embassy_time::{Duration, Instant};

use crate::{AnalogSource, PixelSink, Renderer, effect::Effect};

/// Default target frame rate (60 FPS).
pub const DEFAULT_FPS: u64 = 60;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Portable frame scheduler that manages timing without async.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(renderer, knobs, strip);
///
/// loop {
///     let result = scheduler.tick(Instant::now());
///     sleep(result.sleep_duration);
/// }
/// ```
pub struct FrameScheduler<
    'a,
    E: Effect,
    A: AnalogSource,
    O: PixelSink,
    const MAX_LEDS: usize,
    const EVENTS: usize,
    const INPUTS: usize,
> {
    renderer: Renderer<'a, E, MAX_LEDS, EVENTS>,
    inputs: A,
    output: O,
    samples: [u16; INPUTS],
    next_frame: Instant,
    frame_duration: Duration,
}

impl<'a, E, A, O, const MAX_LEDS: usize, const EVENTS: usize, const INPUTS: usize>
    FrameScheduler<'a, E, A, O, MAX_LEDS, EVENTS, INPUTS>
where
    E: Effect,
    A: AnalogSource,
    O: PixelSink,
{
    /// Create a new frame scheduler.
    ///
    /// Uses `DEFAULT_FRAME_DURATION` (60 FPS) for frame timing.
    pub fn new(renderer: Renderer<'a, E, MAX_LEDS, EVENTS>, inputs: A, output: O) -> Self {
        Self::with_frame_duration(renderer, inputs, output, DEFAULT_FRAME_DURATION)
    }

    /// Create a new frame scheduler with custom frame duration.
    pub fn with_frame_duration(
        renderer: Renderer<'a, E, MAX_LEDS, EVENTS>,
        inputs: A,
        output: O,
        frame_duration: Duration,
    ) -> Self {
        Self {
            renderer,
            inputs,
            output,
            samples: [0; INPUTS],
            next_frame: Instant::from_millis(0),
            frame_duration,
        }
    }

    /// Process one frame and return timing information.
    ///
    /// 1. Applies drift correction if we've fallen too far behind
    /// 2. Samples the analog inputs
    /// 3. Renders the frame
    /// 4. Writes and flushes the strip
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        // More than two frames behind: drop the backlog instead of catching up
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        self.inputs.sample(&mut self.samples);
        let frame = self.renderer.render(now, &self.samples);
        self.output.write(frame);
        self.output.flush();

        self.next_frame += self.frame_duration;

        let sleep_duration = if self.next_frame > now {
            self.next_frame - now
        } else {
            Duration::from_millis(0)
        };

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
        }
    }

    /// Get a reference to the renderer.
    pub fn renderer(&self) -> &Renderer<'a, E, MAX_LEDS, EVENTS> {
        &self.renderer
    }

    /// Get a mutable reference to the renderer.
    pub fn renderer_mut(&mut self) -> &mut Renderer<'a, E, MAX_LEDS, EVENTS> {
        &mut self.renderer
    }
}
