use embassy_time::Instant;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::brightness::{Brightness, BrightnessConfig};
use crate::color::Rgb;
use crate::control::{ControlEvent, EventReceiver, ModeSequencer, Parameter, ParameterSink};
use crate::effect::Effect;
use crate::error::ConfigError;

/// Configuration for the renderer
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Number of pixels on the strip
    pub pixel_count: usize,
    pub brightness: BrightnessConfig,
    /// Color flashed over the whole strip for one frame after a button event
    pub feedback: Option<Rgb>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            pixel_count: 1,
            brightness: BrightnessConfig::default(),
            feedback: Some(Rgb {
                r: 63,
                g: 63,
                b: 63,
            }),
        }
    }
}

/// Routes controller values to the effect, brightness to the output stage
struct Targets<'s, E> {
    effect: &'s mut E,
    brightness: &'s mut Brightness,
}

impl<E: Effect> ParameterSink for Targets<'_, E> {
    fn apply(&mut self, parameter: Parameter, value: f32) {
        match parameter {
            Parameter::Brightness => self.brightness.set(value),
            _ => self.effect.apply(parameter, value),
        }
    }
}

/// Renderer - one tick of the animation
///
/// Owns the effect, the knob modes and the output stage. Call
/// [`Renderer::render`] once per tick with the latest analog samples.
pub struct Renderer<'a, E: Effect, const MAX_LEDS: usize, const EVENTS: usize> {
    // External dependencies and configuration
    events: EventReceiver<'a, EVENTS>,
    pixel_count: usize,
    feedback: Option<Rgb>,

    // Internal state
    effect: E,
    sequencer: ModeSequencer,
    brightness: Brightness,
    flash: bool,
    canvas: [Rgb; MAX_LEDS],
    frame: [Rgb; MAX_LEDS],
}

impl<'a, E: Effect, const MAX_LEDS: usize, const EVENTS: usize> Renderer<'a, E, MAX_LEDS, EVENTS> {
    /// Create a renderer
    ///
    /// Every controller's initial value is applied to the effect and the
    /// brightness before the first frame.
    pub fn new(
        events: EventReceiver<'a, EVENTS>,
        effect: E,
        sequencer: ModeSequencer,
        config: &RendererConfig,
    ) -> Result<Self, ConfigError> {
        if config.pixel_count == 0 || config.pixel_count > MAX_LEDS {
            return Err(ConfigError::InvalidPixelCount);
        }

        let mut renderer = Self {
            events,
            pixel_count: config.pixel_count,
            feedback: config.feedback,
            effect,
            sequencer,
            brightness: Brightness::new(&config.brightness)?,
            flash: false,
            canvas: [Rgb::default(); MAX_LEDS],
            frame: [Rgb::default(); MAX_LEDS],
        };
        renderer.sequencer.sync(&mut Targets {
            effect: &mut renderer.effect,
            brightness: &mut renderer.brightness,
        });
        Ok(renderer)
    }

    /// Process one frame
    ///
    /// Drains control events, feeds `samples` to the active controllers,
    /// renders the effect and applies overlays and brightness.
    pub fn render(&mut self, now: Instant, samples: &[u16]) -> &[Rgb] {
        self.process_events(now);

        self.sequencer.update(
            samples,
            now,
            &mut Targets {
                effect: &mut self.effect,
                brightness: &mut self.brightness,
            },
        );

        let count = self.pixel_count;
        self.effect.render(now, &mut self.canvas[..count]);

        let frame = &mut self.frame[..count];
        match self.feedback {
            Some(color) if self.flash => {
                frame.fill(color);
                self.flash = false;
            }
            _ => {
                frame.copy_from_slice(&self.canvas[..count]);
                self.sequencer.render_indicator(now, frame);
            }
        }
        self.brightness.apply(frame);

        frame
    }

    /// Process pending control events (non-blocking)
    fn process_events(&mut self, now: Instant) {
        while let Some(event) = self.events.try_receive() {
            #[cfg(feature = "esp32-log")]
            println!("[Renderer.process_events] {:?}", event);
            match event {
                ControlEvent::NextMode => {
                    self.sequencer.advance(now);
                }
                ControlEvent::Reset => {
                    self.effect.reset();
                    self.sequencer.reset(
                        now,
                        &mut Targets {
                            effect: &mut self.effect,
                            brightness: &mut self.brightness,
                        },
                    );
                }
                ControlEvent::CycleBrightness => {
                    self.brightness.cycle();
                }
            }
            self.flash = true;
        }
    }

    pub const fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    pub const fn effect(&self) -> &E {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut E {
        &mut self.effect
    }

    pub const fn sequencer(&self) -> &ModeSequencer {
        &self.sequencer
    }

    pub const fn brightness(&self) -> &Brightness {
        &self.brightness
    }
}
