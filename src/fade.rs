//! Linear fade from a strip's current color to a target color.

use std::time::Duration;

use palette::Srgb;
use tracing::trace;

use crate::colors::{Rgb8, channel_distances, quantize_ceil, to_real};
use crate::scene::{Animation, Scene};
use crate::strip::{Strip, StripHandle};
use crate::types::SceneError;

/// Total time a fade takes unless configured otherwise.
pub const DEFAULT_FADE_DURATION: Duration = Duration::from_millis(500);

/// Fades every channel linearly from a start color to a target color.
///
/// The fade takes as many ticks as the largest channel distance, so the
/// channel that has the furthest to go moves by exactly one unit per tick and
/// the others move proportionally slower. Intermediate values are rounded up
/// before they are written; the last tick writes the exact target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeToColor {
    start: Rgb8,
    target: Rgb8,
    delta: Srgb<f32>,
    current: Srgb<f32>,
    steps: u32,
    remaining: u32,
    duration: Duration,
}

impl FadeToColor {
    /// Plans a fade from `start` to `target`.
    ///
    /// A fade whose start equals its target has zero steps and finishes
    /// without touching the strip.
    pub fn new(start: Rgb8, target: Rgb8) -> Self {
        let steps = channel_distances(start, target)
            .into_iter()
            .max()
            .map_or(0, u32::from);

        let delta = if steps == 0 {
            Srgb::new(0.0, 0.0, 0.0)
        } else {
            let (from, to, n) = (to_real(start), to_real(target), steps as f32);
            Srgb::new(
                (to.red - from.red) / n,
                (to.green - from.green) / n,
                (to.blue - from.blue) / n,
            )
        };

        Self {
            start,
            target,
            delta,
            current: to_real(start),
            steps,
            remaining: steps,
            duration: DEFAULT_FADE_DURATION,
        }
    }

    /// Sets the total time the fade should take.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Claims `strip` and plans a fade from its current color to `target`.
    ///
    /// # Errors
    /// * `AlreadyClaimed` - another live scene owns the strip
    pub fn scene<S: Strip>(
        strip: &StripHandle<S>,
        target: Rgb8,
    ) -> Result<Scene<S, Self>, SceneError> {
        Scene::new(strip, |start| Self::new(start, target))
    }

    pub fn start(&self) -> Rgb8 {
        self.start
    }

    pub fn target(&self) -> Rgb8 {
        self.target
    }

    /// Number of ticks the whole fade takes.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Ticks left before the fade is complete.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Per-tick change of each channel.
    pub fn delta(&self) -> Srgb<f32> {
        self.delta
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Delay between two ticks.
    pub fn tick_interval(&self) -> Duration {
        if self.steps == 0 {
            Duration::ZERO
        } else {
            self.duration / self.steps
        }
    }

    fn advance(&mut self) -> Rgb8 {
        self.remaining -= 1;

        // Accumulated rounding error would otherwise leave us one unit off.
        if self.remaining == 0 {
            self.current = to_real(self.target);
            return self.target;
        }

        self.current = Srgb::new(
            self.current.red + self.delta.red,
            self.current.green + self.delta.green,
            self.current.blue + self.delta.blue,
        );
        Srgb::new(
            quantize_ceil(self.current.red),
            quantize_ceil(self.current.green),
            quantize_ceil(self.current.blue),
        )
    }
}

impl<S: Strip> Animation<S> for FadeToColor {
    fn keep_running(&self) -> bool {
        self.remaining > 0
    }

    fn tick(&mut self, strip: &mut S) -> Duration {
        if self.is_complete() {
            return Duration::ZERO;
        }

        let color = self.advance();
        strip.set_color(color);
        trace!(?color, remaining = self.remaining, "fade tick");

        self.tick_interval()
    }
}
