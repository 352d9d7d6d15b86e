//! Endless hue rotation around the RGB color wheel.

use std::time::Duration;

use palette::Srgb;
use tracing::trace;

use crate::colors::{CHANNEL_MAX, Rgb8, offset_channel};
use crate::scene::{Animation, Scene};
use crate::strip::{Strip, StripHandle};
use crate::types::SceneError;

/// Delay between two ticks unless configured otherwise.
pub const DEFAULT_CYCLE_INTERVAL: Duration = Duration::from_millis(300);

/// The pair of channels currently ramping in opposite directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    /// Red falls while green rises.
    RedToGreen,
    /// Green falls while blue rises.
    GreenToBlue,
    /// Blue falls while red rises.
    BlueToRed,
}

impl Stage {
    /// Per-tick change applied to (red, green, blue).
    pub fn delta(self) -> [i16; 3] {
        match self {
            Stage::RedToGreen => [-1, 1, 0],
            Stage::GreenToBlue => [0, -1, 1],
            Stage::BlueToRed => [1, 0, -1],
        }
    }

    pub fn next(self) -> Self {
        match self {
            Stage::RedToGreen => Stage::GreenToBlue,
            Stage::GreenToBlue => Stage::BlueToRed,
            Stage::BlueToRed => Stage::RedToGreen,
        }
    }

    /// Returns true once the falling channel is empty or the rising one full.
    fn is_exhausted(self, color: Rgb8) -> bool {
        let (falling, rising) = match self {
            Stage::RedToGreen => (color.red, color.green),
            Stage::GreenToBlue => (color.green, color.blue),
            Stage::BlueToRed => (color.blue, color.red),
        };
        falling == 0 || rising == CHANNEL_MAX
    }

    fn apply(self, color: Rgb8) -> Rgb8 {
        let [red, green, blue] = self.delta();
        Srgb::new(
            offset_channel(color.red, red),
            offset_channel(color.green, green),
            offset_channel(color.blue, blue),
        )
    }
}

/// Rotates the strip's hue one unit per tick, forever.
///
/// Runs until the scene is stopped. Starting from a pure primary, one full
/// turn takes 765 ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleFade {
    stage: Stage,
    interval: Duration,
}

impl CycleFade {
    pub fn new() -> Self {
        Self {
            stage: Stage::RedToGreen,
            interval: DEFAULT_CYCLE_INTERVAL,
        }
    }

    /// Sets the delay between two ticks.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Claims `strip` and starts cycling from whatever color it shows.
    ///
    /// # Errors
    /// * `AlreadyClaimed` - another live scene owns the strip
    pub fn scene<S: Strip>(strip: &StripHandle<S>) -> Result<Scene<S, Self>, SceneError> {
        Scene::new(strip, |_| Self::new())
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Computes the next color, switching stage first if the current one is
    /// exhausted. At most one stage switch happens per call.
    pub fn advance(&mut self, color: Rgb8) -> Rgb8 {
        if self.stage.is_exhausted(color) {
            let next = self.stage.next();
            trace!(from = ?self.stage, to = ?next, "cycle stage switch");
            self.stage = next;
        }

        self.stage.apply(color)
    }
}

impl Default for CycleFade {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Strip> Animation<S> for CycleFade {
    fn tick(&mut self, strip: &mut S) -> Duration {
        let color = self.advance(strip.color());
        strip.set_color(color);
        self.interval
    }
}
