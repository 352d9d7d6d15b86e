//! Shared test infrastructure for rgb-scenes integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::time::{Duration, Instant};

use rgb_scenes::{Channel, Rgb8, Srgb, Strip, StripHandle};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Mock Strip
// ============================================================================

/// Mock strip that records every color written to it
pub struct MockStrip {
    color: Rgb8,
    history: heapless::Vec<Rgb8, 1024>,
}

impl MockStrip {
    pub fn new(color: Rgb8) -> Self {
        Self {
            color,
            history: heapless::Vec::new(),
        }
    }

    pub fn history(&self) -> &[Rgb8] {
        &self.history
    }
}

impl Strip for MockStrip {
    fn channel(&self, channel: Channel) -> u8 {
        match channel {
            Channel::Red => self.color.red,
            Channel::Green => self.color.green,
            Channel::Blue => self.color.blue,
        }
    }

    fn set_channel(&mut self, channel: Channel, value: u8) {
        let mut color = self.color;
        match channel {
            Channel::Red => color.red = value,
            Channel::Green => color.green = value,
            Channel::Blue => color.blue = value,
        }
        self.set_color(color);
    }

    fn set_color(&mut self, color: Rgb8) {
        self.color = color;
        let _ = self.history.push(color);
    }
}

pub fn mock_strip(color: Rgb8) -> StripHandle<MockStrip> {
    init_tracing();
    StripHandle::new(MockStrip::new(color))
}

pub fn history(strip: &StripHandle<MockStrip>) -> Vec<Rgb8> {
    strip.inspect(|driver| driver.history().to_vec())
}

// ============================================================================
// Helpers
// ============================================================================

pub const RED: Rgb8 = Srgb::new(255, 0, 0);
pub const GREEN: Rgb8 = Srgb::new(0, 255, 0);
pub const BLUE: Rgb8 = Srgb::new(0, 0, 255);
pub const BLACK: Rgb8 = Srgb::new(0, 0, 0);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Polls `condition` until it holds or `timeout` passes.
pub fn eventually(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    condition()
}

pub fn within_one(a: Rgb8, b: Rgb8) -> bool {
    a.red.abs_diff(b.red) <= 1 && a.green.abs_diff(b.green) <= 1 && a.blue.abs_diff(b.blue) <= 1
}
