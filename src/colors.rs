//! Color helpers for 8-bit RGB strips.
//!
//! Strips work in whole PWM duty-cycle units (`0..=255` per channel), so every
//! color that reaches a driver is an [`Rgb8`]. Animations that need fractional
//! precision keep their own `Srgb<f32>` state and quantize through
//! [`quantize_ceil`] before writing.

use palette::Srgb;

/// An 8-bit RGB triple as written to a strip.
pub type Rgb8 = Srgb<u8>;

pub const BLACK: Rgb8 = Srgb::new(0, 0, 0);
pub const WHITE: Rgb8 = Srgb::new(255, 255, 255);
pub const RED: Rgb8 = Srgb::new(255, 0, 0);
pub const GREEN: Rgb8 = Srgb::new(0, 255, 0);
pub const BLUE: Rgb8 = Srgb::new(0, 0, 255);

/// Highest intensity a channel can take.
pub const CHANNEL_MAX: u8 = u8::MAX;

/// Offsets a channel value by a signed delta, saturating at `0` and `255`.
#[inline]
pub fn offset_channel(value: u8, delta: i16) -> u8 {
    (i16::from(value) + delta).clamp(0, i16::from(CHANNEL_MAX)) as u8
}

/// Rounds a real-valued channel up and clamps it into `0..=255`.
#[inline]
pub fn quantize_ceil(value: f32) -> u8 {
    value.ceil().clamp(0.0, f32::from(CHANNEL_MAX)) as u8
}

/// Absolute per-channel distance between two colors.
#[inline]
pub fn channel_distances(a: Rgb8, b: Rgb8) -> [u8; 3] {
    [
        a.red.abs_diff(b.red),
        a.green.abs_diff(b.green),
        a.blue.abs_diff(b.blue),
    ]
}

/// Widens an 8-bit color into real-valued channels without normalizing.
#[inline]
pub fn to_real(color: Rgb8) -> Srgb<f32> {
    Srgb::new(
        f32::from(color.red),
        f32::from(color.green),
        f32::from(color.blue),
    )
}
