#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Strip`**: Trait to implement for your PWM strip driver
//! - **`StripHandle`**: Shared, thread-safe handle to one strip and its claim flag
//! - **`StripClaim`**: Exclusive ownership of a strip, held by a scene
//! - **`Animation`**: Step logic of a scene (one tick plus a continuation check)
//! - **`Scene`**: Runs an animation on its own thread against a claimed strip
//! - **`FadeToColor`**: Linear fade from the strip's current color to a target
//! - **`CycleFade`**: Endless hue rotation through the color wheel
//! - **`SceneAction`**: Commands that can be sent to control scenes
//!
//! Colors are 8-bit `Srgb<u8>` triples ([`Rgb8`]), matching the `0..=255` duty
//! cycle range of the underlying PWM channels.

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub mod claim;
pub mod colors;
pub mod command;
pub mod cycle;
pub mod fade;
pub mod scene;
pub mod strip;
pub mod time;
pub mod types;

pub use claim::StripClaim;
pub use colors::Rgb8;
pub use command::SceneAction;
pub use cycle::{CycleFade, Stage};
pub use fade::FadeToColor;
pub use scene::{Animation, Scene};
pub use strip::{MemoryStrip, Strip, StripHandle};
pub use time::StopSignal;
pub use types::{Channel, SceneError};
