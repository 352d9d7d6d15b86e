//! Strip driver abstraction and the shared handle scenes operate on.
//!
//! Provides the [`Strip`] trait that hardware drivers implement, an in-memory
//! [`MemoryStrip`], and [`StripHandle`], the cloneable thread-safe handle that
//! carries a strip's claim flag.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use palette::Srgb;

use crate::colors::Rgb8;
use crate::types::{Channel, SceneError};

/// Trait for abstracting RGB strip hardware.
///
/// Implement this for your PWM driver. Intensities are duty cycles in the
/// range `0..=255`; pin setup, PWM frequency and range configuration are the
/// driver's own business and happen before the strip is handed to a scene.
pub trait Strip: Send + 'static {
    /// Returns the current intensity of one channel.
    fn channel(&self, channel: Channel) -> u8;

    /// Sets the intensity of one channel. Handle hardware errors internally;
    /// this method cannot fail.
    fn set_channel(&mut self, channel: Channel, value: u8);

    /// Returns the current color as a triple.
    fn color(&self) -> Rgb8 {
        Srgb::new(
            self.channel(Channel::Red),
            self.channel(Channel::Green),
            self.channel(Channel::Blue),
        )
    }

    /// Sets all three channels.
    fn set_color(&mut self, color: Rgb8) {
        self.set_channel(Channel::Red, color.red);
        self.set_channel(Channel::Green, color.green);
        self.set_channel(Channel::Blue, color.blue);
    }
}

/// A strip that only lives in memory.
///
/// Useful for simulations and for hosts without PWM hardware. Starts out
/// green, like a freshly initialized PWM strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryStrip {
    color: Rgb8,
}

impl MemoryStrip {
    pub fn new() -> Self {
        Self::with_color(crate::colors::GREEN)
    }

    pub fn with_color(color: Rgb8) -> Self {
        Self { color }
    }
}

impl Default for MemoryStrip {
    fn default() -> Self {
        Self::new()
    }
}

impl Strip for MemoryStrip {
    fn channel(&self, channel: Channel) -> u8 {
        match channel {
            Channel::Red => self.color.red,
            Channel::Green => self.color.green,
            Channel::Blue => self.color.blue,
        }
    }

    fn set_channel(&mut self, channel: Channel, value: u8) {
        match channel {
            Channel::Red => self.color.red = value,
            Channel::Green => self.color.green = value,
            Channel::Blue => self.color.blue = value,
        }
    }

    fn color(&self) -> Rgb8 {
        self.color
    }

    fn set_color(&mut self, color: Rgb8) {
        self.color = color;
    }
}

static NEXT_STRIP_ID: AtomicUsize = AtomicUsize::new(0);

struct StripCell<S> {
    id: usize,
    driver: Mutex<S>,
    claimed: AtomicBool,
}

/// Shared, thread-safe handle to a strip driver.
///
/// Clones refer to the same strip and share one claim flag, so a claim made
/// through any clone is visible through all of them. Writes through the
/// handle are refused while a scene holds the claim; the scene's worker is
/// then the only writer.
pub struct StripHandle<S: Strip> {
    cell: Arc<StripCell<S>>,
}

impl<S: Strip> StripHandle<S> {
    /// Wraps a driver. The strip starts out unclaimed.
    pub fn new(driver: S) -> Self {
        Self {
            cell: Arc::new(StripCell {
                id: NEXT_STRIP_ID.fetch_add(1, Ordering::Relaxed),
                driver: Mutex::new(driver),
                claimed: AtomicBool::new(false),
            }),
        }
    }

    /// Process-unique identity of the underlying strip.
    pub fn id(&self) -> usize {
        self.cell.id
    }

    /// Returns true if both handles point at the same strip.
    pub fn same_strip(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }

    /// Returns true while a scene holds the claim on this strip.
    pub fn is_claimed(&self) -> bool {
        self.cell.claimed.load(Ordering::Acquire)
    }

    pub fn color(&self) -> Rgb8 {
        self.driver().color()
    }

    /// Sets all three channels of an unclaimed strip.
    ///
    /// # Errors
    /// * `AlreadyClaimed` - a scene currently owns the strip
    pub fn set_color(&self, color: Rgb8) -> Result<(), SceneError> {
        self.ensure_unclaimed()?;
        self.driver().set_color(color);
        Ok(())
    }

    pub fn channel(&self, channel: Channel) -> u8 {
        self.driver().channel(channel)
    }

    /// Sets one channel of an unclaimed strip.
    ///
    /// # Errors
    /// * `AlreadyClaimed` - a scene currently owns the strip
    pub fn set_channel(&self, channel: Channel, value: u8) -> Result<(), SceneError> {
        self.ensure_unclaimed()?;
        self.driver().set_channel(channel, value);
        Ok(())
    }

    /// Runs `f` with shared access to the driver, e.g. to read driver-specific
    /// state.
    pub fn inspect<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let driver = self.driver();
        f(&*driver)
    }

    fn ensure_unclaimed(&self) -> Result<(), SceneError> {
        if self.is_claimed() {
            return Err(SceneError::AlreadyClaimed { strip: self.id() });
        }
        Ok(())
    }

    /// Runs `f` with exclusive access to the driver, bypassing the claim.
    /// Reserved for the claim holder's worker.
    pub(crate) fn with_driver<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut driver = self.driver();
        f(&mut *driver)
    }

    // A panic inside a tick must not wedge the strip for everyone else.
    fn driver(&self) -> MutexGuard<'_, S> {
        self.cell.driver.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn claimed_flag(&self) -> &AtomicBool {
        &self.cell.claimed
    }
}

impl<S: Strip> Clone for StripHandle<S> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<S: Strip> core::fmt::Debug for StripHandle<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StripHandle")
            .field("id", &self.cell.id)
            .field("claimed", &self.is_claimed())
            .finish()
    }
}
