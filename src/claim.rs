//! Exclusive strip ownership.
//!
//! A [`StripClaim`] is the lock a scene holds on its strip. Claiming is a single
//! compare-and-swap on the strip's shared flag, so two scenes racing to claim
//! the same strip can never both succeed.

use std::sync::atomic::Ordering;

use tracing::debug;

use crate::strip::{Strip, StripHandle};
use crate::types::SceneError;

/// Proof that the holder is the only scene driving a strip.
///
/// Released explicitly with [`StripClaim::release`] or implicitly on drop.
#[derive(Debug)]
pub struct StripClaim<S: Strip> {
    strip: StripHandle<S>,
    held: bool,
}

impl<S: Strip> StripHandle<S> {
    /// Claims the strip for a scene.
    ///
    /// # Errors
    /// * `AlreadyClaimed` - another live claim exists on this strip
    pub fn try_claim(&self) -> Result<StripClaim<S>, SceneError> {
        self.claimed_flag()
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SceneError::AlreadyClaimed { strip: self.id() })?;

        debug!(strip = self.id(), "strip claimed");
        Ok(StripClaim {
            strip: self.clone(),
            held: true,
        })
    }
}

impl<S: Strip> StripClaim<S> {
    /// The claimed strip.
    pub fn strip(&self) -> &StripHandle<S> {
        &self.strip
    }

    /// Returns true until the claim is released.
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Gives the strip back. Calling this more than once is a no-op.
    pub fn release(&mut self) {
        if !self.held {
            return;
        }

        self.held = false;
        self.strip.claimed_flag().store(false, Ordering::Release);
        debug!(strip = self.strip.id(), "strip released");
    }
}

impl<S: Strip> Drop for StripClaim<S> {
    fn drop(&mut self) {
        self.release();
    }
}
