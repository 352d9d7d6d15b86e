//! Core types shared by the strip, claim and scene modules.

/// Identifies one RGB channel of a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Red,
    Green,
    Blue,
}

/// Errors raised while constructing or controlling a scene.
///
/// All of these surface synchronously to the caller. Problems that arise
/// inside a running step loop are handled in the loop itself, since nothing
/// is there to observe them.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// The strip is already claimed by another live scene.
    ///
    /// Stop and dispose the existing scene before building a new one.
    #[error("strip {strip} is already part of a scene")]
    AlreadyClaimed {
        /// Identity of the contested strip.
        strip: usize,
    },

    /// A restart was requested while the previous step loop is still active.
    #[error("scene is still running; stop it and wait for the loop to exit first")]
    AlreadyRunning,

    /// Playback was requested on a stopped scene.
    ///
    /// Use `continue_scene` to clear the stop and resume.
    #[error("scene is stopped; call continue_scene to resume it")]
    Stopped,

    /// The worker thread for the step loop could not be spawned.
    #[error("failed to spawn scene worker thread")]
    Spawn(#[from] std::io::Error),
}
