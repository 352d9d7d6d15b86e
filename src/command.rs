//! Command-based control for scenes.

use crate::scene::{Animation, Scene};
use crate::strip::Strip;
use crate::types::SceneError;

/// Actions for controlling a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SceneAction {
    /// Start the step loop.
    Start,
    /// Request a stop without waiting.
    Stop,
    /// Stop and wait for the loop to exit.
    StopAndWait,
    /// Resume a stopped scene.
    Continue,
}

impl<S: Strip, A: Animation<S>> Scene<S, A> {
    /// Dispatches an action to the matching method.
    ///
    /// Convenient when actions arrive over a channel from another task.
    pub fn handle_action(&mut self, action: SceneAction) -> Result<(), SceneError> {
        match action {
            SceneAction::Start => self.start_play(),
            SceneAction::Stop => {
                self.stop();
                Ok(())
            }
            SceneAction::StopAndWait => {
                self.stop_and_wait();
                Ok(())
            }
            SceneAction::Continue => self.continue_scene(),
        }
    }
}
