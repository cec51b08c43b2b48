use tracing::{error, warn};

use crate::{engine::StoryEngine, runner::DialogueRunner, runner_error::EngineError};

/// # State
/// Methods to save and restore the state of the active story.
impl<E: StoryEngine> DialogueRunner<E> {
    /// Saves the current state of the active story: position, visit counts
    /// and variables, in JSON format.
    ///
    /// Returns `None` (and logs) if there is no active story.
    pub fn save_state(&self) -> Option<String> {
        let Some(story) = self.active_story.as_ref() else {
            warn!("No active story found. Please call start() first before trying to get dialogue save state.");
            return None;
        };

        match story.save_state() {
            Ok(json_state) => Some(json_state),
            Err(err) => {
                error!("Failed to save the dialogue state: {err}");
                None
            }
        }
    }

    /// Loads a state previously returned by
    /// [`save_state`](DialogueRunner::save_state) into the active story.
    ///
    /// Without an active story this only logs a warning. A state the engine
    /// can't read is returned as an error.
    pub fn load_save_state(&mut self, json_state: &str) -> Result<(), EngineError> {
        let Some(story) = self.active_story.as_mut() else {
            warn!("No active story found. Please call start() first before trying to load dialogue save state.");
            return Ok(());
        };

        story.load_state(json_state)
    }
}
