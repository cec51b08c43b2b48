//! The interface the runner needs from a story interpreter.
//!
//! [`InkStory`](crate::ink_story::InkStory) implements it on top of the
//! `bladeink` runtime. The runner never executes story content itself, it
//! only orchestrates an engine through this trait.
use crate::{
    dialogue::{DialogueChoice, DialogueLine},
    runner_error::EngineError,
    variable_value::VariableValue,
};

/// Called with the variable name and its new value.
pub type VariableCallback = Box<dyn FnMut(&str, &VariableValue)>;

/// Host function called by the story. Receives the call arguments in order
/// and optionally returns a value to the story.
pub type ExternalCallback = Box<dyn FnMut(&[VariableValue]) -> Option<VariableValue>>;

/// Receives the runtime errors and warnings of the story.
pub type ErrorCallback = Box<dyn FnMut(&str, Severity)>;

/// Severity of a message reported by the engine's error stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Severity {
    /// Problem that is not critical, but should be fixed.
    Warning,
    /// Critical error that can't be recovered from.
    Error,
}

/// A compiled story instance: graph, cursor and variable store.
pub trait StoryEngine {
    /// `true` while there is more linear content before the next decision
    /// point or the end.
    fn can_continue(&self) -> bool;

    /// Advances the story by one line.
    fn continue_one(&mut self) -> Result<DialogueLine, EngineError>;

    /// The choices pending at the current decision point, in engine order.
    fn current_choices(&self) -> Vec<DialogueChoice>;

    fn choose_choice(&mut self, index: usize) -> Result<(), EngineError>;

    /// Resets the whole execution state, as if the story was just loaded.
    fn reset_state(&mut self) -> Result<(), EngineError>;

    /// Moves the cursor to the start, keeping variables and visit counts.
    fn go_to_start(&mut self) -> Result<(), EngineError>;

    /// `true` if `name` is a declared global variable.
    fn has_variable(&self, name: &str) -> bool {
        self.variable(name).is_some()
    }

    fn variable(&self, name: &str) -> Option<VariableValue>;

    fn set_variable(&mut self, name: &str, value: VariableValue) -> Result<(), EngineError>;

    fn observe_variable(
        &mut self,
        name: &str,
        observer: VariableCallback,
    ) -> Result<(), EngineError>;

    /// Binds `function` to the `EXTERNAL` declaration `name`, replacing any
    /// previous binding for that name.
    fn bind_external_function(
        &mut self,
        name: &str,
        function: ExternalCallback,
        lookahead_safe: bool,
    ) -> Result<(), EngineError>;

    /// Serializes cursor, visit counts and variables to JSON.
    fn save_state(&self) -> Result<String, EngineError>;

    fn load_state(&mut self, json_state: &str) -> Result<(), EngineError>;

    fn set_error_handler(&mut self, handler: ErrorCallback);
}
