//! Errors reported by the [`DialogueRunner`](crate::runner::DialogueRunner)
//! and its story engine.
use bladeink::story_error::StoryError;
use thiserror::Error;

use crate::variable_value::VariableKind;

/// Failure reported by a [`StoryEngine`](crate::engine::StoryEngine).
#[derive(Debug, Error)]
pub enum EngineError {
    /// Error raised by the ink runtime.
    #[error(transparent)]
    Ink(#[from] StoryError),
    /// Error raised by any other engine implementation.
    #[error("story engine error: {0}")]
    Runtime(String),
}

/// Misuse of the runner. These are logged as warnings by the runner
/// operations and the operation does nothing; the `try_` variants return
/// them to the caller instead.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("DialogueRunner does not have an active story")]
    NoActiveStory,
    #[error("DialogueRunner already has an active story, stop it first")]
    AlreadyActive,
    #[error("DialogueRunner does not have any active choices to make")]
    NoActiveChoices,
    #[error("DialogueRunner only has `{count}` choices and is zero based, index `{index}` is out of range")]
    ChoiceOutOfRange { index: usize, count: usize },
    #[error("the active story does not contain the variable `{0}`")]
    UnknownVariable(String),
    #[error("variable `{name}` is not of type {expected}")]
    TypeMismatch { name: String, expected: VariableKind },
    #[error(transparent)]
    Engine(#[from] EngineError),
}
