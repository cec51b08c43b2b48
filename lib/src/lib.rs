//! A dialogue runner for [Ink](https://github.com/inkle/ink) stories.
//!
//! [`DialogueRunner`](runner::DialogueRunner) owns one compiled story at a
//! time and moves it forward line by line, surfacing choices, variables and
//! external functions to the host. The story itself is executed by a
//! [`StoryEngine`](engine::StoryEngine); [`InkStory`](ink_story::InkStory)
//! runs it with `bladeink`.

pub mod asset;
pub mod dialogue;
pub mod engine;
pub mod events;
pub mod factory;
pub mod ink_story;
pub mod runner;
pub mod runner_error;
pub mod variable_value;

pub use dialogue::{DialogueChoice, DialogueLine};
pub use events::{EventKind, RunnerEvent};
pub use factory::{LoadError, StoryFactory, StorySource};
pub use ink_story::InkStory;
pub use runner::{DialogueRunner, RunnerState};
pub use runner_error::{EngineError, RunnerError};
pub use variable_value::VariableValue;
