//! Content produced by the runner while the story moves forward.
use serde::{Deserialize, Serialize};

/// One rendered unit of narrative, produced by a single continuation step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DialogueLine {
    /// The text of the line, without the trailing newline.
    pub text: String,
    /// Tags written with `#` in the ink source for this line, in order.
    pub tags: Vec<String>,
}

impl DialogueLine {
    pub fn new(text: impl Into<String>, tags: Vec<String>) -> Self {
        let mut text = text.into();

        if text.ends_with('\n') {
            text.pop();
        }

        Self { text, tags }
    }
}

/// A branch option of the current decision point.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DialogueChoice {
    /// Index assigned by the engine for the current choice set. This is the
    /// value to pass to [`choose`](crate::runner::DialogueRunner::choose).
    pub index: usize,
    /// The text presented to the player.
    pub text: String,
    pub tags: Vec<String>,
}

impl DialogueChoice {
    pub fn new(index: usize, text: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            index,
            text: text.into(),
            tags,
        }
    }
}
