//! [`DialogueRunner`] drives a single story session.
use std::collections::VecDeque;

use tracing::{error, warn};

use crate::{
    dialogue::{DialogueChoice, DialogueLine},
    engine::StoryEngine,
    events::{EventKind, EventRegistry, ObserverToken, RunnerEvent},
    factory::StoryFactory,
    ink_story::InkStory,
    runner_error::RunnerError,
};

/// Observable status of a [`DialogueRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum RunnerState {
    /// No active story.
    Idle,
    /// A story is running.
    Active,
    /// A story is present but continuation is suspended.
    Paused,
}

/// A state machine that owns at most one story and moves it forward on
/// request, broadcasting what happens to its observers.
///
/// Misuse (advancing without a story, choosing out of range, unknown
/// variables...) never panics: it is logged as a warning and the call does
/// nothing.
///
/// ```no_run
/// use dialogue_runner::{events::{EventKind, RunnerEvent}, runner::DialogueRunner};
///
/// let json = std::fs::read_to_string("story.ink.json").unwrap();
/// let mut runner: DialogueRunner = DialogueRunner::new();
///
/// runner.subscribe(EventKind::NewLine, |runner, event| {
///     if let RunnerEvent::NewLine(line) = event {
///         println!("{}", line.text);
///         runner.advance();
///     }
/// });
///
/// runner.start_from(json.as_str(), true);
/// ```
pub struct DialogueRunner<E: StoryEngine = InkStory> {
    active_story: Option<E>,
    paused: bool,
    current_line: Option<DialogueLine>,
    current_choices: Vec<DialogueChoice>,
    factory: StoryFactory,
    events: EventRegistry<DialogueRunner<E>>,
    pending_events: VecDeque<RunnerEvent>,
    dispatching: bool,
}

impl<E: StoryEngine> Default for DialogueRunner<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: StoryEngine> DialogueRunner<E> {
    pub fn new() -> Self {
        Self::with_factory(StoryFactory::new())
    }

    /// Creates a runner that builds the stories of
    /// [`start_from`](DialogueRunner::start_from) with `factory`.
    pub fn with_factory(factory: StoryFactory) -> Self {
        Self {
            active_story: None,
            paused: false,
            current_line: None,
            current_choices: Vec::new(),
            factory,
            events: EventRegistry::new(),
            pending_events: VecDeque::new(),
            dispatching: false,
        }
    }

    pub fn factory(&self) -> &StoryFactory {
        &self.factory
    }

    pub fn state(&self) -> RunnerState {
        match (&self.active_story, self.paused) {
            (None, _) => RunnerState::Idle,
            (Some(_), false) => RunnerState::Active,
            (Some(_), true) => RunnerState::Paused,
        }
    }

    /// Whether there is an active story present.
    pub fn is_story_active(&self) -> bool {
        self.active_story.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The last line produced, unless a choice set or the end replaced it.
    pub fn current_line(&self) -> Option<&DialogueLine> {
        self.current_line.as_ref()
    }

    /// The last choice set produced, empty unless it is the current content.
    pub fn current_choices(&self) -> &[DialogueChoice] {
        &self.current_choices
    }

    pub fn story(&self) -> Option<&E> {
        self.active_story.as_ref()
    }

    pub fn story_mut(&mut self) -> Option<&mut E> {
        self.active_story.as_mut()
    }

    /// Registers `handler` for every event of `kind`.
    ///
    /// Handlers run synchronously, in registration order. A handler may call
    /// back into the runner; the events this causes are delivered once the
    /// handler returns.
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&mut DialogueRunner<E>, &RunnerEvent) + 'static,
    ) -> ObserverToken {
        self.events.subscribe(kind, handler)
    }

    pub fn unsubscribe(&mut self, token: ObserverToken) -> bool {
        self.events.unsubscribe(token)
    }

    /// Releases the story and every observer. Call it when the owner of the
    /// runner goes away; no [`Stopped`](RunnerEvent::Stopped) is fired.
    pub fn teardown(&mut self) {
        self.active_story = None;
        self.paused = false;
        self.clear_content();
        self.events.clear();
        self.pending_events.clear();
    }

    pub(crate) fn emit(&mut self, event: RunnerEvent) {
        self.pending_events.push_back(event);

        // The outer dispatch loop will deliver it.
        if self.dispatching {
            return;
        }

        self.dispatching = true;

        while let Some(event) = self.pending_events.pop_front() {
            for handler in self.events.handlers_for(EventKind::from(&event)) {
                (&mut *handler.borrow_mut())(self, &event);

                // Torn down by the handler.
                if self.events.is_empty() {
                    break;
                }
            }
        }

        self.dispatching = false;
    }

    pub(crate) fn clear_content(&mut self) {
        self.current_line = None;
        self.current_choices.clear();
    }

    pub(crate) fn report(&self, err: &RunnerError) {
        match err {
            RunnerError::Engine(_) => error!("{err}"),
            _ => warn!("{err}"),
        }
    }
}

mod external_functions;
mod lifecycle;
mod progress;
mod state;
mod variables;

pub use external_functions::IntoReturn;
