use tracing::{debug, error, warn};

use crate::{
    engine::{Severity, StoryEngine},
    events::RunnerEvent,
    factory::StorySource,
    ink_story::InkStory,
    runner::DialogueRunner,
    runner_error::RunnerError,
};

/// # Lifecycle
/// Methods to start, stop, pause and restart the dialogue.
impl<E: StoryEngine> DialogueRunner<E> {
    /// Starts the dialogue with `story`.
    ///
    /// Only one story can be active at a time: if there is one already, this
    /// logs a warning and `story` is dropped. With `auto_advance` the first
    /// line (or choice set) is produced right away.
    pub fn start(&mut self, mut story: E, auto_advance: bool) {
        if self.active_story.is_some() {
            warn!("{}", RunnerError::AlreadyActive);
            return;
        }

        story.set_error_handler(Box::new(|message, severity| match severity {
            Severity::Warning => warn!("{message}"),
            Severity::Error => error!("{message}"),
        }));

        self.active_story = Some(story);
        self.clear_content();
        self.paused = false;
        debug!("dialogue started");
        self.emit(RunnerEvent::Started);

        if auto_advance {
            self.advance();
        }
    }

    /// Uses the same story, but resets all its data and starts at the
    /// beginning.
    pub fn reset(&mut self) {
        let Some(story) = self.active_story.as_mut() else {
            return;
        };

        if let Err(err) = story.reset_state() {
            self.report(&err.into());
            return;
        }

        self.paused = false;
        self.clear_content();
        debug!("dialogue restarted");
        self.emit(RunnerEvent::Restarted);
    }

    /// Keeps the story variables and visit counts but moves the dialogue back
    /// to the start.
    pub fn rewind_to_start(&mut self) {
        if self.active_story.is_none() {
            return;
        }

        self.clear_content();

        if let Some(Err(err)) = self.active_story.as_mut().map(|story| story.go_to_start()) {
            self.report(&err.into());
        }
    }

    /// Pauses the dialogue: [`advance`](DialogueRunner::advance) and
    /// [`choose`](DialogueRunner::choose) do nothing until resumed.
    pub fn pause(&mut self) {
        if self.active_story.is_none() || self.paused {
            return;
        }

        self.paused = true;
        self.emit(RunnerEvent::Paused);
    }

    pub fn resume(&mut self) {
        if self.active_story.is_none() || !self.paused {
            return;
        }

        self.paused = false;
        self.emit(RunnerEvent::Resumed);
    }

    /// Stops the dialogue and releases the active story. Observers get
    /// [`Stopped`](RunnerEvent::Stopped) while the story is still present.
    pub fn stop(&mut self) {
        if self.active_story.is_none() {
            return;
        }

        self.emit(RunnerEvent::Stopped);
        self.paused = false;
        self.active_story = None;
        self.clear_content();
        debug!("dialogue stopped");
    }
}

impl DialogueRunner<InkStory> {
    /// Builds a story from `source` with the runner's factory and starts it.
    ///
    /// Logs and does nothing when the source holds no story or can't be
    /// loaded.
    pub fn start_from<'a>(&mut self, source: impl Into<StorySource<'a>>, auto_advance: bool) {
        match self.factory().create_story(source) {
            Ok(Some(story)) => self.start(story, auto_advance),
            Ok(None) => warn!("The story source does not contain a story."),
            Err(err) => error!("Failed to load the story: {err}"),
        }
    }
}
