use crate::{
    engine::StoryEngine, events::RunnerEvent, runner::DialogueRunner, runner_error::RunnerError,
};

/// # Story Progress
/// Methods to move the story forwards.
impl<E: StoryEngine> DialogueRunner<E> {
    /// Continues the dialogue to the next line, or to the choices once all
    /// the lines before them have been produced.
    ///
    /// Exactly one of [`NewLine`](RunnerEvent::NewLine),
    /// [`NewChoices`](RunnerEvent::NewChoices) or
    /// [`Ended`](RunnerEvent::Ended) is fired. Does nothing while paused.
    pub fn advance(&mut self) {
        if let Err(err) = self.try_advance() {
            self.report(&err);
        }
    }

    /// Like [`advance`](DialogueRunner::advance), returning the problem
    /// instead of logging it.
    pub fn try_advance(&mut self) -> Result<(), RunnerError> {
        if self.paused {
            return Ok(());
        }

        let story = self
            .active_story
            .as_mut()
            .ok_or(RunnerError::NoActiveStory)?;

        let event = if story.can_continue() {
            let line = story.continue_one()?;
            self.current_choices.clear();
            self.current_line = Some(line.clone());

            RunnerEvent::NewLine(line)
        } else {
            let choices = story.current_choices();

            if choices.is_empty() {
                self.clear_content();

                RunnerEvent::Ended
            } else {
                self.current_line = None;
                self.current_choices = choices.clone();

                RunnerEvent::NewChoices(choices)
            }
        };

        self.emit(event);

        Ok(())
    }

    /// Chooses the choice with `index` from the current choice set.
    /// With `auto_advance` the dialogue continues right after.
    ///
    /// Does nothing while paused. Logs a warning when there is no story, no
    /// pending choice, or `index` is out of range.
    pub fn choose(&mut self, index: usize, auto_advance: bool) {
        if let Err(err) = self.try_choose(index, auto_advance) {
            self.report(&err);
        }
    }

    pub fn try_choose(&mut self, index: usize, auto_advance: bool) -> Result<(), RunnerError> {
        if self.paused {
            return Ok(());
        }

        let story = self
            .active_story
            .as_mut()
            .ok_or(RunnerError::NoActiveStory)?;

        let count = story.current_choices().len();

        if count == 0 {
            return Err(RunnerError::NoActiveChoices);
        }

        if index >= count {
            return Err(RunnerError::ChoiceOutOfRange { index, count });
        }

        story.choose_choice(index)?;

        if auto_advance {
            self.try_advance()?;
        }

        Ok(())
    }
}
