use std::{cell::RefCell, rc::Rc};

use tracing::{error, warn};

use crate::{
    engine::StoryEngine,
    runner::DialogueRunner,
    runner_error::RunnerError,
    variable_value::{FromVariable, VariableValue},
};

/// # Variables
/// Methods to read, write and observe the story's global variables.
impl<E: StoryEngine> DialogueRunner<E> {
    /// Overwrites the value of a declared global variable. The caller is
    /// responsible for matching the variable's type.
    ///
    /// Does nothing without an active story; logs a warning if the story
    /// doesn't declare `name`.
    pub fn set_variable(&mut self, name: &str, value: impl Into<VariableValue>) {
        if self.active_story.is_none() {
            return;
        }

        if let Err(err) = self.try_set_variable(name, value) {
            self.report(&err);
        }
    }

    pub fn try_set_variable(
        &mut self,
        name: &str,
        value: impl Into<VariableValue>,
    ) -> Result<(), RunnerError> {
        let story = self
            .active_story
            .as_mut()
            .ok_or(RunnerError::NoActiveStory)?;

        if !story.has_variable(name) {
            return Err(RunnerError::UnknownVariable(name.to_owned()));
        }

        story.set_variable(name, value.into())?;

        Ok(())
    }

    /// Reads a global variable as `T`.
    ///
    /// Returns the default value of `T` (`0`, `0.0`, `""` or `false`), and
    /// logs a warning, if there is no active story, the variable doesn't
    /// exist or it holds another type.
    pub fn variable<T: FromVariable + Default>(&self, name: &str) -> T {
        self.try_variable(name).unwrap_or_else(|err| {
            self.report(&err);
            T::default()
        })
    }

    pub fn try_variable<T: FromVariable>(&self, name: &str) -> Result<T, RunnerError> {
        let story = self
            .active_story
            .as_ref()
            .ok_or(RunnerError::NoActiveStory)?;

        let mismatch = || RunnerError::TypeMismatch {
            name: name.to_owned(),
            expected: T::KIND,
        };

        match story.variable(name) {
            Some(value) => T::from_variable(&value).ok_or_else(mismatch),
            // Declared, but not a scalar.
            None if story.has_variable(name) => Err(mismatch()),
            None => Err(RunnerError::UnknownVariable(name.to_owned())),
        }
    }

    /// The raw value of a global variable, whatever its type.
    pub fn variable_value(&self, name: &str) -> Option<VariableValue> {
        self.active_story.as_ref()?.variable(name)
    }

    /// Calls `on_change` with the variable name and its new value every time
    /// the story changes it, from ink logic or through
    /// [`set_variable`](DialogueRunner::set_variable).
    pub fn observe_variable(
        &mut self,
        name: &str,
        on_change: impl FnMut(&str, &VariableValue) + 'static,
    ) {
        let Some(story) = self.active_story.as_mut() else {
            return;
        };

        if !story.has_variable(name) {
            warn!("The active story can not observe the variable `{name}` because it doesn't exist.");
            return;
        }

        if let Err(err) = story.observe_variable(name, Box::new(on_change)) {
            error!("Failed to observe the variable `{name}`: {err}");
        }
    }

    /// Observes several variables with the same callback.
    pub fn observe_variables<I, S>(
        &mut self,
        names: I,
        on_change: impl FnMut(&str, &VariableValue) + 'static,
    ) where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(story) = self.active_story.as_mut() else {
            return;
        };

        let on_change = Rc::new(RefCell::new(on_change));

        for name in names {
            let name = name.as_ref();

            if !story.has_variable(name) {
                warn!("The active story can not observe the variable `{name}` because it doesn't exist.");
                continue;
            }

            let on_change = on_change.clone();
            let observer = Box::new(move |name: &str, value: &VariableValue| {
                (&mut *on_change.borrow_mut())(name, value)
            });

            if let Err(err) = story.observe_variable(name, observer) {
                error!("Failed to observe the variable `{name}`: {err}");
            }
        }
    }
}
