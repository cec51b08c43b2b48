//! [`StoryEngine`] implementation backed by the `bladeink` runtime.
use std::{cell::RefCell, collections::HashSet, rc::Rc};

use bladeink::{
    story::{
        errors::{ErrorHandler, ErrorType},
        external_functions::ExternalFunction,
        variable_observer::VariableObserver,
        Story,
    },
    value_type::ValueType,
};
use tracing::{debug, warn};

use crate::{
    dialogue::{DialogueChoice, DialogueLine},
    engine::{ErrorCallback, ExternalCallback, Severity, StoryEngine, VariableCallback},
    runner_error::EngineError,
    variable_value::VariableValue,
};

// The main weave is always the first element of the root container.
const START_PATH: &str = "0";

/// A compiled ink story, ready to be started by a
/// [`DialogueRunner`](crate::runner::DialogueRunner).
pub struct InkStory {
    story: Story,
    bound_functions: HashSet<String>,
}

impl InkStory {
    /// Constructs an `InkStory` out of a JSON string that was compiled with
    /// `inklecate`. A leading byte order mark is ignored.
    pub fn from_json(json_string: &str) -> Result<Self, EngineError> {
        let json_string = json_string.strip_prefix('\u{feff}').unwrap_or(json_string);
        let story = Story::new(json_string)?;

        Ok(Self {
            story,
            bound_functions: HashSet::new(),
        })
    }

    /// Lets the story call the ink fallback function of an `EXTERNAL` that
    /// has not been bound.
    pub fn set_allow_external_function_fallbacks(&mut self, allow: bool) {
        self.story.set_allow_external_function_fallbacks(allow);
    }

    /// The underlying `bladeink` story.
    pub fn inner(&self) -> &Story {
        &self.story
    }

    pub fn inner_mut(&mut self) -> &mut Story {
        &mut self.story
    }
}

impl StoryEngine for InkStory {
    fn can_continue(&self) -> bool {
        self.story.can_continue()
    }

    fn continue_one(&mut self) -> Result<DialogueLine, EngineError> {
        let text = self.story.cont()?;
        let tags = self.story.get_current_tags()?;

        Ok(DialogueLine::new(text, tags))
    }

    fn current_choices(&self) -> Vec<DialogueChoice> {
        self.story
            .get_current_choices()
            .iter()
            .map(|c| DialogueChoice::new(*c.index.borrow(), c.text.clone(), c.tags.clone()))
            .collect()
    }

    fn choose_choice(&mut self, index: usize) -> Result<(), EngineError> {
        Ok(self.story.choose_choice_index(index)?)
    }

    fn reset_state(&mut self) -> Result<(), EngineError> {
        Ok(self.story.reset_state()?)
    }

    fn go_to_start(&mut self) -> Result<(), EngineError> {
        Ok(self.story.choose_path_string(START_PATH, true, None)?)
    }

    fn has_variable(&self, name: &str) -> bool {
        self.story.get_variable(name).is_some()
    }

    fn variable(&self, name: &str) -> Option<VariableValue> {
        self.story
            .get_variable(name)
            .as_ref()
            .and_then(VariableValue::from_ink)
    }

    fn set_variable(&mut self, name: &str, value: VariableValue) -> Result<(), EngineError> {
        Ok(self.story.set_variable(name, &value.to_ink())?)
    }

    fn observe_variable(
        &mut self,
        name: &str,
        observer: VariableCallback,
    ) -> Result<(), EngineError> {
        let observer = Rc::new(RefCell::new(ObserverRelay(observer)));

        Ok(self.story.observe_variable(name, observer)?)
    }

    fn bind_external_function(
        &mut self,
        name: &str,
        function: ExternalCallback,
        lookahead_safe: bool,
    ) -> Result<(), EngineError> {
        // bladeink refuses to bind the same name twice
        if self.bound_functions.contains(name) {
            self.story.unbind_external_function(name)?;
        }

        let function = Rc::new(RefCell::new(FunctionRelay(function)));
        self.story
            .bind_external_function(name, function, lookahead_safe)?;
        self.bound_functions.insert(name.to_owned());

        Ok(())
    }

    fn save_state(&self) -> Result<String, EngineError> {
        Ok(self.story.save_state()?)
    }

    fn load_state(&mut self, json_state: &str) -> Result<(), EngineError> {
        Ok(self.story.load_state(json_state)?)
    }

    fn set_error_handler(&mut self, handler: ErrorCallback) {
        self.story
            .set_error_handler(Rc::new(RefCell::new(ErrorRelay(handler))));
    }
}

struct ErrorRelay(ErrorCallback);

impl ErrorHandler for ErrorRelay {
    fn error(&mut self, message: &str, error_type: ErrorType) {
        let severity = if error_type == ErrorType::Warning {
            Severity::Warning
        } else {
            Severity::Error
        };

        (self.0)(message, severity);
    }
}

struct ObserverRelay(VariableCallback);

impl VariableObserver for ObserverRelay {
    fn changed(&mut self, variable_name: &str, value: &ValueType) {
        match VariableValue::from_ink(value) {
            Some(value) => (self.0)(variable_name, &value),
            None => debug!(variable_name, "skipping change of a non scalar variable"),
        }
    }
}

struct FunctionRelay(ExternalCallback);

impl ExternalFunction for FunctionRelay {
    fn call(&mut self, func_name: &str, args: Vec<ValueType>) -> Option<ValueType> {
        let args: Option<Vec<VariableValue>> = args.iter().map(VariableValue::from_ink).collect();

        match args {
            Some(args) => (self.0)(&args).map(|value| value.to_ink()),
            None => {
                warn!("External function `{func_name}` was called with a non scalar argument.");
                None
            }
        }
    }
}
