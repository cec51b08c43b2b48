#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::HashMap,
    fmt, fs,
    path::Path,
    rc::Rc,
    sync::{Arc, Mutex},
};

use dialogue_runner::{
    engine::{ErrorCallback, ExternalCallback, Severity, StoryEngine, VariableCallback},
    DialogueChoice, DialogueLine, DialogueRunner, EngineError, EventKind, RunnerEvent,
    VariableValue,
};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{
    field::{Field, Visit},
    Event, Level, Subscriber,
};
use tracing_subscriber::{layer::Context, prelude::*, Layer};

/// One instruction of a [`ScriptedStory`].
#[derive(Debug, Clone)]
pub enum Step {
    Line(DialogueLine),
    /// Choice texts with the knot each one leads to.
    Choices(Vec<(String, usize)>),
    Set(String, VariableValue),
    /// Calls an external function, storing the result in a variable.
    Call {
        function: String,
        args: Vec<VariableValue>,
        into: Option<String>,
    },
    Report(String, Severity),
}

impl Step {
    pub fn line(text: &str, tags: &[&str]) -> Step {
        Step::Line(DialogueLine::new(
            text,
            tags.iter().map(|t| t.to_string()).collect(),
        ))
    }

    pub fn choices(options: &[(&str, usize)]) -> Step {
        Step::Choices(
            options
                .iter()
                .map(|(text, knot)| (text.to_string(), *knot))
                .collect(),
        )
    }

    pub fn set(name: &str, value: impl Into<VariableValue>) -> Step {
        Step::Set(name.to_owned(), value.into())
    }

    pub fn call(function: &str, args: Vec<VariableValue>, into: Option<&str>) -> Step {
        Step::Call {
            function: function.to_owned(),
            args,
            into: into.map(str::to_owned),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptState {
    pub knot: usize,
    pub step: usize,
    pub visits: HashMap<usize, u32>,
    pub variables: HashMap<String, VariableValue>,
}

/// An in-memory story engine made of knots of [`Step`]s. Every step that
/// is not a line or a choice point runs as part of the next continuation.
pub struct ScriptedStory {
    knots: Vec<Vec<Step>>,
    defaults: HashMap<String, VariableValue>,
    state: ScriptState,
    observers: HashMap<String, Vec<VariableCallback>>,
    externals: HashMap<String, (ExternalCallback, bool)>,
    error_handler: Option<ErrorCallback>,
}

impl ScriptedStory {
    pub fn new() -> Self {
        Self {
            knots: Vec::new(),
            defaults: HashMap::new(),
            state: ScriptState::default(),
            observers: HashMap::new(),
            externals: HashMap::new(),
            error_handler: None,
        }
    }

    pub fn knot(mut self, steps: Vec<Step>) -> Self {
        self.knots.push(steps);
        self
    }

    pub fn variable(mut self, name: &str, value: impl Into<VariableValue>) -> Self {
        let value = value.into();
        self.defaults.insert(name.to_owned(), value.clone());
        self.state.variables.insert(name.to_owned(), value);
        self
    }

    pub fn script_state(&self) -> &ScriptState {
        &self.state
    }

    pub fn lookahead_safe(&self, function: &str) -> Option<bool> {
        self.externals.get(function).map(|(_, safe)| *safe)
    }

    fn current_step(&self) -> Option<&Step> {
        self.knots
            .get(self.state.knot)
            .and_then(|knot| knot.get(self.state.step))
    }

    fn assign(&mut self, name: &str, value: VariableValue) {
        self.state.variables.insert(name.to_owned(), value.clone());

        if let Some(observers) = self.observers.get_mut(name) {
            for observer in observers.iter_mut() {
                observer(name, &value);
            }
        }
    }
}

impl StoryEngine for ScriptedStory {
    fn can_continue(&self) -> bool {
        !matches!(self.current_step(), None | Some(Step::Choices(_)))
    }

    fn continue_one(&mut self) -> Result<DialogueLine, EngineError> {
        while let Some(step) = self.current_step().cloned() {
            match step {
                Step::Choices(_) => break,
                Step::Line(line) => {
                    self.state.step += 1;
                    return Ok(line);
                }
                Step::Set(name, value) => self.assign(&name, value),
                Step::Call {
                    function,
                    args,
                    into,
                } => {
                    let (callback, _) = self.externals.get_mut(&function).ok_or_else(|| {
                        EngineError::Runtime(format!("function `{function}` is not bound"))
                    })?;

                    if let (Some(result), Some(into)) = (callback(&args), into) {
                        self.assign(&into, result);
                    }
                }
                Step::Report(message, severity) => {
                    if let Some(handler) = self.error_handler.as_mut() {
                        handler(&message, severity);
                    }
                }
            }

            self.state.step += 1;
        }

        Err(EngineError::Runtime(
            "can't continue, there is no more content".to_owned(),
        ))
    }

    fn current_choices(&self) -> Vec<DialogueChoice> {
        match self.current_step() {
            Some(Step::Choices(options)) => options
                .iter()
                .enumerate()
                .map(|(index, (text, _))| DialogueChoice::new(index, text.clone(), Vec::new()))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn choose_choice(&mut self, index: usize) -> Result<(), EngineError> {
        let target = match self.current_step() {
            Some(Step::Choices(options)) => options.get(index).map(|(_, knot)| *knot),
            _ => None,
        }
        .ok_or_else(|| EngineError::Runtime("choice out of range".to_owned()))?;

        *self.state.visits.entry(target).or_default() += 1;
        self.state.knot = target;
        self.state.step = 0;

        Ok(())
    }

    fn reset_state(&mut self) -> Result<(), EngineError> {
        self.state = ScriptState {
            variables: self.defaults.clone(),
            ..ScriptState::default()
        };

        Ok(())
    }

    fn go_to_start(&mut self) -> Result<(), EngineError> {
        self.state.knot = 0;
        self.state.step = 0;

        Ok(())
    }

    fn has_variable(&self, name: &str) -> bool {
        self.state.variables.contains_key(name)
    }

    fn variable(&self, name: &str) -> Option<VariableValue> {
        self.state.variables.get(name).cloned()
    }

    fn set_variable(&mut self, name: &str, value: VariableValue) -> Result<(), EngineError> {
        self.assign(name, value);

        Ok(())
    }

    fn observe_variable(
        &mut self,
        name: &str,
        observer: VariableCallback,
    ) -> Result<(), EngineError> {
        self.observers
            .entry(name.to_owned())
            .or_default()
            .push(observer);

        Ok(())
    }

    fn bind_external_function(
        &mut self,
        name: &str,
        function: ExternalCallback,
        lookahead_safe: bool,
    ) -> Result<(), EngineError> {
        self.externals
            .insert(name.to_owned(), (function, lookahead_safe));

        Ok(())
    }

    fn save_state(&self) -> Result<String, EngineError> {
        serde_json::to_string(&self.state).map_err(|err| EngineError::Runtime(err.to_string()))
    }

    fn load_state(&mut self, json_state: &str) -> Result<(), EngineError> {
        self.state =
            serde_json::from_str(json_state).map_err(|err| EngineError::Runtime(err.to_string()))?;

        Ok(())
    }

    fn set_error_handler(&mut self, handler: ErrorCallback) {
        self.error_handler = Some(handler);
    }
}

/// Two lines, then a choice between two knots that end with one line each.
pub fn crossroads() -> ScriptedStory {
    ScriptedStory::new()
        .variable("gold", 0)
        .variable("name", "Aldo")
        .knot(vec![
            Step::line("Hello", &["greeting"]),
            Step::line("You reach a crossroads.", &[]),
            Step::choices(&[("Go left", 1), ("Go right", 2)]),
        ])
        .knot(vec![Step::set("gold", 5), Step::line("Left.", &[])])
        .knot(vec![Step::line("Right.", &["right"])])
}

/// Records every event fired by `runner`.
pub fn record_events<E: StoryEngine>(runner: &mut DialogueRunner<E>) -> Rc<RefCell<Vec<RunnerEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));

    for kind in EventKind::iter() {
        let events = events.clone();
        runner.subscribe(kind, move |_, event| events.borrow_mut().push(event.clone()));
    }

    events
}

pub fn kinds(events: &Rc<RefCell<Vec<RunnerEvent>>>) -> Vec<EventKind> {
    events.borrow().iter().map(EventKind::from).collect()
}

/// Log records captured by [`capture_logs`].
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<(Level, String)>>>);

impl CapturedLogs {
    pub fn at(&self, level: Level) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.at(Level::WARN)
    }

    pub fn errors(&self) -> Vec<String> {
        self.at(Level::ERROR)
    }

    pub fn has_warning(&self, needle: &str) -> bool {
        self.warnings().iter().any(|message| message.contains(needle))
    }
}

impl<S: Subscriber> Layer<S> for CapturedLogs {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        self.0
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }
}

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

/// Runs `f` with a subscriber that keeps every log record.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, CapturedLogs) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::registry().with(logs.clone());
    let result = tracing::subscriber::with_default(subscriber, f);

    (result, logs)
}

pub fn get_json_string(filename: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(filename);

    fs::read_to_string(path).unwrap()
}

pub type ScriptedRunner = DialogueRunner<ScriptedStory>;
