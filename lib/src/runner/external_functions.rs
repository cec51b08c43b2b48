use tracing::{error, warn};

use crate::{
    engine::StoryEngine,
    runner::DialogueRunner,
    variable_value::{FromVariable, VariableValue},
};

/// Values a bound function may hand back to the story.
pub trait IntoReturn {
    fn into_return(self) -> Option<VariableValue>;
}

impl IntoReturn for () {
    fn into_return(self) -> Option<VariableValue> {
        None
    }
}

impl IntoReturn for VariableValue {
    fn into_return(self) -> Option<VariableValue> {
        Some(self)
    }
}

impl IntoReturn for i32 {
    fn into_return(self) -> Option<VariableValue> {
        Some(self.into())
    }
}

impl IntoReturn for f32 {
    fn into_return(self) -> Option<VariableValue> {
        Some(self.into())
    }
}

impl IntoReturn for bool {
    fn into_return(self) -> Option<VariableValue> {
        Some(self.into())
    }
}

impl IntoReturn for String {
    fn into_return(self) -> Option<VariableValue> {
        Some(self.into())
    }
}

impl IntoReturn for &str {
    fn into_return(self) -> Option<VariableValue> {
        Some(self.into())
    }
}

impl<T: IntoReturn> IntoReturn for Option<T> {
    fn into_return(self) -> Option<VariableValue> {
        self.and_then(IntoReturn::into_return)
    }
}

/// Converts the argument at `position`, coercing numbers and booleans the
/// way ink does.
fn argument<T: FromVariable>(func_name: &str, args: &[VariableValue], position: usize) -> Option<T> {
    let converted = args
        .get(position)
        .and_then(|value| value.coerce(T::KIND))
        .and_then(|value| T::from_variable(&value));

    if converted.is_none() {
        warn!(
            "External function `{func_name}` expects a {} as argument {position}, got {:?}.",
            T::KIND,
            args.get(position)
        );
    }

    converted
}

fn check_arity(func_name: &str, args: &[VariableValue], arity: usize) -> Option<()> {
    if args.len() == arity {
        return Some(());
    }

    warn!(
        "External function `{func_name}` takes {arity} arguments but was called with {}.",
        args.len()
    );

    None
}

/// # External Functions
/// Methods to bind host functions to ink `EXTERNAL` declarations.
///
/// `lookahead_safe` tells the engine whether the function can be called
/// while it evaluates ahead of the current line. Only pass `true` for
/// functions without side effects.
impl<E: StoryEngine> DialogueRunner<E> {
    /// Binds a function taking the raw argument list. Binding a name again
    /// replaces the previous function.
    ///
    /// Does nothing without an active story.
    pub fn bind_function(
        &mut self,
        name: &str,
        function: impl FnMut(&[VariableValue]) -> Option<VariableValue> + 'static,
        lookahead_safe: bool,
    ) {
        let Some(story) = self.active_story.as_mut() else {
            return;
        };

        if let Err(err) = story.bind_external_function(name, Box::new(function), lookahead_safe) {
            error!("Failed to bind the external function `{name}`: {err}");
        }
    }

    pub fn bind_function0<R>(
        &mut self,
        name: &str,
        mut function: impl FnMut() -> R + 'static,
        lookahead_safe: bool,
    ) where
        R: IntoReturn,
    {
        let func_name = name.to_owned();
        self.bind_function(
            name,
            move |args| {
                check_arity(&func_name, args, 0)?;
                function().into_return()
            },
            lookahead_safe,
        );
    }

    pub fn bind_function1<A, R>(
        &mut self,
        name: &str,
        mut function: impl FnMut(A) -> R + 'static,
        lookahead_safe: bool,
    ) where
        A: FromVariable,
        R: IntoReturn,
    {
        let func_name = name.to_owned();
        self.bind_function(
            name,
            move |args| {
                check_arity(&func_name, args, 1)?;
                let a = argument(&func_name, args, 0)?;
                function(a).into_return()
            },
            lookahead_safe,
        );
    }

    pub fn bind_function2<A, B, R>(
        &mut self,
        name: &str,
        mut function: impl FnMut(A, B) -> R + 'static,
        lookahead_safe: bool,
    ) where
        A: FromVariable,
        B: FromVariable,
        R: IntoReturn,
    {
        let func_name = name.to_owned();
        self.bind_function(
            name,
            move |args| {
                check_arity(&func_name, args, 2)?;
                let a = argument(&func_name, args, 0)?;
                let b = argument(&func_name, args, 1)?;
                function(a, b).into_return()
            },
            lookahead_safe,
        );
    }

    pub fn bind_function3<A, B, C, R>(
        &mut self,
        name: &str,
        mut function: impl FnMut(A, B, C) -> R + 'static,
        lookahead_safe: bool,
    ) where
        A: FromVariable,
        B: FromVariable,
        C: FromVariable,
        R: IntoReturn,
    {
        let func_name = name.to_owned();
        self.bind_function(
            name,
            move |args| {
                check_arity(&func_name, args, 3)?;
                let a = argument(&func_name, args, 0)?;
                let b = argument(&func_name, args, 1)?;
                let c = argument(&func_name, args, 2)?;
                function(a, b, c).into_return()
            },
            lookahead_safe,
        );
    }

    pub fn bind_function4<A, B, C, D, R>(
        &mut self,
        name: &str,
        mut function: impl FnMut(A, B, C, D) -> R + 'static,
        lookahead_safe: bool,
    ) where
        A: FromVariable,
        B: FromVariable,
        C: FromVariable,
        D: FromVariable,
        R: IntoReturn,
    {
        let func_name = name.to_owned();
        self.bind_function(
            name,
            move |args| {
                check_arity(&func_name, args, 4)?;
                let a = argument(&func_name, args, 0)?;
                let b = argument(&func_name, args, 1)?;
                let c = argument(&func_name, args, 2)?;
                let d = argument(&func_name, args, 3)?;
                function(a, b, c, d).into_return()
            },
            lookahead_safe,
        );
    }
}
