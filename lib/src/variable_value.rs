//! Scalar values stored in the story's variable store.
use bladeink::value_type::ValueType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A story variable value, tagged with its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VariableValue {
    Int(i32),
    Float(f32),
    Str(String),
    Bool(bool),
}

/// The type of a [`VariableValue`], used in type mismatch reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum VariableKind {
    Int,
    Float,
    String,
    Bool,
}

impl VariableValue {
    pub fn kind(&self) -> VariableKind {
        match self {
            VariableValue::Int(_) => VariableKind::Int,
            VariableValue::Float(_) => VariableKind::Float,
            VariableValue::Str(_) => VariableKind::String,
            VariableValue::Bool(_) => VariableKind::Bool,
        }
    }

    /// Tries to extract the value as `T`, without any coercion.
    pub fn get<T: FromVariable>(&self) -> Option<T> {
        T::from_variable(self)
    }

    /// Converts the value to `kind` following ink's coercion rules: numbers
    /// and booleans convert into each other and anything converts to a
    /// string.
    pub fn coerce(&self, kind: VariableKind) -> Option<VariableValue> {
        match (self, kind) {
            (value, kind) if value.kind() == kind => Some(value.clone()),
            (VariableValue::Int(v), VariableKind::Float) => Some(VariableValue::Float(*v as f32)),
            (VariableValue::Float(v), VariableKind::Int) => Some(VariableValue::Int(*v as i32)),
            (VariableValue::Bool(v), VariableKind::Int) => Some(VariableValue::Int(i32::from(*v))),
            (VariableValue::Bool(v), VariableKind::Float) => {
                Some(VariableValue::Float(if *v { 1.0 } else { 0.0 }))
            }
            (VariableValue::Int(v), VariableKind::Bool) => Some(VariableValue::Bool(*v == 1)),
            (value, VariableKind::String) => Some(VariableValue::Str(value.to_string())),
            _ => None,
        }
    }

    /// Converts an engine value. Lists, divert targets and variable pointers
    /// have no scalar representation and yield `None`.
    pub(crate) fn from_ink(value: &ValueType) -> Option<Self> {
        match value {
            ValueType::Bool(v) => Some(VariableValue::Bool(*v)),
            ValueType::Int(v) => Some(VariableValue::Int(*v)),
            ValueType::Float(v) => Some(VariableValue::Float(*v)),
            ValueType::String(v) => Some(VariableValue::Str(v.string.clone())),
            _ => None,
        }
    }

    pub(crate) fn to_ink(&self) -> ValueType {
        match self {
            VariableValue::Int(v) => ValueType::from(*v),
            VariableValue::Float(v) => ValueType::from(*v),
            VariableValue::Str(v) => ValueType::from(v.as_str()),
            VariableValue::Bool(v) => ValueType::from(*v),
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableValue::Int(v) => write!(f, "{v}"),
            VariableValue::Float(v) => write!(f, "{v}"),
            VariableValue::Str(v) => write!(f, "{v}"),
            VariableValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<i32> for VariableValue {
    fn from(value: i32) -> Self {
        VariableValue::Int(value)
    }
}

impl From<f32> for VariableValue {
    fn from(value: f32) -> Self {
        VariableValue::Float(value)
    }
}

impl From<bool> for VariableValue {
    fn from(value: bool) -> Self {
        VariableValue::Bool(value)
    }
}

impl From<String> for VariableValue {
    fn from(value: String) -> Self {
        VariableValue::Str(value)
    }
}

impl From<&str> for VariableValue {
    fn from(value: &str) -> Self {
        VariableValue::Str(value.to_owned())
    }
}

/// Rust types a [`VariableValue`] can be read as.
pub trait FromVariable: Sized {
    const KIND: VariableKind;

    fn from_variable(value: &VariableValue) -> Option<Self>;
}

impl FromVariable for i32 {
    const KIND: VariableKind = VariableKind::Int;

    fn from_variable(value: &VariableValue) -> Option<Self> {
        match value {
            VariableValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromVariable for f32 {
    const KIND: VariableKind = VariableKind::Float;

    fn from_variable(value: &VariableValue) -> Option<Self> {
        match value {
            VariableValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromVariable for String {
    const KIND: VariableKind = VariableKind::String;

    fn from_variable(value: &VariableValue) -> Option<Self> {
        match value {
            VariableValue::Str(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromVariable for bool {
    const KIND: VariableKind = VariableKind::Bool;

    fn from_variable(value: &VariableValue) -> Option<Self> {
        match value {
            VariableValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}
