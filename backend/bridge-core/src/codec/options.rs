use serde::{Deserialize, Serialize};

use std::fmt;

/// One encoder option as the frontend sends it.
///
/// The option maps mix booleans, integers and floats, and several flags that
/// are booleans in the UI arrive as 0/1 integers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl Default for OptionValue {
    fn default() -> Self {
        OptionValue::Int(0)
    }
}

impl OptionValue {
    pub fn is_set(self) -> bool {
        match self {
            OptionValue::Bool(b) => b,
            OptionValue::Int(i) => i != 0,
            OptionValue::Float(f) => f != 0.0,
        }
    }

    pub fn as_i64(self) -> i64 {
        match self {
            OptionValue::Bool(b) => i64::from(b),
            OptionValue::Int(i) => i,
            OptionValue::Float(f) => f as i64,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            OptionValue::Bool(b) => f64::from(u8::from(b)),
            OptionValue::Int(i) => i as f64,
            OptionValue::Float(f) => f,
        }
    }

    /// Element of `choices` selected by this value, if in range.
    pub fn pick<'a>(self, choices: &[&'a str]) -> Option<&'a str> {
        usize::try_from(self.as_i64())
            .ok()
            .and_then(|index| choices.get(index).copied())
    }
}

/// Command-line rendering: booleans become `1`/`0`, whole floats keep a `.0`.
impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            OptionValue::Bool(b) => write!(f, "{}", u8::from(b)),
            OptionValue::Int(i) => write!(f, "{i}"),
            OptionValue::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 => {
                write!(f, "{x:.1}")
            }
            OptionValue::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Float(value)
    }
}
