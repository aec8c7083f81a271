// Scalar elements read from a source model and their fallible conversions.
//
// A fitted model hands over loosely-typed elements (a frequency may arrive
// as 3, 3.0 or "3"). Each element is wrapped in a `Scalar` and converted to
// the container's type by one of the three functions below. Every function
// takes the element's location so a failure can say exactly where it was.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{CoercionError, Location, Target};

/// One loosely-typed element of a source model.
///
/// Deserializes from any JSON scalar. Non-negative integers land in
/// `UInt`, negative ones in `Int`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    UInt(u64),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::UInt(v) => write!(f, "{v}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Float(value as f64)
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Scalar::UInt(value)
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Scalar::UInt(value as u64)
    }
}

impl From<usize> for Scalar {
    fn from(value: usize) -> Self {
        Scalar::UInt(value as u64)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value as i64)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Scalar::Null, Into::into)
    }
}

fn fail(value: &Scalar, location: Location, target: Target) -> CoercionError {
    CoercionError {
        location,
        target,
        value: value.clone(),
    }
}

/// Convert an element to a vocabulary term.
///
/// Text is taken as-is and integers use their display form. Floats keep a
/// fractional part (`1.0`, not `1`) so they never collide with integer
/// terms. `Null` is not a term.
pub fn to_term(value: &Scalar, location: Location) -> Result<String, CoercionError> {
    match value {
        Scalar::Text(s) => Ok(s.clone()),
        Scalar::Bool(b) => Ok(b.to_string()),
        Scalar::UInt(v) => Ok(v.to_string()),
        Scalar::Int(v) => Ok(v.to_string()),
        Scalar::Float(v) => Ok(format!("{v:?}")),
        Scalar::Null => Err(fail(value, location, Target::Term)),
    }
}

/// Convert an element to a finite floating-point weight.
pub fn to_weight(value: &Scalar, location: Location) -> Result<f64, CoercionError> {
    let weight = match value {
        Scalar::Float(v) => *v,
        Scalar::UInt(v) => *v as f64,
        Scalar::Int(v) => *v as f64,
        Scalar::Bool(b) => f64::from(u8::from(*b)),
        Scalar::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| fail(value, location, Target::Weight))?,
        Scalar::Null => return Err(fail(value, location, Target::Weight)),
    };

    if weight.is_finite() {
        Ok(weight)
    } else {
        Err(fail(value, location, Target::Weight))
    }
}

/// Convert an element to a non-negative integer count.
///
/// Floats are truncated toward zero; text must spell an integer.
pub fn to_count(value: &Scalar, location: Location) -> Result<u64, CoercionError> {
    match value {
        Scalar::UInt(v) => Ok(*v),
        Scalar::Int(v) => u64::try_from(*v).map_err(|_| fail(value, location, Target::Count)),
        Scalar::Bool(b) => Ok(u64::from(*b)),
        Scalar::Float(v) if v.is_finite() && *v > -1.0 && *v <= u64::MAX as f64 => {
            Ok(v.trunc() as u64)
        }
        Scalar::Text(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| fail(value, location, Target::Count)),
        Scalar::Float(_) | Scalar::Null => Err(fail(value, location, Target::Count)),
    }
}
