//! Conversions between the boxed calling convention and native member
//! representations.
//!
//! Scalar conversion never fails: an absent argument or one of an
//! incompatible dynamic kind degrades to the scalar's zero value, and
//! numeric kinds convert freely between each other. Reference conversion
//! passes the value through a cast that degrades to null on a tag
//! mismatch. Callers that need strictness must impose it themselves.

use crate::signature::{Scalar, TypeSig};
use crate::value::Value;

impl Value {
    /// Boolean content; `false` unless this is a [`Value::Bool`].
    pub fn as_bool(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    /// Character content; `'\0'` unless this is a [`Value::Char`].
    pub fn as_char(&self) -> char {
        match self {
            Value::Char(c) => *c,
            _ => '\0',
        }
    }

    /// Numeric content as a byte; zero for non-numeric values.
    pub fn as_byte(&self) -> i8 {
        self.as_long() as i8
    }

    /// Numeric content as a short; zero for non-numeric values.
    pub fn as_short(&self) -> i16 {
        self.as_long() as i16
    }

    /// Numeric content as an int; zero for non-numeric values.
    pub fn as_int(&self) -> i32 {
        match self {
            Value::Float(f) => *f as i32,
            Value::Double(d) => *d as i32,
            other => other.as_long() as i32,
        }
    }

    /// Numeric content as a long; zero for non-numeric values.
    pub fn as_long(&self) -> i64 {
        match self {
            Value::Byte(b) => *b as i64,
            Value::Short(s) => *s as i64,
            Value::Int(i) => *i as i64,
            Value::Long(l) => *l,
            Value::Float(f) => *f as i64,
            Value::Double(d) => *d as i64,
            _ => 0,
        }
    }

    /// Numeric content as a float; zero for non-numeric values.
    pub fn as_float(&self) -> f32 {
        self.as_double() as f32
    }

    /// Numeric content as a double; zero for non-numeric values.
    pub fn as_double(&self) -> f64 {
        match self {
            Value::Byte(b) => *b as f64,
            Value::Short(s) => *s as f64,
            Value::Int(i) => *i as f64,
            Value::Long(l) => *l as f64,
            Value::Float(f) => *f as f64,
            Value::Double(d) => *d,
            _ => 0.0,
        }
    }
}

/// Conform a positional argument to a native parameter signature.
///
/// Total: scalars degrade to their zero value, references degrade to null
/// when the tag does not match, arrays pass through unchanged.
pub fn conform_argument(sig: &TypeSig, value: Option<&Value>) -> Value {
    match sig {
        TypeSig::Void => Value::Null,
        TypeSig::Primitive(scalar) => conform_scalar(*scalar, value),
        TypeSig::Reference(name) => safe_cast(name, value),
        TypeSig::Array { .. } => value.cloned().unwrap_or(Value::Null),
    }
}

/// Conform an operation result to the operation's declared return signature.
///
/// A void return swallows the value; everything else follows the same
/// policy as [`conform_argument`].
pub fn conform_return(sig: &TypeSig, value: Value) -> Value {
    match sig {
        TypeSig::Void => Value::Null,
        TypeSig::Primitive(scalar) => conform_scalar(*scalar, Some(&value)),
        TypeSig::Reference(name) => safe_cast(name, Some(&value)),
        TypeSig::Array { .. } => value,
    }
}

fn conform_scalar(kind: Scalar, value: Option<&Value>) -> Value {
    let v = value.unwrap_or(&Value::Null);
    match kind {
        Scalar::Boolean => Value::Bool(v.as_bool()),
        Scalar::Char => Value::Char(v.as_char()),
        Scalar::Byte => Value::Byte(v.as_byte()),
        Scalar::Short => Value::Short(v.as_short()),
        Scalar::Int => Value::Int(v.as_int()),
        Scalar::Long => Value::Long(v.as_long()),
        Scalar::Float => Value::Float(v.as_float()),
        Scalar::Double => Value::Double(v.as_double()),
    }
}

fn safe_cast(expected: &str, value: Option<&Value>) -> Value {
    match value {
        Some(Value::Ref(obj)) if obj.type_name() == expected => Value::Ref(obj.clone()),
        _ => Value::Null,
    }
}
