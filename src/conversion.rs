//! Bind-type inference and argument flattening.
//!
//! Drivers in the mysqli family bind a whole parameter list in one call, driven by a
//! type string with one character per placeholder. This module derives that string from
//! runtime values and keeps it positionally aligned with the flattened value list.

use std::fmt;

use crate::types::{BindArg, RowValues};

/// Single-character bind type understood by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    /// `s`
    String,
    /// `d`
    Float,
    /// `i`
    Integer,
    /// `b`, sent as an opaque byte sequence
    Blob,
}

impl TypeCode {
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            TypeCode::String => 's',
            TypeCode::Float => 'd',
            TypeCode::Integer => 'i',
            TypeCode::Blob => 'b',
        }
    }

    /// Parse one character of a type string.
    #[must_use]
    pub fn from_char(code: char) -> Option<Self> {
        match code {
            's' => Some(TypeCode::String),
            'd' => Some(TypeCode::Float),
            'i' => Some(TypeCode::Integer),
            'b' => Some(TypeCode::Blob),
            _ => None,
        }
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Derive the bind type for a value.
///
/// Checked in order: text, float, integer; anything else (booleans, blobs, NULL) binds as
/// a blob. A numeric-looking string such as `"42"` stays a string.
#[must_use]
pub fn infer_type(value: &RowValues) -> TypeCode {
    match value {
        RowValues::Text(_) => TypeCode::String,
        RowValues::Float(_) => TypeCode::Float,
        RowValues::Int(_) => TypeCode::Integer,
        RowValues::Bool(_) | RowValues::Blob(_) | RowValues::Null => TypeCode::Blob,
    }
}

/// Expand sequences in place, preserving argument order.
#[must_use]
pub fn flatten_args(args: &[BindArg]) -> Vec<RowValues> {
    let mut flat = Vec::with_capacity(args.iter().map(BindArg::arity).sum());
    for arg in args {
        match arg {
            BindArg::Scalar(value) => flat.push(value.clone()),
            BindArg::Sequence(values) => flat.extend(values.iter().cloned()),
        }
    }
    flat
}

/// Type string plus the values it describes, index-aligned.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundParams {
    types: String,
    values: Vec<RowValues>,
}

impl BoundParams {
    /// Flatten `args` and infer one type code per flattened value.
    #[must_use]
    pub fn from_args(args: &[BindArg]) -> Self {
        let values = flatten_args(args);
        let types = values.iter().map(|v| infer_type(v).as_char()).collect();
        Self { types, values }
    }

    #[must_use]
    pub fn types(&self) -> &str {
        &self.types
    }

    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Hand ownership to the driver's bind call.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<RowValues>) {
        (self.types, self.values)
    }
}
