use serde::Serialize;

/// Values that can be bound as statement parameters or read back from a row.
///
/// The same enum is used in both directions so callers never deal with driver types:
/// ```rust
/// use fast_sql_conn::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// NULL value
    Null,
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// Booleans come back from most drivers as 0/1 integers or a one byte blob.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RowValues::Bool(value) => Some(*value),
            RowValues::Int(0) => Some(false),
            RowValues::Int(1) => Some(true),
            RowValues::Blob(bytes) if bytes.len() == 1 && bytes[0] <= 1 => Some(bytes[0] == 1),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for RowValues {
                fn from(value: $t) -> Self {
                    RowValues::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u16, u32);

impl From<f32> for RowValues {
    fn from(value: f32) -> Self {
        RowValues::Float(f64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_owned())
    }
}

impl From<&String> for RowValues {
    fn from(value: &String) -> Self {
        RowValues::Text(value.clone())
    }
}

impl From<&[u8]> for RowValues {
    fn from(value: &[u8]) -> Self {
        RowValues::Blob(value.to_vec())
    }
}

impl From<Vec<u8>> for RowValues {
    fn from(value: Vec<u8>) -> Self {
        RowValues::Blob(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// One argument passed to [`Connection::query`](crate::Connection::query).
///
/// A `Sequence` is expanded in place before binding, so
/// `query("... IN (?, ?, ?)", &bind_args![vec![1, 2, 3]])` binds three integers.
/// Byte payloads (`&[u8]`, `Vec<u8>`) go in as a single `RowValues::Blob`, never as a
/// sequence of integers; a lone `u8` has no conversion for that reason.
#[derive(Debug, Clone, PartialEq)]
pub enum BindArg {
    Scalar(RowValues),
    Sequence(Vec<RowValues>),
}

impl BindArg {
    /// Number of placeholders this argument fills once flattened.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            BindArg::Scalar(_) => 1,
            BindArg::Sequence(values) => values.len(),
        }
    }
}

macro_rules! impl_scalar_arg {
    ($($t:ty),*) => {
        $(
            impl From<$t> for BindArg {
                fn from(value: $t) -> Self {
                    BindArg::Scalar(RowValues::from(value))
                }
            }
        )*
    };
}

impl_scalar_arg!(
    i8, i16, i32, i64, u16, u32, f32, f64, bool, String, &str, &String, &[u8], Vec<u8>
);

impl From<RowValues> for BindArg {
    fn from(value: RowValues) -> Self {
        BindArg::Scalar(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for BindArg {
    fn from(value: Option<T>) -> Self {
        BindArg::Scalar(value.into())
    }
}

impl<T: Into<RowValues>> From<Vec<T>> for BindArg {
    fn from(values: Vec<T>) -> Self {
        BindArg::Sequence(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RowValues>, const N: usize> From<[T; N]> for BindArg {
    fn from(values: [T; N]) -> Self {
        BindArg::Sequence(values.into_iter().map(Into::into).collect())
    }
}

/// Build a `Vec<BindArg>` from mixed scalars and sequences.
///
/// ```rust
/// use fast_sql_conn::prelude::*;
///
/// let args = bind_args![7, "Ann", vec![1.5, 2.5]];
/// assert_eq!(args.len(), 3);
/// assert_eq!(args[2].arity(), 2);
/// ```
#[macro_export]
macro_rules! bind_args {
    () => {
        ::std::vec::Vec::<$crate::BindArg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::BindArg::from($arg)),+]
    };
}
