use rusqlite::ffi;
use rusqlite::types::Value;

use crate::conversion::TypeCode;
use crate::error::DriverError;
use crate::types::RowValues;

/// Convert one bound value to a rusqlite `Value` according to its type code.
///
/// Booleans travel as one byte blobs, the way the `b` code treats them.
///
/// # Errors
/// Returns `DriverError` (`SQLITE_MISMATCH`) if the value does not fit the code.
pub fn bind_value(code: TypeCode, value: RowValues) -> Result<Value, DriverError> {
    match (code, value) {
        (TypeCode::String, RowValues::Text(s)) => Ok(Value::Text(s)),
        (TypeCode::Float, RowValues::Float(f)) => Ok(Value::Real(f)),
        (TypeCode::Integer, RowValues::Int(i)) => Ok(Value::Integer(i)),
        (TypeCode::Blob, RowValues::Blob(bytes)) => Ok(Value::Blob(bytes)),
        (TypeCode::Blob, RowValues::Bool(b)) => Ok(Value::Blob(vec![u8::from(b)])),
        (TypeCode::Blob, RowValues::Null) => Ok(Value::Null),
        (code, value) => Err(DriverError::new(
            ffi::SQLITE_MISMATCH,
            format!("cannot bind {value:?} with type code '{code}'"),
        )),
    }
}

/// Convert a whole parameter list, checking the type string against the values.
///
/// # Errors
/// Returns `DriverError` (`SQLITE_RANGE`) on a length mismatch or unknown code.
pub fn convert_params(types: &str, values: Vec<RowValues>) -> Result<Vec<Value>, DriverError> {
    if types.chars().count() != values.len() {
        return Err(DriverError::new(
            ffi::SQLITE_RANGE,
            format!(
                "type string has {} codes for {} values",
                types.chars().count(),
                values.len()
            ),
        ));
    }
    types
        .chars()
        .zip(values)
        .map(|(c, value)| {
            let code = TypeCode::from_char(c).ok_or_else(|| {
                DriverError::new(ffi::SQLITE_RANGE, format!("unknown type code '{c}'"))
            })?;
            bind_value(code, value)
        })
        .collect()
}
