//! Tagged-union parameter value with string coercion (§4.3).

use std::fmt;

/// The declared type of a parameter key, independent of how any one value
/// happens to be stored on disk (always text).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamDataType {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    /// Stored and round-tripped as text in the `M/d/yyyy h:mm:ss tt` format.
    Date,
}

/// A dynamically typed parameter value.
///
/// Modeled as an explicit tagged union rather than relying on ambient
/// dynamic dispatch (§9 design notes): every variant coerces to/from the
/// string representation actually persisted in `Global_Params` /
/// `Frame_Params`.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// Date text, kept as-is (format `M/d/yyyy h:mm:ss tt`).
    Date(String),
}

impl ParamValue {
    pub fn data_type(&self) -> ParamDataType {
        match self {
            ParamValue::Bool(_) => ParamDataType::Bool,
            ParamValue::Byte(_) => ParamDataType::Byte,
            ParamValue::Short(_) => ParamDataType::Short,
            ParamValue::Int(_) => ParamDataType::Int,
            ParamValue::Long(_) => ParamDataType::Long,
            ParamValue::Float(_) => ParamDataType::Float,
            ParamValue::Double(_) => ParamDataType::Double,
            ParamValue::String(_) => ParamDataType::String,
            ParamValue::Date(_) => ParamDataType::Date,
        }
    }

    /// The string form persisted in the `ParamValue` text column.
    pub fn to_storage_string(&self) -> String {
        match self {
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Byte(v) => v.to_string(),
            ParamValue::Short(v) => v.to_string(),
            ParamValue::Int(v) => v.to_string(),
            ParamValue::Long(v) => v.to_string(),
            ParamValue::Float(v) => v.to_string(),
            ParamValue::Double(v) => v.to_string(),
            ParamValue::String(v) => v.clone(),
            ParamValue::Date(v) => v.clone(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Bool(b) => Some(*b as i64),
            ParamValue::Byte(v) => Some(*v as i64),
            ParamValue::Short(v) => Some(*v as i64),
            ParamValue::Int(v) => Some(*v as i64),
            ParamValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v as f64),
            ParamValue::Double(v) => Some(*v),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(v) | ParamValue::Date(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_storage_string())
    }
}

/// Coerce `raw` (the text stored on disk) to `ty`, following §4.3's rules:
///
/// - a trailing `.0` is stripped before parsing an integer type
/// - `Inf`/`-Inf` (case-insensitive) map to the type's maximum/minimum
/// - an empty string maps to NaN for `Float`/`Double`
/// - on any other parse failure, `return_null_on_error` decides whether the
///   caller gets `None` or a [`ParamValue::String`] holding the original
///   text (so unknown/malformed values still round-trip).
pub fn coerce(raw: &str, ty: ParamDataType, return_null_on_error: bool) -> Option<ParamValue> {
    let preserve_or_none = || {
        if return_null_on_error {
            None
        } else {
            Some(ParamValue::String(raw.to_string()))
        }
    };

    match ty {
        ParamDataType::String => Some(ParamValue::String(raw.to_string())),
        ParamDataType::Date => Some(ParamValue::Date(raw.to_string())),
        ParamDataType::Bool => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" => Some(ParamValue::Bool(true)),
            "false" | "0" => Some(ParamValue::Bool(false)),
            _ => preserve_or_none(),
        },
        ParamDataType::Float => {
            if raw.is_empty() {
                return Some(ParamValue::Float(f32::NAN));
            }
            match raw.to_ascii_lowercase().as_str() {
                "inf" => Some(ParamValue::Float(f32::MAX)),
                "-inf" => Some(ParamValue::Float(f32::MIN)),
                _ => raw
                    .parse::<f32>()
                    .map(ParamValue::Float)
                    .ok()
                    .or_else(preserve_or_none),
            }
        }
        ParamDataType::Double => {
            if raw.is_empty() {
                return Some(ParamValue::Double(f64::NAN));
            }
            match raw.to_ascii_lowercase().as_str() {
                "inf" => Some(ParamValue::Double(f64::MAX)),
                "-inf" => Some(ParamValue::Double(f64::MIN)),
                _ => raw
                    .parse::<f64>()
                    .map(ParamValue::Double)
                    .ok()
                    .or_else(preserve_or_none),
            }
        }
        ParamDataType::Byte | ParamDataType::Short | ParamDataType::Int | ParamDataType::Long => {
            let trimmed = raw.strip_suffix(".0").unwrap_or(raw);
            match trimmed.to_ascii_lowercase().as_str() {
                "inf" => Some(int_max(ty)),
                "-inf" => Some(int_min(ty)),
                _ => parse_int(trimmed, ty).or_else(preserve_or_none),
            }
        }
    }
}

fn int_max(ty: ParamDataType) -> ParamValue {
    match ty {
        ParamDataType::Byte => ParamValue::Byte(i8::MAX),
        ParamDataType::Short => ParamValue::Short(i16::MAX),
        ParamDataType::Int => ParamValue::Int(i32::MAX),
        ParamDataType::Long => ParamValue::Long(i64::MAX),
        _ => unreachable!(),
    }
}

fn int_min(ty: ParamDataType) -> ParamValue {
    match ty {
        ParamDataType::Byte => ParamValue::Byte(i8::MIN),
        ParamDataType::Short => ParamValue::Short(i16::MIN),
        ParamDataType::Int => ParamValue::Int(i32::MIN),
        ParamDataType::Long => ParamValue::Long(i64::MIN),
        _ => unreachable!(),
    }
}

fn parse_int(trimmed: &str, ty: ParamDataType) -> Option<ParamValue> {
    match ty {
        ParamDataType::Byte => trimmed.parse::<i8>().ok().map(ParamValue::Byte),
        ParamDataType::Short => trimmed.parse::<i16>().ok().map(ParamValue::Short),
        ParamDataType::Int => trimmed.parse::<i32>().ok().map(ParamValue::Int),
        ParamDataType::Long => trimmed.parse::<i64>().ok().map(ParamValue::Long),
        _ => unreachable!(),
    }
}
