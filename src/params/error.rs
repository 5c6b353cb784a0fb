/// Errors raised while looking up or coercing parameter values.
#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    /// A strict lookup (no alias fallback permitted) did not match any
    /// known key, by exact or case-insensitive name.
    #[error("unknown parameter name: {0}")]
    UnknownName(String),

    /// A strict lookup by numeric ID did not match any known key.
    #[error("unknown parameter id: {0}")]
    UnknownId(i32),

    /// The stored text could not be coerced to the key's declared type and
    /// the caller asked to be told about it rather than silently keeping
    /// the original string.
    #[error("cannot coerce {raw:?} to {expected:?}")]
    Coercion { raw: String, expected: super::ParamDataType },
}
