/// Errors raised while creating, migrating, or querying the table layout.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("sqlite migration error: {0}")]
    Migration(#[from] rusqlite_migration::Error),

    #[error("required table {0} is missing")]
    MissingTable(String),

    #[error("file mixes legacy FrameType 0 (MS1) with modern FrameType 1 (MS1); cannot open")]
    MixedFrameTypeEncoding,

    #[error("parameter error: {0}")]
    Param(#[from] crate::params::ParamError),
}
