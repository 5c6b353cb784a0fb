/// Errors that can occur while writing a dataset.
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("schema error: {0}")]
    Schema(#[from] crate::schema::SchemaError),

    #[error("codec error: {0}")]
    Codec(#[from] crate::codec::CodecError),

    #[error("parameter error: {0}")]
    Param(#[from] crate::params::ParamError),

    #[error("frame {0} does not exist")]
    UnknownFrame(i64),

    #[error("bin-centric index error: {0}")]
    BinCentric(#[from] crate::bincentric::BinCentricError),

    #[error("a sparse (bin, intensity) sequence must be strictly increasing in bin (got {previous} then {next})")]
    NonIncreasingBins { previous: u32, next: u32 },
}
