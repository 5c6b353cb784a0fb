/// Errors that can occur while querying a dataset.
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("schema error: {0}")]
    Schema(#[from] crate::schema::SchemaError),

    #[error("codec error: {0}")]
    Codec(#[from] crate::codec::CodecError),

    #[error("calibration error: {0}")]
    Calibration(#[from] crate::calibration::CalibrationError),

    #[error("frame {0} has no calibration parameters")]
    NotCalibrated(i64),

    #[error("frame {0} does not exist")]
    UnknownFrame(i64),

    #[error("empty frame range")]
    EmptyFrameRange,
}
