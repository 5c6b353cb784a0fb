/// Errors raised by the LZF byte codec and the RLE intensity codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A back-reference pointed before the start of the output, or a write
    /// would have run past the end of a caller-supplied buffer.
    #[error("corrupt LZF stream: {0}")]
    Corruption(String),

    /// The RLE stream violated an invariant of the negative-run encoding
    /// (e.g. a word sequence that does not decode to a well-formed
    /// zero-run / intensity alternation).
    #[error("corrupt RLE stream: {0}")]
    InvalidRle(String),

    /// The compressor's output buffer was too small; the caller should
    /// grow the buffer and retry. Carries the number of bytes consumed
    /// before the overflow was detected, as a sizing hint.
    #[error("compressor output buffer too small (consumed {consumed} bytes before overflow)")]
    OutOfCapacity { consumed: usize },
}
