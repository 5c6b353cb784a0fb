//! # Intensity codec
//!
//! This module implements the two-layer codec that turns a sparse
//! `(bin -> intensity)` spectrum into the byte blob stored in
//! `Frame_Scans.Intensities`.
//!
//! - [`rle`] encodes the sparse map as a stream of little-endian `i32` words
//!   using negative-run zero encoding (C2), computing TIC/BPI/NonZeroCount
//!   as a side effect of the same pass.
//! - [`lzf`] compresses that byte stream with a small LZF-style
//!   dictionary coder (C1).
//!
//! Callers normally go through [`encode_sparse`] / [`decode_blob`] rather
//! than the two layers directly.

mod error;
pub mod lzf;
pub mod rle;


pub use error::CodecError;
pub use rle::{DecodedScan, EncodedScan};

/// Encode a sparse, strictly-increasing `(bin, intensity)` sequence into the
/// compressed blob stored in `Frame_Scans.Intensities`.
///
/// `time_offset` is folded into the first emitted word per §4.2.
pub fn encode_sparse(pairs: &[(u32, i32)], time_offset: i32) -> Result<EncodedScan, CodecError> {
    let summary = rle::encode_sparse(pairs, time_offset)?;
    let compressed = lzf::compress(&summary.bytes)?;
    Ok(EncodedScan {
        blob: compressed,
        non_zero_count: summary.non_zero_count,
        tic: summary.tic,
        bpi: summary.bpi,
        bpi_bin: summary.bpi_bin,
    })
}

/// Encode a dense intensity array (implicit `time_offset = 0`) into the
/// compressed blob stored in `Frame_Scans.Intensities`.
pub fn encode_dense(intensities: &[i32]) -> Result<EncodedScan, CodecError> {
    let summary = rle::encode_dense(intensities)?;
    let compressed = lzf::compress(&summary.bytes)?;
    Ok(EncodedScan {
        blob: compressed,
        non_zero_count: summary.non_zero_count,
        tic: summary.tic,
        bpi: summary.bpi,
        bpi_bin: summary.bpi_bin,
    })
}

/// Encode a dense `i16` array (the TDC-16 writer path, §4.2) into the
/// compressed blob stored in `Frame_Scans.Intensities`. Zero runs are
/// tracked with a running negative 16-bit counter rather than the 32-bit
/// words the other two encoders use, matching the legacy TDC encoder this
/// mode exists to stay compatible with.
pub fn encode_dense_i16(intensities: &[i16]) -> Result<EncodedScan, CodecError> {
    let summary = rle::encode_dense_i16(intensities);
    let compressed = lzf::compress(&summary.bytes)?;
    Ok(EncodedScan {
        blob: compressed,
        non_zero_count: summary.non_zero_count,
        tic: summary.tic,
        bpi: summary.bpi,
        bpi_bin: summary.bpi_bin,
    })
}

/// Decompress and decode a stored blob back into a sparse `(bin,
/// intensity)` stream, computing TIC/BPI/NonZeroCount as it goes.
pub fn decode_blob(blob: &[u8]) -> Result<DecodedScan, CodecError> {
    let bytes = lzf::decompress(blob)?;
    rle::decode(&bytes)
}

/// Decompress and decode a stored TDC-16 blob (§4.2 "Int16 dense
/// encoding"). Only used for datasets whose `TOFIntensityType` global
/// parameter is `TDC-int16`.
pub fn decode_blob_i16(blob: &[u8]) -> Result<DecodedScan, CodecError> {
    let bytes = lzf::decompress(blob)?;
    rle::decode_i16(&bytes)
}
