//! Run-length zero encoding over 32-bit little-endian words (C2).
//!
//! Two encoders share one decoder: [`encode_sparse`] for arbitrary
//! `(bin, intensity)` maps (used by [`crate::writer::Writer::insert_scan`]'s
//! sparse path) and [`encode_dense`] for a dense `i32` array (the
//! `time_offset = 0` path). Both compute TIC/BPI/NonZeroCount as a side
//! effect of the same pass, per §4.2.

use super::error::CodecError;

/// Summary statistics computed alongside an encode pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedScan {
    /// The LZF-compressed blob to persist in `Frame_Scans.Intensities`.
    pub blob: Vec<u8>,
    pub non_zero_count: i32,
    pub tic: i64,
    pub bpi: i32,
    /// Bin of the first-encountered maximum intensity.
    pub bpi_bin: u32,
}

/// The decoded (bin, intensity) stream plus the same summary statistics,
/// recomputed from the stream rather than trusted from storage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedScan {
    pub pairs: Vec<(u32, i32)>,
    pub non_zero_count: i32,
    pub tic: i64,
    pub bpi: i32,
    pub bpi_bin: u32,
}

pub(super) struct RleBytes {
    pub bytes: Vec<u8>,
    pub non_zero_count: i32,
    pub tic: i64,
    pub bpi: i32,
    pub bpi_bin: u32,
}

fn push_word(bytes: &mut Vec<u8>, word: i32) {
    bytes.extend_from_slice(&word.to_le_bytes());
}

/// Encode a sparse, strictly-increasing `(bin, intensity)` sequence.
///
/// Per §4.2: the first word is `-(time_offset + first_bin)`; thereafter a
/// pair whose bin is exactly `previous_bin + 1` emits just the intensity,
/// otherwise a negative skip word `(previous_bin - current_bin + 1)`
/// precedes the intensity.
pub(super) fn encode_sparse(
    pairs: &[(u32, i32)],
    time_offset: i32,
) -> Result<RleBytes, CodecError> {
    let mut bytes = Vec::with_capacity((pairs.len() + 1) * 4);
    let mut tic: i64 = 0;
    let mut bpi = i32::MIN;
    let mut bpi_bin = 0u32;
    let mut non_zero_count = 0i32;

    if pairs.is_empty() {
        return Ok(RleBytes {
            bytes,
            non_zero_count: 0,
            tic: 0,
            bpi: 0,
            bpi_bin: 0,
        });
    }

    let mut previous_bin: i64 = -1;
    for (i, &(bin, intensity)) in pairs.iter().enumerate() {
        if intensity <= 0 {
            return Err(CodecError::InvalidRle(format!(
                "non-positive intensity {intensity} at bin {bin}"
            )));
        }
        if i > 0 && bin as i64 <= previous_bin {
            return Err(CodecError::InvalidRle(format!(
                "bins must strictly increase, got {bin} after {previous_bin}"
            )));
        }

        if i == 0 {
            push_word(&mut bytes, -(time_offset + bin as i64) as i32);
        } else if bin as i64 == previous_bin + 1 {
            // contiguous: no skip word needed
        } else {
            // The virtual cursor sits at `previous_bin + 1` after the prior
            // intensity word; advance it to `bin` with a zero-run.
            let skip = (previous_bin + 1) - bin as i64;
            push_word(&mut bytes, skip as i32);
        }
        push_word(&mut bytes, intensity);

        tic += intensity as i64;
        if intensity > bpi {
            bpi = intensity;
            bpi_bin = bin;
        }
        non_zero_count += 1;
        previous_bin = bin as i64;
    }

    Ok(RleBytes {
        bytes,
        non_zero_count,
        tic,
        bpi: bpi.max(0),
        bpi_bin,
    })
}

/// Encode a dense `i32` array with `time_offset` implicitly zero.
pub(super) fn encode_dense(intensities: &[i32]) -> Result<RleBytes, CodecError> {
    let pairs: Vec<(u32, i32)> = intensities
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v > 0)
        .map(|(i, &v)| (i as u32, v))
        .collect();
    encode_sparse(&pairs, 0)
}

/// Encode a dense `i16` array (the legacy `int16` writer path). Runs of
/// zeros are tracked with a running negative counter that flushes on
/// underflow (reaching `i16::MIN`); trailing zeros after the last
/// positive value are discarded. See §4.2.
pub fn encode_dense_i16(intensities: &[i16]) -> RleBytes {
    let mut bytes = Vec::new();
    let mut tic: i64 = 0;
    let mut bpi = 0i32;
    let mut bpi_bin = 0u32;
    let mut non_zero_count = 0i32;
    let mut zero_run: i32 = 0;

    for (i, &v) in intensities.iter().enumerate() {
        if v > 0 {
            if zero_run != 0 {
                bytes.extend_from_slice(&(zero_run as i16).to_le_bytes());
                zero_run = 0;
            }
            bytes.extend_from_slice(&v.to_le_bytes());
            tic += v as i64;
            if v as i32 > bpi {
                bpi = v as i32;
                bpi_bin = i as u32;
            }
            non_zero_count += 1;
        } else {
            zero_run -= 1;
            if zero_run as i64 == i16::MIN as i64 {
                bytes.extend_from_slice(&(zero_run as i16).to_le_bytes());
                zero_run = 0;
            }
        }
    }
    // trailing zero run after the last positive value is discarded.

    RleBytes {
        bytes,
        non_zero_count,
        tic,
        bpi,
        bpi_bin,
    }
}

/// Decode an RLE byte stream (already LZF-decompressed) back into a sparse
/// `(bin, intensity)` stream, recomputing TIC/BPI/NonZeroCount.
///
/// A negative word advances the virtual cursor by its absolute value (a
/// zero run); a positive word is an intensity at the current cursor, which
/// then advances by one. The very first word folds in `time_offset` and
/// the starting bin (§4.2) — callers that only need the relative bin
/// stream can simply ignore the offset baked into bin 0's position, since
/// it is already applied by this function.
pub fn decode(bytes: &[u8]) -> Result<DecodedScan, CodecError> {
    if bytes.is_empty() {
        return Ok(DecodedScan::default());
    }
    if bytes.len() % 4 != 0 {
        return Err(CodecError::InvalidRle(format!(
            "byte stream length {} is not a multiple of 4",
            bytes.len()
        )));
    }

    let words: Vec<i32> = bytes
        .chunks_exact(4)
        .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    let mut pairs = Vec::new();
    let mut tic: i64 = 0;
    let mut bpi = 0i32;
    let mut bpi_bin = 0u32;
    let mut non_zero_count = 0i32;

    // first word is the negated starting cursor position
    let mut cursor: i64 = -(words[0] as i64);

    for &word in &words[1..] {
        if word < 0 {
            cursor += (-word) as i64;
        } else {
            if cursor < 0 {
                return Err(CodecError::InvalidRle(
                    "cursor went negative while decoding".into(),
                ));
            }
            let bin = cursor as u32;
            pairs.push((bin, word));
            tic += word as i64;
            if word > bpi {
                bpi = word;
                bpi_bin = bin;
            }
            non_zero_count += 1;
            cursor += 1;
        }
    }

    Ok(DecodedScan {
        pairs,
        non_zero_count,
        tic,
        bpi,
        bpi_bin,
    })
}

/// Decode the TDC-16 dense byte stream produced by [`encode_dense_i16`].
///
/// Unlike [`decode`], there is no leading `time_offset` word: the virtual
/// cursor simply starts at index 0, since the encoder walked a dense array
/// from its first element.
pub fn decode_i16(bytes: &[u8]) -> Result<DecodedScan, CodecError> {
    if bytes.is_empty() {
        return Ok(DecodedScan::default());
    }
    if bytes.len() % 2 != 0 {
        return Err(CodecError::InvalidRle(format!(
            "int16 byte stream length {} is not a multiple of 2",
            bytes.len()
        )));
    }

    let words: Vec<i16> = bytes
        .chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]))
        .collect();

    let mut pairs = Vec::new();
    let mut tic: i64 = 0;
    let mut bpi = 0i32;
    let mut bpi_bin = 0u32;
    let mut non_zero_count = 0i32;
    let mut cursor: i64 = 0;

    for &word in &words {
        if word < 0 {
            cursor += (-word) as i64;
        } else {
            let bin = cursor as u32;
            let intensity = word as i32;
            pairs.push((bin, intensity));
            tic += intensity as i64;
            if intensity > bpi {
                bpi = intensity;
                bpi_bin = bin;
            }
            non_zero_count += 1;
            cursor += 1;
        }
    }

    Ok(DecodedScan {
        pairs,
        non_zero_count,
        tic,
        bpi,
        bpi_bin,
    })
}
