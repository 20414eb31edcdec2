//! Raw-deflate decoding for SqPack payload blocks.
//!
//! Compressed blocks carry deflate data with no zlib or gzip wrapper
//! (window-bits −15 by convention) and the block header states the exact
//! decompressed length, so decoding either yields precisely that many bytes
//! at stream end or fails.

use flate2::{Decompress, FlushDecompress, Status};

use crate::error::{Error, Result};

/// Decode a headerless deflate stream whose output length is known exactly.
pub fn inflate_raw(input: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let mut out = vec![0u8; expected_len];
    let mut inflater = Decompress::new(false);
    let status = inflater
        .decompress(input, &mut out, FlushDecompress::Finish)
        .map_err(|_| Error::Compression)?;
    if status != Status::StreamEnd || inflater.total_out() != expected_len as u64 {
        return Err(Error::Compression);
    }
    Ok(out)
}
