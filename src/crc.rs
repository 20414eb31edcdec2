//! JAMCRC and the 64-bit SqPack path hash.
//!
//! The index tables key files by JAMCRC, the bitwise complement of standard
//! reflected CRC-32 (polynomial `0xEDB88320`). The full-path hash is the
//! directory hash in the high 32 bits and the filename hash in the low 32,
//! both computed over the ASCII-lowercased path.

/// JAMCRC of a byte slice.
pub fn jamcrc(bytes: &[u8]) -> u32 {
    !crc32fast::hash(bytes)
}

/// 64-bit content hash for a logical game path.
///
/// The path is lowercased, split at the last `/`, and each half is hashed
/// independently. A path with no separator hashes as a bare filename.
pub fn hash_path(path: &str) -> u64 {
    let lower = path.to_ascii_lowercase();
    match lower.rfind('/') {
        Some(pos) => {
            let directory = jamcrc(lower[..pos].as_bytes());
            let filename = jamcrc(lower[pos + 1..].as_bytes());
            (u64::from(directory) << 32) | u64::from(filename)
        }
        None => u64::from(jamcrc(lower.as_bytes())),
    }
}
