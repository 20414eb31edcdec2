//! The closed set of failure kinds surfaced by this crate.
//!
//! A missing file hash is not an error: lookups return `Ok(None)` or
//! `Ok(false)`. Everything structural propagates; nothing is retried or
//! silently defaulted.

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A backing file could not be opened or read.
    #[error("backing file unavailable: {0}")]
    IoUnavailable(#[source] io::Error),

    /// Fewer bytes were present than the on-disk contract demands.
    #[error("unexpected end of data")]
    Truncated,

    /// A magic field or header signature did not match.
    #[error("bad magic or signature in {what}")]
    BadMagic { what: &'static str },

    /// A version field carried a value this crate does not understand.
    #[error("unsupported version {0}")]
    UnsupportedVersion(u32),

    /// The data-file record is neither Standard nor Model.
    #[error("unsupported file type {0}")]
    UnsupportedFileType(u32),

    /// Raw-deflate did not reach stream end, or the output length mismatched.
    #[error("deflate stream did not decode cleanly")]
    Compression,

    /// The first path token is not in the fixed category table.
    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    /// Repository discovery found no base repository.
    #[error("no base repository found")]
    NoBaseRepository,
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::Truncated,
            _ => Error::IoUnavailable(e),
        }
    }
}
