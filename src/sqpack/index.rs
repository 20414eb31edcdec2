//! `.index` / `.index2` parsing and hash lookup.
//!
//! Both index variants carry the common SqPack header, then an index header
//! that locates a flat entry table. `.index` keys entries by the combined
//! 64-bit directory+filename hash; `.index2` keys them by the 32-bit
//! filename hash alone. Lookups consult `.index` first and fall back to
//! `.index2`.

use std::fs;
use std::path::Path;

use byteorder::LittleEndian;

use crate::buffer::{ByteSpan, Whence};
use crate::error::{Error, Result};

use super::category::Category;
use super::repository::Repository;

pub const SQPACK_MAGIC: &[u8; 6] = b"SqPack";
const SQPACK_VERSION: u32 = 1;

const INDEX_ENTRY_SIZE: usize = 16;
const INDEX2_ENTRY_SIZE: usize = 8;

/// The 1024-byte-aligned header every sqpack file starts with.
#[derive(Debug, Clone, Copy)]
pub struct SqPackHeader {
    pub platform: u8,
    pub size: u32,
    pub version: u32,
    pub file_type: u32,
}

impl SqPackHeader {
    pub fn read(span: &mut ByteSpan) -> Result<SqPackHeader> {
        if span.read_bytes(6)? != SQPACK_MAGIC {
            return Err(Error::BadMagic {
                what: "sqpack header",
            });
        }
        span.skip(2)?;
        let platform = span.read_u8()?;
        span.skip(3)?;
        let size = span.read_u32::<LittleEndian>()?;
        let version = span.read_u32::<LittleEndian>()?;
        let file_type = span.read_u32::<LittleEndian>()?;

        if version != SQPACK_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        Ok(SqPackHeader {
            platform,
            size,
            version,
            file_type,
        })
    }
}

/// Follows the pack header in index variants and locates the entry table.
#[derive(Debug, Clone, Copy)]
pub struct SqPackIndexHeader {
    pub size: u32,
    pub file_type: u32,
    pub index_data_offset: u32,
    pub index_data_size: u32,
}

impl SqPackIndexHeader {
    pub fn read(span: &mut ByteSpan) -> Result<SqPackIndexHeader> {
        Ok(SqPackIndexHeader {
            size: span.read_u32::<LittleEndian>()?,
            file_type: span.read_u32::<LittleEndian>()?,
            index_data_offset: span.read_u32::<LittleEndian>()?,
            index_data_size: span.read_u32::<LittleEndian>()?,
        })
    }
}

/// One entry of the unified hash table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub hash: u64,
    pub data_file_id: u8,
    pub offset_blocks: u32,
}

impl IndexEntry {
    /// Split the packed data word: the low byte carries `data_file_id << 1`,
    /// the remaining bits are the offset in 0x80-byte blocks.
    fn from_packed(hash: u64, data: u32) -> IndexEntry {
        IndexEntry {
            hash,
            data_file_id: ((data & 0xFF) >> 1) as u8,
            offset_blocks: data >> 8,
        }
    }

    /// Byte offset of the record inside its dat file.
    pub fn data_offset(&self) -> u64 {
        u64::from(self.offset_blocks) * 0x80
    }

    /// The directory half of the hash (`.index` entries only).
    pub fn directory_hash(&self) -> u32 {
        (self.hash >> 32) as u32
    }
}

/// The parsed hash tables for one `(repository, category)` pair.
#[derive(Debug)]
pub struct IndexTable {
    entries: Vec<IndexEntry>,
    entries2: Vec<IndexEntry>,
}

/// Position the span on the entry table and return how many bytes it spans.
fn seek_to_entries(span: &mut ByteSpan) -> Result<usize> {
    let pack = SqPackHeader::read(span)?;
    span.seek(pack.size as usize, Whence::Set)?;
    let index = SqPackIndexHeader::read(span)?;
    span.seek(index.index_data_offset as usize, Whence::Set)?;
    Ok(index.index_data_size as usize)
}

fn parse_index(data: &[u8]) -> Result<Vec<IndexEntry>> {
    let mut span = ByteSpan::new(data);
    let table_size = seek_to_entries(&mut span)?;
    let count = table_size / INDEX_ENTRY_SIZE;
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let hash = span.read_u64::<LittleEndian>()?;
        let data = span.read_u32::<LittleEndian>()?;
        span.skip(4)?;
        entries.push(IndexEntry::from_packed(hash, data));
    }
    Ok(entries)
}

fn parse_index2(data: &[u8]) -> Result<Vec<IndexEntry>> {
    let mut span = ByteSpan::new(data);
    let table_size = seek_to_entries(&mut span)?;
    let count = table_size / INDEX2_ENTRY_SIZE;
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let hash = span.read_u32::<LittleEndian>()?;
        let data = span.read_u32::<LittleEndian>()?;
        entries.push(IndexEntry::from_packed(u64::from(hash), data));
    }
    Ok(entries)
}

impl IndexTable {
    /// Read both index variants for a category out of a repository directory.
    pub fn open(
        repo_dir: &Path,
        repository: &Repository,
        category: Category,
    ) -> Result<IndexTable> {
        let index = fs::read(repo_dir.join(repository.index_filename(category)))?;
        let index2 = fs::read(repo_dir.join(repository.index2_filename(category)))?;
        Ok(IndexTable {
            entries: parse_index(&index)?,
            entries2: parse_index2(&index2)?,
        })
    }

    #[cfg(test)]
    fn from_bytes(index: &[u8], index2: &[u8]) -> Result<IndexTable> {
        Ok(IndexTable {
            entries: parse_index(index)?,
            entries2: parse_index2(index2)?,
        })
    }

    /// Look up a 64-bit path hash: `.index` first, then `.index2` by the
    /// filename half. The first match in file order wins.
    pub fn find(&self, hash: u64) -> Option<&IndexEntry> {
        self.entries.iter().find(|e| e.hash == hash).or_else(|| {
            let filename_hash = u64::from(hash as u32);
            self.entries2.iter().find(|e| e.hash == filename_hash)
        })
    }

    /// All `.index` entries, in file order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// `.index` entries whose directory half matches `directory_crc`.
    pub fn entries_in_dir(&self, directory_crc: u32) -> impl Iterator<Item = &IndexEntry> {
        self.entries
            .iter()
            .filter(move |e| e.directory_hash() == directory_crc)
    }
}
