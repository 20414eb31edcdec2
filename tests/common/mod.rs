//! Synthetic-archive builder shared by the integration tests. Everything is
//! written with the same on-disk conventions the library parses: little-endian
//! sqpack structures, big-endian Excel scalars.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use sqpeek::sqpack::{Category, GameData, Repository, SQPACK_MAGIC};

// "hello, world\n" deflated raw (no zlib header), level 9
pub const HELLO_DEFLATED: [u8; 15] = [
    0xcb, 0x48, 0xcd, 0xc9, 0xc9, 0xd7, 0x51, 0x28, 0xcf, 0x2f, 0xca, 0x49, 0xe1, 0x02, 0x00,
];
pub const HELLO_PLAIN: &[u8] = b"hello, world\n";

pub fn stored_block(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_u32::<LittleEndian>(16).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap();
    out.write_u32::<LittleEndian>(32001).unwrap();
    out.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
    out.extend_from_slice(payload);
    out
}

pub fn deflated_block(deflated: &[u8], decompressed_len: u32) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_u32::<LittleEndian>(16).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap();
    out.write_u32::<LittleEndian>(deflated.len() as u32).unwrap();
    out.write_u32::<LittleEndian>(decompressed_len).unwrap();
    out.extend_from_slice(deflated);
    out
}

/// A Standard record holding the given pre-rendered blocks.
pub fn standard_record(blocks: &[Vec<u8>], raw_file_size: u32) -> Vec<u8> {
    let header_size = 0x80u32;
    let mut record = Vec::new();
    record.write_u32::<LittleEndian>(header_size).unwrap();
    record.write_u32::<LittleEndian>(2).unwrap(); // Standard
    record.write_u32::<LittleEndian>(raw_file_size).unwrap();
    record.write_u32::<LittleEndian>(0).unwrap();
    record.write_u32::<LittleEndian>(0).unwrap();
    record.write_u32::<LittleEndian>(blocks.len() as u32).unwrap();

    let mut offset = 0i32;
    for block in blocks {
        record.write_i32::<LittleEndian>(offset).unwrap();
        record.write_u16::<LittleEndian>(0).unwrap();
        record.write_u16::<LittleEndian>(0).unwrap();
        offset += block.len() as i32;
    }
    record.resize(header_size as usize, 0);
    for block in blocks {
        record.extend_from_slice(block);
    }
    record
}

/// A Standard record for a plain byte payload carried in one stored block.
pub fn stored_file_record(payload: &[u8]) -> Vec<u8> {
    standard_record(&[stored_block(payload)], payload.len() as u32)
}

/// A Model record whose only populated section is one stored stack block.
pub fn model_record(version: u32, stack_payload: &[u8]) -> Vec<u8> {
    let header_size = 0x100u32;
    let block = stored_block(stack_payload);

    let mut record = Vec::new();
    record.write_u32::<LittleEndian>(header_size).unwrap();
    record.write_u32::<LittleEndian>(3).unwrap(); // Model
    record.write_u32::<LittleEndian>(stack_payload.len() as u32).unwrap();
    record.write_u32::<LittleEndian>(1).unwrap(); // block count
    record.write_u32::<LittleEndian>(1).unwrap(); // used blocks
    record.write_u32::<LittleEndian>(version).unwrap();

    // uncompressed sizes, compressed sizes, offsets: stack first, rest zero
    for lead in [
        stack_payload.len() as u32,
        block.len() as u32,
        0, // stack offset within the payload
    ] {
        record.write_u32::<LittleEndian>(lead).unwrap();
        for _ in 0..10 {
            record.write_u32::<LittleEndian>(0).unwrap();
        }
    }
    // block start indices, block counts
    for lead in [0u16, 1] {
        record.write_u16::<LittleEndian>(lead).unwrap();
        for _ in 0..10 {
            record.write_u16::<LittleEndian>(0).unwrap();
        }
    }
    record.write_u16::<LittleEndian>(1).unwrap(); // vertex declarations
    record.write_u16::<LittleEndian>(1).unwrap(); // materials
    record.write_u8(1).unwrap(); // lods
    record.write_u8(0).unwrap();
    record.write_u8(0).unwrap();
    record.write_u8(0).unwrap();

    record.write_u16::<LittleEndian>(block.len() as u16).unwrap();

    record.resize(header_size as usize, 0);
    record.extend_from_slice(&block);
    record
}

fn write_sqpack_headers(out: &mut Vec<u8>, entry_bytes: u32) {
    out.extend_from_slice(SQPACK_MAGIC);
    out.extend_from_slice(&[0; 2]);
    out.write_u8(0).unwrap(); // win32
    out.extend_from_slice(&[0; 3]);
    out.write_u32::<LittleEndian>(0x400).unwrap();
    out.write_u32::<LittleEndian>(1).unwrap();
    out.write_u32::<LittleEndian>(2).unwrap();
    out.resize(0x400, 0);
    out.write_u32::<LittleEndian>(16).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap();
    out.write_u32::<LittleEndian>(0x800).unwrap();
    out.write_u32::<LittleEndian>(entry_bytes).unwrap();
    out.resize(0x800, 0);
}

fn pack_data_word(data_file_id: u8, offset_blocks: u32) -> u32 {
    (offset_blocks << 8) | (u32::from(data_file_id) << 1)
}

/// One category's worth of files, written as `.index`/`.index2`/`.dat0`.
pub struct CategoryPack {
    category: Category,
    // (path hash, record bytes, only reachable through index2)
    entries: Vec<(u64, Vec<u8>, bool)>,
}

impl CategoryPack {
    pub fn new(category: Category) -> CategoryPack {
        CategoryPack {
            category,
            entries: Vec::new(),
        }
    }

    pub fn add_file(mut self, path: &str, record: Vec<u8>) -> Self {
        self.entries.push((GameData::hash(path), record, false));
        self
    }

    /// Register the file in `.index2` only, keyed by the filename hash.
    pub fn add_file_index2_only(mut self, path: &str, record: Vec<u8>) -> Self {
        self.entries.push((GameData::hash(path), record, true));
        self
    }

    pub fn write_to(&self, repo_dir: &Path, repository: &Repository) {
        let mut dat = Vec::new();
        let mut index_entries = Vec::new();
        let mut index2_entries = Vec::new();

        for (hash, record, index2_only) in &self.entries {
            while dat.len() % 0x80 != 0 {
                dat.push(0);
            }
            let offset_blocks = (dat.len() / 0x80) as u32;
            if *index2_only {
                index2_entries.push((*hash as u32, offset_blocks));
            } else {
                index_entries.push((*hash, offset_blocks));
            }
            dat.extend_from_slice(record);
        }

        let mut index = Vec::new();
        write_sqpack_headers(&mut index, (index_entries.len() * 16) as u32);
        for (hash, offset_blocks) in &index_entries {
            index.write_u64::<LittleEndian>(*hash).unwrap();
            index
                .write_u32::<LittleEndian>(pack_data_word(0, *offset_blocks))
                .unwrap();
            index.write_u32::<LittleEndian>(0).unwrap();
        }

        let mut index2 = Vec::new();
        write_sqpack_headers(&mut index2, (index2_entries.len() * 8) as u32);
        for (hash, offset_blocks) in &index2_entries {
            index2.write_u32::<LittleEndian>(*hash).unwrap();
            index2
                .write_u32::<LittleEndian>(pack_data_word(0, *offset_blocks))
                .unwrap();
        }

        fs::create_dir_all(repo_dir).unwrap();
        fs::write(repo_dir.join(repository.index_filename(self.category)), index).unwrap();
        fs::write(
            repo_dir.join(repository.index2_filename(self.category)),
            index2,
        )
        .unwrap();
        fs::write(repo_dir.join(repository.dat_filename(self.category, 0)), dat).unwrap();
    }
}

/// Write category packs into `<data_dir>/<repository>/`.
pub fn write_repository(data_dir: &Path, repository_name: &str, packs: &[CategoryPack]) {
    let repository = Repository::from_name(repository_name);
    let repo_dir = data_dir.join(repository_name);
    fs::create_dir_all(&repo_dir).unwrap();
    for pack in packs {
        pack.write_to(&repo_dir, &repository);
    }
}

// ---- Excel byte builders ------------------------------------------------

/// EXH bytes: `columns` are `(raw kind, offset)` pairs, `languages` raw u16s.
pub fn exh_bytes(
    data_offset: u16,
    columns: &[(u16, u16)],
    pages: &[(u32, u32)],
    languages: &[u16],
    row_count: u32,
) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"EXHF");
    out.write_u16::<BigEndian>(1).unwrap();
    out.write_u16::<BigEndian>(data_offset).unwrap();
    out.write_u16::<BigEndian>(columns.len() as u16).unwrap();
    out.write_u16::<BigEndian>(pages.len() as u16).unwrap();
    out.write_u16::<BigEndian>(languages.len() as u16).unwrap();
    out.write_u16::<BigEndian>(0).unwrap();
    out.write_u8(0).unwrap();
    out.write_u8(1).unwrap(); // variant
    out.write_u16::<BigEndian>(0).unwrap();
    out.write_u32::<BigEndian>(row_count).unwrap();
    out.extend_from_slice(&[0; 8]);
    for &(kind, offset) in columns {
        out.write_u16::<BigEndian>(kind).unwrap();
        out.write_u16::<BigEndian>(offset).unwrap();
    }
    for &(start_id, rows) in pages {
        out.write_u32::<BigEndian>(start_id).unwrap();
        out.write_u32::<BigEndian>(rows).unwrap();
    }
    for &language in languages {
        out.write_u16::<LittleEndian>(language).unwrap();
    }
    out
}

/// EXD bytes from `(row_id, subrow_count, payload)` triples.
pub fn exd_bytes(rows: &[(u32, u16, Vec<u8>)]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"EXDF");
    out.write_u16::<BigEndian>(2).unwrap();
    out.write_u16::<BigEndian>(0).unwrap();
    out.write_u32::<BigEndian>((rows.len() * 8) as u32).unwrap();
    out.extend_from_slice(&[0; 20]);

    let mut offset = (out.len() + rows.len() * 8) as u32;
    let mut blobs = Vec::new();
    for &(row_id, subrow_count, ref payload) in rows {
        out.write_u32::<BigEndian>(row_id).unwrap();
        out.write_u32::<BigEndian>(offset).unwrap();

        let mut blob = Vec::new();
        blob.write_u32::<BigEndian>(payload.len() as u32).unwrap();
        blob.write_u16::<BigEndian>(subrow_count).unwrap();
        blob.extend_from_slice(payload);
        offset += blob.len() as u32;
        blobs.push(blob);
    }
    for blob in blobs {
        out.extend_from_slice(&blob);
    }
    out
}
