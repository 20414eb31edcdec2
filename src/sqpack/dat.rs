//! `.datN` record decoding.
//!
//! An index entry points at a record header inside one of a category's data
//! files. The record declares its payload kind: Standard payloads are a flat
//! run of blocks concatenated in locator order, Model payloads are re-sliced
//! into the `.mdl` layout the geometry decoders expect. Every block is
//! either stored or raw-deflate compressed; see [`crate::compression`].

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use num_enum::TryFromPrimitive;

use crate::compression::inflate_raw;
use crate::error::{Error, Result};

/// Stored blocks flag themselves with a `compressed_len` at or above this.
const COMPRESSION_THRESHOLD: u32 = 32000;

/// Size of the emitted `.mdl` file header; the assembler reserves this many
/// bytes up front and rewrites them once the section sizes are known.
const MODEL_HEADER_SIZE: u64 = 0x44;

/// The payload kind of a data-file record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
pub enum FileType {
    Empty = 1,
    Standard = 2,
    Model = 3,
    Texture = 4,
}

/// The fixed leading fields shared by every record kind.
#[derive(Debug, Clone, Copy)]
struct RecordHeader {
    size: u32,
    file_type: u32,
    raw_file_size: u32,
}

impl RecordHeader {
    fn read<R: Read>(r: &mut R) -> Result<RecordHeader> {
        Ok(RecordHeader {
            size: r.read_u32::<LittleEndian>()?,
            file_type: r.read_u32::<LittleEndian>()?,
            raw_file_size: r.read_u32::<LittleEndian>()?,
        })
    }
}

/// Locates one Standard block relative to the payload base.
#[derive(Debug, Clone, Copy)]
struct BlockLocator {
    offset: i32,
    #[allow(dead_code)]
    uncompressed_size: u16,
    #[allow(dead_code)]
    compressed_size: u16,
}

impl BlockLocator {
    fn read<R: Read>(r: &mut R) -> Result<BlockLocator> {
        Ok(BlockLocator {
            offset: r.read_i32::<LittleEndian>()?,
            uncompressed_size: r.read_u16::<LittleEndian>()?,
            compressed_size: r.read_u16::<LittleEndian>()?,
        })
    }
}

/// Per-section values of the Model record tables: stack and runtime memory,
/// then vertex, edge-geometry, and index buffers for each of the three LODs.
#[derive(Debug, Clone, Copy, Default)]
struct ModelSections<T> {
    stack: T,
    runtime: T,
    vertex: [T; 3],
    edge: [T; 3],
    index: [T; 3],
}

impl ModelSections<u16> {
    fn total(&self) -> usize {
        let per_lod: usize = self
            .vertex
            .iter()
            .chain(self.edge.iter())
            .chain(self.index.iter())
            .map(|&v| usize::from(v))
            .sum();
        usize::from(self.stack) + usize::from(self.runtime) + per_lod
    }
}

fn read_sections_u32<R: Read>(r: &mut R) -> Result<ModelSections<u32>> {
    let mut values = [0u32; 11];
    r.read_u32_into::<LittleEndian>(&mut values)?;
    Ok(ModelSections {
        stack: values[0],
        runtime: values[1],
        vertex: [values[2], values[3], values[4]],
        edge: [values[5], values[6], values[7]],
        index: [values[8], values[9], values[10]],
    })
}

fn read_sections_u16<R: Read>(r: &mut R) -> Result<ModelSections<u16>> {
    let mut values = [0u16; 11];
    r.read_u16_into::<LittleEndian>(&mut values)?;
    Ok(ModelSections {
        stack: values[0],
        runtime: values[1],
        vertex: [values[2], values[3], values[4]],
        edge: [values[5], values[6], values[7]],
        index: [values[8], values[9], values[10]],
    })
}

/// The Model record header that follows the three common fields.
#[derive(Debug)]
struct ModelRecordHeader {
    #[allow(dead_code)]
    block_count: u32,
    #[allow(dead_code)]
    used_block_count: u32,
    version: u32,
    #[allow(dead_code)]
    uncompressed_sizes: ModelSections<u32>,
    #[allow(dead_code)]
    compressed_sizes: ModelSections<u32>,
    offsets: ModelSections<u32>,
    #[allow(dead_code)]
    block_indices: ModelSections<u16>,
    block_counts: ModelSections<u16>,
    vertex_declaration_count: u16,
    material_count: u16,
    lod_count: u8,
    index_buffer_streaming_enabled: bool,
    edge_geometry_enabled: bool,
}

impl ModelRecordHeader {
    fn read<R: Read>(r: &mut R) -> Result<ModelRecordHeader> {
        let block_count = r.read_u32::<LittleEndian>()?;
        let used_block_count = r.read_u32::<LittleEndian>()?;
        let version = r.read_u32::<LittleEndian>()?;
        let uncompressed_sizes = read_sections_u32(r)?;
        let compressed_sizes = read_sections_u32(r)?;
        let offsets = read_sections_u32(r)?;
        let block_indices = read_sections_u16(r)?;
        let block_counts = read_sections_u16(r)?;
        let vertex_declaration_count = r.read_u16::<LittleEndian>()?;
        let material_count = r.read_u16::<LittleEndian>()?;
        let lod_count = r.read_u8()?;
        let index_buffer_streaming_enabled = r.read_u8()? != 0;
        let edge_geometry_enabled = r.read_u8()? != 0;
        r.read_u8()?; // padding

        Ok(ModelRecordHeader {
            block_count,
            used_block_count,
            version,
            uncompressed_sizes,
            compressed_sizes,
            offsets,
            block_indices,
            block_counts,
            vertex_declaration_count,
            material_count,
            lod_count,
            index_buffer_streaming_enabled,
            edge_geometry_enabled,
        })
    }
}

/// One open `.datN` file of a category.
#[derive(Debug)]
pub struct DatFile {
    file: File,
}

impl DatFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<DatFile> {
        Ok(DatFile {
            file: File::open(path).map_err(Error::IoUnavailable)?,
        })
    }

    /// Read and reassemble the record at `offset` (a byte offset, already
    /// scaled from the index entry's block offset).
    pub fn read_entry(&mut self, offset: u64) -> Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(offset))?;
        let header = RecordHeader::read(&mut self.file)?;

        match FileType::try_from(header.file_type) {
            Ok(FileType::Standard) => self.read_standard(offset, &header),
            Ok(FileType::Model) => self.read_model(offset, &header),
            _ => Err(Error::UnsupportedFileType(header.file_type)),
        }
    }

    fn read_standard(&mut self, offset: u64, header: &RecordHeader) -> Result<Vec<u8>> {
        // the common fields are followed by 8 reserved bytes and the count
        self.file.seek(SeekFrom::Current(8))?;
        let block_count = self.file.read_u32::<LittleEndian>()?;

        let mut locators = Vec::with_capacity(block_count as usize);
        for _ in 0..block_count {
            locators.push(BlockLocator::read(&mut self.file)?);
        }

        let payload_base = offset + u64::from(header.size);
        let mut data = Vec::with_capacity(header.raw_file_size as usize);
        for locator in &locators {
            let pos = payload_base
                .checked_add_signed(i64::from(locator.offset))
                .ok_or(Error::Truncated)?;
            data.extend_from_slice(&self.read_block(pos)?);
        }
        Ok(data)
    }

    fn read_model(&mut self, offset: u64, header: &RecordHeader) -> Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(offset + 12))?;
        let info = ModelRecordHeader::read(&mut self.file)?;

        let mut block_sizes = vec![0u16; info.block_counts.total()];
        self.file.read_u16_into::<LittleEndian>(&mut block_sizes)?;

        let payload_base = offset + u64::from(header.size);
        let mut current_block = 0usize;
        let mut out = Cursor::new(Vec::new());
        out.seek(SeekFrom::Start(MODEL_HEADER_SIZE))?;

        let stack_size = self.copy_section(
            payload_base,
            info.offsets.stack,
            info.block_counts.stack,
            &block_sizes,
            &mut current_block,
            &mut out,
        )? as u32;
        let runtime_size = self.copy_section(
            payload_base,
            info.offsets.runtime,
            info.block_counts.runtime,
            &block_sizes,
            &mut current_block,
            &mut out,
        )? as u32;

        let mut vertex_offsets = [0u32; 3];
        let mut vertex_sizes = [0u32; 3];
        let mut index_offsets = [0u32; 3];
        let mut index_sizes = [0u32; 3];

        for lod in 0..3 {
            if info.block_counts.vertex[lod] != 0 {
                let position = out.position() as u32;
                vertex_offsets[lod] = if lod == 0 || position != vertex_offsets[lod - 1] {
                    position
                } else {
                    0
                };
                vertex_sizes[lod] = self.copy_section(
                    payload_base,
                    info.offsets.vertex[lod],
                    info.block_counts.vertex[lod],
                    &block_sizes,
                    &mut current_block,
                    &mut out,
                )? as u32;
            }

            // edge geometry is never emitted

            if info.block_counts.index[lod] != 0 {
                let position = out.position() as u32;
                index_offsets[lod] = if lod == 0 || position != index_offsets[lod - 1] {
                    position
                } else {
                    0
                };
                index_sizes[lod] = self.copy_section(
                    payload_base,
                    info.offsets.index[lod],
                    info.block_counts.index[lod],
                    &block_sizes,
                    &mut current_block,
                    &mut out,
                )? as u32;
            }
        }

        // rewind and emit the .mdl header over the reserved prefix
        out.seek(SeekFrom::Start(0))?;
        out.write_u32::<LittleEndian>(info.version)?;
        out.write_u32::<LittleEndian>(stack_size)?;
        out.write_u32::<LittleEndian>(runtime_size)?;
        out.write_u16::<LittleEndian>(info.vertex_declaration_count)?;
        out.write_u16::<LittleEndian>(info.material_count)?;
        for value in vertex_offsets
            .iter()
            .chain(index_offsets.iter())
            .chain(vertex_sizes.iter())
            .chain(index_sizes.iter())
        {
            out.write_u32::<LittleEndian>(*value)?;
        }
        out.write_u8(info.lod_count)?;
        out.write_u8(u8::from(info.index_buffer_streaming_enabled))?;
        out.write_u8(u8::from(info.edge_geometry_enabled))?;
        out.write_u8(0)?; // padding

        Ok(out.into_inner())
    }

    /// Copy one model section's blocks into `out`, advancing the shared
    /// block-size cursor, and return the number of bytes emitted.
    fn copy_section(
        &mut self,
        payload_base: u64,
        section_offset: u32,
        block_count: u16,
        block_sizes: &[u16],
        current_block: &mut usize,
        out: &mut Cursor<Vec<u8>>,
    ) -> Result<u64> {
        self.file
            .seek(SeekFrom::Start(payload_base + u64::from(section_offset)))?;
        let section_start = out.position();
        for _ in 0..block_count {
            let pos = self.file.stream_position()?;
            let data = self.read_block(pos)?;
            out.write_all(&data)?;

            let compressed_size = *block_sizes.get(*current_block).ok_or(Error::Truncated)?;
            self.file
                .seek(SeekFrom::Start(pos + u64::from(compressed_size)))?;
            *current_block += 1;
        }
        Ok(out.position() - section_start)
    }

    /// Decode the payload block whose header sits at `pos`.
    fn read_block(&mut self, pos: u64) -> Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(pos))?;
        let _size = self.file.read_u32::<LittleEndian>()?;
        self.file.seek(SeekFrom::Current(4))?;
        let compressed_len = self.file.read_u32::<LittleEndian>()?;
        let decompressed_len = self.file.read_u32::<LittleEndian>()?;

        if compressed_len >= COMPRESSION_THRESHOLD {
            // stored: the payload follows the header uncompressed
            let mut data = vec![0u8; decompressed_len as usize];
            self.file.read_exact(&mut data)?;
            Ok(data)
        } else {
            let mut compressed = vec![0u8; compressed_len as usize];
            self.file.read_exact(&mut compressed)?;
            inflate_raw(&compressed, decompressed_len as usize)
        }
    }
}
