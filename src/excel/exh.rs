//! EXH: the per-sheet schema file.
//!
//! An EXH describes the row layout (column types and offsets), the page
//! split of the row data, and the languages the sheet is available in. The
//! header and table scalars are big-endian on disk; the trailing language
//! list alone is little-endian, mirroring how the game writes it.

use byteorder::{BigEndian, LittleEndian};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::buffer::ByteSpan;
use crate::error::{Error, Result};

use super::language::Language;

pub const EXH_MAGIC: &[u8; 4] = b"EXHF";

/// The on-disk column value type. The eight `PackedBool` variants address a
/// single bit within a 32-bit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum ColumnKind {
    String = 0x0,
    Bool = 0x1,
    Int8 = 0x2,
    UInt8 = 0x3,
    Int16 = 0x4,
    UInt16 = 0x5,
    Int32 = 0x6,
    UInt32 = 0x7,
    Float32 = 0x9,
    Int64 = 0xA,
    UInt64 = 0xB,
    PackedBool0 = 0x19,
    PackedBool1 = 0x1A,
    PackedBool2 = 0x1B,
    PackedBool3 = 0x1C,
    PackedBool4 = 0x1D,
    PackedBool5 = 0x1E,
    PackedBool6 = 0x1F,
    PackedBool7 = 0x20,
}

impl ColumnKind {
    /// For the packed-bool kinds, which bit of the backing `u32` holds the
    /// value.
    pub fn packed_bit(self) -> Option<u8> {
        let raw = u16::from(self);
        let base = u16::from(ColumnKind::PackedBool0);
        if (base..=u16::from(ColumnKind::PackedBool7)).contains(&raw) {
            Some((raw - base) as u8)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnDefinition {
    pub kind: ColumnKind,
    pub offset: u16,
}

/// One page of row data: its first row id and how many rows it holds.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub start_id: u32,
    pub row_count: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct ExhHeader {
    /// Byte size of one row's fixed part; the string area begins here.
    pub data_offset: u16,
    pub column_count: u16,
    pub page_count: u16,
    pub language_count: u16,
    pub row_count: u32,
}

#[derive(Debug)]
pub struct Exh {
    pub header: ExhHeader,
    pub columns: Vec<ColumnDefinition>,
    pub pages: Vec<Pagination>,
    pub languages: Vec<Language>,
}

impl Exh {
    pub fn read(data: &[u8]) -> Result<Exh> {
        let mut span = ByteSpan::new(data);

        if span.read_bytes(4)? != EXH_MAGIC {
            return Err(Error::BadMagic { what: "exh header" });
        }
        span.skip(2)?; // unknown
        let data_offset = span.read_u16::<BigEndian>()?;
        let column_count = span.read_u16::<BigEndian>()?;
        let page_count = span.read_u16::<BigEndian>()?;
        let language_count = span.read_u16::<BigEndian>()?;
        span.skip(2)?; // unknown
        span.skip(2)?; // u8 pair: unknown, variant
        span.skip(2)?; // unknown
        let row_count = span.read_u32::<BigEndian>()?;
        span.skip(8)?; // unknown trailer

        let header = ExhHeader {
            data_offset,
            column_count,
            page_count,
            language_count,
            row_count,
        };

        let mut columns = Vec::with_capacity(header.column_count as usize);
        for _ in 0..header.column_count {
            let raw_kind = span.read_u16::<BigEndian>()?;
            let kind = ColumnKind::try_from(raw_kind).map_err(|_| Error::BadMagic {
                what: "excel column type",
            })?;
            columns.push(ColumnDefinition {
                kind,
                offset: span.read_u16::<BigEndian>()?,
            });
        }

        let mut pages = Vec::with_capacity(header.page_count as usize);
        for _ in 0..header.page_count {
            pages.push(Pagination {
                start_id: span.read_u32::<BigEndian>()?,
                row_count: span.read_u32::<BigEndian>()?,
            });
        }

        let mut languages = Vec::with_capacity(header.language_count as usize);
        for _ in 0..header.language_count {
            languages.push(Language::from(span.read_u16::<LittleEndian>()?));
        }

        Ok(Exh {
            header,
            columns,
            pages,
            languages,
        })
    }
}
