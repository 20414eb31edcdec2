//! EXD: one page of sheet row data.
//!
//! A page file starts with an offset table mapping row ids to absolute byte
//! offsets. Each target holds a 6-byte row header (`data_size`,
//! `subrow_count`) followed by the row's fixed part and its string area.
//! Multi-byte scalars are big-endian throughout.

use byteorder::BigEndian;

use crate::buffer::{ByteSpan, Whence};
use crate::error::{Error, Result};

use super::exh::{ColumnKind, Exh, Pagination};
use super::language::Language;

pub const EXD_MAGIC: &[u8; 4] = b"EXDF";

/// The page filename for a sheet: `<sheet>_<start_id>.exd`, with the
/// language code appended for localized sheets.
pub fn page_filename(sheet: &str, page: &Pagination, language: Language) -> String {
    match language.code() {
        Some(code) => format!("{}_{}_{}.exd", sheet, page.start_id, code),
        None => format!("{}_{}.exd", sheet, page.start_id),
    }
}

/// A decoded cell value. The on-disk kind survives next to it in [`Cell`];
/// integer widths widen into `Int`/`UInt` but signedness is never erased.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub kind: ColumnKind,
    pub value: CellValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub row_id: u32,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Default)]
pub struct Exd {
    pub rows: Vec<Row>,
}

impl Exd {
    pub fn read(exh: &Exh, data: &[u8]) -> Result<Exd> {
        let mut span = ByteSpan::new(data);

        if span.read_bytes(4)? != EXD_MAGIC {
            return Err(Error::BadMagic { what: "exd header" });
        }
        span.skip(2)?; // version
        span.skip(2)?;
        let index_size = span.read_u32::<BigEndian>()?;
        span.skip(20)?; // unknown trailer

        let mut offsets = Vec::with_capacity((index_size / 8) as usize);
        for _ in 0..index_size / 8 {
            let row_id = span.read_u32::<BigEndian>()?;
            let offset = span.read_u32::<BigEndian>()?;
            offsets.push((row_id, offset));
        }

        let mut rows = Vec::new();
        for expected_id in 0..exh.header.row_count {
            let Some(&(row_id, offset)) = offsets.iter().find(|(id, _)| *id == expected_id) else {
                continue;
            };

            span.seek(offset as usize, Whence::Set)?;
            let _data_size = span.read_u32::<BigEndian>()?;
            let subrow_count = span.read_u16::<BigEndian>()?;
            let base = offset as usize + 6;

            if subrow_count > 1 {
                for subrow in 0..usize::from(subrow_count) {
                    let row_base =
                        base + subrow * (usize::from(exh.header.data_offset) + 2) + 2;
                    rows.push(Row {
                        row_id,
                        cells: read_row(exh, data, row_base)?,
                    });
                }
            } else {
                rows.push(Row {
                    row_id,
                    cells: read_row(exh, data, base)?,
                });
            }
        }

        Ok(Exd { rows })
    }
}

/// Decode every column of the row whose fixed part starts at `row_base`.
fn read_row(exh: &Exh, data: &[u8], row_base: usize) -> Result<Vec<Cell>> {
    let mut cells = Vec::with_capacity(exh.columns.len());
    for column in &exh.columns {
        let mut span = ByteSpan::new(data);
        span.seek(row_base + usize::from(column.offset), Whence::Set)?;

        let value = match column.kind {
            ColumnKind::String => {
                // the cell holds an offset into the row's string area
                let string_offset = span.read_u32::<BigEndian>()?;
                span.seek(
                    row_base + usize::from(exh.header.data_offset) + string_offset as usize,
                    Whence::Set,
                )?;
                let bytes = span.read_cstring()?;
                CellValue::String(String::from_utf8_lossy(bytes).into_owned())
            }
            ColumnKind::Bool => CellValue::Bool(span.read_u8()? != 0),
            ColumnKind::Int8 => CellValue::Int(i64::from(span.read_i8()?)),
            ColumnKind::UInt8 => CellValue::UInt(u64::from(span.read_u8()?)),
            ColumnKind::Int16 => CellValue::Int(i64::from(span.read_i16::<BigEndian>()?)),
            ColumnKind::UInt16 => CellValue::UInt(u64::from(span.read_u16::<BigEndian>()?)),
            ColumnKind::Int32 => CellValue::Int(i64::from(span.read_i32::<BigEndian>()?)),
            ColumnKind::UInt32 => CellValue::UInt(u64::from(span.read_u32::<BigEndian>()?)),
            ColumnKind::Int64 => CellValue::Int(span.read_i64::<BigEndian>()?),
            ColumnKind::UInt64 => CellValue::UInt(span.read_u64::<BigEndian>()?),
            ColumnKind::Float32 => CellValue::Float(span.read_f32::<BigEndian>()?),
            packed => {
                let bit = packed.packed_bit().ok_or(Error::BadMagic {
                    what: "excel column type",
                })?;
                let raw = span.read_u32::<BigEndian>()?;
                CellValue::Bool(raw & (1u32 << bit) != 0)
            }
        };

        cells.push(Cell {
            kind: column.kind,
            value,
        });
    }
    Ok(cells)
}
