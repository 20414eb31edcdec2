//! Sqpeek provides a read-only ***Sq***Pack interface. The API focuses on resolving
//! logical game paths (`category/.../name.ext`) to byte buffers and on decoding the
//! tabular "Excel" data (EXH/EXL/EXD) that ships inside the archives.
//!
//! # Usage Example
//! ```no_run
//! use sqpeek::sqpack::GameData;
//! fn print_sheet_names() -> sqpeek::Result<()> {
//!     // Open the data directory that holds the ffxiv/ex1/ex2/... repositories
//!     let game = GameData::new("game/sqpack")?;
//!
//!     // Pull a file out of the archives
//!     if let Some(bytes) = game.read("exd/root.exl")? {
//!         println!("root.exl is {} bytes", bytes.len());
//!     }
//!
//!     // List the known Excel sheets
//!     for name in game.sheet_names() {
//!         println!("{}", name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Scope
//! Sqpeek only reads. There is no write path, no patching, and no rendering;
//! the model assembler reproduces the raw `.mdl` byte layout that downstream
//! geometry decoders consume, nothing more. Only the `win32` platform variant
//! of the archives is understood.
//!

pub mod buffer;
pub mod compression;
pub mod crc;
pub mod error;
pub mod excel;
pub mod numeric;
pub mod sqpack;

pub use error::{Error, Result};
