//! EXL: the sheet directory.
//!
//! A plain text file of `name,id` lines. The first line is an
//! `EXLT,<version>` header and carries no row. `exd/root.exl` is the root
//! directory every [`crate::sqpack::GameData`] loads at construction.

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExlRow {
    pub name: String,
    pub id: i32,
}

#[derive(Debug, Default)]
pub struct Exl {
    pub rows: Vec<ExlRow>,
}

impl Exl {
    pub fn read(data: &[u8]) -> Result<Exl> {
        let text = String::from_utf8_lossy(data);

        let mut rows = Vec::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            if number == 0 && line.starts_with("EXLT") {
                continue;
            }

            let (name, id) = line
                .split_once(',')
                .ok_or(Error::BadMagic { what: "exl row" })?;
            let id = id
                .trim()
                .parse::<i32>()
                .map_err(|_| Error::BadMagic { what: "exl row" })?;
            rows.push(ExlRow {
                name: name.to_owned(),
                id,
            });
        }

        Ok(Exl { rows })
    }
}
