//! Repositories: the top-level subdirectories of a data directory.
//!
//! The base repository (`ffxiv`) holds the original game data; each
//! expansion lives in its own `exN` directory. The expansion number is the
//! middle hex pair of every sqpack filename the repository owns.

use std::fs;
use std::path::Path;

use crate::error::Result;

use super::category::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryKind {
    Base,
    Expansion(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub kind: RepositoryKind,
}

impl Repository {
    /// Classify a directory name. `exN` with a positive integer `N` is an
    /// expansion; anything else is base data.
    pub fn from_name(name: &str) -> Repository {
        let kind = match name.strip_prefix("ex") {
            Some(rest) => match rest.parse::<u32>() {
                Ok(n) if n >= 1 => RepositoryKind::Expansion(n),
                _ => RepositoryKind::Base,
            },
            None => RepositoryKind::Base,
        };
        Repository {
            name: name.to_owned(),
            kind,
        }
    }

    /// Enumerate the immediate subdirectories of `data_dir` as repositories.
    pub fn discover<P: AsRef<Path>>(data_dir: P) -> Result<Vec<Repository>> {
        let mut repositories = Vec::new();
        for entry in fs::read_dir(data_dir.as_ref())? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                repositories.push(Repository::from_name(name));
            }
        }
        // directory iteration order is platform-dependent
        repositories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(repositories)
    }

    pub fn expansion_number(&self) -> u32 {
        match self.kind {
            RepositoryKind::Base => 0,
            RepositoryKind::Expansion(n) => n,
        }
    }

    fn filename_stem(&self, category: Category) -> String {
        format!(
            "{:02x}{:02x}{:02x}.win32",
            u8::from(category),
            self.expansion_number(),
            0
        )
    }

    pub fn index_filename(&self, category: Category) -> String {
        format!("{}.index", self.filename_stem(category))
    }

    pub fn index2_filename(&self, category: Category) -> String {
        format!("{}.index2", self.filename_stem(category))
    }

    pub fn dat_filename(&self, category: Category, data_file_id: u8) -> String {
        format!("{}.dat{}", self.filename_stem(category), data_file_id)
    }
}
