//! The top-level interface to a set of SqPack repositories. A [`GameData`]
//! resolves logical paths to `(repository, category)`, consults the hash
//! indices, and reassembles file payloads out of the data files. It also
//! owns the sheet directory (`exd/root.exl`) used by the Excel decoders.

use std::io;
use std::path::{Path, PathBuf};

use crate::crc;
use crate::error::{Error, Result};
use crate::excel::exd::{page_filename, Exd};
use crate::excel::exh::{Exh, Pagination};
use crate::excel::exl::{Exl, ExlRow};
use crate::excel::language::Language;

use super::category::Category;
use super::dat::DatFile;
use super::index::IndexTable;
use super::repository::{Repository, RepositoryKind};

#[derive(Debug)]
pub struct GameData {
    data_dir: PathBuf,
    repositories: Vec<Repository>,
    sheets: Vec<ExlRow>,
}

impl GameData {
    /// Open a data directory (the parent of the `ffxiv`/`ex1`/... trees),
    /// discover its repositories, and load the sheet directory.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<GameData> {
        let data_dir = data_dir.as_ref().to_path_buf();
        let repositories = Repository::discover(&data_dir)?;
        let mut game = GameData {
            data_dir,
            repositories,
            sheets: Vec::new(),
        };
        if let Some(bytes) = game.read("exd/root.exl")? {
            game.sheets = Exl::read(&bytes)?.rows;
        }
        Ok(game)
    }

    /// The 64-bit content hash used by the index tables.
    pub fn hash(path: &str) -> u64 {
        crc::hash_path(path)
    }

    /// Resolve a logical path to its owning repository and category.
    ///
    /// A leading repository name is tolerated (`ffxiv/exd/root.exl`); the
    /// canonical form starts with the category, with an expansion name as
    /// the second component for expansion content (`bg/ex1/...`).
    pub fn resolve(&self, path: &str) -> Result<(&Repository, Category)> {
        let mut tokens = path.split('/');
        let first = tokens.next().unwrap_or("");
        let second = tokens.next();

        if let Some(repository) = self.repositories.iter().find(|r| r.name == first) {
            let name = second.unwrap_or("");
            let category =
                Category::from_name(name).ok_or_else(|| Error::UnknownCategory(name.to_owned()))?;
            return Ok((repository, category));
        }

        let category =
            Category::from_name(first).ok_or_else(|| Error::UnknownCategory(first.to_owned()))?;

        if let Some(second) = second {
            let expansion = self
                .repositories
                .iter()
                .find(|r| matches!(r.kind, RepositoryKind::Expansion(_)) && r.name == second);
            if let Some(repository) = expansion {
                return Ok((repository, category));
            }
        }

        Ok((self.base_repository()?, category))
    }

    fn base_repository(&self) -> Result<&Repository> {
        self.repositories
            .iter()
            .find(|r| r.kind == RepositoryKind::Base)
            .ok_or(Error::NoBaseRepository)
    }

    fn repository_dir(&self, repository: &Repository) -> PathBuf {
        self.data_dir.join(&repository.name)
    }

    /// Open the index pair for a category. A category with no index files on
    /// disk holds no files, which is absence rather than failure.
    fn open_index(&self, repository: &Repository, category: Category) -> Result<Option<IndexTable>> {
        match IndexTable::open(&self.repository_dir(repository), repository, category) {
            Ok(table) => Ok(Some(table)),
            Err(Error::IoUnavailable(e)) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Whether a logical path is present in either index of its category.
    pub fn exists(&self, path: &str) -> Result<bool> {
        let (repository, category) = self.resolve(path)?;
        let Some(index) = self.open_index(repository, category)? else {
            return Ok(false);
        };
        Ok(index.find(crc::hash_path(path)).is_some())
    }

    /// Read a logical path into an owned buffer. `Ok(None)` means the path
    /// is not present; structural failures propagate.
    pub fn read(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let (repository, category) = self.resolve(path)?;
        let Some(index) = self.open_index(repository, category)? else {
            return Ok(None);
        };
        let Some(entry) = index.find(crc::hash_path(path)) else {
            return Ok(None);
        };

        let dat_path = self
            .repository_dir(repository)
            .join(repository.dat_filename(category, entry.data_file_id));
        let mut dat = DatFile::open(dat_path)?;
        Ok(Some(dat.read_entry(entry.data_offset())?))
    }

    /// The parsed index of the repository/category that owns `folder`.
    pub fn list(&self, folder: &str) -> Result<IndexTable> {
        let (repository, category) = self.resolve(folder)?;
        IndexTable::open(&self.repository_dir(repository), repository, category)
    }

    /// Sheet names from the root sheet directory, in file order.
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|row| row.name.as_str())
    }

    /// Look up a sheet by name (case-insensitive) and read its schema.
    pub fn read_sheet(&self, name: &str) -> Result<Option<Exh>> {
        let Some(row) = self
            .sheets
            .iter()
            .find(|row| row.name.eq_ignore_ascii_case(name))
        else {
            return Ok(None);
        };

        let path = format!("exd/{}.exh", row.name.to_lowercase());
        match self.read(&path)? {
            Some(bytes) => Ok(Some(Exh::read(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Read and decode one page of a sheet.
    pub fn read_sheet_page(
        &self,
        name: &str,
        exh: &Exh,
        page: &Pagination,
        language: Language,
    ) -> Result<Option<Exd>> {
        let path = format!(
            "exd/{}",
            page_filename(&name.to_lowercase(), page, language)
        );
        match self.read(&path)? {
            Some(bytes) => Ok(Some(Exd::read(exh, &bytes)?)),
            None => Ok(None),
        }
    }
}
