mod category;
mod dat;
mod gamedata;
mod index;
mod repository;

pub use category::Category;
pub use dat::{DatFile, FileType};
pub use gamedata::GameData;
pub use index::{IndexEntry, IndexTable, SqPackHeader, SqPackIndexHeader, SQPACK_MAGIC};
pub use repository::{Repository, RepositoryKind};
