//! The language table carried by EXH schemas.

use num_enum::{FromPrimitive, IntoPrimitive};

/// A sheet language. `None` marks language-neutral sheets, whose page files
/// carry no language suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, FromPrimitive)]
#[repr(u16)]
pub enum Language {
    #[num_enum(default)]
    None = 0,
    Japanese = 1,
    English = 2,
    German = 3,
    French = 4,
    ChineseSimplified = 5,
    ChineseTraditional = 6,
    Korean = 7,
}

impl Language {
    /// The filename qualifier for this language, if it has one.
    pub fn code(self) -> Option<&'static str> {
        match self {
            Language::None => None,
            Language::Japanese => Some("ja"),
            Language::English => Some("en"),
            Language::German => Some("de"),
            Language::French => Some("fr"),
            Language::ChineseSimplified => Some("chs"),
            Language::ChineseTraditional => Some("cht"),
            Language::Korean => Some("ko"),
        }
    }
}
