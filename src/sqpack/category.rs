//! The fixed table of content categories.
//!
//! The first component of every logical path names a category, and the
//! category's one-byte id is the leading pair of hex digits in the index and
//! dat filenames.

use num_enum::{IntoPrimitive, TryFromPrimitive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum Category {
    Common = 0,
    BgCommon = 1,
    Bg = 2,
    Cut = 3,
    Chara = 4,
    Shader = 5,
    Ui = 6,
    Sound = 7,
    Vfx = 8,
    UiScript = 9,
    Exd = 10,
    GameScript = 11,
    Music = 12,
    SqpackTest = 13,
    Debug = 14,
}

impl Category {
    /// Look up a category by its path-component name.
    pub fn from_name(name: &str) -> Option<Category> {
        Some(match name {
            "common" => Category::Common,
            "bgcommon" => Category::BgCommon,
            "bg" => Category::Bg,
            "cut" => Category::Cut,
            "chara" => Category::Chara,
            "shader" => Category::Shader,
            "ui" => Category::Ui,
            "sound" => Category::Sound,
            "vfx" => Category::Vfx,
            "ui_script" => Category::UiScript,
            "exd" => Category::Exd,
            "game_script" => Category::GameScript,
            "music" => Category::Music,
            "sqpack_test" => Category::SqpackTest,
            "debug" => Category::Debug,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Common => "common",
            Category::BgCommon => "bgcommon",
            Category::Bg => "bg",
            Category::Cut => "cut",
            Category::Chara => "chara",
            Category::Shader => "shader",
            Category::Ui => "ui",
            Category::Sound => "sound",
            Category::Vfx => "vfx",
            Category::UiScript => "ui_script",
            Category::Exd => "exd",
            Category::GameScript => "game_script",
            Category::Music => "music",
            Category::SqpackTest => "sqpack_test",
            Category::Debug => "debug",
        }
    }
}
