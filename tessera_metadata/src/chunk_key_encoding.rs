use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A chunk key separator.
#[derive(Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, Debug, Display)]
pub enum ChunkKeySeparator {
    /// The slash `/` character.
    #[serde(rename = "/")]
    #[display("/")]
    Slash,
    /// The dot `.` character.
    #[serde(rename = ".")]
    #[display(".")]
    Dot,
}

impl ChunkKeySeparator {
    /// Return the separator as a character.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Slash => '/',
            Self::Dot => '.',
        }
    }
}

const fn slash() -> ChunkKeySeparator {
    ChunkKeySeparator::Slash
}

const fn dot() -> ChunkKeySeparator {
    ChunkKeySeparator::Dot
}

/// Chunk key encoding metadata.
///
/// - `default`: keys are `c/1/2` (or `c.1.2` with the `.` separator),
/// - `v2`: keys are `1.2` (or `1/2` with the `/` separator).
///
/// A zero dimensional array has the key `c` with the `default` encoding and `0` with the `v2` encoding.
#[derive(Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, Debug)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum ChunkKeyEncodingMetadata {
    /// The `default` chunk key encoding.
    Default {
        /// The separator.
        #[serde(default = "slash")]
        separator: ChunkKeySeparator,
    },
    /// The `v2` chunk key encoding.
    V2 {
        /// The separator.
        #[serde(default = "dot")]
        separator: ChunkKeySeparator,
    },
}

impl Default for ChunkKeyEncodingMetadata {
    fn default() -> Self {
        Self::Default {
            separator: ChunkKeySeparator::Slash,
        }
    }
}

impl ChunkKeyEncodingMetadata {
    /// The `v2` chunk key encoding with a `.` separator.
    #[must_use]
    pub const fn v2() -> Self {
        Self::V2 {
            separator: ChunkKeySeparator::Dot,
        }
    }
}
