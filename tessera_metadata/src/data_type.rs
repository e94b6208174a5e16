use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of a [`DataType`].
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum DataTypeKind {
    /// A boolean stored as one byte, `0` or `1`.
    Bool,
    /// A signed integer.
    Int,
    /// An unsigned integer.
    UInt,
    /// An IEEE 754 floating point number.
    Float,
}

impl DataTypeKind {
    const fn code(self) -> char {
        match self {
            Self::Bool => 'b',
            Self::Int => 'i',
            Self::UInt => 'u',
            Self::Float => 'f',
        }
    }
}

/// The byte order of a multi-byte [`DataType`].
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Default)]
pub enum Endianness {
    /// Little endian.
    #[default]
    Little,
    /// Big endian.
    Big,
}

impl Endianness {
    /// Return the native endianness of the target.
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }
}

/// An unsupported data type code error.
#[derive(Clone, Debug, Error)]
#[error("unsupported data type {_0}")]
pub struct UnsupportedDataTypeError(String);

/// A fixed-width scalar data type: a kind, a byte width and an endianness.
///
/// Serialised as a `numpy` style type code, e.g. `"<f4"`, `">i8"` or `"|u1"`.
/// Single byte types have no byte order and are always serialised with `|`.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataType {
    kind: DataTypeKind,
    size: usize,
    endianness: Endianness,
}

macro_rules! data_type_constructor {
    ($name:ident, $kind:ident, $size:literal, $doc:literal) => {
        #[doc = $doc]
        #[must_use]
        pub const fn $name() -> Self {
            Self {
                kind: DataTypeKind::$kind,
                size: $size,
                endianness: Endianness::Little,
            }
        }
    };
}

impl DataType {
    /// Create a new data type.
    ///
    /// # Errors
    /// Returns [`UnsupportedDataTypeError`] if the kind does not support `size` bytes.
    pub fn new(
        kind: DataTypeKind,
        size: usize,
        endianness: Endianness,
    ) -> Result<Self, UnsupportedDataTypeError> {
        let supported = match kind {
            DataTypeKind::Bool => size == 1,
            DataTypeKind::Int | DataTypeKind::UInt => matches!(size, 1 | 2 | 4 | 8),
            DataTypeKind::Float => matches!(size, 4 | 8),
        };
        if supported {
            let endianness = if size == 1 {
                Endianness::Little
            } else {
                endianness
            };
            Ok(Self {
                kind,
                size,
                endianness,
            })
        } else {
            Err(UnsupportedDataTypeError(format!("{}{size}", kind.code())))
        }
    }

    data_type_constructor!(bool, Bool, 1, "A `bool` data type (`|b1`).");
    data_type_constructor!(int8, Int, 1, "An `int8` data type (`|i1`).");
    data_type_constructor!(int16, Int, 2, "A little endian `int16` data type (`<i2`).");
    data_type_constructor!(int32, Int, 4, "A little endian `int32` data type (`<i4`).");
    data_type_constructor!(int64, Int, 8, "A little endian `int64` data type (`<i8`).");
    data_type_constructor!(uint8, UInt, 1, "A `uint8` data type (`|u1`).");
    data_type_constructor!(uint16, UInt, 2, "A little endian `uint16` data type (`<u2`).");
    data_type_constructor!(uint32, UInt, 4, "A little endian `uint32` data type (`<u4`).");
    data_type_constructor!(uint64, UInt, 8, "A little endian `uint64` data type (`<u8`).");
    data_type_constructor!(float32, Float, 4, "A little endian `float32` data type (`<f4`).");
    data_type_constructor!(float64, Float, 8, "A little endian `float64` data type (`<f8`).");

    /// Return the data type with a different endianness. Has no effect on single byte types.
    #[must_use]
    pub const fn with_endianness(mut self, endianness: Endianness) -> Self {
        if self.size > 1 {
            self.endianness = endianness;
        }
        self
    }

    /// Return the kind.
    #[must_use]
    pub const fn kind(&self) -> DataTypeKind {
        self.kind
    }

    /// Return the size of an element in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Return the endianness.
    #[must_use]
    pub const fn endianness(&self) -> Endianness {
        self.endianness
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let byte_order = match (self.size, self.endianness) {
            (1, _) => '|',
            (_, Endianness::Little) => '<',
            (_, Endianness::Big) => '>',
        };
        write!(f, "{byte_order}{}{}", self.kind.code(), self.size)
    }
}

impl From<DataType> for String {
    fn from(data_type: DataType) -> Self {
        data_type.to_string()
    }
}

impl TryFrom<&str> for DataType {
    type Error = UnsupportedDataTypeError;

    fn try_from(code: &str) -> Result<Self, Self::Error> {
        let err = || UnsupportedDataTypeError(code.to_string());
        let mut chars = code.chars();
        let endianness = match chars.next() {
            Some('<' | '|') => Endianness::Little,
            Some('>') => Endianness::Big,
            _ => return Err(err()),
        };
        let kind = match chars.next() {
            Some('b') => DataTypeKind::Bool,
            Some('i') => DataTypeKind::Int,
            Some('u') => DataTypeKind::UInt,
            Some('f') => DataTypeKind::Float,
            _ => return Err(err()),
        };
        let size = chars.as_str().parse::<usize>().map_err(|_| err())?;
        if code.starts_with('|') != (size == 1) {
            return Err(err());
        }
        Self::new(kind, size, endianness).map_err(|_| err())
    }
}

impl TryFrom<String> for DataType {
    type Error = UnsupportedDataTypeError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::try_from(code.as_str())
    }
}
