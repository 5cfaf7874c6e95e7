//! Shared types and enums used across sampleview.
//! Includes `SampleKind`, the declared on-disk `DataType`, `ByteOrder`,
//! `BitmaskOp`, and the image `OutputFormat`.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// In-memory element kind of a sample array.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum SampleKind {
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
}

impl SampleKind {
    pub fn bits(self) -> u32 {
        match self {
            SampleKind::Int8 => 8,
            SampleKind::Int16 => 16,
            SampleKind::Int32 | SampleKind::Float32 => 32,
            SampleKind::Int64 | SampleKind::Float64 => 64,
        }
    }

    pub fn size_in_bytes(self) -> usize {
        (self.bits() / 8) as usize
    }

    pub fn is_integer(self) -> bool {
        !matches!(self, SampleKind::Float32 | SampleKind::Float64)
    }
}

impl std::fmt::Display for SampleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SampleKind::Int8 => "Int8",
            SampleKind::Int16 => "Int16",
            SampleKind::Int32 => "Int32",
            SampleKind::Int64 => "Int64",
            SampleKind::Float32 => "Float32",
            SampleKind::Float64 => "Float64",
        };
        write!(f, "{}", s)
    }
}

/// Element type as declared by the dataset.
///
/// Unsigned integers have no in-memory kind of their own: they are held in the
/// next wider signed kind and carried with an `is_unsigned` flag.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl DataType {
    /// Storage kind and unsigned flag for this declared type.
    pub fn storage(self) -> Result<(SampleKind, bool)> {
        Ok(match self {
            DataType::I8 => (SampleKind::Int8, false),
            DataType::U8 => (SampleKind::Int16, true),
            DataType::I16 => (SampleKind::Int16, false),
            DataType::U16 => (SampleKind::Int32, true),
            DataType::I32 => (SampleKind::Int32, false),
            DataType::U32 => (SampleKind::Int64, true),
            DataType::I64 => (SampleKind::Int64, false),
            DataType::U64 => {
                return Err(Error::UnsupportedType {
                    kind: "uint64".to_string(),
                });
            }
            DataType::F32 => (SampleKind::Float32, false),
            DataType::F64 => (SampleKind::Float64, false),
        })
    }

    /// Width of one element in the file, before any unsigned upgrade.
    pub fn file_size_in_bytes(self) -> usize {
        match self {
            DataType::I8 | DataType::U8 => 1,
            DataType::I16 | DataType::U16 => 2,
            DataType::I32 | DataType::U32 | DataType::F32 => 4,
            DataType::I64 | DataType::U64 | DataType::F64 => 8,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DataType::I8 => "i8",
            DataType::U8 => "u8",
            DataType::I16 => "i16",
            DataType::U16 => "u16",
            DataType::I32 => "i32",
            DataType::U32 => "u32",
            DataType::I64 => "i64",
            DataType::U64 => "u64",
            DataType::F32 => "f32",
            DataType::F64 => "f64",
        };
        write!(f, "{}", s)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum ByteOrder {
    Little,
    Big,
}

impl Default for ByteOrder {
    fn default() -> Self {
        ByteOrder::Little
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum BitmaskOp {
    /// Keep selected bits in place, zero the rest
    And,
    /// Pack selected bits into the low bits of the value
    Extract,
}

impl std::fmt::Display for BitmaskOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BitmaskOp::And => write!(f, "And"),
            BitmaskOp::Extract => write!(f, "Extract"),
        }
    }
}

#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Debug,
    ValueEnum,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum OutputFormat {
    TIFF,
    JPEG, // Lossy, preview only
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::TIFF => "tiff",
            OutputFormat::JPEG => "jpg",
        }
    }
}
