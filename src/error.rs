//! Error types for the aamp library

use std::io;
use thiserror::Error;

/// Main error type for parameter archive operations
#[derive(Debug, Error)]
pub enum AampError {
    /// IO error occurred while a CLI or file-based caller read/wrote a file.
    /// The reader and writer themselves operate on in-memory buffers and
    /// never raise this variant directly.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The first four bytes were not `AAMP`.
    #[error("invalid magic: {0:?} (expected \"AAMP\")")]
    InvalidMagic([u8; 4]),

    /// The header flags field did not have the little-endian bit set.
    #[error("unsupported endianness: only little-endian archives are supported")]
    UnsupportedEndianness,

    /// The header flags field did not have the UTF-8 bit set.
    #[error("unsupported encoding: only UTF-8 archives are supported")]
    UnsupportedEncoding,

    /// A parameter record's type tag did not match any known variant.
    #[error("unknown parameter type: {0}")]
    UnknownParameterType(u8),

    /// A read would have gone past the end of the input buffer.
    #[error("truncated archive: offset {0:#x} is past the end of the input")]
    Truncated(usize),

    /// The writer was given a value with no defined wire encoding.
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    /// A computed relative offset did not fit in its field's width.
    #[error("offset overflow in {record}: {offset:#x} does not fit in {bits} bits")]
    OffsetOverflow {
        record: String,
        offset: u64,
        bits: u8,
    },

    /// The textual document tree was structurally invalid, e.g. a `!list`
    /// node missing its `lists` or `objects` sub-mapping.
    #[error("invalid document tree: {0}")]
    InvalidDocTree(String),

    /// Failure from the YAML document-tree layer.
    #[error("document tree error: {0}")]
    DocTree(#[from] serde_yaml::Error),

    /// CLI usage error (bad arguments, `!!` used with stdin, etc).
    #[error("{0}")]
    CliUsage(String),
}

/// Result type alias for parameter archive operations
pub type Result<T> = std::result::Result<T, AampError>;
