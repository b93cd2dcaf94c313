//! # aamp
//!
//! A pure Rust library for reading and writing Nintendo AAMP (binary
//! parameter archive) files, plus a textual YAML-based surface format and
//! a heuristic for recovering the original names behind each archive's
//! CRC32 keys.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use aamp::io::reader::decode;
//! use aamp::io::writer::write;
//!
//! let pio = decode(&bytes)?;
//! let reencoded = write(&pio)?;
//! # Ok::<(), aamp::error::AampError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - leaf value types and the CRC32 key newtype
//! - [`parameter`] - the parameter tree data model (`ParameterIO`,
//!   `ParameterList`, `ParameterObject`, `Parameter`)
//! - [`io`] - the binary reader/writer and the YAML document-tree bridge
//! - [`names`] - the name-recovery heuristic
//! - [`error`] - the crate's error type

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod io;
pub mod names;
pub mod parameter;
pub mod types;

pub use error::{AampError, Result};
pub use io::doc_tree::{from_doc_tree, to_doc_tree};
pub use io::{decode, write, Reader, ReaderConfig};
pub use names::NameResolver;
pub use parameter::{Parameter, ParameterIO, ParameterList, ParameterObject};
pub use types::Crc32;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
