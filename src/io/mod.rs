//! Binary codec for parameter archives: primitive I/O, placeholder
//! back-patching, the reader, and the writer.

pub mod doc_tree;
pub mod placeholder;
pub mod primitive;
pub mod reader;
pub mod writer;

pub use reader::{decode, Reader, ReaderConfig};
pub use writer::write;
