//! File I/O: frontmatter parsing, reading and atomic writing

pub mod frontmatter;
pub mod reader;
pub mod writer;

pub use frontmatter::{parse, serialize};
pub use reader::{has_extension, DocumentReader, ReaderConfig};
pub use writer::{DocumentWriter, WriteOptions, WriteResult, WriterConfig};
