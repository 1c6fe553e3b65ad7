//! Zero-copy JSON tree parser.
//!
//! [`parse`] makes one pass over the input and links every object, array and
//! scalar into a tree of arena-allocated [`Node`]s. Keys and scalar values are
//! spans into the input, so the [`Document`] borrows the buffer it came from.
//!
//! The parser does not validate the grammar. Structural problems it notices
//! are reported through [`Document::anomalies`] instead of failing the call.
//!
//! ```
//! let doc = spanjson::parse(r#"{"a":1,"b":[2,3,4]}"#).unwrap();
//! let b = doc.get("b").and_then(|node| node.as_array()).unwrap();
//! assert_eq!(b.count(), 3);
//! assert_eq!(doc.get("a").and_then(|node| node.text()), Some("1"));
//! ```

pub mod access;
pub mod arena;
pub mod constants;
pub mod decode;
pub mod document;
pub mod error;
pub mod options;
pub mod parallel;

pub use crate::access::{array_f32, ArrayRef, Children, NodeRef};
pub use crate::arena::{Arena, NodeId};
pub use crate::document::{Anomaly, Document, DocumentStats, Kind, Node, NodeValue, Span};
pub use crate::error::Error;
pub use crate::options::{ArenaConfig, ParseMode, ParseOptions};
pub use crate::parallel::parse_batch;

pub type Result<T> = std::result::Result<T, Error>;

/// Parses `input` in forward mode with the default arena.
pub fn parse(input: &str) -> Result<Document<'_>> {
    parse_with_options(input, &ParseOptions::default())
}

/// Parses `input` in reverse mode: every child list comes out reversed.
pub fn parse_reverse(input: &str) -> Result<Document<'_>> {
    parse_with_options(input, &ParseOptions::reverse())
}

pub fn parse_with_options<'a>(input: &'a str, options: &ParseOptions) -> Result<Document<'a>> {
    decode::parse(input, options)
}

/// Parses raw bytes, checking UTF-8 up to the first NUL.
pub fn parse_bytes<'a>(input: &'a [u8], options: &ParseOptions) -> Result<Document<'a>> {
    decode::parse_bytes(input, options)
}
