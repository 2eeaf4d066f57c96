//! Text codec
//!
//! Indented, bracketed, line-oriented output that diffs well under version
//! control:
//!
//! ```text
//! Version 1
//! 4
//! [Collection 2 
//! 	0,
//! 	1,
//! ]
//! [String 14 "This is a test"]
//! [Probe
//! 	4.5
//! ]
//! ```
//!
//! Like the binary codec it carries no schema; a reader replays the writer's
//! call sequence. The strict reader checks every delimiter and keyword and
//! reports the first mismatch as [`FormatDesync`](crate::ArchiveError::FormatDesync).
//! The permissive reader skips fixed-width tokens without looking at them.

mod reader;
mod writer;

pub use reader::TextReader;
pub use writer::TextWriter;

/// Whether primitives are followed by a list separator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Default,
    List,
}

pub(crate) mod token {
    pub const INDENT: u8 = b'\t';
    pub const SPACE: u8 = b' ';
    pub const LIST_SEPARATOR: u8 = b',';
    pub const QUOTE: u8 = b'"';
    pub const BRACKET_OPEN: u8 = b'[';
    pub const BRACKET_CLOSE: u8 = b']';
    pub const EOL: u8 = b'\n';

    pub const VERSION: &str = "Version";
    pub const COLLECTION: &str = "Collection";
    pub const STRING: &str = "String";

    use crate::category::CollectionKind;

    /// Keyword opening a collection envelope of the given kind
    pub fn collection_keyword(kind: CollectionKind) -> &'static str {
        if kind.is_text() { STRING } else { COLLECTION }
    }
}
