//! Binary codec
//!
//! Layout: `[u32 version][payload]`. Primitives are their raw host-order
//! bytes, collections are `[u32 count][elements]`, and runs of plain numeric
//! elements are stored as one contiguous blob. Nothing is padded, aligned or
//! tagged, so a reader must replay the writer's exact call sequence.

mod reader;
mod writer;

pub use reader::BinaryReader;
pub use writer::BinaryWriter;
