//! Serialization strategies and archive roles

use std::fmt;

/// How a value of a given type is encoded
///
/// Resolved at compile time through [`Serializable::CATEGORY`](crate::Serializable::CATEGORY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    /// Fixed-width integer, float, bool or character
    Primitive,
    /// Owned pointer to a primitive, or a length-prefixed character string
    PrimitivePointer,
    /// Length-prefixed homogeneous sequence
    Array,
    /// Structured value with its own save/load body
    Composite,
    /// Owned pointer to a structured value; reads allocate before populating
    CompositePointer,
}

impl TypeCategory {
    /// Category of an owned pointer whose target has category `target`
    ///
    /// At most one level of indirection is stripped.
    pub const fn pointer_to(target: TypeCategory) -> TypeCategory {
        match target {
            TypeCategory::Primitive => TypeCategory::PrimitivePointer,
            TypeCategory::Composite => TypeCategory::CompositePointer,
            other => other,
        }
    }

    /// Whether values are bracketed by `write_composite` / `read_composite`
    pub const fn is_composite(self) -> bool {
        matches!(
            self,
            TypeCategory::Composite | TypeCategory::CompositePointer
        )
    }
}

/// Direction an archive moves data in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Reader,
    Writer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Reader => f.write_str("reader"),
            Role::Writer => f.write_str("writer"),
        }
    }
}

/// Shape of a collection envelope
///
/// Character strings get their own envelope in the text codec; binary
/// codecs only store the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// Sequence of arbitrary elements
    Elements,
    /// Narrow characters (bytes)
    NarrowText,
    /// Wide characters (UTF-16 code units)
    WideText,
}

impl CollectionKind {
    pub const fn is_text(self) -> bool {
        matches!(self, CollectionKind::NarrowText | CollectionKind::WideText)
    }
}
