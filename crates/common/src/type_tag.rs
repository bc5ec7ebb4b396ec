//! Type tags exchanged across the native/VM boundary.
//!
//! The tag order is part of the boundary contract: it doubles as the index
//! into [`TYPE_NAMES`].

use crate::error::TagError;

/// Identifies the kind of a value sitting on the VM stack.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeTag {
    /// No value. Reported for stack indices that address nothing.
    Invalid = 0,
    /// The null value.
    Null = 1,
    /// Signed 64-bit integer.
    Integer = 2,
    /// Byte string (may contain NUL bytes).
    String = 3,
    /// Dictionary.
    Dict = 4,
    /// List.
    List = 5,
    /// Callable function object.
    Function = 6,
    /// Object instance (modules are objects).
    Object = 7,
    /// Opaque native pointer.
    Data = 8,
}

/// Number of type tags. Any raw tag must be strictly less than this.
pub const TYPE_TAG_COUNT: usize = 9;

/// All type tags, in discriminant order.
pub const ALL_TYPE_TAGS: [TypeTag; TYPE_TAG_COUNT] = [
    TypeTag::Invalid,
    TypeTag::Null,
    TypeTag::Integer,
    TypeTag::String,
    TypeTag::Dict,
    TypeTag::List,
    TypeTag::Function,
    TypeTag::Object,
    TypeTag::Data,
];

/// Display names used in diagnostics, indexed by tag discriminant.
pub const TYPE_NAMES: [&str; TYPE_TAG_COUNT] = [
    "INVALID", "null", "integer", "string", "dict", "list", "function", "object", "data",
];

impl TryFrom<u32> for TypeTag {
    type Error = TagError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        ALL_TYPE_TAGS
            .get(value as usize)
            .copied()
            .ok_or(TagError::OutOfRange(value))
    }
}

impl TryFrom<u8> for TypeTag {
    type Error = TagError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        TypeTag::try_from(u32::from(value))
    }
}

impl TypeTag {
    /// Returns the diagnostic name for this tag.
    pub fn name(&self) -> &'static str {
        TYPE_NAMES[*self as usize]
    }

    /// Returns true for the container tags (dict and list).
    pub fn is_container(&self) -> bool {
        matches!(self, TypeTag::Dict | TypeTag::List)
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_type_tags_count() {
        assert_eq!(ALL_TYPE_TAGS.len(), TYPE_TAG_COUNT);
        assert_eq!(TYPE_NAMES.len(), TYPE_TAG_COUNT);
    }

    #[test]
    fn discriminants_follow_table_order() {
        for (i, &tag) in ALL_TYPE_TAGS.iter().enumerate() {
            assert_eq!(tag as usize, i, "{tag:?} out of order");
        }
    }

    #[test]
    fn names_match_diagnostic_table() {
        assert_eq!(TypeTag::Invalid.name(), "INVALID");
        assert_eq!(TypeTag::Null.name(), "null");
        assert_eq!(TypeTag::Integer.name(), "integer");
        assert_eq!(TypeTag::String.name(), "string");
        assert_eq!(TypeTag::Dict.name(), "dict");
        assert_eq!(TypeTag::List.name(), "list");
        assert_eq!(TypeTag::Function.name(), "function");
        assert_eq!(TypeTag::Object.name(), "object");
        assert_eq!(TypeTag::Data.name(), "data");
    }

    #[test]
    fn out_of_range_tags_rejected() {
        assert_eq!(TypeTag::try_from(9u32), Err(TagError::OutOfRange(9)));
        assert_eq!(TypeTag::try_from(255u8), Err(TagError::OutOfRange(255)));
        assert_eq!(
            TypeTag::try_from(u32::MAX),
            Err(TagError::OutOfRange(u32::MAX))
        );
    }

    #[test]
    fn containers() {
        assert!(TypeTag::Dict.is_container());
        assert!(TypeTag::List.is_container());
        assert!(!TypeTag::String.is_container());
        assert!(!TypeTag::Object.is_container());
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(TypeTag::Function.to_string(), "function");
    }
}
