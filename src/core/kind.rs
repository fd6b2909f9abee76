//! Value kinds - the closed set of types a metadata slot can hold.

use std::fmt;

use super::MetadataType;
use crate::util::Error;

/// Runtime tag identifying the type of a stored metadata value.
///
/// The numeric discriminants are the on-disk tags used by the binary codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum ValueKind {
    /// `bool`
    Bool = 0,
    /// `i32`
    Int32 = 1,
    /// `u64`
    UInt64 = 2,
    /// `f32`
    Float32 = 3,
    /// UTF-8 string
    StringValue = 4,
    /// Three-component `f32` vector
    Vector3 = 5,
}

impl ValueKind {
    /// Number of kinds.
    pub const COUNT: usize = 6;

    /// All kinds in tag order.
    pub const ALL: [ValueKind; Self::COUNT] = [
        Self::Bool,
        Self::Int32,
        Self::UInt64,
        Self::Float32,
        Self::StringValue,
        Self::Vector3,
    ];

    /// Returns the name of this kind as a string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int32 => "int32",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::StringValue => "string",
            Self::Vector3 => "vector3",
        }
    }

    /// Parse a kind from its name string.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(Self::Bool),
            "int32" => Some(Self::Int32),
            "uint64" => Some(Self::UInt64),
            "float32" => Some(Self::Float32),
            "string" => Some(Self::StringValue),
            "vector3" => Some(Self::Vector3),
            _ => None,
        }
    }

    /// Numeric tag.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for ValueKind {
    type Error = Error;

    fn try_from(tag: u16) -> Result<Self, Error> {
        Self::ALL
            .get(tag as usize)
            .copied()
            .ok_or(Error::UnknownKind(tag))
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Kind of a value of a statically known type.
#[inline]
pub fn kind_of<T: MetadataType>(_value: &T) -> ValueKind {
    T::KIND
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Vector3;

    #[test]
    fn test_kind_tags() {
        assert_eq!(ValueKind::Bool.as_u16(), 0);
        assert_eq!(ValueKind::StringValue.as_u16(), 4);
        assert_eq!(ValueKind::Vector3.as_u16(), 5);
        for (i, kind) in ValueKind::ALL.iter().enumerate() {
            assert_eq!(kind.as_u16() as usize, i);
        }
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ValueKind::Float32.name(), "float32");
        assert_eq!(ValueKind::from_name("uint64"), Some(ValueKind::UInt64));
        assert_eq!(ValueKind::from_name("double"), None);
        for kind in ValueKind::ALL {
            assert_eq!(ValueKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_tag() {
        assert!(matches!(ValueKind::try_from(6), Err(Error::UnknownKind(6))));
        assert!(matches!(ValueKind::try_from(u16::MAX), Err(Error::UnknownKind(_))));
        assert_eq!(ValueKind::try_from(3).ok(), Some(ValueKind::Float32));
    }

    #[test]
    fn test_kind_of() {
        assert_eq!(kind_of(&true), ValueKind::Bool);
        assert_eq!(kind_of(&7i32), ValueKind::Int32);
        assert_eq!(kind_of(&7u64), ValueKind::UInt64);
        assert_eq!(kind_of(&2.5f32), ValueKind::Float32);
        assert_eq!(kind_of(&String::from("root")), ValueKind::StringValue);
        assert_eq!(kind_of(&Vector3::ONE), ValueKind::Vector3);
    }
}
