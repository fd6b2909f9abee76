//! Typed metadata values and kind dispatch.
//!
//! [`MetadataValue`] is the single owning slot payload: one variant per
//! [`ValueKind`]. Code that has to act on a value without knowing its type at
//! compile time implements [`ValueVisitor`] and lets
//! [`MetadataValue::visit`] recover the concrete type from the variant.

use std::fmt;

use super::ValueKind;
use crate::util::{format_vector3, parse_vector3, Error, Result, Vector3};

/// One stored metadata value.
#[derive(Clone, Debug, PartialEq)]
pub enum MetadataValue {
    Bool(bool),
    Int32(i32),
    UInt64(u64),
    Float32(f32),
    String(String),
    Vector3(Vector3),
}

impl MetadataValue {
    /// The kind tag of this value.
    #[inline]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int32(_) => ValueKind::Int32,
            Self::UInt64(_) => ValueKind::UInt64,
            Self::Float32(_) => ValueKind::Float32,
            Self::String(_) => ValueKind::StringValue,
            Self::Vector3(_) => ValueKind::Vector3,
        }
    }

    /// Call the visitor method matching this value's concrete type.
    pub fn visit<V: ValueVisitor>(&self, visitor: V) -> V::Output {
        match self {
            Self::Bool(v) => visitor.visit_bool(*v),
            Self::Int32(v) => visitor.visit_int32(*v),
            Self::UInt64(v) => visitor.visit_uint64(*v),
            Self::Float32(v) => visitor.visit_float32(*v),
            Self::String(v) => visitor.visit_string(v),
            Self::Vector3(v) => visitor.visit_vector3(*v),
        }
    }

    /// Borrow the payload as `T` if the kinds agree.
    #[inline]
    pub fn as_type<T: MetadataType>(&self) -> Option<&T> {
        T::from_value(self)
    }

    /// Parse text into a value of the given kind.
    ///
    /// Booleans accept `true`/`false`/`1`/`0`, vectors use `x,y,z`.
    pub fn parse(kind: ValueKind, text: &str) -> Result<Self> {
        let invalid = || Error::InvalidValue {
            kind,
            text: text.to_string(),
        };
        let trimmed = text.trim();
        let value = match kind {
            ValueKind::Bool => match trimmed {
                "true" | "1" => Self::Bool(true),
                "false" | "0" => Self::Bool(false),
                _ => return Err(invalid()),
            },
            ValueKind::Int32 => Self::Int32(trimmed.parse().map_err(|_| invalid())?),
            ValueKind::UInt64 => Self::UInt64(trimmed.parse().map_err(|_| invalid())?),
            ValueKind::Float32 => Self::Float32(trimmed.parse().map_err(|_| invalid())?),
            // Strings keep surrounding whitespace.
            ValueKind::StringValue => Self::String(text.to_string()),
            ValueKind::Vector3 => Self::Vector3(parse_vector3(trimmed).ok_or_else(invalid)?),
        };
        Ok(value)
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::UInt64(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
            Self::Vector3(v) => write!(f, "{}", format_vector3(*v)),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

/// Operation over any metadata value, one method per kind.
///
/// Serializers and other generic consumers implement this instead of matching
/// on [`MetadataValue`] themselves. Implement it for `&mut YourType` when the
/// operation needs to accumulate state.
pub trait ValueVisitor {
    type Output;

    fn visit_bool(self, value: bool) -> Self::Output;
    fn visit_int32(self, value: i32) -> Self::Output;
    fn visit_uint64(self, value: u64) -> Self::Output;
    fn visit_float32(self, value: f32) -> Self::Output;
    fn visit_string(self, value: &str) -> Self::Output;
    fn visit_vector3(self, value: Vector3) -> Self::Output;
}

mod sealed {
    pub trait Sealed {}
}

/// Rust types that can be stored in a metadata slot.
///
/// Implemented for exactly `bool`, `i32`, `u64`, `f32`, `String` and
/// [`Vector3`]; the trait is sealed so the set stays closed.
pub trait MetadataType: Clone + Into<MetadataValue> + sealed::Sealed {
    /// The kind tag for this type.
    const KIND: ValueKind;

    /// Borrow the payload if `value` holds this type.
    fn from_value(value: &MetadataValue) -> Option<&Self>;
}

macro_rules! metadata_type {
    ($ty:ty, $variant:ident, $kind:ident) => {
        impl sealed::Sealed for $ty {}

        impl MetadataType for $ty {
            const KIND: ValueKind = ValueKind::$kind;

            #[inline]
            fn from_value(value: &MetadataValue) -> Option<&Self> {
                match value {
                    MetadataValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }

        impl From<$ty> for MetadataValue {
            #[inline]
            fn from(v: $ty) -> Self {
                MetadataValue::$variant(v)
            }
        }
    };
}

metadata_type!(bool, Bool, Bool);
metadata_type!(i32, Int32, Int32);
metadata_type!(u64, UInt64, UInt64);
metadata_type!(f32, Float32, Float32);
metadata_type!(String, String, StringValue);
metadata_type!(Vector3, Vector3, Vector3);

#[cfg(test)]
mod tests {
    use super::*;

    /// Reports the visited type name.
    struct TypeName;

    impl ValueVisitor for TypeName {
        type Output = &'static str;

        fn visit_bool(self, _: bool) -> &'static str {
            "bool"
        }
        fn visit_int32(self, _: i32) -> &'static str {
            "i32"
        }
        fn visit_uint64(self, _: u64) -> &'static str {
            "u64"
        }
        fn visit_float32(self, _: f32) -> &'static str {
            "f32"
        }
        fn visit_string(self, _: &str) -> &'static str {
            "String"
        }
        fn visit_vector3(self, _: Vector3) -> &'static str {
            "Vec3"
        }
    }

    fn samples() -> Vec<MetadataValue> {
        vec![
            true.into(),
            (-4i32).into(),
            u64::MAX.into(),
            2.5f32.into(),
            "root".into(),
            Vector3::new(1.0, 2.0, 3.0).into(),
        ]
    }

    #[test]
    fn test_kind_matches_variant() {
        let kinds: Vec<ValueKind> = samples().iter().map(MetadataValue::kind).collect();
        assert_eq!(kinds, ValueKind::ALL.to_vec());
    }

    #[test]
    fn test_visit_dispatches_per_kind() {
        let names: Vec<&str> = samples().iter().map(|v| v.visit(TypeName)).collect();
        assert_eq!(names, ["bool", "i32", "u64", "f32", "String", "Vec3"]);
    }

    #[test]
    fn test_as_type() {
        let v = MetadataValue::from(7i32);
        assert_eq!(v.as_type::<i32>(), Some(&7));
        assert_eq!(v.as_type::<u64>(), None);
        assert_eq!(v.as_type::<f32>(), None);

        let s = MetadataValue::from("name");
        assert_eq!(s.as_type::<String>().map(String::as_str), Some("name"));
    }

    #[test]
    fn test_parse() {
        assert_eq!(MetadataValue::parse(ValueKind::Bool, "1").unwrap(), true.into());
        assert_eq!(MetadataValue::parse(ValueKind::Int32, " -12 ").unwrap(), (-12i32).into());
        assert_eq!(
            MetadataValue::parse(ValueKind::UInt64, "18446744073709551615").unwrap(),
            u64::MAX.into()
        );
        assert_eq!(MetadataValue::parse(ValueKind::Float32, "2.5").unwrap(), 2.5f32.into());
        assert_eq!(MetadataValue::parse(ValueKind::StringValue, " a b").unwrap(), " a b".into());
        assert_eq!(
            MetadataValue::parse(ValueKind::Vector3, "0,1,0").unwrap(),
            Vector3::Y.into()
        );
    }

    #[test]
    fn test_parse_rejects_bad_text() {
        let err = MetadataValue::parse(ValueKind::Int32, "seven").unwrap_err();
        assert!(matches!(err, Error::InvalidValue { kind: ValueKind::Int32, .. }));
        assert!(MetadataValue::parse(ValueKind::UInt64, "-1").is_err());
        assert!(MetadataValue::parse(ValueKind::Bool, "yes").is_err());
        assert!(MetadataValue::parse(ValueKind::Vector3, "1,2").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(MetadataValue::from(false).to_string(), "false");
        assert_eq!(MetadataValue::from(2.5f32).to_string(), "2.5");
        assert_eq!(MetadataValue::from(Vector3::new(1.0, 0.0, -1.0)).to_string(), "1,0,-1");
    }
}
