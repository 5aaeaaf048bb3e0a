//! Built-in scalar types of the schema language.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A built-in scalar type.
///
/// These make up the third type registry consulted by the parser, after
/// user entities and user enums.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScalarType {
    /// UTF-8 text.
    String,
    /// Boolean.
    Bool,
    /// Raw byte sequence.
    Bytes,
    /// Decimal number.
    Decimal,
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 8-bit integer.
    UInt8,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Unsigned 64-bit integer.
    UInt64,
}

impl ScalarType {
    /// Every built-in scalar, in registry order.
    pub const ALL: [Self; 12] = [
        Self::String,
        Self::Bool,
        Self::Bytes,
        Self::Decimal,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::UInt8,
        Self::UInt16,
        Self::UInt32,
        Self::UInt64,
    ];

    /// The 64-bit identifier scalar used for entity ids and reference fields.
    pub const IDENTIFIER: Self = Self::UInt64;

    /// Returns the name this scalar is declared with in source.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Bytes => "bytes",
            Self::Decimal => "decimal",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
        }
    }

    /// Looks up a scalar by its source name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|scalar| scalar.name() == name)
    }

    /// Returns the normalized output type name handed to backends.
    ///
    /// Only `bytes` is renamed; every other scalar passes through.
    #[must_use]
    pub const fn output_name(self) -> &'static str {
        match self {
            Self::Bytes => "byte-sequence",
            other => other.name(),
        }
    }

    /// Returns true for the sized integer scalars.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    /// Returns true for the signed integer scalars.
    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Returns true for the unsigned integer scalars.
    #[must_use]
    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64
        )
    }

    /// Returns the zero value of this scalar.
    #[must_use]
    pub fn zero(self) -> Value {
        match self {
            Self::String => Value::String(String::new()),
            Self::Bool => Value::Bool(false),
            Self::Bytes => Value::Bytes(Vec::new()),
            Self::Decimal => Value::Decimal(0.0),
            s if s.is_signed() => Value::Int(0),
            _ => Value::UInt(0),
        }
    }

    /// Parses a textual value into this scalar.
    ///
    /// Integers are range-checked against their width. Returns `None`
    /// when the text does not denote a value of this type.
    #[must_use]
    pub fn parse(self, text: &str) -> Option<Value> {
        match self {
            Self::String => Some(Value::String(text.to_string())),
            Self::Bytes => Some(Value::Bytes(text.as_bytes().to_vec())),
            Self::Bool => match text {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            Self::Decimal => text
                .parse::<f64>()
                .ok()
                .filter(|d| d.is_finite())
                .map(Value::Decimal),
            Self::Int8 => text.parse::<i8>().ok().map(|n| Value::Int(n.into())),
            Self::Int16 => text.parse::<i16>().ok().map(|n| Value::Int(n.into())),
            Self::Int32 => text.parse::<i32>().ok().map(|n| Value::Int(n.into())),
            Self::Int64 => text.parse::<i64>().ok().map(Value::Int),
            Self::UInt8 => text.parse::<u8>().ok().map(|n| Value::UInt(n.into())),
            Self::UInt16 => text.parse::<u16>().ok().map(|n| Value::UInt(n.into())),
            Self::UInt32 => text.parse::<u32>().ok().map(|n| Value::UInt(n.into())),
            Self::UInt64 => text.parse::<u64>().ok().map(Value::UInt),
        }
    }

    /// Checks whether a value can be stored in a field of this scalar.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (Self::String, Value::String(_))
            | (Self::Bool, Value::Bool(_))
            | (Self::Bytes, Value::Bytes(_))
            | (Self::Decimal, Value::Decimal(_)) => true,
            (Self::Int8, Value::Int(n)) => i8::try_from(*n).is_ok(),
            (Self::Int16, Value::Int(n)) => i16::try_from(*n).is_ok(),
            (Self::Int32, Value::Int(n)) => i32::try_from(*n).is_ok(),
            (Self::Int64, Value::Int(_)) | (Self::UInt64, Value::UInt(_)) => true,
            (Self::UInt8, Value::UInt(n)) => u8::try_from(*n).is_ok(),
            (Self::UInt16, Value::UInt(n)) => u16::try_from(*n).is_ok(),
            (Self::UInt32, Value::UInt(n)) => u32::try_from(*n).is_ok(),
            _ => false,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
