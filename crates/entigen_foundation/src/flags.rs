//! Field attribute flags.
//!
//! Flags follow a field's type in brackets, e.g. `name: string [editable, searchable];`.
//! [`FieldFlag`] is the closed set of names the parser accepts; [`FieldFlags`]
//! is the bitmask stored on each field.

use std::fmt;

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// Combinable field attributes.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct FieldFlags: u8 {
        /// The field can be updated through `edit`.
        const EDITABLE = 1;
        /// The field is not exposed to clients.
        const HIDDEN = 1 << 1;
        /// The field gets a dedicated lookup-by-value accessor.
        const SEARCHABLE = 1 << 2;
        /// The field is managed by the generated layer, never set by callers.
        const INTERNAL = 1 << 3;
        /// The field's value is unique; reference fields become one-to-one.
        const UNIQUE = 1 << 4;
        /// The field is derived by the backend and never stored.
        const DYNAMIC = 1 << 5;
    }
}

/// A single named field flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldFlag {
    /// See [`FieldFlags::EDITABLE`].
    Editable,
    /// See [`FieldFlags::HIDDEN`].
    Hidden,
    /// See [`FieldFlags::SEARCHABLE`].
    Searchable,
    /// See [`FieldFlags::INTERNAL`].
    Internal,
    /// See [`FieldFlags::UNIQUE`].
    Unique,
    /// See [`FieldFlags::DYNAMIC`].
    Dynamic,
}

impl FieldFlag {
    /// Every flag, in bit order.
    pub const ALL: [Self; 6] = [
        Self::Editable,
        Self::Hidden,
        Self::Searchable,
        Self::Internal,
        Self::Unique,
        Self::Dynamic,
    ];

    /// Returns the source spelling of this flag.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Editable => "editable",
            Self::Hidden => "hidden",
            Self::Searchable => "searchable",
            Self::Internal => "internal",
            Self::Unique => "unique",
            Self::Dynamic => "dynamic",
        }
    }

    /// Parses a flag name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|flag| flag.name().eq_ignore_ascii_case(name))
    }

    /// Returns the bit this flag occupies.
    #[must_use]
    pub const fn bits(self) -> FieldFlags {
        match self {
            Self::Editable => FieldFlags::EDITABLE,
            Self::Hidden => FieldFlags::HIDDEN,
            Self::Searchable => FieldFlags::SEARCHABLE,
            Self::Internal => FieldFlags::INTERNAL,
            Self::Unique => FieldFlags::UNIQUE,
            Self::Dynamic => FieldFlags::DYNAMIC,
        }
    }
}

impl From<FieldFlag> for FieldFlags {
    fn from(flag: FieldFlag) -> Self {
        flag.bits()
    }
}

impl fmt::Display for FieldFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for FieldFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for flag in FieldFlag::ALL {
            if self.contains(flag.bits()) {
                if !first {
                    f.write_str(", ")?;
                }
                f.write_str(flag.name())?;
                first = false;
            }
        }
        Ok(())
    }
}
