//! Declaration types produced by the parser.
//!
//! These are the typed AST of the schema language: type references,
//! enum declarations, entity declarations, and their fields. They still
//! name their parents and referenced types by string; linking happens in
//! the model builder.

use entigen_foundation::{FieldFlags, ScalarType};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::span::Span;

/// A resolved reference to a declared type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeDecl {
    /// A built-in scalar.
    Scalar(ScalarType),
    /// A user or discriminator enum, by name.
    Enum(String),
    /// A user entity, by name.
    Entity(String),
}

impl TypeDecl {
    /// Returns the declared name of this type.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(scalar) => scalar.name(),
            Self::Enum(name) | Self::Entity(name) => name,
        }
    }

    /// Returns the entity name if this type is an entity.
    #[must_use]
    pub fn as_entity(&self) -> Option<&str> {
        match self {
            Self::Entity(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the scalar if this type is a scalar.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<ScalarType> {
        match self {
            Self::Scalar(scalar) => Some(*scalar),
            _ => None,
        }
    }
}

/// A single member of an enum declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnumMember {
    /// Member name.
    pub name: String,
    /// Explicit or auto-incremented value.
    pub value: u64,
    /// Source span
    pub span: Span,
}

/// An enum declaration.
///
/// Corresponds to:
/// ```text
/// enum Status { Draft, Published = 5, Archived }
/// ```
/// Discriminator enums (`<Parent>Kind`) are synthesized by the parser
/// with the same shape.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnumDecl {
    /// Enum name
    pub name: String,
    /// Members in declaration order
    pub members: Vec<EnumMember>,
    /// True for `<Parent>Kind` enums created from inheritance
    pub discriminator: bool,
    /// Source span
    pub span: Span,
}

impl EnumDecl {
    /// Creates an empty enum declaration.
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            discriminator: false,
            span,
        }
    }

    /// Returns the value the next auto-valued member would get.
    ///
    /// `None` if the previous member already holds `u64::MAX`.
    #[must_use]
    pub fn next_value(&self) -> Option<u64> {
        match self.members.last() {
            Some(last) => last.value.checked_add(1),
            None => Some(0),
        }
    }

    /// Looks up a member by name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Looks up a member's value by name.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<u64> {
        self.member(name).map(|m| m.value)
    }

    /// Returns the member names in order.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.name.as_str())
    }
}

/// A field of an entity declaration.
///
/// Corresponds to `name: Type [flag, flag];`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityField {
    /// Field name
    pub name: String,
    /// Field type, resolved at parse time
    pub ty: TypeDecl,
    /// Attribute flags
    pub flags: FieldFlags,
    /// Source span
    pub span: Span,
}

/// An entity declaration.
///
/// Corresponds to:
/// ```text
/// entity Dog : Animal {
///     name: string [editable, searchable];
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityDecl {
    /// Entity name
    pub name: String,
    /// Declared parent entity, linked by the model builder
    pub parent: Option<String>,
    /// Fields in declaration order
    pub fields: Vec<EntityField>,
    /// Source span
    pub span: Span,
}

impl EntityDecl {
    /// Creates a new entity declaration with no fields.
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            parent: None,
            fields: Vec::new(),
            span,
        }
    }

    /// Looks up a declared field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&EntityField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The declaration tables produced by one parse.
///
/// Both tables keep insertion order so every later stage iterates
/// deterministically.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Declarations {
    /// Entity declarations in source order.
    pub entities: Vec<EntityDecl>,
    /// Enum declarations in order of first appearance.
    pub enums: Vec<EnumDecl>,
}

impl Declarations {
    /// Looks up an entity declaration by name.
    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&EntityDecl> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Looks up an enum declaration by name.
    #[must_use]
    pub fn enumeration(&self, name: &str) -> Option<&EnumDecl> {
        self.enums.iter().find(|e| e.name == name)
    }
}
