//! Linked entities and their fields.

use std::fmt;

use entigen_foundation::{FieldFlags, ScalarType};
use entigen_language::TypeDecl;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name of the implicit identifier field every entity carries.
pub const ID_FIELD: &str = "ID";

/// Index of an entity within its [`Model`](crate::Model).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityRef(pub usize);

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The type a backend emits for a field.
///
/// Entity-typed fields never reach backends as entities: they are
/// rewritten to the identifier scalar.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OutputType {
    /// A built-in scalar.
    Scalar(ScalarType),
    /// An enum, by name.
    Enum(String),
}

impl OutputType {
    /// Returns the normalized type name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(scalar) => scalar.output_name(),
            Self::Enum(name) => name,
        }
    }
}

/// Output name and type of a field, as handed to backends.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldDecl {
    /// Output field name (`ownerID` for a field `owner` of entity type).
    pub name: String,
    /// Output type.
    pub ty: OutputType,
}

impl FieldDecl {
    /// Computes the output declaration for a declared field.
    #[must_use]
    pub fn for_field(name: &str, ty: &TypeDecl) -> Self {
        match ty {
            TypeDecl::Entity(_) => Self {
                name: format!("{name}{ID_FIELD}"),
                ty: OutputType::Scalar(ScalarType::IDENTIFIER),
            },
            TypeDecl::Enum(enum_name) => Self {
                name: name.to_string(),
                ty: OutputType::Enum(enum_name.clone()),
            },
            TypeDecl::Scalar(scalar) => Self {
                name: name.to_string(),
                ty: OutputType::Scalar(*scalar),
            },
        }
    }
}

/// A resolved entity field.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Field {
    /// Declared name.
    pub name: String,
    /// Declared type.
    pub ty: TypeDecl,
    /// Attribute flags.
    pub flags: FieldFlags,
    /// Output name and type.
    pub decl: FieldDecl,
    /// Source line of the declaration.
    pub line: u32,
}

impl Field {
    /// Returns true if the field carries every flag in `flags`.
    #[must_use]
    pub fn has(&self, flags: FieldFlags) -> bool {
        self.flags.contains(flags)
    }

    /// Returns true if the field is derived by the backend and never stored.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.has(FieldFlags::DYNAMIC)
    }

    /// Returns true if the field is managed by the generated layer.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.has(FieldFlags::INTERNAL)
    }

    /// Returns true if `edit` may update this field.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.has(FieldFlags::EDITABLE) && !self.is_dynamic()
    }

    /// Returns true if the field gets a lookup-by-value accessor.
    #[must_use]
    pub fn is_searchable(&self) -> bool {
        self.has(FieldFlags::SEARCHABLE) && !self.is_dynamic()
    }
}

/// One concrete subtype of an abstract entity, keyed by its discriminator value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Subtype {
    /// Member value in the parent's `<Name>Kind` enum.
    pub value: u64,
    /// The child entity.
    pub entity: EntityRef,
}

/// A lookup key an entity can be found by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchKey<'a> {
    /// The implicit identifier.
    Id,
    /// A field flagged searchable.
    Field(&'a Field),
}

impl SearchKey<'_> {
    /// Returns the output name of the key.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Id => ID_FIELD,
            Self::Field(field) => &field.decl.name,
        }
    }
}

/// A resolved, linked entity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entity {
    /// This entity's index in the model.
    pub id: EntityRef,
    /// Entity name.
    pub name: String,
    /// Parent entity, if declared.
    pub parent: Option<EntityRef>,
    /// Fields in order; an abstract entity's discriminator comes first.
    pub fields: Vec<Field>,
    /// Direct children in declaration order, with their discriminator values.
    pub subtypes: Vec<Subtype>,
    /// `<Name>Kind` for abstract entities.
    pub kind_enum: Option<String>,
    /// Source line of the declaration.
    pub line: u32,
}

impl Entity {
    /// Returns true if another entity declares this one as parent.
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        !self.subtypes.is_empty()
    }

    /// Returns true if this entity declares a parent.
    #[must_use]
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Looks up one of this entity's own fields by declared name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the output declaration of a field: the decl map lookup.
    #[must_use]
    pub fn decl_of(&self, field_name: &str) -> Option<&FieldDecl> {
        self.field(field_name).map(|f| &f.decl)
    }

    /// Returns the synthetic discriminator field of an abstract entity.
    #[must_use]
    pub fn discriminator_field(&self) -> Option<&Field> {
        let kind = self.kind_enum.as_deref()?;
        self.fields.first().filter(|f| f.name == kind)
    }

    /// Returns the direct children.
    pub fn sub_entities(&self) -> impl Iterator<Item = EntityRef> + '_ {
        self.subtypes.iter().map(|s| s.entity)
    }

    /// Resolves a discriminator value to the child it denotes.
    #[must_use]
    pub fn dispatch(&self, value: u64) -> Option<EntityRef> {
        self.subtypes
            .iter()
            .find(|s| s.value == value)
            .map(|s| s.entity)
    }

    /// Returns the discriminator value of a direct child.
    #[must_use]
    pub fn discriminator_of(&self, child: EntityRef) -> Option<u64> {
        self.subtypes
            .iter()
            .find(|s| s.entity == child)
            .map(|s| s.value)
    }

    /// Returns the lookup keys: the implicit id, then own searchable fields.
    #[must_use]
    pub fn searchable_fields(&self) -> Vec<SearchKey<'_>> {
        std::iter::once(SearchKey::Id)
            .chain(
                self.fields
                    .iter()
                    .filter(|f| f.is_searchable())
                    .map(SearchKey::Field),
            )
            .collect()
    }

    /// Returns own fields `edit` may update.
    pub fn editable_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_editable())
    }
}
