//! References inferred between entities.
//!
//! A field `f` on entity `X` whose type is entity `Y` and whose name is
//! also `Y` makes `X` hold a reference to `Y`. The referenced entity gets
//! an aggregate accessor: singular when the field is unique, plural
//! otherwise.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::entity::EntityRef;

/// A reference from one entity's field to another entity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reference {
    /// The entity holding the reference field.
    pub source: EntityRef,
    /// Name of the holding entity.
    pub source_name: String,
    /// The referenced entity.
    pub target: EntityRef,
    /// Name of the referenced entity.
    pub target_name: String,
    /// Declared name of the reference field.
    pub field: String,
    /// One-to-one when the field is flagged unique.
    pub unique: bool,
}

impl Reference {
    /// Returns the aggregate accessor name exposed by the referenced entity.
    ///
    /// `GetProfileOfUser` for a unique reference, `GetPostsOfUser` otherwise.
    #[must_use]
    pub fn accessor_name(&self) -> String {
        if self.unique {
            format!("Get{}Of{}", self.source_name, self.target_name)
        } else {
            format!("Get{}sOf{}", self.source_name, self.target_name)
        }
    }
}
