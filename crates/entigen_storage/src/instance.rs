//! Materialized entity instances.

use std::fmt;

use entigen_foundation::Value;

/// A stored instance of a concrete entity.
///
/// Values are keyed by output field name and ordered parent-first, the
/// same order the entity's storage layout uses.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    entity: String,
    id: u64,
    values: Vec<(String, Value)>,
}

impl Instance {
    pub(crate) fn new(entity: impl Into<String>, id: u64, values: Vec<(String, Value)>) -> Self {
        Self {
            entity: entity.into(),
            id,
            values,
        }
    }

    /// Returns the concrete entity name.
    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Returns a field value by output name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Returns every field in layout order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{} {{", self.entity, self.id)?;
        for (i, (name, value)) in self.values.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{name}: {value}")?;
        }
        f.write_str(" }")
    }
}
