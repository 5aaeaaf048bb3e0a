//! Generation settings.

use entigen_model::Model;

/// Settings shared by every backend in one generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Namespace passed to `namespaces()`; the model name when unset.
    pub namespace: Option<String>,
    /// Spaces per indentation level in the output buffer.
    pub indent: usize,
    /// Artifact name; `<model>.<backend extension>` when unset.
    pub artifact_name: Option<String>,
    /// Collect per-entity backend failures instead of aborting on the first.
    pub continue_on_error: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            indent: 4,
            artifact_name: None,
            continue_on_error: false,
        }
    }
}

impl GeneratorConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the indentation width.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the artifact name.
    #[must_use]
    pub fn with_artifact_name(mut self, name: impl Into<String>) -> Self {
        self.artifact_name = Some(name.into());
        self
    }

    /// Sets whether per-entity failures are collected.
    #[must_use]
    pub fn with_continue_on_error(mut self, keep_going: bool) -> Self {
        self.continue_on_error = keep_going;
        self
    }

    /// Returns the namespace to emit for `model`.
    #[must_use]
    pub fn namespace_for<'a>(&'a self, model: &'a Model) -> &'a str {
        self.namespace.as_deref().unwrap_or_else(|| model.name())
    }
}
