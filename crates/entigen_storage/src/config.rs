//! Memory store configuration.

/// Tunables for a [`MemoryStore`](crate::MemoryStore).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Page size used by `list` when the caller passes none.
    pub default_page_size: usize,
    /// First identifier handed out; 0 is reserved for "no id".
    pub first_id: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_page_size: 25,
            first_id: 1,
        }
    }
}

impl StoreConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default page size; zero is raised to one.
    #[must_use]
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size.max(1);
        self
    }

    /// Sets the first identifier; zero is raised to one.
    #[must_use]
    pub fn with_first_id(mut self, id: u64) -> Self {
        self.first_id = id.max(1);
        self
    }
}
