//! Indented text buffer shared by one backend run.

/// Append-only text buffer with an indentation level.
///
/// The orchestrator owns the buffer for the whole run and lends it to each
/// backend call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Output {
    text: String,
    width: usize,
    depth: usize,
}

impl Output {
    /// Creates an empty buffer indenting `width` spaces per level.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            text: String::new(),
            width,
            depth: 0,
        }
    }

    /// Appends one indented line.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            self.text
                .extend(std::iter::repeat_n(' ', self.width * self.depth));
            self.text.push_str(text);
        }
        self.text.push('\n');
        self
    }

    /// Appends an empty line.
    pub fn blank(&mut self) -> &mut Self {
        self.line("")
    }

    /// Increases the indentation level.
    pub fn indent(&mut self) -> &mut Self {
        self.depth += 1;
        self
    }

    /// Decreases the indentation level, stopping at zero.
    pub fn dedent(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self
    }

    /// Runs `body` one level deeper.
    pub fn nested(&mut self, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.indent();
        body(self);
        self.dedent()
    }

    /// Returns the current indentation level.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Returns true if nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the text written so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consumes the buffer, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}
