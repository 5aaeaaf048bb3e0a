//! Error types for the entigen compiler.
//!
//! Uses `thiserror` for ergonomic error definition. Every compile error
//! carries the source line it was raised on and renders as
//! `line <n>: <message>`.

use std::fmt;

use thiserror::Error;

/// Result alias used by every compiler stage.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for entigen compilation.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a syntax error.
    #[must_use]
    pub fn syntax(line: u32, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax {
            line,
            message: message.into(),
        })
    }

    /// Creates an unresolved type name error.
    #[must_use]
    pub fn unknown_type(line: u32, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownType {
            line,
            name: name.into(),
        })
    }

    /// Creates an unknown field flag error.
    #[must_use]
    pub fn unknown_flag(line: u32, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownFlag {
            line,
            name: name.into(),
        })
    }

    /// Creates a malformed numeric literal error.
    #[must_use]
    pub fn invalid_number(line: u32, text: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidNumber {
            line,
            text: text.into(),
        })
    }

    /// Creates a cyclic inheritance error.
    #[must_use]
    pub fn cyclic_inheritance(line: u32, entity: impl Into<String>) -> Self {
        Self::new(ErrorKind::CyclicInheritance {
            line,
            entity: entity.into(),
        })
    }

    /// Returns the source line this error was raised on, if it has one.
    #[must_use]
    pub fn line(&self) -> Option<u32> {
        self.kind.line()
    }

    /// Returns the taxonomy bucket of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unexpected token, missing punctuation, or unknown top-level keyword.
    #[error("line {line}: {message}")]
    Syntax {
        /// Line number (1-indexed).
        line: u32,
        /// Description of the problem.
        message: String,
    },

    /// A type name matched no entity, enum, or built-in scalar.
    #[error("line {line}: unknown type '{name}'")]
    UnknownType {
        /// Line number (1-indexed).
        line: u32,
        /// The offending type name.
        name: String,
    },

    /// A field flag name is not one of the known flags.
    #[error("line {line}: unknown flag '{name}'")]
    UnknownFlag {
        /// Line number (1-indexed).
        line: u32,
        /// The offending flag name.
        name: String,
    },

    /// A numeric literal could not be used where a non-negative integer was required.
    #[error("line {line}: invalid number '{text}'")]
    InvalidNumber {
        /// Line number (1-indexed).
        line: u32,
        /// The literal text.
        text: String,
    },

    /// An enum declares the same member twice.
    #[error("line {line}: duplicate member '{member}' in enum {name}")]
    DuplicateMember {
        /// Line number (1-indexed).
        line: u32,
        /// The enum name.
        name: String,
        /// The repeated member.
        member: String,
    },

    /// An entity declares (or inherits) the same field name twice.
    #[error("line {line}: duplicate field '{field}' in entity {entity}")]
    DuplicateField {
        /// Line number (1-indexed).
        line: u32,
        /// The entity name.
        entity: String,
        /// The repeated field.
        field: String,
    },

    /// A top-level declaration reuses a name.
    #[error("line {line}: {what} '{name}' is already declared")]
    DuplicateDeclaration {
        /// Line number (1-indexed).
        line: u32,
        /// `"entity"` or `"enum"`.
        what: &'static str,
        /// The repeated name.
        name: String,
    },

    /// An entity names a parent that is not a declared entity.
    #[error("line {line}: entity {entity} declares unknown parent '{parent}'")]
    UnknownParent {
        /// Line number (1-indexed).
        line: u32,
        /// The child entity.
        entity: String,
        /// The unresolved parent name.
        parent: String,
    },

    /// The parent chain of an entity loops back on itself.
    #[error("line {line}: cyclic inheritance through entity {entity}")]
    CyclicInheritance {
        /// Line number (1-indexed).
        line: u32,
        /// The entity whose parent chain is cyclic.
        entity: String,
    },

    /// Reading source or writing artifacts failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// Encoding or decoding a model snapshot failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ErrorKind {
    /// Returns the source line for compile errors.
    #[must_use]
    pub fn line(&self) -> Option<u32> {
        match self {
            Self::Syntax { line, .. }
            | Self::UnknownType { line, .. }
            | Self::UnknownFlag { line, .. }
            | Self::InvalidNumber { line, .. }
            | Self::DuplicateMember { line, .. }
            | Self::DuplicateField { line, .. }
            | Self::DuplicateDeclaration { line, .. }
            | Self::UnknownParent { line, .. }
            | Self::CyclicInheritance { line, .. } => Some(*line),
            Self::Io(_) | Self::Serialization(_) | Self::Internal(_) => None,
        }
    }

    /// Returns the taxonomy bucket of this kind.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Syntax { .. } => ErrorCategory::Syntax,
            Self::UnknownType { .. }
            | Self::UnknownFlag { .. }
            | Self::InvalidNumber { .. }
            | Self::DuplicateMember { .. }
            | Self::DuplicateField { .. }
            | Self::DuplicateDeclaration { .. }
            | Self::UnknownParent { .. }
            | Self::CyclicInheritance { .. } => ErrorCategory::Semantic,
            Self::Io(_) | Self::Serialization(_) => ErrorCategory::Io,
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }
}

/// Coarse error taxonomy.
///
/// There is no lexical bucket: scanning is total and never fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The token stream does not match the grammar.
    Syntax,
    /// The declarations are well-formed but inconsistent.
    Semantic,
    /// Loading source or writing output failed.
    Io,
    /// A compiler bug.
    Internal,
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source file name.
    pub source: Option<String>,
    /// Pipeline stage that raised the error.
    pub stage: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source file name.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the pipeline stage.
    #[must_use]
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.source, &self.stage) {
            (Some(source), Some(stage)) => write!(f, "in {source} ({stage})"),
            (Some(source), None) => write!(f, "in {source}"),
            (None, Some(stage)) => write!(f, "during {stage}"),
            (None, None) => Ok(()),
        }
    }
}
