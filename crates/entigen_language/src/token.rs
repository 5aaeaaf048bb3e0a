//! Token types for the schema language.
//!
//! A token's kind is inferred from the shape of its lexeme alone, never
//! from parser context. See [`TokenKind::classify`].

use crate::span::Span;

/// Separator punctuation.
pub const SEPARATORS: [char; 9] = [';', ',', '{', '}', '(', ')', '[', ']', '.'];

/// Characters that make up symbolic operators.
pub const OPERATOR_CHARS: [char; 11] = ['=', '+', '-', '*', '/', '%', '<', '>', '!', ':', '^'];

/// Word-shaped operators.
pub const KEYWORD_OPERATORS: [&str; 3] = ["and", "or", "xor"];

/// Returns true if `c` is separator punctuation.
#[must_use]
pub fn is_separator(c: char) -> bool {
    SEPARATORS.contains(&c)
}

/// Returns true if `c` can be part of a symbolic operator.
#[must_use]
pub fn is_operator_char(c: char) -> bool {
    OPERATOR_CHARS.contains(&c)
}

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The classified shape of this token.
    pub kind: TokenKind,
    /// Token text. For strings this is the content between the quotes.
    pub text: String,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Returns the line this token starts on.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.span.line
    }

    /// Returns true if this is the separator `c`.
    #[must_use]
    pub fn is_separator(&self, c: char) -> bool {
        self.kind == TokenKind::Separator && self.text.chars().eq(std::iter::once(c))
    }

    /// Returns true if this is the operator `op`.
    #[must_use]
    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    /// Returns true if this is the identifier `word`.
    #[must_use]
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == word
    }

    /// Returns the value of an integer token.
    #[must_use]
    pub fn as_integer(&self) -> Option<u64> {
        match self.kind {
            TokenKind::Integer => self.text.parse().ok(),
            _ => None,
        }
    }

    /// Returns how this token reads in an error message.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::String => format!("string \"{}\"", self.text),
            _ => format!("{} '{}'", self.kind.name(), self.text),
        }
    }
}

/// Token kinds for the schema language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `true` or `false`
    Boolean,
    /// `.`
    Selector,
    /// Symbolic operator like `:` or `:=`, or `and`/`or`/`xor`
    Operator,
    /// Unsigned integer literal like `42`
    Integer,
    /// Decimal literal like `2.5`
    Decimal,
    /// Double-quoted string literal
    String,
    /// Separator punctuation other than `.`
    Separator,
    /// Anything else: names, keywords, type names
    Identifier,
}

impl TokenKind {
    /// Classifies a raw lexeme by its shape.
    ///
    /// String lexemes are passed with their opening quote. Numeric lexemes
    /// try the unsigned-integer reading first, then the decimal one.
    #[must_use]
    pub fn classify(lexeme: &str) -> Self {
        if lexeme.starts_with('"') {
            return Self::String;
        }
        if lexeme == "true" || lexeme == "false" {
            return Self::Boolean;
        }
        if lexeme == "." {
            return Self::Selector;
        }
        if KEYWORD_OPERATORS.contains(&lexeme)
            || (!lexeme.is_empty() && lexeme.chars().all(is_operator_char))
        {
            return Self::Operator;
        }
        if lexeme.starts_with(|c: char| c.is_ascii_digit()) {
            if lexeme.parse::<u64>().is_ok() {
                return Self::Integer;
            }
            if lexeme.parse::<f64>().is_ok() {
                return Self::Decimal;
            }
        }
        let mut chars = lexeme.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if is_separator(c) {
                return Self::Separator;
            }
        }
        Self::Identifier
    }

    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Selector => "selector",
            Self::Operator => "operator",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::String => "string",
            Self::Separator => "separator",
            Self::Identifier => "identifier",
        }
    }
}
