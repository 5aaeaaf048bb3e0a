//! Scanner for the schema language.
//!
//! The lexer converts source text into a stream of tokens. Scanning is
//! total: every input produces a token sequence, and comments are
//! stripped rather than tokenized.

use crate::span::Span;
use crate::token::{Token, TokenKind, is_operator_char, is_separator};

/// Lexer for schema source code.
pub struct Lexer<'src> {
    /// Source text being tokenized.
    source: &'src str,
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    column: u32,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the next token, or `None` once the source is exhausted.
    pub fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace_and_comments();

        let start = self.position;
        let line = self.line;
        let column = self.column;

        let c = self.peek_char()?;
        let (lexeme, text) = match c {
            '"' => self.scan_string(),
            c if is_separator(c) => {
                self.advance();
                let lexeme = &self.source[start..self.position];
                (lexeme, lexeme)
            }
            c if is_operator_char(c) => {
                let lexeme = self.scan_operator();
                (lexeme, lexeme)
            }
            _ => {
                let lexeme = self.scan_word();
                (lexeme, lexeme)
            }
        };

        let kind = TokenKind::classify(lexeme);

        Some(Token::new(
            kind,
            text,
            Span::new(start, self.position, line, column),
        ))
    }

    /// Tokenizes all source and returns a vector of tokens.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token() {
            tokens.push(token);
        }
        tokens
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Peeks `n` characters past the next one.
    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    /// Advances past the next character.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Returns true if the remaining input opens a `//` or `/*` comment.
    fn at_comment(&self) -> bool {
        self.rest.starts_with("//") || self.rest.starts_with("/*")
    }

    /// Skips whitespace, line comments, and block comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => self.advance(),
                Some('/') if self.rest.starts_with("//") => {
                    while let Some(c) = self.peek_char() {
                        self.advance();
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some('/') if self.rest.starts_with("/*") => {
                    self.advance();
                    self.advance();
                    // An unterminated block comment runs to end of input.
                    while !self.rest.is_empty() && !self.rest.starts_with("*/") {
                        self.advance();
                    }
                    self.advance();
                    self.advance();
                }
                _ => break,
            }
        }
    }

    /// Scans a string literal, returning the lexeme (with quotes) and its content.
    ///
    /// Content is kept verbatim; a backslash only keeps the following
    /// quote from closing the string. An unterminated string runs to end
    /// of input.
    fn scan_string(&mut self) -> (&'src str, &'src str) {
        let start = self.position;
        self.advance(); // opening '"'
        let content_start = self.position;
        let mut content_end = None;
        while let Some(c) = self.peek_char() {
            match c {
                '"' => {
                    content_end = Some(self.position);
                    self.advance();
                    break;
                }
                '\\' => {
                    self.advance();
                    self.advance();
                }
                _ => self.advance(),
            }
        }
        let content_end = content_end.unwrap_or(self.position);
        (
            &self.source[start..self.position],
            &self.source[content_start..content_end],
        )
    }

    /// Scans a maximal run of operator characters.
    fn scan_operator(&mut self) -> &'src str {
        let start = self.position;
        while let Some(c) = self.peek_char() {
            if !is_operator_char(c) || (self.position > start && self.at_comment()) {
                break;
            }
            self.advance();
        }
        &self.source[start..self.position]
    }

    /// Scans an identifier or numeric literal.
    ///
    /// A `.` continues the lexeme only while it is still an unsigned
    /// integer followed by another digit, i.e. inside a number.
    fn scan_word(&mut self) -> &'src str {
        let start = self.position;
        while let Some(c) = self.peek_char() {
            if c == '.' {
                let so_far = &self.source[start..self.position];
                let inside_number =
                    !so_far.is_empty() && so_far.chars().all(|d| d.is_ascii_digit());
                if inside_number && self.peek_char_n(1).is_some_and(|d| d.is_ascii_digit()) {
                    self.advance();
                    continue;
                }
                break;
            }
            if !is_word_char(c) {
                break;
            }
            self.advance();
        }
        &self.source[start..self.position]
    }
}

/// Returns true if `c` can appear in an identifier or number.
fn is_word_char(c: char) -> bool {
    !(c.is_whitespace() || c == '"' || is_separator(c) || is_operator_char(c))
}
