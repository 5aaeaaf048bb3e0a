//! Parser for the schema language.
//!
//! A recursive-descent parser with one token of lookahead. When it reads
//! ahead to decide between two productions it pushes back exactly the
//! tokens it fetched; it never backtracks further than that.
//!
//! Type names are resolved as soon as they are read, against user
//! entities, then user enums, then built-in scalars. Parent names are left
//! for the model builder, which links the full declaration set.

use entigen_foundation::{Error, ErrorKind, FieldFlag, FieldFlags, Result, ScalarType};
use tracing::debug;

use crate::declaration::{Declarations, EntityDecl, EntityField, EnumDecl, EnumMember, TypeDecl};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// Scans and parses schema source into declaration tables.
///
/// # Errors
/// Returns the first syntax or semantic error found; there is no partial result.
pub fn parse(source: &str) -> Result<Declarations> {
    Parser::new(Lexer::tokenize_all(source)).parse()
}

/// Parser state for one compilation.
///
/// All position and registry state lives here, so independent parses never
/// share anything.
pub struct Parser {
    /// The token stream being consumed.
    tokens: Vec<Token>,
    /// Index of the next token to fetch.
    cursor: usize,
    /// Declarations registered so far.
    decls: Declarations,
    /// Entity whose body is being parsed; resolvable as a field type.
    current_entity: Option<String>,
}

impl Parser {
    /// Creates a parser over a token stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            cursor: 0,
            decls: Declarations::default(),
            current_entity: None,
        }
    }

    /// Parses every top-level declaration until the stream is exhausted.
    ///
    /// # Errors
    /// Returns an error on the first unexpected token, unresolved type,
    /// unknown flag, duplicate name, or malformed enum value.
    pub fn parse(mut self) -> Result<Declarations> {
        while let Some(token) = self.fetch() {
            if token.is_word("entity") {
                self.parse_entity(&token)?;
            } else if token.is_word("enum") {
                self.parse_enum(&token)?;
            } else {
                return Err(Error::syntax(
                    token.line(),
                    format!(
                        "unexpected {}; expected 'entity' or 'enum'",
                        token.describe()
                    ),
                ));
            }
        }
        debug!(
            entities = self.decls.entities.len(),
            enums = self.decls.enums.len(),
            "parsed declarations"
        );
        Ok(self.decls)
    }

    // =========================================================================
    // Token Stream
    // =========================================================================

    /// Fetches the next token.
    fn fetch(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    /// Pushes back the last `count` fetched tokens.
    fn rewind(&mut self, count: usize) {
        debug_assert!(count <= self.cursor, "rewind past start of stream");
        self.cursor -= count;
    }

    /// Line of the most recently fetched token.
    fn current_line(&self) -> u32 {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(1, Token::line)
    }

    /// Fetches the next token, failing at end of input.
    fn require(&mut self, expected: &str) -> Result<Token> {
        self.fetch().ok_or_else(|| {
            Error::syntax(
                self.current_line(),
                format!("unexpected end of input; expected {expected}"),
            )
        })
    }

    /// Fetches a separator token `c`.
    fn expect_separator(&mut self, c: char) -> Result<Token> {
        let token = self.require(&format!("'{c}'"))?;
        if token.is_separator(c) {
            Ok(token)
        } else {
            Err(unexpected(&token, &format!("'{c}'")))
        }
    }

    /// Fetches an operator token `op`.
    fn expect_operator(&mut self, op: &str) -> Result<Token> {
        let token = self.require(&format!("'{op}'"))?;
        if token.is_operator(op) {
            Ok(token)
        } else {
            Err(unexpected(&token, &format!("'{op}'")))
        }
    }

    /// Fetches an identifier token.
    fn expect_name(&mut self, what: &str) -> Result<Token> {
        let token = self.require(what)?;
        if token.kind == TokenKind::Identifier {
            Ok(token)
        } else {
            Err(unexpected(&token, what))
        }
    }

    // =========================================================================
    // Registries
    // =========================================================================

    /// Fails if `name` is already taken by an entity or enum.
    fn check_free_name(&self, token: &Token, what: &'static str) -> Result<()> {
        let taken = self.decls.entity(&token.text).is_some()
            || self.decls.enumeration(&token.text).is_some();
        if taken {
            return Err(Error::new(ErrorKind::DuplicateDeclaration {
                line: token.line(),
                what,
                name: token.text.clone(),
            }));
        }
        Ok(())
    }

    /// Resolves a type name against entities, enums, then scalars.
    fn resolve_type(&self, token: &Token) -> Result<TypeDecl> {
        let name = token.text.as_str();
        if self.decls.entity(name).is_some() || self.current_entity.as_deref() == Some(name) {
            return Ok(TypeDecl::Entity(name.to_string()));
        }
        if self.decls.enumeration(name).is_some() {
            return Ok(TypeDecl::Enum(name.to_string()));
        }
        if let Some(scalar) = ScalarType::from_name(name) {
            return Ok(TypeDecl::Scalar(scalar));
        }
        Err(Error::unknown_type(token.line(), name))
    }

    /// Adds `child` as the next member of the `<parent>Kind` discriminator enum,
    /// creating the enum on first use.
    fn register_subtype(&mut self, parent: &Token, child: &str) -> Result<()> {
        let kind_name = format!("{}Kind", parent.text);
        let index = match self.decls.enums.iter().position(|e| e.name == kind_name) {
            Some(index) => index,
            None => {
                let mut decl = EnumDecl::new(kind_name, parent.span);
                decl.discriminator = true;
                self.decls.enums.push(decl);
                self.decls.enums.len() - 1
            }
        };

        let kind = &mut self.decls.enums[index];
        if kind.member(child).is_some() {
            return Err(Error::new(ErrorKind::DuplicateMember {
                line: parent.line(),
                name: kind.name.clone(),
                member: child.to_string(),
            }));
        }
        let value = kind
            .next_value()
            .ok_or_else(|| Error::invalid_number(parent.line(), format!("{}+1", u64::MAX)))?;
        kind.members.push(EnumMember {
            name: child.to_string(),
            value,
            span: parent.span,
        });
        Ok(())
    }

    // =========================================================================
    // Entity Declarations
    // =========================================================================

    /// Parses `entity NAME [: PARENT] { FIELD* }` after the keyword.
    fn parse_entity(&mut self, keyword: &Token) -> Result<()> {
        let name = self.expect_name("entity name")?;
        self.check_free_name(&name, "entity")?;
        let mut decl = EntityDecl::new(name.text.clone(), keyword.span.to(name.span));

        let next = self.require("':' or '{'")?;
        if next.is_operator(":") {
            let parent = self.expect_name("parent entity name")?;
            self.register_subtype(&parent, &decl.name)?;
            decl.parent = Some(parent.text);
        } else {
            self.rewind(1);
        }

        self.expect_separator('{')?;
        self.current_entity = Some(decl.name.clone());
        loop {
            let token = self.require("field or '}'")?;
            if token.is_separator('}') {
                decl.span = decl.span.to(token.span);
                break;
            }
            self.rewind(1);

            let field = self.parse_field()?;
            if decl.field(&field.name).is_some() {
                return Err(Error::new(ErrorKind::DuplicateField {
                    line: field.span.line,
                    entity: decl.name.clone(),
                    field: field.name,
                }));
            }
            decl.fields.push(field);
        }
        self.current_entity = None;

        debug!(
            entity = %decl.name,
            parent = decl.parent.as_deref().unwrap_or("-"),
            fields = decl.fields.len(),
            "parsed entity"
        );
        self.decls.entities.push(decl);
        Ok(())
    }

    /// Parses `IDENT : TYPE [ [FLAGS] ] ;`.
    fn parse_field(&mut self) -> Result<EntityField> {
        let name = self.expect_name("field name")?;
        self.expect_operator(":")?;
        let type_name = self.expect_name("type name")?;
        let ty = self.resolve_type(&type_name)?;

        let next = self.require("'[' or ';'")?;
        let flags = if next.is_separator('[') {
            self.parse_flags()?
        } else {
            self.rewind(1);
            FieldFlags::empty()
        };
        let end = self.expect_separator(';')?;

        Ok(EntityField {
            name: name.text,
            ty,
            flags,
            span: name.span.to(end.span),
        })
    }

    /// Parses a flag list after its opening `[`, through the closing `]`.
    ///
    /// Flags may be separated by commas, whitespace, or both.
    fn parse_flags(&mut self) -> Result<FieldFlags> {
        let mut flags = FieldFlags::empty();
        loop {
            let token = self.require("flag name or ']'")?;
            if token.is_separator(']') {
                return Ok(flags);
            }
            if token.is_separator(',') {
                continue;
            }
            if token.kind != TokenKind::Identifier {
                return Err(unexpected(&token, "flag name"));
            }
            let flag = FieldFlag::from_name(&token.text)
                .ok_or_else(|| Error::unknown_flag(token.line(), &token.text))?;
            flags |= flag.bits();
        }
    }

    // =========================================================================
    // Enum Declarations
    // =========================================================================

    /// Parses `enum NAME { MEMBER [= NUMBER] (, MEMBER [= NUMBER])* }` after the keyword.
    fn parse_enum(&mut self, keyword: &Token) -> Result<()> {
        let name = self.expect_name("enum name")?;
        self.check_free_name(&name, "enum")?;
        let mut decl = EnumDecl::new(name.text.clone(), keyword.span.to(name.span));
        self.expect_separator('{')?;

        loop {
            let token = self.require("enum member or '}'")?;
            if token.is_separator('}') {
                decl.span = decl.span.to(token.span);
                break;
            }
            if token.kind != TokenKind::Identifier {
                return Err(unexpected(&token, "enum member"));
            }
            if decl.member(&token.text).is_some() {
                return Err(Error::new(ErrorKind::DuplicateMember {
                    line: token.line(),
                    name: decl.name.clone(),
                    member: token.text,
                }));
            }

            let value = self.parse_member_value(&decl, &token)?;
            decl.members.push(EnumMember {
                name: token.text,
                value,
                span: token.span,
            });

            let separator = self.require("',' or '}'")?;
            if separator.is_separator('}') {
                decl.span = decl.span.to(separator.span);
                break;
            }
            if !separator.is_separator(',') {
                return Err(unexpected(&separator, "',' or '}'"));
            }
        }

        debug!(name = %decl.name, members = decl.members.len(), "parsed enum");
        self.decls.enums.push(decl);
        Ok(())
    }

    /// Parses an optional `= NUMBER`, defaulting to the previous value plus one.
    fn parse_member_value(&mut self, decl: &EnumDecl, member: &Token) -> Result<u64> {
        let next = self.require("'=', ',' or '}'")?;
        let assigned = next
            .text
            .strip_prefix('=')
            .filter(|_| next.kind == TokenKind::Operator);
        if let Some(sign) = assigned {
            // A sign scans together with `=`, as in `A =-1`.
            if !sign.is_empty() {
                return Err(self.signed_number(next.line(), sign));
            }
            let number = self.require("member value")?;
            if number.kind == TokenKind::Operator {
                return Err(self.signed_number(number.line(), &number.text));
            }
            return number
                .as_integer()
                .ok_or_else(|| Error::invalid_number(number.line(), &number.text));
        }
        self.rewind(1);

        decl.next_value().ok_or_else(|| {
            Error::invalid_number(member.line(), format!("{}+1", u64::MAX))
        })
    }

    /// Reports `sign` and the literal after it as one malformed number.
    fn signed_number(&self, line: u32, sign: &str) -> Error {
        let digits = self
            .tokens
            .get(self.cursor)
            .filter(|t| matches!(t.kind, TokenKind::Integer | TokenKind::Decimal))
            .map(|t| t.text.clone())
            .unwrap_or_default();
        Error::invalid_number(line, format!("{sign}{digits}"))
    }
}

/// Builds an "expected X, found Y" syntax error at `token`.
fn unexpected(token: &Token, expected: &str) -> Error {
    Error::syntax(
        token.line(),
        format!("expected {expected}, found {}", token.describe()),
    )
}
