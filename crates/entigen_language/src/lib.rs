//! Scanner, declaration types, and parser for the entigen schema language.
//!
//! This crate provides:
//! - `Lexer` - Tokenization of schema source
//! - `Parser` - Parsing tokens into entity and enum declarations
//! - `Declarations` - The declaration tables handed to the model builder

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod declaration;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

pub use declaration::{Declarations, EntityDecl, EntityField, EnumDecl, EnumMember, TypeDecl};
pub use lexer::Lexer;
pub use parser::{Parser, parse};
pub use span::Span;
pub use token::{Token, TokenKind};
