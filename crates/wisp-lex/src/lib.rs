//! Tokenizes wisp source text.

pub mod cursor;
pub mod lexer;
pub mod token;

pub use lexer::{tokenize, Lexer};
pub use token::Token;
