//! The lexer: turns source text into a flat token stream.
//!
//! Whitespace (space, tab, newline) and commas are equivalent separators;
//! `;` starts a line comment; single-char delimiters `()[]{}'` `~^@` each
//! produce their own token, with `~@` as the one two-char exception;
//! everything else runs until the next separator, delimiter, or quote and
//! becomes an atom, classified later by the reader.

use wisp_util::{WispError, WispResult};

use crate::cursor::Cursor;
use crate::token::Token;

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            cursor: Cursor::new(source),
        }
    }

    /// Tokenizes the entire input. Returns [`WispError::Eof`] if a string
    /// literal is left open at the end of input — the REPL uses that to
    /// tell "show me more lines" apart from a genuine syntax error.
    pub fn tokenize(mut self) -> WispResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            match self.cursor.current() {
                None => break,
                Some(b';') => self.skip_comment(),
                Some(b'"') => tokens.push(self.lex_string()?),
                Some(c) if is_delimiter_start(c) => tokens.push(self.lex_delimiter()),
                Some(_) => tokens.push(self.lex_atom()),
            }
        }
        Ok(tokens)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.cursor.current(), Some(b',' | b' ' | b'\t' | b'\n')) {
            self.cursor.advance();
        }
    }

    fn skip_comment(&mut self) {
        while !matches!(self.cursor.current(), None | Some(b'\n')) {
            self.cursor.advance();
        }
        if self.cursor.current() == Some(b'\n') {
            self.cursor.advance();
        }
    }

    fn lex_delimiter(&mut self) -> Token {
        let c = self.cursor.current().expect("caller checked current() is Some");
        if c == b'~' && self.cursor.peek() == Some(b'@') {
            self.cursor.advance();
            self.cursor.advance();
            return Token::SpliceUnquote;
        }
        self.cursor.advance();
        match c {
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'[' => Token::LBracket,
            b']' => Token::RBracket,
            b'{' => Token::LBrace,
            b'}' => Token::RBrace,
            b'\'' => Token::Quote,
            b'`' => Token::Quasiquote,
            b'~' => Token::Unquote,
            b'^' => Token::WithMeta,
            b'@' => Token::Deref,
            _ => unreachable!("is_delimiter_start only admits the chars matched above"),
        }
    }

    /// Consumes the opening and closing `"`, leaving escape sequences
    /// untouched in the returned text — a lone trailing backslash just
    /// swallows whatever follows it, same as the reference tokenizer.
    fn lex_string(&mut self) -> WispResult<Token> {
        self.cursor.advance();
        let start = self.cursor.position();
        loop {
            match self.cursor.current() {
                None => {
                    log::trace!("unterminated string literal at end of input");
                    return Err(WispError::Eof);
                }
                Some(b'"') => {
                    let content = self.cursor.slice(start, self.cursor.position()).to_string();
                    self.cursor.advance();
                    return Ok(Token::Str(content));
                }
                Some(b'\\') => {
                    self.cursor.advance();
                    if self.cursor.current().is_some() {
                        self.cursor.advance();
                    }
                }
                Some(_) => self.cursor.advance(),
            }
        }
    }

    fn lex_atom(&mut self) -> Token {
        let start = self.cursor.position();
        while let Some(c) = self.cursor.current() {
            if is_atom_terminator(c) {
                break;
            }
            self.cursor.advance();
        }
        Token::Atom(self.cursor.slice(start, self.cursor.position()).to_string())
    }
}

fn is_delimiter_start(c: u8) -> bool {
    matches!(
        c,
        b'(' | b')' | b'[' | b']' | b'{' | b'}' | b'\'' | b'`' | b'~' | b'^' | b'@'
    )
}

/// Note this deliberately excludes `~`, `^`, `@`: those only start a
/// delimiter token at the front of a run, they don't break one up.
fn is_atom_terminator(c: u8) -> bool {
    matches!(
        c,
        b' ' | b'\t' | b'\n' | b',' | b';' | b'(' | b')' | b'[' | b']' | b'{' | b'}' | b'\'' | b'`' | b'"'
    )
}

pub fn tokenize(source: &str) -> WispResult<Vec<Token>> {
    Lexer::new(source).tokenize()
}
