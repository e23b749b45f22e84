//! Turns a token stream into [`Value`] trees.
//!
//! `read_form` is the mutually-recursive entry point every other method
//! here feeds back into: a list reads forms until its closing paren, a
//! reader macro (`'`, `` ` ``, `~`, `~@`, `@`, `^`) reads its target form
//! and wraps it, and so on. Running out of tokens partway through any of
//! these is reported as [`WispError::Eof`] rather than [`WispError::ParseFailure`]
//! so the REPL can tell "this line isn't finished yet" from "this input is
//! simply wrong" and prompt for another line instead of printing an error.

use wisp_lex::Token;
use wisp_util::{WispError, WispResult};
use wisp_value::{MapData, Value};

pub struct Reader {
    tokens: Vec<Token>,
    position: usize,
}

impl Reader {
    pub fn new(tokens: Vec<Token>) -> Self {
        Reader { tokens, position: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.position).cloned();
        if t.is_some() {
            self.position += 1;
        }
        t
    }

    /// Reads one top-level form. Returns `Ok(None)` only when called with
    /// no tokens left at all — an empty line is not an error.
    pub fn read_form(&mut self) -> WispResult<Option<Value>> {
        match self.peek() {
            None => Ok(None),
            Some(Token::RParen) | Some(Token::RBracket) | Some(Token::RBrace) => {
                let c = closing_char(self.peek().unwrap());
                log::debug!("parse failure: stray '{c}'");
                Err(WispError::ParseFailure(format!("unexpected '{c}'")))
            }
            Some(Token::LParen) => Ok(Some(self.read_seq(Token::RParen, ')', Value::list)?)),
            Some(Token::LBracket) => Ok(Some(self.read_seq(Token::RBracket, ']', Value::vector)?)),
            Some(Token::LBrace) => Ok(Some(self.read_hashmap()?)),
            Some(Token::Str(_)) => Ok(Some(self.read_string()?)),
            Some(Token::Quote) => Ok(Some(self.read_reader_macro("quote")?)),
            Some(Token::Quasiquote) => Ok(Some(self.read_reader_macro("quasiquote")?)),
            Some(Token::Unquote) => Ok(Some(self.read_reader_macro("unquote")?)),
            Some(Token::SpliceUnquote) => Ok(Some(self.read_reader_macro("splice-unquote")?)),
            Some(Token::Deref) => Ok(Some(self.read_reader_macro("deref")?)),
            Some(Token::WithMeta) => Ok(Some(self.read_with_meta()?)),
            Some(Token::Atom(a)) if a.starts_with(':') => Ok(Some(self.read_keyword()?)),
            Some(Token::Atom(_)) => Ok(Some(self.read_atom()?)),
        }
    }

    /// Requires a form to follow — used anywhere a reader macro or bracket
    /// has committed to reading one more form and running out of tokens
    /// means the overall input is incomplete, not empty.
    fn require_form(&mut self) -> WispResult<Value> {
        self.read_form()?.ok_or(WispError::Eof)
    }

    fn read_seq(
        &mut self,
        close: Token,
        close_char: char,
        build: impl Fn(Vec<Value>) -> Value,
    ) -> WispResult<Value> {
        self.advance();
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => return Err(WispError::Eof),
                Some(t) if *t == close => {
                    self.advance();
                    return Ok(build(items));
                }
                _ => items.push(self.require_form()?),
            }
        }
    }

    fn read_hashmap(&mut self) -> WispResult<Value> {
        self.advance();
        let mut map = MapData::empty();
        loop {
            match self.peek() {
                None => return Err(WispError::Eof),
                Some(Token::RBrace) => {
                    self.advance();
                    map.sort();
                    return Ok(Value::Map(std::rc::Rc::new(map)));
                }
                _ => {
                    let key = self.require_form()?;
                    match self.peek() {
                        None => return Err(WispError::Eof),
                        Some(Token::RBrace) => {
                            return Err(WispError::ParseFailure(
                                "expected a value for hashmap key, got '}'".to_string(),
                            ))
                        }
                        _ => {
                            let value = self.require_form()?;
                            map.insert_unsorted(key, value);
                        }
                    }
                }
            }
        }
    }

    fn read_reader_macro(&mut self, symbol: &str) -> WispResult<Value> {
        self.advance();
        let target = self.require_form()?;
        Ok(Value::list(vec![Value::symbol(symbol), target]))
    }

    /// `^meta value` reads as `(with-meta value meta)` — the meta datum
    /// comes first on the page but second in the emitted call, matching
    /// `with-meta`'s (target, meta) argument order.
    fn read_with_meta(&mut self) -> WispResult<Value> {
        self.advance();
        let meta = self.require_form()?;
        let target = self.require_form()?;
        Ok(Value::list(vec![
            Value::symbol("with-meta"),
            target,
            meta,
        ]))
    }

    fn read_keyword(&mut self) -> WispResult<Value> {
        match self.advance() {
            Some(Token::Atom(text)) => Ok(Value::keyword(text.trim_start_matches(':'))),
            _ => unreachable!("caller matched on Token::Atom starting with ':'"),
        }
    }

    fn read_string(&mut self) -> WispResult<Value> {
        match self.advance() {
            Some(Token::Str(raw)) => Ok(Value::string(unescape(&raw))),
            _ => unreachable!("caller matched on Token::Str"),
        }
    }

    fn read_atom(&mut self) -> WispResult<Value> {
        let text = match self.advance() {
            Some(Token::Atom(text)) => text,
            _ => unreachable!("caller matched on Token::Atom"),
        };

        Ok(match text.as_str() {
            "nil" => Value::Nil,
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => match text.parse::<i64>() {
                Ok(n) => Value::Int(n),
                Err(_) if is_integer_shaped(&text) => {
                    log::debug!("parse failure: integer overflow in {text:?}");
                    return Err(WispError::ParseFailure(format!(
                        "numeric overflow in '{text}'"
                    )));
                }
                Err(_) => {
                    if let Ok(n) = text.parse::<f64>() {
                        Value::Float(n)
                    } else {
                        Value::symbol(text)
                    }
                }
            },
        })
    }
}

/// True for an optional `-` followed by one or more ASCII digits — a token
/// that *looks* like an integer and so should be a parse failure rather
/// than silently falling through to float or symbol when it overflows
/// `i64`, matching `reader.c`'s `strtoll`/`ERANGE` check.
fn is_integer_shaped(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn closing_char(t: &Token) -> char {
    match t {
        Token::RParen => ')',
        Token::RBracket => ']',
        Token::RBrace => '}',
        _ => unreachable!("only called with a closing-delimiter token"),
    }
}

/// Special-cases `\\`, `\"`, `\n`, and a trailing lone backslash (dropped);
/// any other escape sequence is copied through unchanged, backslash and
/// all — it is deliberately *not* stripped.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            None => {}
            Some('\\') => {
                out.push('\\');
                chars.next();
            }
            Some('"') => {
                out.push('"');
                chars.next();
            }
            Some('n') => {
                out.push('\n');
                chars.next();
            }
            Some(&other) => {
                out.push('\\');
                out.push(other);
                chars.next();
            }
        }
    }
    out
}

/// Tokenizes and reads a single form from `source`. Returns `Ok(None)` for
/// input with no forms in it (blank lines, comment-only input).
pub fn read_str(source: &str) -> WispResult<Option<Value>> {
    let tokens = wisp_lex::tokenize(source)?;
    Reader::new(tokens).read_form()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wisp_value::wisp_eq;

    #[test]
    fn empty_input_reads_nothing() {
        assert!(read_str("").unwrap().is_none());
        assert!(read_str("  ; just a comment").unwrap().is_none());
    }

    #[test]
    fn reads_scalars() {
        assert!(wisp_eq(&read_str("nil").unwrap().unwrap(), &Value::Nil));
        assert!(wisp_eq(&read_str("true").unwrap().unwrap(), &Value::Bool(true)));
        assert!(wisp_eq(&read_str("42").unwrap().unwrap(), &Value::Int(42)));
        assert!(wisp_eq(&read_str("-3.5").unwrap().unwrap(), &Value::Float(-3.5)));
        assert!(wisp_eq(&read_str("foo").unwrap().unwrap(), &Value::symbol("foo")));
        assert!(wisp_eq(&read_str(":foo").unwrap().unwrap(), &Value::keyword("foo")));
    }

    #[test]
    fn reads_nested_lists_and_vectors() {
        let v = read_str("(1 [2 3] 4)").unwrap().unwrap();
        let expected = Value::list(vec![
            Value::Int(1),
            Value::vector(vec![Value::Int(2), Value::Int(3)]),
            Value::Int(4),
        ]);
        assert!(wisp_eq(&v, &expected));
    }

    #[test]
    fn reads_hashmap_literal() {
        let v = read_str(r#"{:a 1 :b 2}"#).unwrap().unwrap();
        if let Value::Map(m) = &v {
            assert_eq!(m.get(&Value::keyword("a")), Some(&Value::Int(1)));
            assert_eq!(m.get(&Value::keyword("b")), Some(&Value::Int(2)));
        } else {
            panic!("expected a hashmap");
        }
    }

    #[test]
    fn reader_macros_expand_to_calls() {
        let v = read_str("'(1 2)").unwrap().unwrap();
        let expected = Value::list(vec![
            Value::symbol("quote"),
            Value::list(vec![Value::Int(1), Value::Int(2)]),
        ]);
        assert!(wisp_eq(&v, &expected));

        let v = read_str("~@x").unwrap().unwrap();
        let expected = Value::list(vec![Value::symbol("splice-unquote"), Value::symbol("x")]);
        assert!(wisp_eq(&v, &expected));
    }

    #[test]
    fn with_meta_places_meta_datum_last() {
        let v = read_str("^{:a 1} [1 2]").unwrap().unwrap();
        if let Value::List(seq) = &v {
            assert!(wisp_eq(&seq.items[0], &Value::symbol("with-meta")));
            assert!(wisp_eq(&seq.items[1], &Value::vector(vec![Value::Int(1), Value::Int(2)])));
            assert!(matches!(seq.items[2], Value::Map(_)));
        } else {
            panic!("expected a list");
        }
    }

    #[test]
    fn string_unescaping_handles_known_and_unknown_sequences() {
        let v = read_str(r#""a\n\"b\\c""#).unwrap().unwrap();
        assert!(wisp_eq(&v, &Value::string("a\n\"b\\c")));

        let v = read_str(r#""a\qb""#).unwrap().unwrap();
        assert!(wisp_eq(&v, &Value::string("a\\qb")));
    }

    #[test]
    fn unbalanced_list_is_eof_so_repl_can_ask_for_more() {
        assert!(matches!(read_str("(1 2").unwrap_err(), WispError::Eof));
    }

    #[test]
    fn stray_closing_delimiter_is_a_parse_failure() {
        assert!(matches!(
            read_str(")").unwrap_err(),
            WispError::ParseFailure(_)
        ));
    }

    #[test]
    fn integer_shaped_atom_that_overflows_i64_is_a_parse_failure() {
        assert!(matches!(
            read_str("99999999999999999999999999").unwrap_err(),
            WispError::ParseFailure(_)
        ));
        assert!(matches!(
            read_str("-99999999999999999999999999").unwrap_err(),
            WispError::ParseFailure(_)
        ));
    }

    #[test]
    fn non_integer_shaped_atom_still_falls_through_to_float_or_symbol() {
        assert!(wisp_eq(&read_str("3.14159e2").unwrap().unwrap(), &Value::Float(314.159)));
        assert!(wisp_eq(&read_str("not-a-number").unwrap().unwrap(), &Value::symbol("not-a-number")));
    }
}
