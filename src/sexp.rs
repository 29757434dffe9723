//! Textual s-expressions.
//!
//! This is the human-readable form used by tooling and tests, e.g.
//! `(insert 2 (become-atom "x"))`. It is not the persisted format; see
//! `note` for the byte encoding.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// A parsed s-expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sexp {
    /// A bare token such as `insert` or `2`.
    Word(String),
    /// A double-quoted string, unescaped.
    Text(String),
    List(Vec<Sexp>),
}

impl Sexp {
    pub fn word(word: impl Into<String>) -> Sexp {
        return Sexp::Word(word.into());
    }

    pub fn text(text: impl Into<String>) -> Sexp {
        return Sexp::Text(text.into());
    }

    pub fn as_word(&self) -> Option<&str> {
        return match self {
            Sexp::Word(word) => Some(word),
            _ => None,
        };
    }

    pub fn as_list(&self) -> Option<&[Sexp]> {
        return match self {
            Sexp::List(items) => Some(items),
            _ => None,
        };
    }

    /// Parse exactly one s-expression; anything but whitespace after it is an error.
    pub fn parse(input: &str) -> Result<Sexp, ParseError> {
        let mut parser = Parser { input, pos: 0 };
        let sexp = parser.sexp(0)?;
        parser.skip_whitespace();
        if parser.pos < input.len() {
            return Err(ParseError::TrailingInput(parser.pos));
        }
        return Ok(sexp);
    }
}

impl FromStr for Sexp {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Sexp, ParseError> {
        return Sexp::parse(s);
    }
}

/// Write `text` as a double-quoted string with escapes.
pub fn write_quoted(f: &mut impl fmt::Write, text: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in text.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            c => f.write_char(c)?,
        }
    }
    return f.write_char('"');
}

impl fmt::Display for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            Sexp::Word(word) => f.write_str(word),
            Sexp::Text(text) => write_quoted(f, text),
            Sexp::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
        };
    }
}

/// How deeply lists may nest in parsed input.
pub const MAX_DEPTH: usize = 512;

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

fn is_delimiter(c: char) -> bool {
    return c.is_whitespace() || c == '(' || c == ')' || c == '"';
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        return self.input[self.pos..].chars().next();
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn sexp(&mut self, depth: usize) -> Result<Sexp, ParseError> {
        self.skip_whitespace();
        let c = self.peek().ok_or(ParseError::UnexpectedEnd)?;
        return match c {
            '(' => self.list(depth + 1),
            '"' => self.text(),
            ')' => Err(ParseError::UnexpectedToken {
                token: ")".to_string(),
                offset: self.pos,
            }),
            _ => Ok(self.word()),
        };
    }

    fn list(&mut self, depth: usize) -> Result<Sexp, ParseError> {
        if depth > MAX_DEPTH {
            return Err(ParseError::TooDeep(MAX_DEPTH));
        }
        // opening paren
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(ParseError::UnexpectedEnd),
                Some(')') => {
                    self.pos += 1;
                    return Ok(Sexp::List(items));
                }
                Some(_) => items.push(self.sexp(depth)?),
            }
        }
    }

    fn text(&mut self) -> Result<Sexp, ParseError> {
        let start = self.pos;
        self.pos += 1;
        let mut text = String::new();
        let input = self.input;
        let mut chars = input[self.pos..].char_indices();
        while let Some((offset, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += offset + 1;
                    return Ok(Sexp::Text(text));
                }
                '\\' => {
                    let (_, escaped) = chars.next().ok_or(ParseError::UnterminatedString(start))?;
                    match escaped {
                        '"' => text.push('"'),
                        '\\' => text.push('\\'),
                        'n' => text.push('\n'),
                        't' => text.push('\t'),
                        other => return Err(ParseError::UnknownEscape(other)),
                    }
                }
                c => text.push(c),
            }
        }
        return Err(ParseError::UnterminatedString(start));
    }

    fn word(&mut self) -> Sexp {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_delimiter(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        return Sexp::Word(self.input[start..self.pos].to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_nested() {
        let sexp = Sexp::parse("(insert 2 (become-atom \"x y\"))").unwrap();
        assert_eq!(
            sexp,
            Sexp::List(vec![
                Sexp::word("insert"),
                Sexp::word("2"),
                Sexp::List(vec![Sexp::word("become-atom"), Sexp::text("x y")]),
            ])
        );
    }

    #[test]
    fn display_escapes_text() {
        let sexp = Sexp::List(vec![Sexp::word("set-atom"), Sexp::text("say \"hi\"\\")]);
        assert_eq!(sexp.to_string(), "(set-atom \"say \\\"hi\\\"\\\\\")");
        assert_eq!(Sexp::parse(&sexp.to_string()).unwrap(), sexp);
    }

    #[test]
    fn whitespace_is_flexible() {
        let a = Sexp::parse("  ( a\n\t(b)  ) ").unwrap();
        let b = Sexp::parse("(a (b))").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unicode_text_and_words() {
        let sexp = Sexp::parse("(λ \"ünïcode\")").unwrap();
        assert_eq!(sexp, Sexp::List(vec![Sexp::word("λ"), Sexp::text("ünïcode")]));
    }

    #[test]
    fn errors() {
        assert_eq!(Sexp::parse("(a"), Err(ParseError::UnexpectedEnd));
        assert_eq!(Sexp::parse(""), Err(ParseError::UnexpectedEnd));
        assert_eq!(Sexp::parse("\"abc"), Err(ParseError::UnterminatedString(0)));
        assert_eq!(Sexp::parse("(a) b"), Err(ParseError::TrailingInput(4)));
        assert_eq!(Sexp::parse("\"\\q\""), Err(ParseError::UnknownEscape('q')));
        assert!(matches!(Sexp::parse(")"), Err(ParseError::UnexpectedToken { .. })));
    }

    #[test]
    fn nesting_is_bounded() {
        let deep = format!("{}{}", "(".repeat(20_000), ")".repeat(20_000));
        assert_eq!(Sexp::parse(&deep), Err(ParseError::TooDeep(MAX_DEPTH)));

        let limit = format!("{}{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(Sexp::parse(&limit).is_ok());
        let over = format!("({})", limit);
        assert_eq!(Sexp::parse(&over), Err(ParseError::TooDeep(MAX_DEPTH)));
    }
}
