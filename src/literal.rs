//! Safe parsing of serialized list literals.
//!
//! Listing descriptions are exported as the textual form of a list of
//! strings, e.g. `['About this space', 'Cozy flat', '']`. [`parse_fragment_list()`]
//! reads that form back without evaluating anything: only list or tuple
//! literals whose elements are string literals or `None` are accepted.
//!
//! Supported string syntax:
//!
//! - single, double and triple quotes
//! - `r`/`u` prefixes (raw strings keep backslashes verbatim)
//! - implicit concatenation of adjacent literals (`'a' 'b'` is `"ab"`)
//! - the usual backslash escapes, including octal, `\x`, `\u` and `\U`

use thiserror::Error;

/// One parsed element. `None` stands for a literal `None` entry.
pub type Fragment = Option<String>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LiteralError {
    #[error("expected a list or tuple literal at offset {offset}")]
    ExpectedSequence { offset: usize },
    #[error("unexpected character {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEnd { offset: usize },
    #[error("unterminated string literal starting at offset {offset}")]
    UnterminatedString { offset: usize },
    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },
    #[error("unsupported element at offset {offset}; only strings and None are allowed")]
    UnsupportedElement { offset: usize },
    #[error("trailing content at offset {offset}")]
    TrailingContent { offset: usize },
}

pub fn parse_fragment_list(input: &str) -> Result<Vec<Fragment>, LiteralError> {
    let mut parser = Parser { input, pos: 0 };
    parser.skip_whitespace();
    let fragments = parser.parse_sequence()?;
    parser.skip_whitespace();
    if parser.peek().is_some() {
        return Err(LiteralError::TrailingContent { offset: parser.pos });
    }
    Ok(fragments)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn parse_sequence(&mut self) -> Result<Vec<Fragment>, LiteralError> {
        let start = self.pos;
        let close = match self.peek() {
            Some('[') => ']',
            Some('(') => ')',
            _ => return Err(LiteralError::ExpectedSequence { offset: start }),
        };
        self.bump();

        let mut fragments = Vec::new();
        let mut saw_comma = false;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(ch) if ch == close => {
                    self.bump();
                    break;
                }
                None => return Err(LiteralError::UnexpectedEnd { offset: self.pos }),
                _ => {}
            }
            fragments.push(self.parse_element()?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => saw_comma = true,
                Some(ch) if ch == close => break,
                Some(found) => {
                    return Err(LiteralError::Unexpected {
                        found,
                        offset: self.pos - found.len_utf8(),
                    });
                }
                None => return Err(LiteralError::UnexpectedEnd { offset: self.pos }),
            }
        }

        // `('a')` is a parenthesised string, not a one-element tuple.
        if close == ')' && fragments.len() == 1 && !saw_comma {
            return Err(LiteralError::ExpectedSequence { offset: start });
        }
        Ok(fragments)
    }

    fn parse_element(&mut self) -> Result<Fragment, LiteralError> {
        let start = self.pos;
        if self.at_keyword("None") {
            self.pos += "None".len();
            return Ok(None);
        }
        if !self.at_string_start() {
            return Err(LiteralError::UnsupportedElement { offset: start });
        }
        let mut value = String::new();
        while self.at_string_start() {
            self.parse_string_into(&mut value)?;
            self.skip_whitespace();
        }
        Ok(Some(value))
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        let rest = self.rest();
        rest.starts_with(keyword)
            && !rest[keyword.len()..]
                .chars()
                .next()
                .is_some_and(|ch| ch.is_alphanumeric() || ch == '_')
    }

    fn at_string_start(&self) -> bool {
        match self.peek() {
            Some('\'' | '"') => true,
            Some('r' | 'R' | 'u' | 'U') => matches!(self.peek_second(), Some('\'' | '"')),
            _ => false,
        }
    }

    fn parse_string_into(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let start = self.pos;
        let raw = matches!(self.peek(), Some('r' | 'R'));
        if matches!(self.peek(), Some('r' | 'R' | 'u' | 'U')) {
            self.bump();
        }
        let quote = match self.bump() {
            Some(ch @ ('\'' | '"')) => ch,
            _ => return Err(LiteralError::UnterminatedString { offset: start }),
        };
        let triple = self.peek() == Some(quote) && self.peek_second() == Some(quote);
        if triple {
            self.pos += 2 * quote.len_utf8();
        }

        loop {
            let Some(ch) = self.bump() else {
                return Err(LiteralError::UnterminatedString { offset: start });
            };
            if ch == quote {
                if !triple {
                    return Ok(());
                }
                if self.peek() == Some(quote) && self.peek_second() == Some(quote) {
                    self.pos += 2 * quote.len_utf8();
                    return Ok(());
                }
                out.push(ch);
                continue;
            }
            match ch {
                '\\' if raw => {
                    let Some(next) = self.bump() else {
                        return Err(LiteralError::UnterminatedString { offset: start });
                    };
                    out.push('\\');
                    out.push(next);
                }
                '\\' => self.parse_escape_into(out, start)?,
                '\n' | '\r' if !triple => {
                    return Err(LiteralError::UnterminatedString { offset: start });
                }
                other => out.push(other),
            }
        }
    }

    fn parse_escape_into(
        &mut self,
        out: &mut String,
        literal_start: usize,
    ) -> Result<(), LiteralError> {
        let offset = self.pos - 1;
        let Some(ch) = self.bump() else {
            return Err(LiteralError::UnterminatedString {
                offset: literal_start,
            });
        };
        match ch {
            '\n' => {}
            '\\' | '\'' | '"' => out.push(ch),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0b}'),
            '0'..='7' => {
                let mut code = ch.to_digit(8).unwrap_or_default();
                for _ in 0..2 {
                    match self.peek().and_then(|next| next.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            self.bump();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(code).ok_or(LiteralError::InvalidEscape { offset })?);
            }
            'x' => out.push(self.parse_hex_escape(2, offset)?),
            'u' => out.push(self.parse_hex_escape(4, offset)?),
            'U' => out.push(self.parse_hex_escape(8, offset)?),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn parse_hex_escape(&mut self, digits: usize, offset: usize) -> Result<char, LiteralError> {
        let mut code = 0u32;
        for _ in 0..digits {
            let digit = self
                .bump()
                .and_then(|ch| ch.to_digit(16))
                .ok_or(LiteralError::InvalidEscape { offset })?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or(LiteralError::InvalidEscape { offset })
    }
}
