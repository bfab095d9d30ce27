mod cursor;
mod error;
pub mod formatter;
mod token;

use cursor::SourceChar;
pub use error::{LexicalError, LexicalErrorKind};
use std::{ops::Range, rc::Rc, str::Chars};
pub use token::{Span, SpanIndex, SpanLength, Token, TokenKind, KEYWORD_HASHMAP};

#[derive(Debug, Clone)]
pub struct LineBreaks {
    line_breaks: Rc<[Range<SpanIndex>]>,
}

impl LineBreaks {
    pub fn new(text: &str) -> Self {
        let line_breaks = if !text.is_empty() {
            let mut line_breaks = Vec::new();
            let mut cursor: SpanIndex = 0.into();
            for (offset, byte) in text.bytes().enumerate() {
                let offset = (offset + 1).into();
                if byte == b'\n' {
                    line_breaks.push(cursor..offset);
                    cursor = offset;
                }
            }
            if !text.ends_with('\n') {
                line_breaks.push(cursor..(text.len() + 1).into());
            }
            line_breaks
        } else {
            vec![0.into()..1.into()]
        };
        Self {
            line_breaks: line_breaks.into(),
        }
    }

    pub fn get_max_line(&self) -> u32 {
        (self.line_breaks.len() + 1) as u32
    }

    pub fn get_line(&self, offset: SpanIndex) -> u32 {
        self.line_breaks
            .binary_search_by(|r| {
                if offset < r.start {
                    std::cmp::Ordering::Greater
                } else if offset >= r.end {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .map(|v| (v + 1) as u32)
            .unwrap_or(self.get_max_line())
    }

    pub fn get_line_from_span(&self, span: Span) -> u32 {
        self.get_line(span.start)
    }
}

#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    chars: Chars<'src>,
    offset: SpanIndex,
    lookahead: Option<SourceChar>,
    line_breaks: LineBreaks,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.chars(),
            offset: 0.into(),
            lookahead: None,
            line_breaks: LineBreaks::new(source),
        }
    }

    pub fn get_source(&self) -> &'src str {
        self.source
    }

    pub fn get_line_breaks(&self) -> LineBreaks {
        self.line_breaks.clone()
    }

    pub fn get_lexeme(&self, span: &Span) -> Option<&'src str> {
        self.source.get(span.range())
    }
}

impl<'src> Lexer<'src> {
    fn next_char(&mut self) -> Option<SourceChar> {
        if let Some(lookahead) = self.lookahead.take() {
            return Some(lookahead);
        }
        let c = self.chars.next()?;
        let old_location = self.offset;
        self.offset = self.offset + c.len_utf8();
        Some(SourceChar {
            value: c,
            offset: old_location,
        })
    }

    fn peek_char(&mut self) -> Option<SourceChar> {
        if self.lookahead.is_none() {
            self.lookahead = self.next_char();
        }
        self.lookahead
    }

    fn eat_while(&mut self, predicate: impl Fn(char) -> bool) -> SpanIndex {
        while let Some(c) = self.peek_char() {
            if !predicate(c.value) {
                return c.offset;
            }
            let _ = self.next_char();
        }
        self.source.len().into()
    }

    fn error(&self, kind: LexicalErrorKind, start: SpanIndex, end: SpanIndex) -> LexicalError {
        LexicalError {
            kind,
            span: Span {
                start,
                length: end - start,
            },
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexicalError> {
        loop {
            let Some(current) = self.next_char() else {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    span: Span::new(self.source.len(), self.source.len()),
                });
            };

            let start = current.offset;
            let just = |kind: TokenKind| {
                Ok(Token {
                    kind,
                    span: Span {
                        start,
                        length: 1.into(),
                    },
                })
            };

            return match current.value {
                '(' => just(TokenKind::LeftParenthesis),
                ')' => just(TokenKind::RightParenthesis),
                '{' => just(TokenKind::LeftBrace),
                '}' => just(TokenKind::RightBrace),
                ',' => just(TokenKind::Comma),
                ':' => match self.peek_char() {
                    Some(SourceChar { value: '=', .. }) => {
                        let _ = self.next_char();
                        Ok(Token {
                            kind: TokenKind::ColonEqual,
                            span: Span::new(start.to_usize(), start.to_usize() + 2),
                        })
                    }
                    _ => just(TokenKind::Colon),
                },
                '-' => match self.peek_char() {
                    Some(SourceChar { value: '>', .. }) => {
                        let _ = self.next_char();
                        Ok(Token {
                            kind: TokenKind::Arrow,
                            span: Span::new(start.to_usize(), start.to_usize() + 2),
                        })
                    }
                    _ => Err(self.error(
                        LexicalErrorKind::Unrecognized('-'),
                        start,
                        current.next_offset(),
                    )),
                },
                '/' => match self.peek_char() {
                    Some(SourceChar { value: '/', .. }) => {
                        let _ = self.eat_while(|c| c != '\n');
                        continue;
                    }
                    Some(SourceChar { value: '*', .. }) => {
                        let _ = self.next_char();
                        self.skip_block_comment(start)?;
                        continue;
                    }
                    _ => Err(self.error(
                        LexicalErrorKind::Unrecognized('/'),
                        start,
                        current.next_offset(),
                    )),
                },
                '"' => self.lex_string(start),
                '0' if matches!(self.peek_char(), Some(SourceChar { value: 'x', .. })) => {
                    let _ = self.next_char();
                    let end = self.eat_while(|c| c.is_ascii_hexdigit());
                    if end.to_usize() == start.to_usize() + 2 {
                        Err(self.error(LexicalErrorKind::EmptyHexLiteral, start, end))
                    } else {
                        Ok(Token {
                            kind: TokenKind::HexLiteral,
                            span: Span::new(start.to_usize(), end.to_usize()),
                        })
                    }
                }
                '0'..='9' => {
                    let end = self.eat_while(|c| c.is_ascii_digit());
                    Ok(Token {
                        kind: TokenKind::NumericLiteral,
                        span: Span::new(start.to_usize(), end.to_usize()),
                    })
                }
                c if is_ident_start(c) => {
                    let end = self.eat_while(is_ident_continue);
                    let span = Span::new(start.to_usize(), end.to_usize());
                    let lexeme = &self.source[span.range()];
                    Ok(Token {
                        kind: KEYWORD_HASHMAP
                            .get(lexeme)
                            .copied()
                            .unwrap_or(TokenKind::Ident),
                        span,
                    })
                }
                c if c.is_whitespace() => continue,
                c => Err(self.error(
                    LexicalErrorKind::Unrecognized(c),
                    start,
                    current.next_offset(),
                )),
            };
        }
    }

    fn skip_block_comment(&mut self, start: SpanIndex) -> Result<(), LexicalError> {
        let mut previous = '\0';
        while let Some(c) = self.next_char() {
            if previous == '*' && c.value == '/' {
                return Ok(());
            }
            previous = c.value;
        }
        Err(self.error(
            LexicalErrorKind::UnclosedComment,
            start,
            self.source.len().into(),
        ))
    }

    fn lex_string(&mut self, start: SpanIndex) -> Result<Token, LexicalError> {
        loop {
            let Some(c) = self.next_char() else {
                return Err(self.error(
                    LexicalErrorKind::UnclosedString,
                    start,
                    self.source.len().into(),
                ));
            };
            match c.value {
                '"' => {
                    return Ok(Token {
                        kind: TokenKind::StringLiteral,
                        span: Span::new(start.to_usize(), c.next_offset().to_usize()),
                    });
                }
                '\n' => {
                    return Err(self.error(LexicalErrorKind::UnclosedString, start, c.offset));
                }
                '\\' => {
                    let Some(escape) = self.next_char() else {
                        continue;
                    };
                    let decoded = {
                        let mut hex = || self.next_char().map(|c| c.value);
                        decode_escape(escape.value, &mut hex)
                    };
                    if let Err(kind) = decoded {
                        return Err(self.error(kind, c.offset, escape.next_offset()));
                    }
                }
                _ => {}
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.'
}

/// Decodes the character following a backslash into the byte it stands for.
fn decode_escape(
    escape: char,
    next: &mut impl FnMut() -> Option<char>,
) -> Result<u8, LexicalErrorKind> {
    match escape {
        'n' => Ok(b'\n'),
        't' => Ok(b'\t'),
        'r' => Ok(b'\r'),
        '0' => Ok(0),
        '"' => Ok(b'"'),
        '\'' => Ok(b'\''),
        '\\' => Ok(b'\\'),
        'x' => {
            let high = next().and_then(|c| c.to_digit(16));
            let low = next().and_then(|c| c.to_digit(16));
            match (high, low) {
                (Some(high), Some(low)) => Ok((high << 4 | low) as u8),
                _ => Err(LexicalErrorKind::InvalidEscape('x')),
            }
        }
        other => Err(LexicalErrorKind::InvalidEscape(other)),
    }
}

/// Strips the quotes from a string literal lexeme and resolves its escapes.
/// Unescaped characters contribute their UTF-8 encoding.
pub fn unescape_string_literal(lexeme: &str) -> Result<Vec<u8>, LexicalErrorKind> {
    let inner = lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or(LexicalErrorKind::UnclosedString)?;
    let mut value = Vec::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            let escape = chars.next().ok_or(LexicalErrorKind::UnclosedString)?;
            let mut hex = || chars.next();
            value.push(decode_escape(escape, &mut hex)?);
        } else {
            let mut encoded = [0u8; 4];
            value.extend_from_slice(c.encode_utf8(&mut encoded).as_bytes());
        }
    }
    Ok(value)
}
