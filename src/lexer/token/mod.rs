mod span;

pub use span::{SpanIndex, SpanLength};
use std::collections::HashMap;
use std::fmt::Display;
use std::ops::Range;
use std::sync::LazyLock;

/// The hashmap for keywords
pub static KEYWORD_HASHMAP: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert("let", TokenKind::KeywordLet);
    map.insert("function", TokenKind::KeywordFunction);
    map.insert("if", TokenKind::KeywordIf);
    map.insert("switch", TokenKind::KeywordSwitch);
    map.insert("case", TokenKind::KeywordCase);
    map.insert("default", TokenKind::KeywordDefault);
    map.insert("for", TokenKind::KeywordFor);
    map.insert("true", TokenKind::KeywordTrue);
    map.insert("false", TokenKind::KeywordFalse);
    map
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// The byte position of the start of the token.
    pub start: SpanIndex,
    /// The length of the token in bytes.
    pub length: SpanLength,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.into(),
            length: end.saturating_sub(start).into(),
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start.into()..(self.start + self.length).into()
    }

    pub fn end(&self) -> SpanIndex {
        self.start + self.length
    }

    pub fn merge(&self, other: &Span) -> Span {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        let length = end - start;
        Span { start, length }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Parentheses
    LeftParenthesis,
    RightParenthesis,
    // Braces
    LeftBrace,
    RightBrace,
    // Miscellaneous
    Comma,
    Colon,
    ColonEqual,
    Arrow,

    // Literals
    NumericLiteral,
    HexLiteral,
    StringLiteral,
    Ident,

    // Keywords
    KeywordLet,
    KeywordFunction,
    KeywordIf,
    KeywordSwitch,
    KeywordCase,
    KeywordDefault,
    KeywordFor,
    KeywordTrue,
    KeywordFalse,

    // End of file.
    Eof,
}

impl TokenKind {
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::NumericLiteral
                | TokenKind::HexLiteral
                | TokenKind::StringLiteral
                | TokenKind::KeywordTrue
                | TokenKind::KeywordFalse
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::LeftParenthesis => write!(f, "LEFT_PAREN"),
            TokenKind::RightParenthesis => write!(f, "RIGHT_PAREN"),
            TokenKind::LeftBrace => write!(f, "LEFT_BRACE"),
            TokenKind::RightBrace => write!(f, "RIGHT_BRACE"),
            TokenKind::Comma => write!(f, "COMMA"),
            TokenKind::Colon => write!(f, "COLON"),
            TokenKind::ColonEqual => write!(f, "COLON_EQUAL"),
            TokenKind::Arrow => write!(f, "ARROW"),
            TokenKind::NumericLiteral => write!(f, "NUMBER"),
            TokenKind::HexLiteral => write!(f, "HEX_NUMBER"),
            TokenKind::StringLiteral => write!(f, "STRING"),
            TokenKind::Ident => write!(f, "IDENTIFIER"),
            TokenKind::KeywordLet => write!(f, "LET"),
            TokenKind::KeywordFunction => write!(f, "FUNCTION"),
            TokenKind::KeywordIf => write!(f, "IF"),
            TokenKind::KeywordSwitch => write!(f, "SWITCH"),
            TokenKind::KeywordCase => write!(f, "CASE"),
            TokenKind::KeywordDefault => write!(f, "DEFAULT"),
            TokenKind::KeywordFor => write!(f, "FOR"),
            TokenKind::KeywordTrue => write!(f, "TRUE"),
            TokenKind::KeywordFalse => write!(f, "FALSE"),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}
