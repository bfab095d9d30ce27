use super::token::Span;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexicalErrorKind {
    #[error("Unrecognized character {0}")]
    Unrecognized(char),
    #[error("Unterminated string literal")]
    UnclosedString,
    #[error("Unterminated block comment")]
    UnclosedComment,
    #[error("Invalid escape sequence \\{0}")]
    InvalidEscape(char),
    #[error("Hex literal without digits")]
    EmptyHexLiteral,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct LexicalError {
    #[source]
    pub kind: LexicalErrorKind,
    pub span: Span,
}

impl LexicalError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            LexicalErrorKind::Unrecognized(_) => "LX001",
            LexicalErrorKind::UnclosedString => "LX002",
            LexicalErrorKind::UnclosedComment => "LX003",
            LexicalErrorKind::InvalidEscape(_) => "LX004",
            LexicalErrorKind::EmptyHexLiteral => "LX005",
        }
    }
}
