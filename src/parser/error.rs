use crate::lexer::{LexicalError, Span, TokenKind};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserErrorKind {
    #[error("Expected {expected} but got token {actual}.")]
    UnexpectedToken {
        actual: TokenKind,
        expected: TokenKind,
    },
    #[error("Expected a non-EOF token.")]
    UnexpectedEof,
    #[error("Expected an expression but got token {0}.")]
    NonExpression(TokenKind),
    #[error("Expected a statement but got {0}.")]
    InvalidStatement(TokenKind),
    #[error("Expected a literal case value but got token {0}.")]
    NonLiteralCase(TokenKind),
    #[error("A default case must be the last case of a switch.")]
    DefaultNotLast,
    #[error("A switch needs at least one case.")]
    EmptySwitch,
    #[error("Encountered a lexer error {0}.")]
    LexicalError(#[from] LexicalError),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct ParserError {
    #[source]
    pub kind: ParserErrorKind,
    pub span: Span,
}

impl ParserError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            ParserErrorKind::UnexpectedToken { .. } => "PA001",
            ParserErrorKind::UnexpectedEof => "PA002",
            ParserErrorKind::NonExpression(_) => "PA003",
            ParserErrorKind::InvalidStatement(_) => "PA004",
            ParserErrorKind::NonLiteralCase(_) => "PA005",
            ParserErrorKind::DefaultNotLast => "PA006",
            ParserErrorKind::EmptySwitch => "PA007",
            ParserErrorKind::LexicalError(ref error) => error.code(),
        }
    }
}

impl From<LexicalError> for ParserError {
    fn from(error: LexicalError) -> Self {
        Self {
            span: error.span,
            kind: ParserErrorKind::LexicalError(error),
        }
    }
}
