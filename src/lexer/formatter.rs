use super::{
    token::{Token, TokenKind},
    unescape_string_literal, LineBreaks,
};
use crate::lexer::{Lexer, LexicalError, LexicalErrorKind};

/// Interface for creating new token formatters.
pub trait TokenFormatter {
    /// Formats a token into a string.
    fn format(&self, token: &Token) -> String;
    /// Formats a lexer error into a string.
    fn format_lexical_error(&self, error: &LexicalError) -> String;
}

pub trait ToFormatter<F>
where
    F: TokenFormatter,
{
    fn create_formatter(&self) -> F;
}

fn describe(text: &str, token: &Token) -> String {
    let lexeme = text.get(token.span.range()).unwrap_or_default();
    match token.kind {
        TokenKind::Eof => "EOF  null".into(),
        TokenKind::NumericLiteral | TokenKind::HexLiteral => {
            format!("{} {lexeme} {lexeme}", token.kind)
        }
        TokenKind::StringLiteral => match unescape_string_literal(lexeme) {
            Ok(value) => format!("STRING {lexeme} {}", String::from_utf8_lossy(&value)),
            Err(_) => format!("STRING {lexeme} null"),
        },
        kind => format!("{kind} {lexeme} null"),
    }
}

fn describe_error(error: &LexicalError) -> String {
    match error.kind {
        LexicalErrorKind::Unrecognized(c) => format!("Unexpected character: {c}"),
        LexicalErrorKind::UnclosedString => "Unterminated string.".into(),
        LexicalErrorKind::UnclosedComment => "Unterminated block comment.".into(),
        LexicalErrorKind::InvalidEscape(c) => format!("Invalid escape sequence: \\{c}"),
        LexicalErrorKind::EmptyHexLiteral => "Hex literal has no digits.".into(),
    }
}

pub struct BasicFormatter<'src> {
    text: &'src str,
    line_breaks: LineBreaks,
}

impl<'src> ToFormatter<BasicFormatter<'src>> for Lexer<'src> {
    fn create_formatter(&self) -> BasicFormatter<'src> {
        BasicFormatter {
            text: self.get_source(),
            line_breaks: self.get_line_breaks(),
        }
    }
}

impl<'src> TokenFormatter for BasicFormatter<'src> {
    fn format(&self, token: &Token) -> String {
        describe(self.text, token)
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        let line = self.line_breaks.get_line_from_span(error.span);
        format!("[line {line}] Error: {}", describe_error(error))
    }
}

pub struct DebugFormatter;

impl<'src> ToFormatter<DebugFormatter> for Lexer<'src> {
    fn create_formatter(&self) -> DebugFormatter {
        DebugFormatter {}
    }
}

impl TokenFormatter for DebugFormatter {
    fn format(&self, token: &Token) -> String {
        format!("{token:?}")
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        format!("{error:?}")
    }
}

pub struct LineFormatter<'src> {
    text: &'src str,
    line_breaks: LineBreaks,
}

impl<'src> ToFormatter<LineFormatter<'src>> for Lexer<'src> {
    fn create_formatter(&self) -> LineFormatter<'src> {
        LineFormatter {
            text: self.get_source(),
            line_breaks: self.get_line_breaks(),
        }
    }
}

impl<'src> TokenFormatter for LineFormatter<'src> {
    fn format(&self, token: &Token) -> String {
        let line = self.line_breaks.get_line_from_span(token.span);
        format!("({line}) {}", describe(self.text, token))
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        let line = self.line_breaks.get_line_from_span(error.span);
        format!("({line}) ERROR {} [{}]", describe_error(error), error.code())
    }
}
