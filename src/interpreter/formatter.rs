use super::error::{RuntimeError, RuntimeErrorKind};
use crate::lexer::LineBreaks;
use ariadne::{Color, Label, Report, ReportKind, Source};
use std::path::Path;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

pub trait RuntimeFormatter {
    fn format_error(&self, error: &RuntimeError) -> String;
}

pub struct DebugRuntimeFormatter;

impl RuntimeFormatter for DebugRuntimeFormatter {
    fn format_error(&self, error: &RuntimeError) -> String {
        format!("{error:?}")
    }
}

pub struct BasicRuntimeFormatter {
    line_breaks: LineBreaks,
}

impl BasicRuntimeFormatter {
    pub fn new(text: &str) -> Self {
        Self {
            line_breaks: LineBreaks::new(text),
        }
    }
}

impl RuntimeFormatter for BasicRuntimeFormatter {
    fn format_error(&self, error: &RuntimeError) -> String {
        let line = self.line_breaks.get_line_from_span(error.span);
        format!("({line}) {} [{}]", error.kind, error.code())
    }
}

pub struct PrettyRuntimeFormatter<'src> {
    text: &'src str,
    path: &'src Path,
}

impl<'src> PrettyRuntimeFormatter<'src> {
    pub fn new(text: &'src str, path: &'src Path) -> Self {
        Self { text, path }
    }
}

impl<'src> RuntimeFormatter for PrettyRuntimeFormatter<'src> {
    fn format_error(&self, error: &RuntimeError) -> String {
        let path = &self.path.to_string_lossy();
        let span = error.span;
        let message = match error.kind {
            RuntimeErrorKind::ArityMismatch { .. } | RuntimeErrorKind::ArgumentCount { .. } => {
                "Wrong number of values"
            }
            RuntimeErrorKind::UndefinedVariable(_)
            | RuntimeErrorKind::UndeclaredAssignment(_)
            | RuntimeErrorKind::UndefinedFunction(_) => "Unknown name",
            RuntimeErrorKind::DuplicateDeclaration(_) => "Name declared twice",
            RuntimeErrorKind::ScopeIntegrity { .. } | RuntimeErrorKind::ScopeUnderflow => {
                "Scope bookkeeping is corrupted"
            }
            RuntimeErrorKind::Literal(_) => "Malformed literal",
            RuntimeErrorKind::Machine(_) => "Instruction failed",
        };
        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, span.range()))
            .with_code(error.code())
            .with_message(message)
            .with_label(
                Label::new((path, span.range()))
                    .with_message(error.kind.to_string())
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}
