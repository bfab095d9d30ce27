use super::{
    expression::{Expression, ExpressionRef, LiteralKind},
    program::BlockRef,
    statement::{Statement, SwitchCase},
    ParserError, ParserErrorKind, Program,
};
use crate::{
    lexer::{
        formatter::{LineFormatter, ToFormatter, TokenFormatter},
        Lexer, LexicalErrorKind, LineBreaks,
    },
    string::Ident,
};
use ariadne::{Color, Label, Report, ReportKind, Source};
use std::{fmt::Write, path::Path};

const WRITE_FMT_MSG: &str = "Encountered an error while attempting to write format string to buffer.";
const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";
const INDENT: &str = "    ";

pub trait ParserFormatter {
    fn format(&self, program: &Program) -> String;
    fn format_error(&self, error: &ParserError) -> String;
}

pub struct DebugParserFormatter;

impl ParserFormatter for DebugParserFormatter {
    fn format(&self, program: &Program) -> String {
        format!("{program:?}")
    }

    fn format_error(&self, error: &ParserError) -> String {
        format!("{error:?}")
    }
}

/// Prints programs back as canonical source text and errors as
/// `(line) ERROR message [code]`.
pub struct BasicParserFormatter<'src> {
    token_formatter: LineFormatter<'src>,
    line_breaks: LineBreaks,
}

impl<'src> BasicParserFormatter<'src> {
    pub fn new(text: &'src str) -> Self {
        let lexer = Lexer::new(text);
        Self {
            token_formatter: lexer.create_formatter(),
            line_breaks: lexer.get_line_breaks(),
        }
    }
}

impl<'src> ParserFormatter for BasicParserFormatter<'src> {
    fn format(&self, program: &Program) -> String {
        let mut printer = ProgramPrinter::new(program);
        printer.print_block(program.root());
        printer.buffer
    }

    fn format_error(&self, error: &ParserError) -> String {
        if let ParserErrorKind::LexicalError(ref error) = error.kind {
            return self.token_formatter.format_lexical_error(error);
        }
        let line = self.line_breaks.get_line_from_span(error.span);
        format!("({line}) ERROR {} [{}]", error.kind, error.code())
    }
}

pub struct PrettyParserFormatter<'src> {
    text: &'src str,
    path: &'src Path,
}

impl<'src> PrettyParserFormatter<'src> {
    pub fn new(text: &'src str, path: &'src Path) -> Self {
        Self { text, path }
    }
}

impl<'src> ParserFormatter for PrettyParserFormatter<'src> {
    fn format(&self, program: &Program) -> String {
        let mut printer = ProgramPrinter::new(program);
        printer.print_block(program.root());
        printer.buffer
    }

    fn format_error(&self, error: &ParserError) -> String {
        let path = &self.path.to_string_lossy();
        let span = error.span;
        let (message, label) = match error.kind {
            ParserErrorKind::UnexpectedToken { actual, expected } => (
                "Expected a different token".to_string(),
                format!("Expected {expected} but got {actual}"),
            ),
            ParserErrorKind::UnexpectedEof => {
                ("Unexpected EOF".to_string(), "File ends here...".to_string())
            }
            ParserErrorKind::NonExpression(kind) => (
                "Expected a literal, identifier or call".to_string(),
                format!("Not an expression token {kind}"),
            ),
            ParserErrorKind::InvalidStatement(kind) => (
                "Expected a statement".to_string(),
                format!("Can not start or continue a statement with {kind}"),
            ),
            ParserErrorKind::NonLiteralCase(kind) => (
                "Switch cases must be literals".to_string(),
                format!("Got {kind}"),
            ),
            ParserErrorKind::DefaultNotLast => (
                "Misplaced default case".to_string(),
                "No case may follow the default case".to_string(),
            ),
            ParserErrorKind::EmptySwitch => (
                "Switch without cases".to_string(),
                "Expected at least one case or default".to_string(),
            ),
            ParserErrorKind::LexicalError(ref error) => (
                "Malformed token".to_string(),
                match error.kind {
                    LexicalErrorKind::Unrecognized(c) => format!("Unexpected character {c}"),
                    ref kind => format!("{kind}"),
                },
            ),
        };
        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, span.range()))
            .with_code(error.code())
            .with_message(message)
            .with_label(
                Label::new((path, span.range()))
                    .with_message(label)
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}

struct ProgramPrinter<'prog> {
    program: &'prog Program,
    buffer: String,
    depth: usize,
}

impl<'prog> ProgramPrinter<'prog> {
    fn new(program: &'prog Program) -> Self {
        Self {
            program,
            buffer: String::new(),
            depth: 0,
        }
    }

    fn newline(&mut self) {
        self.buffer.push('\n');
        for _ in 0..self.depth {
            self.buffer.push_str(INDENT);
        }
    }

    fn print_block(&mut self, block: BlockRef) {
        let program = self.program;
        let statements = &program[block].statements;
        if statements.is_empty() {
            self.buffer.push_str("{ }");
            return;
        }
        self.buffer.push('{');
        self.depth += 1;
        for statement in statements.iter() {
            self.newline();
            self.print_statement(statement);
        }
        self.depth -= 1;
        self.newline();
        self.buffer.push('}');
    }

    fn print_idents(&mut self, idents: &[Ident]) {
        for (index, ident) in idents.iter().enumerate() {
            if index > 0 {
                self.buffer.push_str(", ");
            }
            self.buffer.push_str(&ident.name);
        }
    }

    fn print_statement(&mut self, statement: &Statement) {
        let program = self.program;
        match statement {
            Statement::Expression(statement) => self.print_expression(statement.expr),
            Statement::Assignment(assignment) => {
                self.print_idents(&assignment.targets);
                self.buffer.push_str(" := ");
                self.print_expression(assignment.value);
            }
            Statement::VariableDeclaration(declaration) => {
                self.buffer.push_str("let ");
                self.print_idents(&declaration.names);
                if let Some(value) = declaration.value {
                    self.buffer.push_str(" := ");
                    self.print_expression(value);
                }
            }
            Statement::If(statement) => {
                self.buffer.push_str("if ");
                self.print_expression(statement.condition);
                self.buffer.push(' ');
                self.print_block(statement.body);
            }
            Statement::Switch(statement) => {
                self.buffer.push_str("switch ");
                self.print_expression(statement.scrutinee);
                for SwitchCase { guard, body, .. } in statement.cases.iter() {
                    self.newline();
                    match guard {
                        Some(guard) => {
                            self.buffer.push_str("case ");
                            self.print_expression(*guard);
                        }
                        None => self.buffer.push_str("default"),
                    }
                    self.buffer.push(' ');
                    self.print_block(*body);
                }
            }
            Statement::FunctionDefinition(function) => {
                let function = &program[*function];
                self.buffer
                    .write_fmt(format_args!("function {}(", function.name))
                    .expect(WRITE_FMT_MSG);
                self.print_idents(&function.parameters);
                self.buffer.push(')');
                if !function.returns.is_empty() {
                    self.buffer.push_str(" -> ");
                    self.print_idents(&function.returns);
                }
                self.buffer.push(' ');
                self.print_block(function.body);
            }
            Statement::For(statement) => {
                self.buffer.push_str("for ");
                self.print_block(statement.pre);
                self.buffer.push(' ');
                self.print_expression(statement.condition);
                self.buffer.push(' ');
                self.print_block(statement.post);
                self.buffer.push(' ');
                self.print_block(statement.body);
            }
            Statement::Block(block) => self.print_block(*block),
        }
    }

    fn print_expression(&mut self, expr: ExpressionRef) {
        let program = self.program;
        match &program[expr] {
            Expression::Literal(literal) => match literal.kind {
                LiteralKind::Boolean | LiteralKind::Number => {
                    self.buffer.push_str(&literal.text())
                }
                LiteralKind::String => {
                    self.buffer.push('"');
                    for byte in literal.value.iter().copied() {
                        match byte {
                            b'"' => self.buffer.push_str("\\\""),
                            b'\\' => self.buffer.push_str("\\\\"),
                            b'\n' => self.buffer.push_str("\\n"),
                            b'\t' => self.buffer.push_str("\\t"),
                            b'\r' => self.buffer.push_str("\\r"),
                            byte if byte.is_ascii_graphic() || byte == b' ' => {
                                self.buffer.push(char::from(byte))
                            }
                            byte => self
                                .buffer
                                .write_fmt(format_args!("\\x{byte:02x}"))
                                .expect(WRITE_FMT_MSG),
                        }
                    }
                    self.buffer.push('"');
                }
            },
            Expression::Identifier(ident) => self.buffer.push_str(&ident.name),
            Expression::Instruction(call) => {
                self.print_call(&call.instruction, &call.arguments)
            }
            Expression::FunctionCall(call) => self.print_call(&call.function, &call.arguments),
        }
    }

    fn print_call(&mut self, name: &Ident, arguments: &[ExpressionRef]) {
        self.buffer.push_str(&name.name);
        self.buffer.push('(');
        for (index, argument) in arguments.iter().enumerate() {
            if index > 0 {
                self.buffer.push_str(", ");
            }
            self.print_expression(*argument);
        }
        self.buffer.push(')');
    }
}
