use crate::{lexer::Span, string::Ident};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpressionRef(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Boolean,
    Number,
    String,
}

/// Booleans and numbers keep their source text and strings keep their
/// unescaped bytes. Decoding into a word happens at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub value: Vec<u8>,
    pub span: Span,
}

impl Literal {
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.value)
    }
}

/// A primitive word-machine instruction applied to arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionCall {
    pub instruction: Ident,
    pub arguments: Vec<ExpressionRef>,
    pub span: Span,
}

/// A call to a user-defined function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub function: Ident,
    pub arguments: Vec<ExpressionRef>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Identifier(Ident),
    Instruction(InstructionCall),
    FunctionCall(FunctionCall),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Literal(literal) => literal.span,
            Expression::Identifier(ident) => ident.span,
            Expression::Instruction(call) => call.span,
            Expression::FunctionCall(call) => call.span,
        }
    }
}
