use super::{
    expression::ExpressionRef,
    program::{BlockRef, FunctionRef},
};
use crate::{lexer::Span, string::Ident};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expression(ExpressionStatement),
    Assignment(Assignment),
    VariableDeclaration(VariableDeclaration),
    If(IfStatement),
    Switch(SwitchStatement),
    FunctionDefinition(FunctionRef),
    For(ForStatement),
    Block(BlockRef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expr: ExpressionRef,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub targets: Vec<Ident>,
    pub value: ExpressionRef,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub names: Vec<Ident>,
    pub value: Option<ExpressionRef>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: ExpressionRef,
    pub body: BlockRef,
    pub span: Span,
}

/// A case without a guard is the default and is expected to come last.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub guard: Option<ExpressionRef>,
    pub body: BlockRef,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStatement {
    pub scrutinee: ExpressionRef,
    pub cases: Vec<SwitchCase>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub pre: BlockRef,
    pub condition: ExpressionRef,
    pub post: BlockRef,
    pub body: BlockRef,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub name: Ident,
    pub parameters: Vec<Ident>,
    pub returns: Vec<Ident>,
    pub body: BlockRef,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}
