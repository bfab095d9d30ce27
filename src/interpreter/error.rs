use crate::lexer::Span;
use crate::machine::error::{Halt, MachineError};
use crate::string::IdentName;
use crate::value::error::LiteralError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("Expected {expected} values but got {actual}")]
    ArityMismatch { expected: usize, actual: usize },
    #[error("Function `{function}` takes {expected} arguments but got {actual}")]
    ArgumentCount {
        function: IdentName,
        expected: usize,
        actual: usize,
    },
    #[error("Undefined variable `{0}`")]
    UndefinedVariable(IdentName),
    #[error("Assignment to undeclared variable `{0}`")]
    UndeclaredAssignment(IdentName),
    #[error("Undefined function `{0}`")]
    UndefinedFunction(IdentName),
    #[error("`{0}` is already declared")]
    DuplicateDeclaration(IdentName),
    #[error("Closing scope removed `{name}` {removed} times")]
    ScopeIntegrity { name: IdentName, removed: usize },
    #[error("Closing a scope that was never opened")]
    ScopeUnderflow,
    #[error(transparent)]
    Literal(#[from] LiteralError),
    #[error(transparent)]
    Machine(#[from] MachineError),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub span: Span,
}

impl RuntimeError {
    pub fn new(kind: impl Into<RuntimeErrorKind>, span: Span) -> Self {
        Self {
            kind: kind.into(),
            span,
        }
    }

    pub fn code(&self) -> &'static str {
        match self.kind {
            RuntimeErrorKind::ArityMismatch { .. } => "RT001",
            RuntimeErrorKind::ArgumentCount { .. } => "RT002",
            RuntimeErrorKind::UndefinedVariable(_) => "RT003",
            RuntimeErrorKind::UndeclaredAssignment(_) => "RT004",
            RuntimeErrorKind::UndefinedFunction(_) => "RT005",
            RuntimeErrorKind::DuplicateDeclaration(_) => "RT006",
            RuntimeErrorKind::ScopeIntegrity { .. } => "RT007",
            RuntimeErrorKind::ScopeUnderflow => "RT008",
            RuntimeErrorKind::Literal(_) => "RT009",
            RuntimeErrorKind::Machine(ref error) => error.code(),
        }
    }

    /// Scope bookkeeping failures mean the interpreter itself is broken
    /// rather than the program it was given.
    pub fn is_internal(&self) -> bool {
        matches!(
            self.kind,
            RuntimeErrorKind::ScopeIntegrity { .. } | RuntimeErrorKind::ScopeUnderflow
        )
    }

    /// The halt reason if execution ended through a halting instruction.
    pub fn halt(&self) -> Option<&Halt> {
        match self.kind {
            RuntimeErrorKind::Machine(MachineError::Halted(ref halt)) => Some(halt),
            _ => None,
        }
    }
}
