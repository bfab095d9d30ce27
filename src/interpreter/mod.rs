mod environment;
pub mod error;
mod expression;
pub mod formatter;
mod tree;

pub use environment::{Environment, FunctionTable};
pub use error::{RuntimeError, RuntimeErrorKind};
pub use expression::ExpressionEvaluator;
pub use tree::{Interpreter, StatementExecutor};
