use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LiteralError {
    #[error("Invalid boolean literal `{0}`")]
    InvalidBool(CompactString),
    #[error("Invalid number literal `{0}`")]
    InvalidNumber(CompactString),
    #[error("Number literal `{0}` does not fit in a word")]
    NumberOverflow(CompactString),
    #[error("String literal of {length} bytes does not fit in a word")]
    StringTooLong { length: usize },
}
