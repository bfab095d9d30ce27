use crate::value::Word;
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Halt {
    Stop,
    Return(Vec<u8>),
    Revert(Vec<u8>),
    Invalid,
}

impl std::fmt::Display for Halt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Halt::Stop => write!(f, "stop"),
            Halt::Return(data) => write!(f, "return with {} bytes", data.len()),
            Halt::Revert(data) => write!(f, "revert with {} bytes", data.len()),
            Halt::Invalid => write!(f, "invalid instruction"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MachineError {
    #[error("Unknown instruction `{0}`")]
    UnknownInstruction(CompactString),
    #[error("Instruction `{instruction}` takes {expected} arguments but got {actual}")]
    ArgumentCount {
        instruction: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Memory access of {size} bytes at {offset} exceeds the limit of {limit} bytes")]
    MemoryLimit {
        offset: Word,
        size: Word,
        limit: usize,
    },
    #[error("Execution halted: {0}")]
    Halted(Halt),
}

impl MachineError {
    pub fn code(&self) -> &'static str {
        match self {
            MachineError::UnknownInstruction(_) => "WM001",
            MachineError::ArgumentCount { .. } => "WM002",
            MachineError::MemoryLimit { .. } => "WM003",
            MachineError::Halted(_) => "WM004",
        }
    }
}
