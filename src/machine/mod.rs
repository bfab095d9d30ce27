pub mod error;
pub mod formatter;
mod instruction;
mod memory;

use crate::value::{word_from_bool, word_to_usize, Word, WORD_BYTES};
use compact_str::ToCompactString;
use error::{Halt, MachineError};
pub use instruction::Instruction;
pub use memory::Memory;
use std::collections::BTreeMap;

/// Evaluates a single word-machine instruction against the shared machine
/// state. Implementors own that state; the interpreter only ever holds a
/// mutable borrow of it.
pub trait InstructionEvaluator {
    fn evaluate(&mut self, instruction: &str, arguments: &[Word]) -> Result<Word, MachineError>;
}

#[derive(Debug, Clone, Copy)]
pub struct MachineConfig {
    /// Upper bound on addressable memory, in bytes.
    pub memory_limit: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            memory_limit: 1 << 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraceEntry {
    pub instruction: Instruction,
    pub arguments: Vec<Word>,
}

impl std::fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.instruction)?;
        for (index, argument) in self.arguments.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{argument}")?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub topics: Vec<Word>,
    pub data: Vec<u8>,
}

/// Reference word machine with memory, storage and logs.
#[derive(Debug, Clone)]
pub struct WordMachine {
    memory: Memory,
    storage: BTreeMap<Word, Word>,
    logs: Vec<LogEntry>,
    trace: Vec<TraceEntry>,
}

impl WordMachine {
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    pub fn with_config(config: MachineConfig) -> Self {
        Self {
            memory: Memory::new(config.memory_limit),
            storage: BTreeMap::new(),
            logs: Vec::new(),
            trace: Vec::new(),
        }
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn storage(&self) -> &BTreeMap<Word, Word> {
        &self.storage
    }

    pub fn sload(&self, key: &Word) -> Word {
        self.storage.get(key).copied().unwrap_or(Word::ZERO)
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }
}

impl Default for WordMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionEvaluator for WordMachine {
    fn evaluate(&mut self, name: &str, arguments: &[Word]) -> Result<Word, MachineError> {
        let instruction = Instruction::from_name(name)
            .ok_or_else(|| MachineError::UnknownInstruction(name.to_compact_string()))?;
        if arguments.len() != instruction.arity() {
            return Err(MachineError::ArgumentCount {
                instruction: instruction.name(),
                expected: instruction.arity(),
                actual: arguments.len(),
            });
        }
        tracing::trace!(%instruction, ?arguments, "evaluating instruction");
        self.trace.push(TraceEntry {
            instruction,
            arguments: arguments.to_vec(),
        });
        self.execute(instruction, arguments)
    }
}

impl WordMachine {
    fn execute(&mut self, instruction: Instruction, args: &[Word]) -> Result<Word, MachineError> {
        type I = Instruction;
        let zero = Word::ZERO;
        let result = match instruction {
            I::Stop => return Err(MachineError::Halted(Halt::Stop)),
            I::Invalid => return Err(MachineError::Halted(Halt::Invalid)),
            I::Return => {
                let data = self.memory.read(&args[0], &args[1])?;
                return Err(MachineError::Halted(Halt::Return(data)));
            }
            I::Revert => {
                let data = self.memory.read(&args[0], &args[1])?;
                return Err(MachineError::Halted(Halt::Revert(data)));
            }
            I::Add => args[0].wrapping_add(args[1]),
            I::Sub => args[0].wrapping_sub(args[1]),
            I::Mul => args[0].wrapping_mul(args[1]),
            I::Div => match args[1].is_zero() {
                true => zero,
                false => args[0] / args[1],
            },
            I::Mod => match args[1].is_zero() {
                true => zero,
                false => args[0] % args[1],
            },
            I::AddMod => match args[2].is_zero() {
                true => zero,
                false => args[0].add_mod(args[1], args[2]),
            },
            I::MulMod => match args[2].is_zero() {
                true => zero,
                false => args[0].mul_mod(args[1], args[2]),
            },
            I::Exp => args[0].wrapping_pow(args[1]),
            I::Lt => word_from_bool(args[0] < args[1]),
            I::Gt => word_from_bool(args[0] > args[1]),
            I::Eq => word_from_bool(args[0] == args[1]),
            I::IsZero => word_from_bool(args[0].is_zero()),
            I::And => args[0] & args[1],
            I::Or => args[0] | args[1],
            I::Xor => args[0] ^ args[1],
            I::Not => !args[0],
            I::Byte => match word_to_usize(&args[0]) {
                Some(index) if index < WORD_BYTES => {
                    Word::from(args[1].to_be_bytes::<WORD_BYTES>()[index])
                }
                _ => zero,
            },
            I::Shl => match word_to_usize(&args[0]) {
                Some(shift) if shift < Word::BITS => args[1] << shift,
                _ => zero,
            },
            I::Shr => match word_to_usize(&args[0]) {
                Some(shift) if shift < Word::BITS => args[1] >> shift,
                _ => zero,
            },
            I::MLoad => self.memory.load_word(&args[0])?,
            I::MStore => {
                self.memory.store_word(&args[0], &args[1])?;
                zero
            }
            I::MStore8 => {
                self.memory.store_byte(&args[0], &args[1])?;
                zero
            }
            I::MSize => Word::from(self.memory.size()),
            I::SLoad => self.sload(&args[0]),
            I::SStore => {
                if args[1].is_zero() {
                    self.storage.remove(&args[0]);
                } else {
                    self.storage.insert(args[0], args[1]);
                }
                zero
            }
            I::Log0 | I::Log1 | I::Log2 | I::Log3 | I::Log4 => {
                let data = self.memory.read(&args[0], &args[1])?;
                self.logs.push(LogEntry {
                    topics: args[2..].to_vec(),
                    data,
                });
                zero
            }
            I::Pop => zero,
        };
        Ok(result)
    }
}
