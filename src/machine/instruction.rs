use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    // Halting
    Stop,
    Return,
    Revert,
    Invalid,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    AddMod,
    MulMod,
    Exp,
    // Comparison
    Lt,
    Gt,
    Eq,
    IsZero,
    // Bitwise
    And,
    Or,
    Xor,
    Not,
    Byte,
    Shl,
    Shr,
    // Memory
    MLoad,
    MStore,
    MStore8,
    MSize,
    // Storage
    SLoad,
    SStore,
    // Logging
    Log0,
    Log1,
    Log2,
    Log3,
    Log4,
    // Miscellaneous
    Pop,
}

const INSTRUCTIONS: [Instruction; 35] = [
    Instruction::Stop,
    Instruction::Return,
    Instruction::Revert,
    Instruction::Invalid,
    Instruction::Add,
    Instruction::Sub,
    Instruction::Mul,
    Instruction::Div,
    Instruction::Mod,
    Instruction::AddMod,
    Instruction::MulMod,
    Instruction::Exp,
    Instruction::Lt,
    Instruction::Gt,
    Instruction::Eq,
    Instruction::IsZero,
    Instruction::And,
    Instruction::Or,
    Instruction::Xor,
    Instruction::Not,
    Instruction::Byte,
    Instruction::Shl,
    Instruction::Shr,
    Instruction::MLoad,
    Instruction::MStore,
    Instruction::MStore8,
    Instruction::MSize,
    Instruction::SLoad,
    Instruction::SStore,
    Instruction::Log0,
    Instruction::Log1,
    Instruction::Log2,
    Instruction::Log3,
    Instruction::Log4,
    Instruction::Pop,
];

impl Instruction {
    pub fn all() -> &'static [Instruction] {
        &INSTRUCTIONS
    }

    pub fn from_name(name: &str) -> Option<Instruction> {
        INSTRUCTIONS
            .iter()
            .copied()
            .find(|instruction| instruction.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Instruction::Stop => "stop",
            Instruction::Return => "return",
            Instruction::Revert => "revert",
            Instruction::Invalid => "invalid",
            Instruction::Add => "add",
            Instruction::Sub => "sub",
            Instruction::Mul => "mul",
            Instruction::Div => "div",
            Instruction::Mod => "mod",
            Instruction::AddMod => "addmod",
            Instruction::MulMod => "mulmod",
            Instruction::Exp => "exp",
            Instruction::Lt => "lt",
            Instruction::Gt => "gt",
            Instruction::Eq => "eq",
            Instruction::IsZero => "iszero",
            Instruction::And => "and",
            Instruction::Or => "or",
            Instruction::Xor => "xor",
            Instruction::Not => "not",
            Instruction::Byte => "byte",
            Instruction::Shl => "shl",
            Instruction::Shr => "shr",
            Instruction::MLoad => "mload",
            Instruction::MStore => "mstore",
            Instruction::MStore8 => "mstore8",
            Instruction::MSize => "msize",
            Instruction::SLoad => "sload",
            Instruction::SStore => "sstore",
            Instruction::Log0 => "log0",
            Instruction::Log1 => "log1",
            Instruction::Log2 => "log2",
            Instruction::Log3 => "log3",
            Instruction::Log4 => "log4",
            Instruction::Pop => "pop",
        }
    }

    /// Number of stack arguments consumed.
    pub fn arity(&self) -> usize {
        match self {
            Instruction::Stop | Instruction::Invalid | Instruction::MSize => 0,
            Instruction::IsZero
            | Instruction::Not
            | Instruction::MLoad
            | Instruction::SLoad
            | Instruction::Pop => 1,
            Instruction::Return
            | Instruction::Revert
            | Instruction::Add
            | Instruction::Sub
            | Instruction::Mul
            | Instruction::Div
            | Instruction::Mod
            | Instruction::Exp
            | Instruction::Lt
            | Instruction::Gt
            | Instruction::Eq
            | Instruction::And
            | Instruction::Or
            | Instruction::Xor
            | Instruction::Byte
            | Instruction::Shl
            | Instruction::Shr
            | Instruction::MStore
            | Instruction::MStore8
            | Instruction::SStore
            | Instruction::Log0 => 2,
            Instruction::AddMod | Instruction::MulMod | Instruction::Log1 => 3,
            Instruction::Log2 => 4,
            Instruction::Log3 => 5,
            Instruction::Log4 => 6,
        }
    }

    /// Whether the instruction pushes a result. Instructions without one still
    /// evaluate to zero.
    pub fn has_result(&self) -> bool {
        !matches!(
            self,
            Instruction::Stop
                | Instruction::Return
                | Instruction::Revert
                | Instruction::Invalid
                | Instruction::MStore
                | Instruction::MStore8
                | Instruction::SStore
                | Instruction::Log0
                | Instruction::Log1
                | Instruction::Log2
                | Instruction::Log3
                | Instruction::Log4
                | Instruction::Pop
        )
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
