use super::{error::Halt, WordMachine};
use std::fmt::Write;

const WRITE_FMT_MSG: &str = "Encountered an error while attempting to write format string to buffer.";

pub trait StateFormatter {
    fn format_trace(&self, machine: &WordMachine) -> String;
    fn format_state(&self, machine: &WordMachine) -> String;
    fn format_halt(&self, halt: &Halt) -> String;
}

pub struct DebugStateFormatter;

impl StateFormatter for DebugStateFormatter {
    fn format_trace(&self, machine: &WordMachine) -> String {
        format!("{:?}", machine.trace())
    }

    fn format_state(&self, machine: &WordMachine) -> String {
        format!("{:?}\n{:?}", machine.storage(), machine.logs())
    }

    fn format_halt(&self, halt: &Halt) -> String {
        format!("{halt:?}")
    }
}

/// Plain text, one fact per line. Words are printed in decimal.
pub struct BasicStateFormatter;

fn hex(bytes: &[u8]) -> String {
    let mut buffer = String::with_capacity(2 + bytes.len() * 2);
    buffer.push_str("0x");
    for byte in bytes {
        write!(buffer, "{byte:02x}").expect(WRITE_FMT_MSG);
    }
    buffer
}

impl StateFormatter for BasicStateFormatter {
    fn format_trace(&self, machine: &WordMachine) -> String {
        let mut buffer = String::new();
        for entry in machine.trace() {
            writeln!(buffer, "{entry}").expect(WRITE_FMT_MSG);
        }
        buffer
    }

    fn format_state(&self, machine: &WordMachine) -> String {
        let mut buffer = String::new();
        for (key, value) in machine.storage() {
            writeln!(buffer, "storage {key} => {value}").expect(WRITE_FMT_MSG);
        }
        for log in machine.logs() {
            write!(buffer, "log").expect(WRITE_FMT_MSG);
            for topic in log.topics.iter() {
                write!(buffer, " {topic}").expect(WRITE_FMT_MSG);
            }
            writeln!(buffer, " {}", hex(&log.data)).expect(WRITE_FMT_MSG);
        }
        buffer
    }

    fn format_halt(&self, halt: &Halt) -> String {
        match halt {
            Halt::Stop => "stop".into(),
            Halt::Invalid => "invalid".into(),
            Halt::Return(data) => format!("return {}", hex(data)),
            Halt::Revert(data) => format!("revert {}", hex(data)),
        }
    }
}
