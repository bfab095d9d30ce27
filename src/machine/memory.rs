use super::error::MachineError;
use crate::value::{word_to_usize, Word, WORD_BYTES};
use std::ops::Range;

/// Byte-addressed, zero-initialised memory that grows in whole words.
#[derive(Debug, Clone)]
pub struct Memory {
    bytes: Vec<u8>,
    limit: usize,
}

impl Memory {
    pub fn new(limit: usize) -> Self {
        Self {
            bytes: Vec::new(),
            limit,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn expand(&mut self, offset: &Word, size: &Word) -> Result<Range<usize>, MachineError> {
        if size.is_zero() {
            return Ok(0..0);
        }
        let limit = self.limit;
        let exceeded = || MachineError::MemoryLimit {
            offset: *offset,
            size: *size,
            limit,
        };
        let start = word_to_usize(offset).ok_or_else(exceeded)?;
        let length = word_to_usize(size).ok_or_else(exceeded)?;
        let end = start.checked_add(length).ok_or_else(exceeded)?;
        if end > limit {
            return Err(exceeded());
        }
        let required = end.div_ceil(WORD_BYTES) * WORD_BYTES;
        if required > self.bytes.len() {
            self.bytes.resize(required, 0);
        }
        Ok(start..end)
    }

    pub fn load_word(&mut self, offset: &Word) -> Result<Word, MachineError> {
        let range = self.expand(offset, &Word::from(WORD_BYTES))?;
        let mut buffer = [0u8; WORD_BYTES];
        buffer.copy_from_slice(&self.bytes[range]);
        Ok(Word::from_be_bytes(buffer))
    }

    pub fn store_word(&mut self, offset: &Word, value: &Word) -> Result<(), MachineError> {
        let range = self.expand(offset, &Word::from(WORD_BYTES))?;
        self.bytes[range].copy_from_slice(&value.to_be_bytes::<WORD_BYTES>());
        Ok(())
    }

    pub fn store_byte(&mut self, offset: &Word, value: &Word) -> Result<(), MachineError> {
        let range = self.expand(offset, &Word::from(1u64))?;
        let bytes = value.to_be_bytes::<WORD_BYTES>();
        self.bytes[range.start] = bytes[WORD_BYTES - 1];
        Ok(())
    }

    pub fn read(&mut self, offset: &Word, size: &Word) -> Result<Vec<u8>, MachineError> {
        let range = self.expand(offset, size)?;
        Ok(self.bytes[range].to_vec())
    }
}
