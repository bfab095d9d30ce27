pub mod error;

use error::LiteralError;
use ruint::aliases::U256;

/// The single runtime value kind: a 256-bit unsigned machine word.
pub type Word = U256;

/// Number of bytes in a [`Word`].
pub const WORD_BYTES: usize = 32;

pub fn word_from_bool(value: bool) -> Word {
    if value {
        Word::from(1u64)
    } else {
        Word::ZERO
    }
}

pub fn is_truthy(value: &Word) -> bool {
    !value.is_zero()
}

/// Converts a word into a `usize` if it fits.
pub fn word_to_usize(value: &Word) -> Option<usize> {
    let limbs = value.as_limbs();
    if limbs[1..].iter().any(|limb| *limb != 0) {
        return None;
    }
    usize::try_from(limbs[0]).ok()
}

pub fn decode_bool(text: &str) -> Result<Word, LiteralError> {
    match text {
        "true" => Ok(word_from_bool(true)),
        "false" => Ok(word_from_bool(false)),
        _ => Err(LiteralError::InvalidBool(text.into())),
    }
}

/// Decimal, or hexadecimal with a `0x` prefix.
pub fn decode_number(text: &str) -> Result<Word, LiteralError> {
    let (digits, radix) = match text.strip_prefix("0x") {
        Some(digits) => (digits, 16),
        None => (text, 10),
    };
    let valid = !digits.is_empty()
        && digits.chars().all(|c| match radix {
            16 => c.is_ascii_hexdigit(),
            _ => c.is_ascii_digit(),
        });
    if !valid {
        return Err(LiteralError::InvalidNumber(text.into()));
    }
    Word::from_str_radix(digits, radix).map_err(|_| LiteralError::NumberOverflow(text.into()))
}

/// Left-aligns `bytes` in a big-endian word, zero padding on the right.
pub fn decode_string(bytes: &[u8]) -> Result<Word, LiteralError> {
    if bytes.len() > WORD_BYTES {
        return Err(LiteralError::StringTooLong {
            length: bytes.len(),
        });
    }
    let mut buffer = [0u8; WORD_BYTES];
    buffer[..bytes.len()].copy_from_slice(bytes);
    Ok(Word::from_be_bytes(buffer))
}
