//! Amount parsing
//!
//! Turns free-form user text into a strictly positive [`Decimal`]. Digits may
//! be typed with Latin, Arabic-Indic, Extended Arabic-Indic or fullwidth
//! glyphs.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,
    #[error("Not a number: {0}")]
    NotANumber(String),
    #[error("Amount must be greater than zero, got {0}")]
    NotPositive(Decimal),
}

/// Arabic decimal separator (U+066B)
const ARABIC_DECIMAL_SEPARATOR: char = '\u{066B}';

/// Parse a strictly positive amount
pub fn parse_amount(text: &str) -> Result<Decimal, AmountError> {
    let normalized = normalize_digits(text);
    let trimmed = normalized.trim();

    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    if !is_plain_decimal(trimmed) {
        return Err(AmountError::NotANumber(trimmed.to_string()));
    }

    let amount =
        Decimal::from_str(trimmed).map_err(|_| AmountError::NotANumber(trimmed.to_string()))?;

    if amount <= Decimal::ZERO {
        return Err(AmountError::NotPositive(amount));
    }
    Ok(amount)
}

/// Map every supported digit glyph to its ASCII digit
pub fn normalize_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => shift_digit(c, '\u{0660}'),
            '\u{06F0}'..='\u{06F9}' => shift_digit(c, '\u{06F0}'),
            '\u{FF10}'..='\u{FF19}' => shift_digit(c, '\u{FF10}'),
            ARABIC_DECIMAL_SEPARATOR => '.',
            other => other,
        })
        .collect()
}

fn shift_digit(c: char, zero: char) -> char {
    let offset = u32::from(c) - u32::from(zero);
    char::from_digit(offset, 10).unwrap_or(c)
}

/// Optional sign, at least one digit, at most one '.'
fn is_plain_decimal(s: &str) -> bool {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let mut digits = 0;
    let mut dots = 0;
    for c in unsigned.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}
