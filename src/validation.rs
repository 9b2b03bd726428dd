use alloy::primitives::U256;

/// Why a piece of user input cannot be submitted as a `uint256`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a number")]
    Empty,
    #[error("Please enter a valid number")]
    NotNumeric,
    #[error("Please enter a positive number (negative numbers are not allowed)")]
    Negative,
    #[error("Please enter a whole number (no decimals allowed)")]
    NonInteger,
    #[error("Please enter a smaller number (the maximum is 2^256 - 1)")]
    OutOfRange,
}

/// A decimal numeral split into its parts: `[+-]digits[.,digits]`.
struct Numeral<'a> {
    negative: bool,
    integer: &'a str,
    fraction: Option<&'a str>,
}

impl<'a> Numeral<'a> {
    fn parse(input: &'a str) -> Option<Self> {
        let (negative, unsigned) = match input.as_bytes().first()? {
            b'-' => (true, &input[1..]),
            b'+' => (false, &input[1..]),
            _ => (false, input),
        };

        let (integer, fraction) = match unsigned.find(['.', ',']) {
            Some(idx) => (&unsigned[..idx], Some(&unsigned[idx + 1..])),
            None => (unsigned, None),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(integer) || !fraction.is_none_or(all_digits) {
            return None;
        }

        // At least one digit on either side of the separator
        if integer.is_empty() && fraction.is_none_or(str::is_empty) {
            return None;
        }

        Some(Self {
            negative,
            integer,
            fraction,
        })
    }

    fn is_zero(&self) -> bool {
        self.integer
            .bytes()
            .chain(self.fraction.unwrap_or("").bytes())
            .all(|b| b == b'0')
    }
}

/// Validate raw input text and return the integer to submit.
///
/// Rules are checked in order and the first failure wins: empty, not a
/// decimal numeral, negative, has a decimal separator, too large for
/// `uint256`. Surrounding whitespace is ignored.
pub fn validate(input: &str) -> Result<U256, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }

    let numeral = Numeral::parse(trimmed).ok_or(ValidationError::NotNumeric)?;

    if numeral.negative && !numeral.is_zero() {
        return Err(ValidationError::Negative);
    }

    if numeral.fraction.is_some() {
        return Err(ValidationError::NonInteger);
    }

    U256::from_str_radix(numeral.integer, 10).map_err(|_| ValidationError::OutOfRange)
}
