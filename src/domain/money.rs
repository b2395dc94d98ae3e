use std::fmt;

/// Money is represented as whole currency units (rubles for the default catalog).
/// The machine never deals in fractions, and a balance can never go negative.
pub type Units = u64;

/// Currency sign shown next to amounts.
pub const CURRENCY_SIGN: &str = "₽";

/// Format an amount as a human-readable currency string.
/// Takes anything displayable so that wide session totals format the same way.
/// Example: 50 -> "50 ₽"
pub fn format_units(units: impl fmt::Display) -> String {
    format!("{} {}", units, CURRENCY_SIGN)
}

/// Parse user-entered text into a signed amount.
/// Example: "50" -> 50, " +20 " -> 20, "-5" -> -5
///
/// Sign is preserved so that the ledger, not the parser, decides what a
/// valid deposit is.
pub fn parse_amount(input: &str) -> Result<i64, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    let (negative, digits) = match input.as_bytes()[0] {
        b'-' => (true, &input[1..]),
        b'+' => (false, &input[1..]),
        _ => (false, input),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseAmountError::InvalidFormat);
    }

    let value: i64 = digits.parse().map_err(|_| ParseAmountError::OutOfRange)?;
    Ok(if negative { -value } else { value })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    InvalidFormat,
    OutOfRange,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Empty => write!(f, "no amount entered"),
            ParseAmountError::InvalidFormat => write!(f, "invalid amount format"),
            ParseAmountError::OutOfRange => write!(f, "amount out of range"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
