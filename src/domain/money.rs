use std::fmt;

/// Money is represented as integer cents so balances never accumulate
/// floating-point rounding drift. $50.00 = 5000 cents.
pub type Cents = i64;

/// Format cents as a human-readable currency string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Parse user-entered amount text into cents.
///
/// Amounts arrive as free text from an input field, so this accepts whole
/// units ("200"), one or two decimal places ("12.5", "12.50"), and an
/// optional leading "$". Anything else is rejected: negative signs,
/// sub-cent precision, empty or non-numeric input. Zero parses fine;
/// callers decide whether zero is acceptable.
pub fn parse_amount(input: &str) -> Result<Cents, ParseAmountError> {
    let input = input.trim().trim_start_matches('$');

    let (units_str, decimal_str) = match input.split_once('.') {
        Some((u, d)) => (u, d),
        None => (input, ""),
    };
    if units_str.is_empty() && decimal_str.is_empty() {
        return Err(ParseAmountError::Invalid);
    }
    // Digits only on both sides of the dot: i64 parsing alone would let
    // signs through.
    if !units_str.bytes().all(|b| b.is_ascii_digit())
        || !decimal_str.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ParseAmountError::Invalid);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str.parse().map_err(|_| ParseAmountError::Invalid)?
    };

    let decimal_cents: i64 = match decimal_str.len() {
        0 => 0,
        // "12.5" means 50 cents
        1 => {
            decimal_str
                .parse::<i64>()
                .map_err(|_| ParseAmountError::Invalid)?
                * 10
        }
        2 => decimal_str.parse().map_err(|_| ParseAmountError::Invalid)?,
        _ => return Err(ParseAmountError::SubCentPrecision),
    };

    units
        .checked_mul(100)
        .and_then(|c| c.checked_add(decimal_cents))
        .ok_or(ParseAmountError::Invalid)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Invalid,
    SubCentPrecision,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Invalid => write!(f, "invalid amount"),
            ParseAmountError::SubCentPrecision => {
                write!(f, "amounts may have at most two decimal places")
            }
        }
    }
}

impl std::error::Error for ParseAmountError {}
