//! Numeric coercion for sheet cells.
//!
//! Every numeric read in the parser goes through this module. Gating checks use
//! [`parse_number`]; field values use [`parse_lenient_number`], which turns anything that
//! is not a finite number into 0 instead of failing the parse.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Cell text at `idx`, or "" when the row is shorter.
pub fn cell_at(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// Parses a cell as a finite number.
///
/// Accepts plain decimals ("1200", "-200.25", "+5") with optional `,` thousands
/// separators, and scientific notation ("1.5e3"). Every `,` is dropped wherever it sits,
/// so both "1,234" and the lakh grouping "1,23,456" read as plain digits. Empty text,
/// "NaN", "inf", `_` digit separators and any other text yield `None`.
pub fn parse_number(cell: &str) -> Option<Decimal> {
    // Decimal::from_str ignores `_`
    if cell.contains('_') {
        return None;
    }
    let s = cell.trim().replace(',', "");
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = Decimal::from_str(&s) {
        return Some(d);
    }
    if s.contains(['e', 'E']) {
        return Decimal::from_scientific(&s.to_lowercase()).ok();
    }
    None
}

/// [`parse_number`] with 0 for anything unparsable.
pub fn parse_lenient_number(cell: &str) -> Decimal {
    parse_number(cell).unwrap_or(Decimal::ZERO)
}

/// Whole days, truncated toward zero. 0 when unparsable or out of range.
pub fn parse_lenient_days(cell: &str) -> i64 {
    parse_number(cell)
        .and_then(|d| d.trunc().to_i64())
        .unwrap_or(0)
}
