//! Utilities for A1-style cell references and ranges.
//!
//! Used for default column titles and for the textual form of [`SheetRange`].

use crate::types::{CellPos, SheetRange};

/// Convert a 0-based column index to column letters (A, B, ..., Z, AA, AB, ...).
///
/// Negative indices yield an empty string.
pub fn col_to_letter(col: i32) -> String {
    let Ok(col) = u32::try_from(col) else {
        return String::new();
    };
    let mut result = Vec::new();
    let mut n = u64::from(col) + 1;
    while n > 0 {
        n -= 1;
        let offset = u8::try_from(n % 26).unwrap_or(0);
        result.push(char::from(b'A' + offset));
        n /= 26;
    }
    result.iter().rev().collect()
}

/// Format a cell position as `A1`; unset positions format as `-`.
pub fn cell_name(pos: CellPos) -> String {
    if !pos.is_set() {
        return "-".to_string();
    }
    format!("{}{}", col_to_letter(pos.col), i64::from(pos.row) + 1)
}

/// Parse a cell reference like "A1" (or "$A$1") into a 0-based position.
pub fn parse_cell_ref(cell_ref: &str) -> Option<CellPos> {
    let mut col: i32 = 0;
    let mut row: i32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for ch in cell_ref.trim().chars() {
        if ch == '$' {
            continue;
        }
        if ch.is_ascii_alphabetic() {
            // Letters after digits ("1A") are not a reference.
            if saw_row {
                return None;
            }
            let upper = ch.to_ascii_uppercase();
            let digit = i32::try_from(u32::from(upper) - u32::from('A') + 1).ok()?;
            col = col.checked_mul(26)?.checked_add(digit)?;
            saw_col = true;
        } else if let Some(digit) = ch.to_digit(10) {
            row = row
                .checked_mul(10)?
                .checked_add(i32::try_from(digit).ok()?)?;
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row || row == 0 {
        return None;
    }

    Some(CellPos::new(row - 1, col - 1))
}

/// Parse a range like "A1:B10" or a single "A1" into a normalized [`SheetRange`].
pub fn parse_cell_range(range: &str) -> Option<SheetRange> {
    if let Some((start, end)) = range.split_once(':') {
        let start = parse_cell_ref(start)?;
        let end = parse_cell_ref(end)?;
        Some(SheetRange::spanning(start, end))
    } else {
        let pos = parse_cell_ref(range)?;
        Some(SheetRange::cell(pos.row, pos.col))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_col_to_letter() {
        assert_eq!(col_to_letter(0), "A");
        assert_eq!(col_to_letter(25), "Z");
        assert_eq!(col_to_letter(26), "AA");
        assert_eq!(col_to_letter(27), "AB");
        assert_eq!(col_to_letter(701), "ZZ");
        assert_eq!(col_to_letter(702), "AAA");
        assert_eq!(col_to_letter(-1), "");
    }

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("A1"), Some(CellPos::new(0, 0)));
        assert_eq!(parse_cell_ref("$C$7"), Some(CellPos::new(6, 2)));
        assert_eq!(parse_cell_ref("aa10"), Some(CellPos::new(9, 26)));
        assert_eq!(parse_cell_ref("A0"), None);
        assert_eq!(parse_cell_ref("1A"), None);
        assert_eq!(parse_cell_ref("A-1"), None);
        assert_eq!(parse_cell_ref(""), None);
    }

    #[test]
    fn test_parse_cell_range_normalizes() {
        let range = parse_cell_range("C5:A1").unwrap();
        assert_eq!(range, SheetRange::new(0, 0, 4, 2));
        assert_eq!(parse_cell_range("B2").unwrap(), SheetRange::cell(1, 1));
        assert!(parse_cell_range("B2:").is_none());
    }

    #[test]
    fn test_cell_name() {
        assert_eq!(cell_name(CellPos::new(2, 27)), "AB3");
        assert_eq!(cell_name(CellPos::UNSET), "-");
    }
}
