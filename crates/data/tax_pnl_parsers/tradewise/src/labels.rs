use crate::numbers::cell_at;

/// Column holding row labels in the Equity and Mutual Funds sheets.
pub const LABEL_COLUMN: usize = 1;
/// Column holding the value next to a label.
pub const VALUE_COLUMN: usize = 2;

/// Normalized form used for every label comparison.
pub fn normalize_label(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Finds the first row whose label cell contains `label` and returns its value cell.
///
/// Matching is a case-insensitive substring test, so "Client Name :" still matches
/// "client name". A matching row with a blank value cell yields `default`. `None` means
/// no row matched.
pub fn find_labeled_value(matrix: &[Vec<String>], label: &str, default: &str) -> Option<String> {
    let needle = normalize_label(label);

    for row in matrix {
        let Some(cell) = row.get(LABEL_COLUMN) else {
            continue;
        };
        if !normalize_label(cell).contains(&needle) {
            continue;
        }

        let value = cell_at(row, VALUE_COLUMN);
        if value.trim().is_empty() {
            return Some(default.to_string());
        }
        return Some(value.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_finds_client_name() {
        let m = matrix(&[
            &["", "Statement for", "FY 2023-24"],
            &["", "Client Name", "Jane Doe"],
        ]);
        assert_eq!(
            find_labeled_value(&m, "client name", "Guest"),
            Some("Jane Doe".to_string())
        );
    }

    #[test]
    fn test_substring_match() {
        let m = matrix(&[&["", "  CLIENT NAME (as per PAN) ", "Jane Doe"]]);
        assert_eq!(
            find_labeled_value(&m, "Client Name", "Guest"),
            Some("Jane Doe".to_string())
        );
    }

    #[test]
    fn test_blank_or_missing_value_uses_default() {
        let m = matrix(&[&["", "Client Name", "   "]]);
        assert_eq!(find_labeled_value(&m, "client name", "Guest"), Some("Guest".to_string()));

        let m = matrix(&[&["", "Client Name"]]);
        assert_eq!(find_labeled_value(&m, "client name", "Guest"), Some("Guest".to_string()));
    }

    #[test]
    fn test_absent_label() {
        let m = matrix(&[&["Client Name", "Jane Doe"], &[], &["", "Client ID", "AB1234"]]);
        assert_eq!(find_labeled_value(&m, "client name", "Guest"), None);
    }

    #[test]
    fn test_first_match_wins() {
        let m = matrix(&[
            &["", "Client Name", "First"],
            &["", "Client Name", "Second"],
        ]);
        assert_eq!(find_labeled_value(&m, "client name", "Guest"), Some("First".to_string()));
    }
}
