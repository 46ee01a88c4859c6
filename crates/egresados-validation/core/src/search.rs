//! Search-as-you-type row filtering

use alloc::string::String;
use alloc::vec::Vec;

/// Case-insensitive substring match of the whole row text
pub fn row_matches(row_text: &str, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    row_text.to_lowercase().contains(&filter.to_lowercase())
}

/// Visibility for each row, in order
pub fn filter_rows<S: AsRef<str>>(rows: &[S], filter: &str) -> Vec<bool> {
    let needle: String = filter.to_lowercase();
    rows.iter()
        .map(|row| needle.is_empty() || row.as_ref().to_lowercase().contains(&needle))
        .collect()
}
