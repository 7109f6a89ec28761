//! Row matching and field extraction for the result table.

use crate::domain::model::{CourseStatus, Enrollment, TableLayout};
use crate::utils::error::{Result, WatchError};
use regex::Regex;
use std::sync::LazyLock;

// ASCII only: `\d` would also match digits `u32::from_str` rejects.
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit pattern is valid"));
static OVERRIDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([0-9]+)\)").expect("override pattern is valid"));

/// First run of ASCII digits after dropping thousands separators.
pub fn first_integer(text: &str) -> Option<u32> {
    let cleaned = text.replace(',', "");
    DIGITS.find(&cleaned)?.as_str().parse().ok()
}

/// Current enrollment; a cell without digits counts as zero.
pub fn extract_current(text: &str) -> u32 {
    first_integer(text).unwrap_or(0)
}

/// Capacity, preferring the adjusted value in parentheses, e.g. `"80 (75)"`.
pub fn extract_capacity(text: &str) -> Option<u32> {
    OVERRIDE
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
        .or_else(|| first_integer(text))
}

/// First row, in document order, wide enough for the layout and holding a
/// cell exactly equal to the section code.
pub fn find_row<'a>(rows: &'a [Vec<String>], section_code: &str, layout: &TableLayout) -> Option<&'a [String]> {
    let wanted = section_code.trim();
    rows.iter()
        .filter(|cells| cells.len() > layout.max_index())
        .find(|cells| cells.iter().any(|cell| cell.trim() == wanted))
        .map(Vec::as_slice)
}

pub fn extract_status(rows: &[Vec<String>], section_code: &str, layout: &TableLayout) -> Result<CourseStatus> {
    let Some(cells) = find_row(rows, section_code, layout) else {
        tracing::debug!("No row matched section '{}' among {} rows", section_code.trim(), rows.len());
        return Ok(CourseStatus::NotFound);
    };

    let capacity_text = &cells[layout.capacity];
    let capacity = extract_capacity(capacity_text).ok_or_else(|| {
        WatchError::parse(format!(
            "capacity cell '{}' of section '{}' holds no number",
            capacity_text,
            section_code.trim()
        ))
    })?;

    Ok(CourseStatus::Found(Enrollment {
        title: cells[layout.title].trim().to_string(),
        capacity,
        current: extract_current(&cells[layout.current]),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(section_at: usize, section: &str, title: &str, capacity: &str, current: &str) -> Vec<String> {
        let mut cells: Vec<String> = (0..16).map(|i| format!("c{}", i)).collect();
        cells[section_at] = section.to_string();
        cells[6] = title.to_string();
        cells[13] = capacity.to_string();
        cells[14] = current.to_string();
        cells
    }

    #[test]
    fn test_first_integer_strips_commas() {
        assert_eq!(first_integer("1,234"), Some(1234));
        assert_eq!(first_integer("  42 seats"), Some(42));
        assert_eq!(first_integer("-"), None);
        assert_eq!(first_integer(""), None);
    }

    #[test]
    fn test_extract_current_defaults_to_zero() {
        assert_eq!(extract_current("-"), 0);
        assert_eq!(extract_current(""), 0);
        assert_eq!(extract_current("75"), 75);
    }

    #[test]
    fn test_non_ascii_digits_are_skipped() {
        assert_eq!(extract_current("１２ / 30"), 30);
        assert_eq!(extract_capacity("٣ 40"), Some(40));
        assert_eq!(extract_capacity("80(７５)"), Some(80));
        assert_eq!(extract_current("１２"), 0);
    }

    #[test]
    fn test_extract_capacity_prefers_parenthesized() {
        assert_eq!(extract_capacity("75(70)"), Some(70));
        assert_eq!(extract_capacity("80 (75)"), Some(75));
        assert_eq!(extract_capacity("75"), Some(75));
        assert_eq!(extract_capacity("1,200"), Some(1200));
        assert_eq!(extract_capacity("-"), None);
    }

    #[test]
    fn test_exact_match_only() {
        let layout = TableLayout::default();
        let rows = vec![row(7, "002A", "Wrong", "40", "10"), row(7, " 0020", "Wrong too", "40", "10")];
        assert!(find_row(&rows, "002", &layout).is_none());
        assert_eq!(extract_status(&rows, "002", &layout).unwrap(), CourseStatus::NotFound);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let layout = TableLayout::default();
        let rows = vec![row(7, "a01", "Lower", "40", "10")];
        assert!(find_row(&rows, "A01", &layout).is_none());
        assert!(find_row(&rows, " a01 ", &layout).is_some());
    }

    #[test]
    fn test_section_in_any_column() {
        let layout = TableLayout::default();
        let rows = vec![row(2, "002", "Moved column", "30", "12")];
        let status = extract_status(&rows, "002", &layout).unwrap();
        assert_eq!(
            status,
            CourseStatus::Found(Enrollment {
                title: "Moved column".to_string(),
                capacity: 30,
                current: 12,
            })
        );
    }

    #[test]
    fn test_first_match_wins() {
        let layout = TableLayout::default();
        let rows = vec![row(7, "002", "First", "30", "12"), row(7, "002", "Second", "50", "1")];
        let status = extract_status(&rows, "002", &layout).unwrap();
        assert_eq!(status.enrollment().unwrap().title, "First");
    }

    #[test]
    fn test_narrow_rows_are_skipped() {
        let layout = TableLayout::default();
        let narrow: Vec<Vec<String>> = vec![
            vec!["002".to_string(); 14],
            vec!["Section".to_string(), "002".to_string()],
        ];
        assert_eq!(extract_status(&narrow, "002", &layout).unwrap(), CourseStatus::NotFound);
    }

    #[test]
    fn test_empty_table_is_not_found() {
        let layout = TableLayout::default();
        assert_eq!(extract_status(&[], "002", &layout).unwrap(), CourseStatus::NotFound);
    }

    #[test]
    fn test_capacity_without_digits_is_parse_error() {
        let layout = TableLayout::default();
        let rows = vec![row(7, "002", "Broken", "-", "10")];
        let err = extract_status(&rows, "002", &layout).unwrap_err();
        assert!(matches!(err, WatchError::ParseError { .. }));
    }

    #[test]
    fn test_literal_zero_capacity_is_data() {
        let layout = TableLayout::default();
        let rows = vec![row(7, "002", "Closed", "0", "-")];
        let status = extract_status(&rows, "002", &layout).unwrap();
        let e = status.enrollment().unwrap();
        assert_eq!((e.capacity, e.current), (0, 0));
    }

    #[test]
    fn test_custom_layout() {
        let layout = TableLayout {
            row_selector: "tr".to_string(),
            title: 1,
            capacity: 2,
            current: 3,
        };
        let rows = vec![vec![
            "X1".to_string(),
            " Custom ".to_string(),
            "10".to_string(),
            "4".to_string(),
        ]];
        let status = extract_status(&rows, "X1", &layout).unwrap();
        let e = status.enrollment().unwrap();
        assert_eq!((e.title.as_str(), e.capacity, e.current), ("Custom", 10, 4));
    }
}
