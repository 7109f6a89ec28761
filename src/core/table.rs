//! Turns the search result page into plain cell texts.

use crate::domain::model::RowTable;
use crate::utils::error::{Result, WatchError};
use scraper::{ElementRef, Html, Selector};

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| WatchError::config(format!("invalid CSS selector '{}': {:?}", css, e)))
}

/// Visible text of an element with whitespace runs collapsed.
pub fn cell_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collect the `td` texts of every row matched by `row_selector`.
pub fn parse_rows(html: &str, row_selector: &str) -> Result<RowTable> {
    let rows = selector(row_selector)?;
    let cells = selector("td")?;
    let document = Html::parse_document(html);

    let table: RowTable = document
        .select(&rows)
        .map(|tr| tr.select(&cells).map(cell_text).collect())
        .collect();

    tracing::debug!("Parsed {} result rows", table.len());
    Ok(table)
}
