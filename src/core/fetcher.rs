use crate::core::matcher;
use crate::domain::model::{CourseStatus, Query, TableLayout};
use crate::domain::ports::PageFetcher;
use crate::utils::error::Result;

/// Course Status Fetcher: runs a search through any transport and reads the
/// requested section out of the result table.
pub struct StatusFetcher<F: PageFetcher> {
    fetcher: F,
    layout: TableLayout,
}

impl<F: PageFetcher> StatusFetcher<F> {
    pub fn new(fetcher: F, layout: TableLayout) -> Self {
        Self { fetcher, layout }
    }

    pub async fn fetch(&mut self, query: &Query) -> Result<CourseStatus> {
        tracing::debug!("Fetching {}", query);
        let rows = self.fetcher.search(query, &self.layout).await?;
        let status = matcher::extract_status(&rows, &query.section_code, &self.layout)?;

        match &status {
            CourseStatus::Found(e) => tracing::debug!(
                "{} -> '{}' {}/{}",
                query,
                e.title,
                e.current,
                e.capacity
            ),
            CourseStatus::NotFound => tracing::warn!("{} -> no matching row", query),
        }
        Ok(status)
    }

    /// Release the transport session.
    pub async fn close(self) -> Result<()> {
        Box::new(self.fetcher).close().await
    }
}
