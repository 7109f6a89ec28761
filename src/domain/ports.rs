use crate::domain::frame::Frame;
use crate::domain::model::{Query, RowTable, TableLayout, TrackedCourse, TransportKind};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Submits a search to the registration site and returns the result rows.
///
/// Implementations own their session (HTTP cookie jar or browser tab) and
/// may keep it warm between calls.
#[async_trait]
pub trait PageFetcher: Send {
    async fn search(&mut self, query: &Query, layout: &TableLayout) -> Result<RowTable>;

    /// Release the underlying session.
    async fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for Box<F> {
    async fn search(&mut self, query: &Query, layout: &TableLayout) -> Result<RowTable> {
        (**self).search(query, layout).await
    }

    async fn close(self: Box<Self>) -> Result<()> {
        F::close(*self).await
    }
}

/// Receives one rendered frame per poll.
pub trait Dashboard: Send {
    fn render(&mut self, frame: &Frame) -> Result<()>;
}

impl<D: Dashboard + ?Sized> Dashboard for Box<D> {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        (**self).render(frame)
    }
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn transport(&self) -> TransportKind;
    fn timeout(&self) -> Duration;
    fn user_agent(&self) -> &str;
    fn browser_path(&self) -> Option<&str>;
    fn interval(&self) -> Duration;
    fn bar_width(&self) -> usize;
    fn layout(&self) -> TableLayout;
    fn courses(&self) -> Vec<TrackedCourse>;
}
