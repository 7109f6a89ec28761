use crate::core::fetcher::StatusFetcher;
use crate::core::gauge::rank_panels;
use crate::domain::frame::{Frame, Panel};
use crate::domain::model::{TableLayout, TrackedCourse};
use crate::domain::ports::{Dashboard, PageFetcher};
use crate::utils::error::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// How the refresh loop orders panels before each render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardMode {
    /// Panels keep their configured order.
    Single,
    /// Panels are re-sorted by descending fill ratio every poll.
    Ranked,
}

/// Polls every tracked course, one after another, on a fixed interval.
pub struct WatchEngine<F: PageFetcher, D: Dashboard> {
    fetcher: StatusFetcher<F>,
    dashboard: D,
    courses: Vec<TrackedCourse>,
    interval: Duration,
    mode: BoardMode,
}

impl<F: PageFetcher, D: Dashboard> WatchEngine<F, D> {
    pub fn new(
        fetcher: F,
        layout: TableLayout,
        dashboard: D,
        courses: Vec<TrackedCourse>,
        interval: Duration,
    ) -> Self {
        let mode = if courses.len() > 1 {
            BoardMode::Ranked
        } else {
            BoardMode::Single
        };
        Self {
            fetcher: StatusFetcher::new(fetcher, layout),
            dashboard,
            courses,
            interval,
            mode,
        }
    }

    pub fn with_mode(mut self, mode: BoardMode) -> Self {
        self.mode = mode;
        self
    }

    /// One fetch-and-render cycle. Failures end up inside the frame.
    pub async fn poll_once(&mut self) -> Frame {
        let mut panels = Vec::with_capacity(self.courses.len());

        for course in &self.courses {
            let outcome = self.fetcher.fetch(&course.query).await;
            if let Err(e) = &outcome {
                tracing::error!(
                    "Poll of {} failed: {} (Category: {:?})",
                    course.query,
                    e,
                    e.category()
                );
                tracing::debug!("Suggestion: {}", e.recovery_suggestion());
            }
            panels.push(Panel::from_outcome(
                course.query.clone(),
                outcome,
                course.label.as_deref(),
            ));
        }

        if self.mode == BoardMode::Ranked {
            rank_panels(&mut panels);
        }

        Frame {
            updated_at: chrono::Local::now().format("%H:%M:%S").to_string(),
            panels,
        }
    }

    /// Poll until Ctrl-C or until `max_polls` cycles have run. Returns the
    /// number of completed polls.
    pub async fn run(&mut self, max_polls: Option<u64>) -> Result<u64> {
        self.run_until(max_polls, tokio::signal::ctrl_c()).await
    }

    /// Like [`run`](Self::run), but stops when `stop` resolves. The stop
    /// future is watched during the wait and during each poll; an interrupted
    /// poll is not rendered or counted.
    pub async fn run_until<S: Future>(&mut self, max_polls: Option<u64>, stop: S) -> Result<u64> {
        tracing::info!(
            "Watching {} course(s) every {:?}",
            self.courses.len(),
            self.interval
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut polls = 0u64;
        tokio::pin!(stop);

        while !max_polls.is_some_and(|max| polls >= max) {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = &mut stop => {
                    tracing::info!("Interrupted, stopping after {} poll(s)", polls);
                    break;
                }
            }

            let frame = tokio::select! {
                frame = self.poll_once() => frame,
                _ = &mut stop => {
                    tracing::info!("Interrupted during a poll, stopping after {} poll(s)", polls);
                    break;
                }
            };
            if let Err(e) = self.dashboard.render(&frame) {
                tracing::error!("Render failed: {}", e);
            }
            polls += 1;
        }

        Ok(polls)
    }

    /// Tear down the loop and release the transport session.
    pub async fn shutdown(self) -> Result<D> {
        self.fetcher.close().await?;
        Ok(self.dashboard)
    }
}
