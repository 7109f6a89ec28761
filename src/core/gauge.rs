//! Display decisions: fill percentage, full/open state, labels, ranking and
//! plain-text bars.

use crate::domain::frame::{Gauge, Panel, PanelState};
use crate::domain::model::{CourseStatus, Enrollment, Query};
use crate::utils::error::WatchError;
use std::cmp::Ordering;

pub const NOT_FOUND_MESSAGE: &str = "Row not found. Check the subject code, section and term.";

pub fn percent_filled(current: u32, capacity: u32) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    (f64::from(current) / f64::from(capacity) * 100.0).clamp(0.0, 100.0)
}

pub fn label(title: &str, current: u32, capacity: u32) -> String {
    if title.is_empty() {
        format!("({}/{})", current, capacity)
    } else {
        format!("{} ({}/{})", title, current, capacity)
    }
}

impl Gauge {
    /// `title_override` replaces the scraped title when set and non-empty.
    pub fn from_enrollment(enrollment: &Enrollment, title_override: Option<&str>) -> Self {
        let title = title_override
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(enrollment.title.as_str());
        Self {
            label: label(title, enrollment.current, enrollment.capacity),
            current: enrollment.current,
            capacity: enrollment.capacity,
            fill_ratio: enrollment.fill_ratio(),
            percent_filled: percent_filled(enrollment.current, enrollment.capacity),
            is_full: enrollment.is_full(),
        }
    }
}

impl Panel {
    /// Convert one poll outcome into something displayable. Errors stop here.
    pub fn from_outcome(
        query: Query,
        outcome: Result<CourseStatus, WatchError>,
        title_override: Option<&str>,
    ) -> Self {
        let state = match outcome {
            Ok(CourseStatus::Found(e)) => PanelState::Gauge(Gauge::from_enrollment(&e, title_override)),
            Ok(CourseStatus::NotFound) => PanelState::NotFound,
            Err(e) => PanelState::Failed {
                message: e.user_friendly_message(),
                timed_out: e.is_timeout(),
            },
        };
        Self { query, state }
    }
}

/// Sort by descending fill ratio. Stable: equal ratios and panels without a
/// ratio keep their configured order, the latter after every gauge.
pub fn rank_panels(panels: &mut [Panel]) {
    panels.sort_by(|a, b| match (a.fill_ratio(), b.fill_ratio()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

pub fn render_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn render_panel(panel: &Panel, width: usize) -> String {
    match &panel.state {
        PanelState::Gauge(g) => format!(
            "{} {:>5.1}%  {}  {}",
            render_bar(g.percent_filled, width),
            g.percent_filled,
            g.label,
            if g.is_full { "FULL" } else { "OPEN" }
        ),
        PanelState::NotFound => format!("{}  {}", panel.query, NOT_FOUND_MESSAGE),
        PanelState::Failed { message, timed_out } => {
            if *timed_out {
                format!("{}  {} (consider a longer timeout)", panel.query, message)
            } else {
                format!("{}  {}", panel.query, message)
            }
        }
    }
}
