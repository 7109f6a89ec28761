use crate::domain::model::Query;
use serde::Serialize;

/// Display decision for one found section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    pub label: String,
    pub current: u32,
    pub capacity: u32,
    pub fill_ratio: f64,
    pub percent_filled: f64,
    pub is_full: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PanelState {
    Gauge(Gauge),
    NotFound,
    Failed { message: String, timed_out: bool },
}

/// One tracked course inside a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub query: Query,
    pub state: PanelState,
}

impl Panel {
    /// Fill ratio for ranking; `None` when there is nothing to rank.
    pub fn fill_ratio(&self) -> Option<f64> {
        match &self.state {
            PanelState::Gauge(g) => Some(g.fill_ratio),
            _ => None,
        }
    }
}

/// Everything shown after one poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub updated_at: String,
    pub panels: Vec<Panel>,
}
