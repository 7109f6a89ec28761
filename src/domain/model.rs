use crate::utils::error::WatchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 學期；每個學期對應教務系統固定的兩段代碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Term {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Term {
    pub const ALL: [Term; 4] = [Term::Spring, Term::Summer, Term::Fall, Term::Winter];

    /// The opaque code pair the registration site expects.
    pub fn code_pair(self) -> (&'static str, &'static str) {
        match self {
            Term::Spring => ("U000200001", "U000300001"),
            Term::Summer => ("U000200001", "U000300002"),
            Term::Fall => ("U000200002", "U000300001"),
            Term::Winter => ("U000200002", "U000300002"),
        }
    }

    /// Value bound into the search form's term field.
    pub fn form_value(self) -> String {
        let (major, minor) = self.code_pair();
        format!("{}{}", major, minor)
    }

    pub fn ordinal(self) -> u8 {
        match self {
            Term::Spring => 1,
            Term::Summer => 2,
            Term::Fall => 3,
            Term::Winter => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Term::Spring => "spring",
            Term::Summer => "summer",
            Term::Fall => "fall",
            Term::Winter => "winter",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Term {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Term::ALL
            .into_iter()
            .find(|t| t.name() == wanted || t.ordinal().to_string() == wanted)
            .ok_or_else(|| WatchError::InvalidConfigValueError {
                field: "term".to_string(),
                value: s.to_string(),
                reason: "Expected spring, summer, fall, winter or 1-4".to_string(),
            })
    }
}

/// How a `PageFetcher` reaches the registration site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Http,
    Browser,
}

impl FromStr for TransportKind {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(TransportKind::Http),
            "browser" => Ok(TransportKind::Browser),
            _ => Err(WatchError::InvalidConfigValueError {
                field: "transport".to_string(),
                value: s.to_string(),
                reason: "Expected http or browser".to_string(),
            }),
        }
    }
}

/// One section lookup. Codes are trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub year: u16,
    pub term: Term,
    pub subject_code: String,
    pub section_code: String,
}

impl Query {
    pub fn new(year: u16, term: Term, subject_code: &str, section_code: &str) -> Self {
        Self {
            year,
            term,
            subject_code: subject_code.trim().to_string(),
            section_code: section_code.trim().to_string(),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} {} ({})",
            self.year, self.term, self.subject_code, self.section_code
        )
    }
}

/// A query the dashboard keeps polling, with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedCourse {
    pub query: Query,
    pub label: Option<String>,
}

impl From<Query> for TrackedCourse {
    fn from(query: Query) -> Self {
        Self { query, label: None }
    }
}

/// Enrollment figures scraped from a matched row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub title: String,
    pub capacity: u32,
    pub current: u32,
}

impl Enrollment {
    pub fn fill_ratio(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            f64::from(self.current) / f64::from(self.capacity)
        }
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.capacity
    }
}

/// Result of one poll. `NotFound` carries no figures so zeros can never be
/// mistaken for data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseStatus {
    Found(Enrollment),
    NotFound,
}

impl CourseStatus {
    pub fn enrollment(&self) -> Option<&Enrollment> {
        match self {
            CourseStatus::Found(e) => Some(e),
            CourseStatus::NotFound => None,
        }
    }
}

/// Cell texts of the result table, one `Vec` per body row, in document order.
pub type RowTable = Vec<Vec<String>>;

/// Where the interesting fields live in the result table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLayout {
    pub row_selector: String,
    pub title: usize,
    pub capacity: usize,
    pub current: usize,
}

impl TableLayout {
    /// Rows with this many cells or fewer are headers or malformed.
    pub fn max_index(&self) -> usize {
        self.title.max(self.capacity).max(self.current)
    }
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            row_selector: "table.tbl_basic tbody tr".to_string(),
            title: 6,
            capacity: 13,
            current: 14,
        }
    }
}
