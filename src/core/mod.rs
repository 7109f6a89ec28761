pub mod fetcher;
pub mod gauge;
pub mod matcher;
pub mod table;
pub mod watch;

pub use crate::domain::frame::{Frame, Gauge, Panel, PanelState};
pub use crate::domain::model::{CourseStatus, Enrollment, Query, RowTable, TableLayout, Term, TrackedCourse};
pub use crate::domain::ports::{ConfigProvider, Dashboard, PageFetcher};
pub use crate::utils::error::Result;
