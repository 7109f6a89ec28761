// Adapters layer: concrete transports and outputs behind the domain ports.

#[cfg(feature = "browser")]
pub mod browser;
pub mod http;
pub mod terminal;

use crate::domain::model::Query;

pub const DEFAULT_ENDPOINT: &str = "https://shine.snu.ac.kr/uni/sugang/cc/cc100.action";

/// Form element ids the site's own search routine reads.
pub const YEAR_FIELD: &str = "srchOpenSchyy";
pub const TERM_FIELD: &str = "srchOpenShtm";
pub const SUBJECT_FIELD: &str = "srchSbjtCd";

/// The three parameter bindings every transport must reproduce.
pub fn form_bindings(query: &Query) -> [(&'static str, String); 3] {
    [
        (YEAR_FIELD, query.year.to_string()),
        (TERM_FIELD, query.term.form_value()),
        (SUBJECT_FIELD, query.subject_code.trim().to_string()),
    ]
}
