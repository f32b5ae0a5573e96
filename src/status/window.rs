//! Weekly date window
//!
//! The weekly-JSON probe asks for the rota of the current week, from the
//! Monday of the current week up to the following Monday.

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;

/// Query parameter carrying the window start
pub const VALID_AFTER_PARAM: &str = "valid-after";

/// Query parameter carrying the window end
pub const VALID_BEFORE_PARAM: &str = "valid-before";

/// Monday-to-Monday date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    /// Window for the week containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        // 0 = Sunday, so Sunday maps to an offset of 6
        let weekday = date.weekday().num_days_from_sunday() as i64;
        let offset = (weekday + 6) % 7;
        let start = date - Duration::days(offset);
        Self {
            start,
            end: start + Duration::days(7),
        }
    }

    /// Window for today's local calendar date
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn start_str(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }

    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            (VALID_AFTER_PARAM, self.start_str()),
            (VALID_BEFORE_PARAM, self.end_str()),
        ]
    }
}
