//! Start/end time validation for event drafts.
//!
//! Errors are returned as data so a form can highlight both fields at once.

use chrono::NaiveTime;
use serde::Serialize;

pub const START_BEFORE_END: &str = "시작 시간은 종료 시간보다 빨라야 합니다.";
pub const END_AFTER_START: &str = "종료 시간은 시작 시간보다 늦어야 합니다.";
pub const INVALID_TIME_FORMAT: &str = "시간 형식이 올바르지 않습니다.";

const TIME_FORMAT: &str = "%H:%M";

/// Per-field error messages for a start/end pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeErrors {
    pub start_time_error: Option<&'static str>,
    pub end_time_error: Option<&'static str>,
}

impl TimeErrors {
    pub fn none() -> Self {
        TimeErrors::default()
    }

    fn range_invalid() -> Self {
        TimeErrors {
            start_time_error: Some(START_BEFORE_END),
            end_time_error: Some(END_AFTER_START),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.start_time_error.is_none() && self.end_time_error.is_none()
    }
}

/// Parse a strict "HH:MM" 24-hour string.
fn parse_hh_mm(raw: &str) -> Option<NaiveTime> {
    // chrono accepts single-digit hours; the form always sends two
    if raw.len() != 5 {
        return None;
    }
    NaiveTime::parse_from_str(raw, TIME_FORMAT).ok()
}

/// Check a start/end time pair.
///
/// - Either side empty: no errors, the required-field check happens elsewhere.
/// - Either side not "HH:MM": that side gets a format error.
/// - `start >= end`: both sides get an error.
pub fn get_time_error_message(start: &str, end: &str) -> TimeErrors {
    if start.is_empty() || end.is_empty() {
        return TimeErrors::none();
    }

    match (parse_hh_mm(start), parse_hh_mm(end)) {
        (Some(start), Some(end)) if start >= end => TimeErrors::range_invalid(),
        (Some(_), Some(_)) => TimeErrors::none(),
        (start, end) => TimeErrors {
            start_time_error: start.is_none().then_some(INVALID_TIME_FORMAT),
            end_time_error: end.is_none().then_some(INVALID_TIME_FORMAT),
        },
    }
}
