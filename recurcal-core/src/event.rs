//! Event and recurrence rule shapes.
//!
//! These types mirror what the calendar form submits and what the storage layer
//! persists. `RepeatInfo` keeps its fields in their raw, form-shaped types so that
//! drafts deserialize unchanged; `recurrence::RecurrenceRule` is the validated view.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used for `endDate` and `excludeDates`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Minutes before start used when a draft does not say otherwise.
pub const DEFAULT_NOTIFICATION_MINUTES: u32 = 10;

/// How often an event repeats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatType {
    /// Not recurring (also the marker for a detached instance)
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RepeatType {
    pub fn as_str(self) -> &'static str {
        match self {
            RepeatType::None => "none",
            RepeatType::Daily => "daily",
            RepeatType::Weekly => "weekly",
            RepeatType::Monthly => "monthly",
            RepeatType::Yearly => "yearly",
        }
    }
}

impl fmt::Display for RepeatType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_interval() -> i64 {
    1
}

/// A recurrence rule attached to an event, as submitted by the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatInfo {
    #[serde(rename = "type")]
    pub kind: RepeatType,

    /// Step between occurrences, in units of `kind`
    #[serde(default = "default_interval")]
    pub interval: i64,

    /// Inclusive last date (YYYY-MM-DD, a trailing ISO time part is ignored)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    /// Maximum number of generated slots, including the first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,

    /// Dates removed from the series (deleted or independently edited instances)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_dates: Vec<String>,

    /// Weekday names ("mon", "Tuesday") or JS day numbers ("0" = Sunday)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days_of_week: Vec<String>,

    /// First occurrence of the series; set on generated instances only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_date: Option<String>,
}

impl Default for RepeatInfo {
    fn default() -> Self {
        RepeatInfo::none()
    }
}

impl RepeatInfo {
    /// A rule of the given kind with no end condition.
    pub fn new(kind: RepeatType, interval: i64) -> Self {
        RepeatInfo {
            kind,
            interval,
            end_date: None,
            count: None,
            exclude_dates: Vec::new(),
            days_of_week: Vec::new(),
            anchor_date: None,
        }
    }

    /// The non-recurring rule, `{ type: "none" }`.
    pub fn none() -> Self {
        RepeatInfo::new(RepeatType::None, 1)
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date.format(DATE_FORMAT).to_string());
        self
    }

    pub fn with_count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_days_of_week<I, S>(mut self, days: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.days_of_week = days.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.kind != RepeatType::None
    }

    /// The series anchor recorded on a generated instance, if any.
    pub fn series_anchor(&self) -> Result<Option<NaiveDate>, chrono::ParseError> {
        self.anchor_date.as_deref().map(parse_iso_date).transpose()
    }

    /// Whether `date` is already in the exclusion set.
    pub fn is_excluded(&self, date: NaiveDate) -> bool {
        self.exclude_dates
            .iter()
            .any(|raw| parse_iso_date(raw).is_ok_and(|d| d == date))
    }

    /// A copy of this rule with `date` added to the exclusion set.
    ///
    /// Adding a date that is already excluded returns an identical rule.
    pub fn with_excluded_date(&self, date: NaiveDate) -> Self {
        let mut updated = self.clone();
        if !self.is_excluded(date) {
            updated.exclude_dates.push(date.format(DATE_FORMAT).to_string());
            updated.exclude_dates.sort();
        }
        updated
    }
}

/// Parse an ISO date, accepting either `YYYY-MM-DD` or a full ISO timestamp.
pub fn parse_iso_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
}

fn default_notification_time() -> u32 {
    DEFAULT_NOTIFICATION_MINUTES
}

/// A user-editable event draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
    pub title: String,
    /// Anchor date: the first occurrence for a recurring draft
    pub date: NaiveDate,
    /// "HH:MM", 24-hour; may be empty while the form is being filled
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<RepeatInfo>,
    /// Minutes before start to notify
    #[serde(default = "default_notification_time")]
    pub notification_time: u32,
}

impl EventForm {
    pub fn new(
        title: impl Into<String>,
        date: NaiveDate,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        EventForm {
            title: title.into(),
            date,
            start_time: start_time.into(),
            end_time: end_time.into(),
            description: String::new(),
            location: String::new(),
            category: String::new(),
            repeat: None,
            notification_time: DEFAULT_NOTIFICATION_MINUTES,
        }
    }

    pub fn with_repeat(mut self, repeat: RepeatInfo) -> Self {
        self.repeat = Some(repeat);
        self
    }

    /// The attached rule, treating a missing rule as `none`.
    pub fn repeat_or_none(&self) -> RepeatInfo {
        self.repeat.clone().unwrap_or_else(RepeatInfo::none)
    }

    pub fn is_recurring(&self) -> bool {
        self.repeat.as_ref().is_some_and(RepeatInfo::is_recurring)
    }
}

/// A persisted event: a draft plus its identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// None until the event has been persisted once
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub form: EventForm,
}

impl Event {
    pub fn from_form(form: EventForm, id: Option<String>) -> Self {
        Event { id, form }
    }

    pub fn date(&self) -> NaiveDate {
        self.form.date
    }

    pub fn is_recurring(&self) -> bool {
        self.form.is_recurring()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.form.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn deserializes_form_shaped_json() {
        let json = r#"{
            "id": "abc",
            "title": "운동",
            "date": "2025-05-22",
            "startTime": "18:00",
            "endTime": "19:00",
            "description": "",
            "location": "",
            "category": "개인",
            "repeat": { "type": "weekly", "interval": 2, "count": 4, "daysOfWeek": ["mon", "3"] },
            "notificationTime": 60
        }"#;

        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.id.as_deref(), Some("abc"));
        assert_eq!(event.date(), date(2025, 5, 22));
        assert_eq!(event.form.notification_time, 60);

        let repeat = event.form.repeat.unwrap();
        assert_eq!(repeat.kind, RepeatType::Weekly);
        assert_eq!(repeat.interval, 2);
        assert_eq!(repeat.count, Some(4));
        assert_eq!(repeat.days_of_week, vec!["mon", "3"]);
        assert!(repeat.exclude_dates.is_empty());
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let json = r#"{ "title": "t", "date": "2025-01-01", "startTime": "", "endTime": "" }"#;
        let form: EventForm = serde_json::from_str(json).unwrap();
        assert_eq!(form.notification_time, DEFAULT_NOTIFICATION_MINUTES);
        assert!(form.repeat.is_none());
        assert!(!form.is_recurring());
        assert_eq!(form.repeat_or_none(), RepeatInfo::none());
    }

    #[test]
    fn none_rule_serializes_as_type_only() {
        let json = serde_json::to_value(RepeatInfo::none()).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "none", "interval": 1 }));
    }

    #[test]
    fn excluded_date_is_added_once_and_sorted() {
        let rule = RepeatInfo::new(RepeatType::Daily, 1)
            .with_excluded_date(date(2025, 5, 9))
            .with_excluded_date(date(2025, 5, 3))
            .with_excluded_date(date(2025, 5, 9));

        assert_eq!(rule.exclude_dates, vec!["2025-05-03", "2025-05-09"]);
        assert!(rule.is_excluded(date(2025, 5, 3)));
        assert!(!rule.is_excluded(date(2025, 5, 4)));
    }

    #[test]
    fn exclusion_matches_iso_timestamps() {
        let mut rule = RepeatInfo::new(RepeatType::Daily, 1);
        rule.exclude_dates.push("2025-05-08T00:00:00.000Z".to_string());
        assert!(rule.is_excluded(date(2025, 5, 8)));
        assert_eq!(rule.with_excluded_date(date(2025, 5, 8)), rule);
    }

    #[test]
    fn series_anchor_is_parsed_when_present() {
        let mut rule = RepeatInfo::new(RepeatType::Monthly, 1);
        assert_eq!(rule.series_anchor(), Ok(None));

        rule.anchor_date = Some("2025-01-31".to_string());
        assert_eq!(rule.series_anchor(), Ok(Some(date(2025, 1, 31))));

        rule.anchor_date = Some("31/01/2025".to_string());
        assert!(rule.series_anchor().is_err());
    }

    #[test]
    fn parse_iso_date_rejects_garbage() {
        assert!(parse_iso_date("2025-13-01").is_err());
        assert!(parse_iso_date("tomorrow").is_err());
        assert!(parse_iso_date("").is_err());
    }
}
