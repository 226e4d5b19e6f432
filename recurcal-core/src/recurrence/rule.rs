//! Validated recurrence rules.

use std::collections::BTreeSet;
use std::num::NonZeroU32;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{CoreError, CoreResult};
use crate::event::{RepeatInfo, RepeatType, parse_iso_date};
use crate::recurrence::occurrences::Occurrences;

/// A `RepeatInfo` that has passed validation, anchored at its first date.
///
/// Expansion only ever runs on this type, so a malformed rule is reported
/// before any instance is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub(crate) anchor: NaiveDate,
    pub(crate) kind: RepeatType,
    pub(crate) interval: NonZeroU32,
    pub(crate) end_date: Option<NaiveDate>,
    pub(crate) count: Option<u32>,
    pub(crate) exclusions: BTreeSet<NaiveDate>,
    /// Sorted from Sunday; only used by weekly rules
    pub(crate) days_of_week: Vec<Weekday>,
}

impl RecurrenceRule {
    /// Validate `info` against `anchor`.
    ///
    /// A `none` rule ignores every other field and always validates.
    pub fn new(anchor: NaiveDate, info: &RepeatInfo) -> CoreResult<Self> {
        if !info.is_recurring() {
            return Ok(RecurrenceRule::single(anchor));
        }

        let interval = u32::try_from(info.interval)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| {
                CoreError::InvalidRule(format!(
                    "interval must be a positive integer, got {}",
                    info.interval
                ))
            })?;

        let count = info
            .count
            .map(|count| {
                u32::try_from(count).map_err(|_| {
                    CoreError::InvalidRule(format!("count must not be negative, got {count}"))
                })
            })
            .transpose()?;

        let end_date = info
            .end_date
            .as_deref()
            .map(|raw| parse_rule_date("endDate", raw))
            .transpose()?;

        if let Some(end) = end_date
            && end < anchor
        {
            return Err(CoreError::InvalidRule(format!(
                "endDate {end} is before the first occurrence {anchor}"
            )));
        }

        // Exclusions only filter; one left behind by a later rule change is dropped
        let mut exclusions = BTreeSet::new();
        for raw in &info.exclude_dates {
            let date = parse_rule_date("excludeDates", raw)?;
            if date < anchor || end_date.is_some_and(|end| date > end) {
                tracing::debug!(%anchor, excluded = %date, "Dropping exclusion outside the series");
                continue;
            }
            exclusions.insert(date);
        }

        let days_of_week = if info.kind == RepeatType::Weekly {
            weekly_days(anchor, &info.days_of_week)?
        } else {
            Vec::new()
        };

        Ok(RecurrenceRule {
            anchor,
            kind: info.kind,
            interval,
            end_date,
            count,
            exclusions,
            days_of_week,
        })
    }

    /// The rule of a non-recurring event: just the anchor.
    pub fn single(anchor: NaiveDate) -> Self {
        RecurrenceRule {
            anchor,
            kind: RepeatType::None,
            interval: NonZeroU32::MIN,
            end_date: None,
            count: None,
            exclusions: BTreeSet::new(),
            days_of_week: Vec::new(),
        }
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn kind(&self) -> RepeatType {
        self.kind
    }

    pub fn is_recurring(&self) -> bool {
        self.kind != RepeatType::None
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn count(&self) -> Option<u32> {
        self.count
    }

    pub fn is_excluded(&self, date: NaiveDate) -> bool {
        self.exclusions.contains(&date)
    }

    /// The rule's own occurrences, ascending, with exclusions removed.
    ///
    /// Bounded only by `endDate`/`count`; see `expand` for the safety-capped form.
    pub fn occurrences(&self) -> Occurrences<'_> {
        Occurrences::new(self, true)
    }

    /// Whether the rule generates `date`, ignoring the exclusion set.
    pub fn contains(&self, date: NaiveDate) -> bool {
        if date < self.anchor {
            return false;
        }
        if !self.is_recurring() {
            return date == self.anchor;
        }
        Occurrences::new(self, false)
            .until(date)
            .any(|occurrence| occurrence == date)
    }
}

fn parse_rule_date(field: &str, raw: &str) -> CoreResult<NaiveDate> {
    parse_iso_date(raw)
        .map_err(|e| CoreError::InvalidDate(format!("{field} value '{raw}': {e}")))
}

/// Resolve `daysOfWeek`, falling back to the anchor's own weekday.
fn weekly_days(anchor: NaiveDate, raw_days: &[String]) -> CoreResult<Vec<Weekday>> {
    if raw_days.is_empty() {
        return Ok(vec![anchor.weekday()]);
    }

    let mut days = raw_days
        .iter()
        .map(|raw| parse_weekday(raw))
        .collect::<CoreResult<Vec<_>>>()?;
    days.sort_by_key(|day| day.num_days_from_sunday());
    days.dedup();
    Ok(days)
}

/// Accepts weekday names in any case ("mon", "Monday") or JS day numbers ("0" = Sunday).
fn parse_weekday(raw: &str) -> CoreResult<Weekday> {
    let trimmed = raw.trim();
    if let Ok(number) = trimmed.parse::<u8>() {
        return match number {
            0 => Ok(Weekday::Sun),
            1 => Ok(Weekday::Mon),
            2 => Ok(Weekday::Tue),
            3 => Ok(Weekday::Wed),
            4 => Ok(Weekday::Thu),
            5 => Ok(Weekday::Fri),
            6 => Ok(Weekday::Sat),
            _ => Err(CoreError::InvalidRule(format!(
                "day of week number must be 0-6, got {number}"
            ))),
        };
    }
    trimmed
        .parse::<Weekday>()
        .map_err(|_| CoreError::InvalidRule(format!("unknown day of week '{raw}'")))
}
