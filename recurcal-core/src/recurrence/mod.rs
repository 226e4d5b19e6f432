//! Recurrence expansion for repeating events.
//!
//! Expands an anchor date and its `RepeatInfo` into the concrete dates of the
//! series, and materializes those dates into standalone `Event` instances.

mod occurrences;
mod rule;

pub use occurrences::Occurrences;
pub use rule::RecurrenceRule;

use chrono::{Days, NaiveDate};
use uuid::Uuid;

use crate::error::CoreResult;
use crate::event::{DATE_FORMAT, Event, EventForm, RepeatInfo};

/// Default cap on instances produced by a single expansion
pub const DEFAULT_MAX_INSTANCES: usize = 365;

/// Default lookahead window after the anchor, in days
pub const DEFAULT_HORIZON_DAYS: u32 = 730;

/// Safety bound for expansion.
///
/// `endDate` and `count` are optional, so an open-ended rule is cut off here
/// instead of generating forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionBound {
    pub max_instances: usize,
    pub horizon_days: u32,
}

impl Default for ExpansionBound {
    fn default() -> Self {
        ExpansionBound {
            max_instances: DEFAULT_MAX_INSTANCES,
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

impl ExpansionBound {
    /// Last date (inclusive) an expansion from `anchor` may reach.
    pub fn horizon_from(&self, anchor: NaiveDate) -> NaiveDate {
        anchor
            .checked_add_days(Days::new(u64::from(self.horizon_days)))
            .unwrap_or(NaiveDate::MAX)
    }
}

/// The dates produced by `expand`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Strictly ascending, exclusions removed
    pub dates: Vec<NaiveDate>,
    /// True when the safety bound cut off a rule that had more occurrences
    pub truncated: bool,
}

/// Expand `info` from `anchor` into concrete dates, capped by `bound`.
///
/// A non-recurring rule always yields exactly `[anchor]`.
pub fn expand(anchor: NaiveDate, info: &RepeatInfo, bound: &ExpansionBound) -> CoreResult<Expansion> {
    let rule = RecurrenceRule::new(anchor, info)?;
    Ok(expand_rule(&rule, bound))
}

/// Expand an already validated rule.
pub fn expand_rule(rule: &RecurrenceRule, bound: &ExpansionBound) -> Expansion {
    if !rule.is_recurring() {
        return Expansion {
            dates: vec![rule.anchor()],
            truncated: false,
        };
    }

    let mut occurrences = rule.occurrences().until(bound.horizon_from(rule.anchor()));
    let dates: Vec<NaiveDate> = occurrences.by_ref().take(bound.max_instances).collect();
    let truncated = occurrences.next().is_some() || occurrences.hit_horizon();

    if truncated {
        tracing::debug!(
            anchor = %rule.anchor(),
            kind = %rule.kind(),
            emitted = dates.len(),
            max_instances = bound.max_instances,
            horizon_days = bound.horizon_days,
            "Expansion stopped at safety bound"
        );
    }

    Expansion { dates, truncated }
}

/// The events produced by `materialize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Materialized {
    pub events: Vec<Event>,
    /// True when the safety bound cut the series short
    pub truncated: bool,
}

/// Turn a draft into one event per generated date.
///
/// Every instance gets a fresh id and its own copy of the rule. Recurring
/// instances also record the series anchor so the series can be recomputed
/// from any one of them.
pub fn materialize(form: &EventForm, bound: &ExpansionBound) -> CoreResult<Materialized> {
    let info = form.repeat_or_none();
    let rule = RecurrenceRule::new(form.date, &info)?;
    let expansion = expand_rule(&rule, bound);

    let snapshot = form.repeat.clone().map(|mut repeat| {
        if repeat.is_recurring() {
            repeat.anchor_date = Some(form.date.format(DATE_FORMAT).to_string());
        }
        repeat
    });

    let events: Vec<Event> = expansion
        .dates
        .into_iter()
        .map(|date| {
            let instance = EventForm {
                date,
                repeat: snapshot.clone(),
                ..form.clone()
            };
            Event::from_form(instance, Some(Uuid::new_v4().to_string()))
        })
        .collect();

    tracing::debug!(
        title = %form.title,
        anchor = %form.date,
        instances = events.len(),
        truncated = expansion.truncated,
        "Materialized event draft"
    );

    Ok(Materialized {
        events,
        truncated: expansion.truncated,
    })
}
