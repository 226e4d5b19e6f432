//! Detaching a single occurrence from its series.
//!
//! An occurrence is either attached to its series rule or detached, and detaching
//! is terminal. Deleting one occurrence only narrows the rule's exclusion set;
//! editing one also turns the edited copy into a standalone `none` event. Sibling
//! instances and their rule snapshots are never touched.

use chrono::NaiveDate;

use crate::error::{CoreError, CoreResult};
use crate::event::{Event, RepeatInfo};
use crate::recurrence::RecurrenceRule;

/// What the user asked to do with one occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetachAction {
    /// "Delete this event only"
    DeleteOnly,
    /// "Edit this event only", carrying the edited instance
    EditOnly(Event),
}

/// Result of detaching one occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detachment {
    /// The series rule with the target date excluded
    pub updated_rule: RepeatInfo,
    /// The standalone event for an edit; None for a delete
    pub detached_event: Option<Event>,
}

/// Detach the occurrence on `target_date` from the series anchored at `anchor`.
///
/// Detaching a date that is already excluded leaves the rule unchanged.
pub fn detach_single(
    anchor: NaiveDate,
    series_rule: &RepeatInfo,
    target_date: NaiveDate,
    action: DetachAction,
) -> CoreResult<Detachment> {
    if !series_rule.is_recurring() {
        return Err(CoreError::InvalidRule(
            "cannot detach an occurrence from a non-recurring event".into(),
        ));
    }

    let rule = RecurrenceRule::new(anchor, series_rule)?;

    let updated_rule = if rule.is_excluded(target_date) {
        tracing::debug!(%anchor, target = %target_date, "Occurrence already detached");
        series_rule.clone()
    } else if rule.contains(target_date) {
        series_rule.with_excluded_date(target_date)
    } else {
        return Err(CoreError::NotAnOccurrence(target_date));
    };

    let detached_event = match action {
        DetachAction::DeleteOnly => None,
        DetachAction::EditOnly(mut edited) => {
            edited.form.repeat = Some(RepeatInfo::none());
            Some(edited)
        }
    };

    tracing::debug!(
        %anchor,
        target = %target_date,
        edited = detached_event.is_some(),
        excluded = updated_rule.exclude_dates.len(),
        "Detached occurrence from series"
    );

    Ok(Detachment {
        updated_rule,
        detached_event,
    })
}
