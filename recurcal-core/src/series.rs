//! Composing validation, expansion and detachment into the create/edit/delete
//! flow a calendar application runs.
//!
//! A `Series` is an immutable value: every change returns a new series whose
//! rule snapshot has been replaced, and instances are regenerated from it.

use chrono::NaiveDate;
use thiserror::Error;

use crate::detach::{DetachAction, detach_single};
use crate::error::{CoreError, CoreResult};
use crate::event::{Event, EventForm, RepeatInfo};
use crate::recurrence::{
    Expansion, ExpansionBound, Materialized, RecurrenceRule, expand_rule, materialize,
};
use crate::time_validation::{TimeErrors, get_time_error_message};

/// Why a draft could not become events
#[derive(Error, Debug)]
pub enum DraftError {
    /// Both field messages, for the form to show at once
    #[error("start time must be before end time")]
    TimeRange(TimeErrors),

    #[error(transparent)]
    Rule(#[from] CoreError),
}

fn check_times(form: &EventForm) -> Result<(), DraftError> {
    let errors = get_time_error_message(&form.start_time, &form.end_time);
    if errors.is_valid() {
        Ok(())
    } else {
        Err(DraftError::TimeRange(errors))
    }
}

/// Validate a submitted draft and expand it into the events to persist.
///
/// One event for a non-recurring draft, one per occurrence otherwise.
pub fn create_events(form: &EventForm, bound: &ExpansionBound) -> Result<Materialized, DraftError> {
    check_times(form)?;
    Ok(materialize(form, bound)?)
}

/// A recurring event: its anchor draft, which carries the rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    anchor: EventForm,
}

impl Series {
    /// Wrap a recurring draft, validating its rule.
    pub fn new(anchor: EventForm) -> CoreResult<Self> {
        if !anchor.is_recurring() {
            return Err(CoreError::InvalidRule(format!(
                "'{}' does not repeat",
                anchor.title
            )));
        }
        RecurrenceRule::new(anchor.date, &anchor.repeat_or_none())?;
        Ok(Series { anchor })
    }

    /// Rebuild the series from any generated instance.
    pub fn from_instance(instance: &Event) -> CoreResult<Self> {
        let mut anchor = instance.form.clone();
        let repeat = anchor
            .repeat
            .as_mut()
            .filter(|repeat| repeat.is_recurring())
            .ok_or_else(|| {
                CoreError::InvalidRule(format!("'{}' is not part of a series", instance))
            })?;

        let anchor_date = repeat
            .series_anchor()
            .map_err(|e| CoreError::InvalidDate(format!("anchorDate: {e}")))?
            .ok_or_else(|| {
                CoreError::InvalidRule(format!("'{}' does not record its series anchor", instance))
            })?;

        repeat.anchor_date = None;
        anchor.date = anchor_date;
        Series::new(anchor)
    }

    pub fn anchor(&self) -> &EventForm {
        &self.anchor
    }

    pub fn rule(&self) -> RepeatInfo {
        self.anchor.repeat_or_none()
    }

    fn validated_rule(&self) -> CoreResult<RecurrenceRule> {
        RecurrenceRule::new(self.anchor.date, &self.rule())
    }

    pub fn dates(&self, bound: &ExpansionBound) -> CoreResult<Expansion> {
        Ok(expand_rule(&self.validated_rule()?, bound))
    }

    /// Regenerate every remaining instance from the current rule.
    pub fn instances(&self, bound: &ExpansionBound) -> CoreResult<Vec<Event>> {
        Ok(materialize(&self.anchor, bound)?.events)
    }

    /// Whether `date` is a live (not detached) occurrence.
    pub fn is_member(&self, date: NaiveDate) -> CoreResult<bool> {
        let rule = self.validated_rule()?;
        Ok(!rule.is_excluded(date) && rule.contains(date))
    }

    fn with_rule(&self, rule: RepeatInfo) -> Series {
        Series {
            anchor: self.anchor.clone().with_repeat(rule),
        }
    }

    /// "Delete this event only": the series without `date`.
    pub fn delete_instance(&self, date: NaiveDate) -> CoreResult<Series> {
        let detachment = detach_single(self.anchor.date, &self.rule(), date, DetachAction::DeleteOnly)?;
        Ok(self.with_rule(detachment.updated_rule))
    }

    /// "Edit this event only": the series without `date`, plus the standalone edited event.
    pub fn edit_instance(&self, date: NaiveDate, edited: Event) -> Result<(Series, Event), DraftError> {
        check_times(&edited.form)?;
        let detachment = detach_single(
            self.anchor.date,
            &self.rule(),
            date,
            DetachAction::EditOnly(edited),
        )?;
        let event = detachment
            .detached_event
            .ok_or(CoreError::NotAnOccurrence(date))?;
        Ok((self.with_rule(detachment.updated_rule), event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RepeatType;
    use crate::time_validation::{END_AFTER_START, START_BEFORE_END};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekly_draft() -> EventForm {
        EventForm::new("123123", date(2025, 5, 1), "03:47", "15:47")
            .with_repeat(RepeatInfo::new(RepeatType::Weekly, 1).with_count(4))
    }

    #[test]
    fn create_events_rejects_reversed_times_with_both_messages() {
        let form = EventForm::new("운동", date(2025, 5, 22), "19:00", "18:00");
        match create_events(&form, &ExpansionBound::default()) {
            Err(DraftError::TimeRange(errors)) => {
                assert_eq!(errors.start_time_error, Some(START_BEFORE_END));
                assert_eq!(errors.end_time_error, Some(END_AFTER_START));
            }
            other => panic!("expected time range error, got {other:?}"),
        }
    }

    #[test]
    fn create_events_rejects_invalid_rule() {
        let form = EventForm::new("운동", date(2025, 5, 22), "18:00", "19:00")
            .with_repeat(RepeatInfo::new(RepeatType::Daily, 0));
        assert!(matches!(
            create_events(&form, &ExpansionBound::default()),
            Err(DraftError::Rule(CoreError::InvalidRule(_)))
        ));
    }

    #[test]
    fn create_events_single() {
        let form = EventForm::new("운동", date(2025, 5, 22), "18:00", "19:00");
        let events = create_events(&form, &ExpansionBound::default()).unwrap().events;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].form, form);
    }

    #[test]
    fn series_requires_recurring_draft() {
        let form = EventForm::new("운동", date(2025, 5, 22), "18:00", "19:00");
        assert!(Series::new(form).is_err());
    }

    #[test]
    fn from_instance_recovers_the_anchor() {
        let series = Series::new(weekly_draft()).unwrap();
        let instances = series.instances(&ExpansionBound::default()).unwrap();

        let rebuilt = Series::from_instance(&instances[2]).unwrap();
        assert_eq!(rebuilt, series);
    }

    #[test]
    fn from_instance_rejects_detached_event() {
        let mut form = weekly_draft();
        form.repeat = Some(RepeatInfo::none());
        let event = Event::from_form(form, Some("x".into()));
        assert!(Series::from_instance(&event).is_err());
    }

    #[test]
    fn delete_instance_returns_new_series() {
        let series = Series::new(weekly_draft()).unwrap();
        let narrowed = series.delete_instance(date(2025, 5, 8)).unwrap();

        assert!(series.is_member(date(2025, 5, 8)).unwrap());
        assert!(!narrowed.is_member(date(2025, 5, 8)).unwrap());
        assert!(narrowed.is_member(date(2025, 5, 15)).unwrap());
        assert_eq!(narrowed.delete_instance(date(2025, 5, 8)).unwrap(), narrowed);
    }

    #[test]
    fn edit_instance_validates_times() {
        let series = Series::new(weekly_draft()).unwrap();
        let mut edited = series.instances(&ExpansionBound::default()).unwrap().remove(1);
        edited.form.end_time = "01:00".into();

        assert!(matches!(
            series.edit_instance(date(2025, 5, 8), edited),
            Err(DraftError::TimeRange(_))
        ));
    }
}
