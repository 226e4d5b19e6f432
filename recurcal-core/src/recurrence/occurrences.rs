//! Stepping a validated rule into concrete dates.
//!
//! Each rule is walked period by period (one day, week, month or year times the
//! interval). A period yields one or more slots; a slot is a candidate date that
//! counts toward `count` even when it is skipped, either because its day does not
//! exist in the target month or because it is excluded.

use std::collections::VecDeque;

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::event::RepeatType;
use crate::recurrence::rule::RecurrenceRule;

/// A candidate occurrence within one period.
#[derive(Debug, Clone, Copy)]
struct Slot {
    /// Position used for end/horizon checks; the first of the month for
    /// monthly/yearly rules so that an overflowing slot still advances
    nominal: NaiveDate,
    /// None when the anchor's day does not exist in the target month
    date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    /// The rule itself has no further occurrences
    Exhausted,
    /// Stopped at the caller-supplied horizon while the rule continues
    Horizon,
}

/// Ascending iterator over a rule's occurrences.
///
/// Cloning restarts from the clone point; `RecurrenceRule::occurrences` always
/// starts from the anchor.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    rule: &'a RecurrenceRule,
    apply_exclusions: bool,
    horizon: Option<NaiveDate>,
    period: u32,
    pending: VecDeque<Slot>,
    slots_used: u32,
    state: State,
}

impl<'a> Occurrences<'a> {
    pub(crate) fn new(rule: &'a RecurrenceRule, apply_exclusions: bool) -> Self {
        Occurrences {
            rule,
            apply_exclusions,
            horizon: None,
            period: 0,
            pending: VecDeque::new(),
            slots_used: 0,
            state: State::Running,
        }
    }

    /// Stop before the first slot that falls after `last`.
    pub fn until(mut self, last: NaiveDate) -> Self {
        self.horizon = Some(self.horizon.map_or(last, |current| current.min(last)));
        self
    }

    /// True once iteration stopped at the horizon while the rule had more to give.
    pub fn hit_horizon(&self) -> bool {
        self.state == State::Horizon
    }

    fn finish(&mut self, state: State) -> Option<NaiveDate> {
        self.state = state;
        None
    }

    fn next_slot(&mut self) -> Option<Slot> {
        loop {
            if let Some(slot) = self.pending.pop_front() {
                return Some(slot);
            }
            let slots = period_slots(self.rule, self.period)?;
            self.period = self.period.checked_add(1)?;
            self.pending.extend(slots);
        }
    }
}

impl Iterator for Occurrences<'_> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        loop {
            if self.state != State::Running {
                return None;
            }
            if self.rule.count.is_some_and(|count| self.slots_used >= count) {
                return self.finish(State::Exhausted);
            }

            let Some(slot) = self.next_slot() else {
                return self.finish(State::Exhausted);
            };

            if self.rule.end_date.is_some_and(|end| slot.nominal > end) {
                return self.finish(State::Exhausted);
            }
            if self.horizon.is_some_and(|horizon| slot.nominal > horizon) {
                return self.finish(State::Horizon);
            }

            self.slots_used += 1;

            let Some(date) = slot.date else {
                tracing::trace!(
                    anchor = %self.rule.anchor,
                    month = %slot.nominal.format("%Y-%m"),
                    "Skipping slot: day does not exist in month"
                );
                continue;
            };
            if self.rule.end_date.is_some_and(|end| date > end) {
                continue;
            }
            if self.horizon.is_some_and(|horizon| date > horizon) {
                return self.finish(State::Horizon);
            }
            if self.apply_exclusions && self.rule.exclusions.contains(&date) {
                tracing::trace!(%date, "Skipping excluded occurrence");
                continue;
            }

            return Some(date);
        }
    }
}

impl std::iter::FusedIterator for Occurrences<'_> {}

/// Slots of the `period`-th period, or None once date arithmetic runs out of range.
fn period_slots(rule: &RecurrenceRule, period: u32) -> Option<Vec<Slot>> {
    let anchor = rule.anchor;
    let steps = period.checked_mul(rule.interval.get())?;

    match rule.kind {
        RepeatType::None => (period == 0).then(|| vec![exact(anchor)]),
        RepeatType::Daily => {
            let date = anchor.checked_add_days(Days::new(u64::from(steps)))?;
            Some(vec![exact(date)])
        }
        RepeatType::Weekly => {
            // Windows are Sunday-started weeks; the first one contains the anchor
            let first_window = anchor
                .checked_sub_days(Days::new(u64::from(anchor.weekday().num_days_from_sunday())))?;
            let window = first_window.checked_add_days(Days::new(u64::from(steps) * 7))?;
            let mut slots = Vec::with_capacity(rule.days_of_week.len());
            for day in &rule.days_of_week {
                let date =
                    window.checked_add_days(Days::new(u64::from(day.num_days_from_sunday())))?;
                if date >= anchor {
                    slots.push(exact(date));
                }
            }
            Some(slots)
        }
        RepeatType::Monthly => {
            let month_start = anchor.with_day(1)?.checked_add_months(Months::new(steps))?;
            Some(vec![Slot {
                nominal: month_start,
                date: month_start.with_day(anchor.day()),
            }])
        }
        RepeatType::Yearly => {
            let year = anchor.year().checked_add(i32::try_from(steps).ok()?)?;
            let month_start = NaiveDate::from_ymd_opt(year, anchor.month(), 1)?;
            Some(vec![Slot {
                nominal: month_start,
                date: month_start.with_day(anchor.day()),
            }])
        }
    }
}

fn exact(date: NaiveDate) -> Slot {
    Slot {
        nominal: date,
        date: Some(date),
    }
}
