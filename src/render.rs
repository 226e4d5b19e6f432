//! Colored terminal rendering for recurcal types.

use owo_colors::OwoColorize;
use recurcal_core::time_validation::TimeErrors;
use recurcal_core::{Event, RepeatInfo, RepeatType};

/// Extension trait for terminal rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let day = self.date().format("%a %Y-%m-%d").to_string();
        let time = format!("{}-{}", self.form.start_time, self.form.end_time);

        let mut line = format!("{} {} {}", day.bold(), time, self.form.title);
        if !self.form.location.is_empty() {
            line.push_str(&format!(" {}", format!("@ {}", self.form.location).dimmed()));
        }
        if !self.form.category.is_empty() {
            line.push_str(&format!(" {}", format!("[{}]", self.form.category).dimmed()));
        }
        line
    }
}

impl Render for RepeatInfo {
    fn render(&self) -> String {
        let unit = match self.kind {
            RepeatType::None => return "does not repeat".dimmed().to_string(),
            RepeatType::Daily => "day",
            RepeatType::Weekly => "week",
            RepeatType::Monthly => "month",
            RepeatType::Yearly => "year",
        };

        let mut parts = vec![match self.interval {
            1 => format!("every {unit}"),
            n => format!("every {n} {unit}s"),
        }];

        if !self.days_of_week.is_empty() {
            parts.push(format!("on {}", self.days_of_week.join(", ")));
        }
        if let Some(count) = self.count {
            parts.push(format!("{count} times"));
        }
        if let Some(end_date) = &self.end_date {
            parts.push(format!("until {end_date}"));
        }

        let mut rule = parts.join(", ");
        if !self.exclude_dates.is_empty() {
            let excluded = format!("except {}", self.exclude_dates.join(", "));
            rule.push_str(&format!(" {}", excluded.yellow()));
        }
        rule
    }
}

fn render_field(label: &str, message: Option<&str>) -> String {
    match message {
        Some(message) => format!("{} {}", format!("{label}:").dimmed(), message.red()),
        None => format!("{} {}", format!("{label}:").dimmed(), "ok".green()),
    }
}

impl Render for TimeErrors {
    fn render(&self) -> String {
        [
            render_field("start", self.start_time_error),
            render_field("end", self.end_time_error),
        ]
        .join("\n")
    }
}

/// Render a list of instances, one per line, indented under a heading.
pub fn render_events(events: &[Event]) -> String {
    if events.is_empty() {
        return "   No instances".dimmed().to_string();
    }

    events
        .iter()
        .map(|event| format!("   {}", event.render()))
        .collect::<Vec<_>>()
        .join("\n")
}
