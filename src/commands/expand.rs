use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use recurcal_core::recurrence::ExpansionBound;
use recurcal_core::series::{DraftError, create_events};

use crate::commands::print_json;
use crate::draft;
use crate::render::{Render, render_events};

pub fn run(path: &Path, bound: &ExpansionBound, json: bool) -> Result<()> {
    let form = draft::load_event(path)?.form;

    let materialized = match create_events(&form, bound) {
        Ok(materialized) => materialized,
        Err(DraftError::TimeRange(errors)) => {
            eprintln!("{}", errors.render());
            anyhow::bail!("{} has an invalid time range", path.display());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        return print_json(&materialized.events);
    }

    println!("{} {}", form.title.bold(), form.repeat_or_none().render());
    println!("{}", render_events(&materialized.events));

    if materialized.truncated {
        println!(
            "{}",
            format!(
                "   Stopped after {} instances (max_instances = {}, horizon_days = {})",
                materialized.events.len(),
                bound.max_instances,
                bound.horizon_days
            )
            .dimmed()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_draft(dir: &tempfile::TempDir, start: &str, end: &str) -> std::path::PathBuf {
        let path = dir.path().join("draft.json");
        let contents = format!(
            r#"{{
                "title": "운동",
                "date": "2025-05-01",
                "startTime": "{start}",
                "endTime": "{end}",
                "repeat": {{ "type": "daily", "interval": 1 }}
            }}"#
        );
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn expands_open_ended_draft_within_bound() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_draft(&dir, "18:00", "19:00");
        let bound = ExpansionBound {
            max_instances: 3,
            ..ExpansionBound::default()
        };

        run(&path, &bound, false).unwrap();
        run(&path, &bound, true).unwrap();
    }

    #[test]
    fn invalid_time_range_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_draft(&dir, "19:00", "18:00");

        let err = run(&path, &ExpansionBound::default(), false).unwrap_err();
        assert!(err.to_string().contains("has an invalid time range"));
    }

    #[test]
    fn invalid_rule_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.json");
        std::fs::write(
            &path,
            r#"{ "title": "t", "date": "2025-05-01", "startTime": "09:00", "endTime": "10:00",
                 "repeat": { "type": "weekly", "interval": 0 } }"#,
        )
        .unwrap();

        let err = run(&path, &ExpansionBound::default(), false).unwrap_err();
        assert!(err.to_string().contains("Invalid recurrence rule"));
    }
}
