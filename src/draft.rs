//! Reading event drafts from disk.
//!
//! A draft is an event form, optionally with an `id`, stored as JSON (the shape
//! the calendar form submits) or TOML. In TOML, dates are written as strings.

use std::path::Path;

use anyhow::{Context, Result};
use recurcal_core::Event;
use recurcal_core::series::Series;

/// Read a draft or a persisted event.
pub fn load_event(path: &Path) -> Result<Event> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read draft {}", path.display()))?;

    let event = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&contents)
            .with_context(|| format!("Invalid JSON draft {}", path.display()))?,
        Some("toml") => toml::from_str(&contents)
            .with_context(|| format!("Invalid TOML draft {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported draft format: {} (expected .json or .toml)",
            path.display()
        ),
    };

    tracing::debug!(path = %path.display(), "Loaded draft");
    Ok(event)
}

/// Read a recurring series from its anchor draft or from any generated instance.
pub fn load_series(path: &Path) -> Result<Series> {
    let event = load_event(path)?;

    let generated = event
        .form
        .repeat
        .as_ref()
        .is_some_and(|repeat| repeat.anchor_date.is_some());

    let series = if generated {
        Series::from_instance(&event)
    } else {
        Series::new(event.form)
    };

    series.with_context(|| format!("{} is not a recurring draft", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use recurcal_core::recurrence::ExpansionBound;
    use recurcal_core::RepeatType;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    const WEEKLY_JSON: &str = r#"{
        "title": "123123",
        "date": "2025-05-01",
        "startTime": "03:47",
        "endTime": "15:47",
        "repeat": { "type": "weekly", "interval": 1, "count": 4 }
    }"#;

    #[test]
    fn loads_json_draft() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "draft.json", WEEKLY_JSON);

        let event = load_event(&path).unwrap();
        assert!(event.id.is_none());
        assert_eq!(event.form.title, "123123");
        assert_eq!(event.date(), NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
        assert_eq!(event.form.repeat.unwrap().kind, RepeatType::Weekly);
    }

    #[test]
    fn loads_toml_draft() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "draft.toml",
            r#"
id = "standup-1"
title = "standup"
date = "2025-01-31"
startTime = "09:00"
endTime = "09:15"

[repeat]
type = "monthly"
count = 3
"#,
        );

        let event = load_event(&path).unwrap();
        assert_eq!(event.id.as_deref(), Some("standup-1"));

        let repeat = event.form.repeat.unwrap();
        assert_eq!(repeat.kind, RepeatType::Monthly);
        assert_eq!(repeat.interval, 1);
        assert_eq!(repeat.count, Some(3));
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "draft.yaml", "title: x");

        let err = load_event(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported draft format"));
    }

    #[test]
    fn reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_event(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read draft"));
    }

    #[test]
    fn series_from_anchor_and_from_instance_agree() {
        let dir = tempfile::tempdir().unwrap();
        let anchor_path = write(&dir, "draft.json", WEEKLY_JSON);
        let series = load_series(&anchor_path).unwrap();

        let instances = series.instances(&ExpansionBound::default()).unwrap();
        let instance_path = write(
            &dir,
            "instance.json",
            &serde_json::to_string(&instances[3]).unwrap(),
        );

        assert_eq!(load_series(&instance_path).unwrap(), series);
    }

    #[test]
    fn non_recurring_draft_is_not_a_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            "single.json",
            r#"{ "title": "t", "date": "2025-05-01", "startTime": "09:00", "endTime": "10:00" }"#,
        );

        let err = load_series(&path).unwrap_err();
        assert!(err.to_string().contains("is not a recurring draft"));
    }
}
