use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use recurcal_core::recurrence::ExpansionBound;
use recurcal_core::series::DraftError;
use serde_json::json;

use crate::commands::print_json;
use crate::draft;
use crate::render::{Render, render_events};

pub fn run(
    path: &Path,
    date: NaiveDate,
    edit: Option<&Path>,
    bound: &ExpansionBound,
    json: bool,
) -> Result<()> {
    let series = draft::load_series(path)?;

    let (narrowed, detached) = match edit {
        None => (series.delete_instance(date)?, None),
        Some(edit_path) => {
            let edited = draft::load_event(edit_path)?;
            match series.edit_instance(date, edited) {
                Ok((narrowed, event)) => (narrowed, Some(event)),
                Err(DraftError::TimeRange(errors)) => {
                    eprintln!("{}", errors.render());
                    anyhow::bail!("{} has an invalid time range", edit_path.display());
                }
                Err(DraftError::Rule(e)) => return Err(e.into()),
            }
        }
    };

    if json {
        return print_json(&json!({
            "series": narrowed.anchor(),
            "detached": detached,
        }));
    }

    let verb = if detached.is_some() { "Edited" } else { "Deleted" };
    println!("{}", format!("{verb} {date} only").green());
    println!(
        "{} {}",
        narrowed.anchor().title.bold(),
        narrowed.rule().render()
    );
    println!("{}", render_events(&narrowed.instances(bound)?));

    if let Some(event) = detached {
        println!();
        println!("{}", "Standalone event:".dimmed());
        println!("   {}", event.render());
    }

    Ok(())
}
