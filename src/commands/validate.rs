use anyhow::Result;
use recurcal_core::time_validation::get_time_error_message;

use crate::commands::print_json;
use crate::render::Render;

pub fn run(start: &str, end: &str, json: bool) -> Result<()> {
    let errors = get_time_error_message(start, end);
    tracing::debug!(start, end, valid = errors.is_valid(), "Validated time range");

    if json {
        return print_json(&errors);
    }

    println!("{}", errors.render());
    Ok(())
}
