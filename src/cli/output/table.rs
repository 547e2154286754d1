//! Table output for task lists using comfy-table.

use chrono::{DateTime, Utc};
use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::{AccountKey, LoadingState, Task};

/// Render `tasks` as seen by `account` at `now`.
pub fn format_tasks(tasks: &[Task], account: &AccountKey, now: DateTime<Utc>) -> String {
    let use_colors = supports_color();
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Languages").add_attribute(Attribute::Bold),
        Cell::new("Status").add_attribute(Attribute::Bold),
        Cell::new("Party").add_attribute(Attribute::Bold),
        Cell::new("Deadline").add_attribute(Attribute::Bold),
    ]);

    for task in tasks {
        let status = task.display_status(now);
        let status_cell = if use_colors {
            Cell::new(&status).fg(status_color(&status))
        } else {
            Cell::new(&status)
        };

        table.add_row(vec![
            Cell::new(task.id),
            Cell::new(&task.title),
            Cell::new(format!("{} → {}", task.source_language, task.target_language)),
            status_cell,
            Cell::new(task.party_for(account)),
            Cell::new(task.submission_deadline.format("%Y-%m-%d %H:%M UTC")),
        ]);
    }

    table.to_string()
}

/// Style a loading state for terminal output.
pub fn styled_loading_state(state: LoadingState) -> String {
    let text = state.as_str();
    if !supports_color() {
        return text.to_string();
    }
    match state {
        LoadingState::Idle => console::style(text).dim().to_string(),
        LoadingState::Loading => console::style(text).yellow().to_string(),
        LoadingState::Fetched => console::style(text).green().bold().to_string(),
        LoadingState::Failed => console::style(text).red().bold().to_string(),
    }
}

fn status_color(status: &str) -> Color {
    match status {
        "created" => Color::Blue,
        "assigned" => Color::Cyan,
        "awaiting_review" => Color::Yellow,
        "dispute_created" | "incomplete" => Color::Red,
        "resolved" => Color::Green,
        _ => Color::White,
    }
}

fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    console::colors_enabled()
}
