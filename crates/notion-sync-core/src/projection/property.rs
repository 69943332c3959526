use super::rich_text;
use crate::config::TaskLineConfig;
use crate::model::{DateRange, Page, PropertyValue, SelectOption, User};

/// Project one property value into the value half of a header line.
///
/// Only people and multi-select values span lines; line breaks inside any
/// remote text become spaces.
pub fn project(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Title(runs) => single_line(&rich_text::project(runs)),
        PropertyValue::Checkbox(checked) => checked.to_string(),
        PropertyValue::CreatedTime(time) => single_line(time),
        PropertyValue::Date(date) => date
            .as_ref()
            .map(|date| single_line(&project_date(date)))
            .unwrap_or_default(),
        PropertyValue::People(users) => project_people(users),
        PropertyValue::Select(option) => option
            .as_ref()
            .map(|option| single_line(&option.name))
            .unwrap_or_default(),
        PropertyValue::MultiSelect(options) => project_multi_select(options),
        PropertyValue::Unsupported { .. } => String::new(),
    }
}

/// `start -- end tz`; the end only shows when both ends are known.
pub fn project_date(date: &DateRange) -> String {
    let mut out = date.start.clone().unwrap_or_default();
    if let (Some(_), Some(end)) = (&date.start, &date.end) {
        out.push_str(" -- ");
        out.push_str(end);
    }
    if let Some(time_zone) = &date.time_zone {
        out.push(' ');
        out.push_str(time_zone);
    }
    out
}

/// Indented block list of wiki links, one per user.
/// Partial users, whose name is unknown, leave an empty line.
pub fn project_people(users: &[User]) -> String {
    users
        .iter()
        .map(|user| match &user.name {
            Some(name) => format!("\n  - [[{}]]", single_line(name)),
            None => "\n  ".to_string(),
        })
        .collect()
}

/// Indented block list of option labels.
pub fn project_multi_select(options: &[SelectOption]) -> String {
    options
        .iter()
        .map(|option| format!("\n  - {}", single_line(&option.name)))
        .collect()
}

/// Task list line for entries of to-do style databases.
///
/// Only produced when the entry has a checkbox property named after
/// `config.complete_property`.
pub fn task_line(page: &Page, config: &TaskLineConfig) -> Option<String> {
    if !config.enabled {
        return None;
    }

    let complete = match page.property(&config.complete_property) {
        Some(PropertyValue::Checkbox(checked)) => *checked,
        _ => return None,
    };

    let title = page
        .title()
        .map(|runs| single_line(&rich_text::project(runs)))
        .unwrap_or_default();
    let mut line = format!("\n- [{}] {}", if complete { "x" } else { " " }, title);

    if let Some(PropertyValue::Select(Some(priority))) = page.property(&config.priority_property) {
        line.push(' ');
        line.push_str(&single_line(&priority.name));
    }

    let due = page
        .property(&config.due_date_property)
        .map(project)
        .unwrap_or_default();
    if !due.is_empty() {
        line.push_str(" 📅 ");
        line.push_str(&due);
    }

    line.push('\n');
    Some(line)
}

fn single_line(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(" ")
}
