use chrono::{DateTime, TimeZone};

use super::time::{compose_instant, format_relative};
use super::validate::{LeadChoice, ReminderForm};

pub fn lead_label(minutes: u32) -> String {
    match minutes {
        0 => "At exact time".to_string(),
        60 => "1 hour before".to_string(),
        m => format!("{} min before", m),
    }
}

fn form_lead_label(lead: &LeadChoice) -> String {
    match lead.minutes() {
        Ok(m) => lead_label(m),
        Err(_) => "Custom time".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub headline: String,
    pub meta: String,
    pub category: String,
}

pub fn preview<Tz: TimeZone>(form: &ReminderForm, now: &DateTime<Tz>) -> Preview
where
    Tz::Offset: std::fmt::Display,
{
    let when = compose_instant(&now.timezone(), &form.date, &form.time)
        .map(|at| format_relative(&at, now))
        .unwrap_or_else(|| "not set".to_string());

    let category = match form.category.trim() {
        "" => "None".to_string(),
        c => c.to_string(),
    };

    Preview {
        headline: format!("I'll remind you: {}", form.effective_title()),
        meta: format!(
            "{} · {} · {} · {}",
            when,
            form.repeat.label(),
            form_lead_label(&form.lead),
            form.priority.label()
        ),
        category,
    }
}
