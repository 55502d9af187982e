use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    #[default]
    Once,
    Weekly,
    Monthly,
    Yearly,
}

impl Repeat {
    pub fn next(&self) -> Self {
        match self {
            Repeat::Once => Repeat::Weekly,
            Repeat::Weekly => Repeat::Monthly,
            Repeat::Monthly => Repeat::Yearly,
            Repeat::Yearly => Repeat::Once,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Repeat::Once => "Once",
            Repeat::Weekly => "Every week",
            Repeat::Monthly => "Every month",
            Repeat::Yearly => "Every year",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    Urgent,
}

impl Priority {
    pub fn next(&self) -> Self {
        match self {
            Priority::Low => Priority::Normal,
            Priority::Normal => Priority::Urgent,
            Priority::Urgent => Priority::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low priority",
            Priority::Normal => "Normal priority",
            Priority::Urgent => "High priority",
        }
    }
}

/// A persisted reminder. `datetime` is the instant the reminder is due;
/// the notification itself fires `remind_before_minutes` earlier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub datetime: DateTime<Utc>,
    #[serde(default)]
    pub repeat: Repeat,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub remind_before_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub timezone: String,
}

impl Reminder {
    pub fn notify_at(&self) -> DateTime<Utc> {
        self.datetime - Duration::minutes(i64::from(self.remind_before_minutes))
    }

    pub fn has_category(&self) -> bool {
        !self.category.is_empty()
    }

    pub fn payload(&self) -> ReminderPayload<'_> {
        ReminderPayload {
            id: &self.id,
            title: &self.title,
            datetime: self.datetime,
            repeat: self.repeat,
            priority: self.priority,
            category: &self.category,
            remind_before_minutes: self.remind_before_minutes,
            timezone: &self.timezone,
            note: self.note.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReminderPayload<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub datetime: DateTime<Utc>,
    pub repeat: Repeat,
    pub priority: Priority,
    pub category: &'a str,
    pub remind_before_minutes: u32,
    pub timezone: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'a str>,
}

pub fn sort_by_time(reminders: &mut [&Reminder]) {
    reminders.sort_by_key(|r| r.datetime);
}

#[cfg(test)]
pub(crate) fn sample(id: &str, datetime: &str, category: &str) -> Reminder {
    Reminder {
        id: id.to_string(),
        title: format!("Reminder {id}"),
        datetime: datetime.parse().expect("valid RFC 3339 instant"),
        repeat: Repeat::Once,
        priority: Priority::Normal,
        category: category.to_string(),
        remind_before_minutes: 0,
        note: None,
        timezone: "UTC".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_uses_wire_field_names() {
        let mut r = sample("42", "2025-06-03T09:30:00Z", "Work");
        r.repeat = Repeat::Weekly;
        r.priority = Priority::Urgent;
        r.remind_before_minutes = 15;
        r.note = Some("bring slides".to_string());

        let value = serde_json::to_value(r.payload()).unwrap();
        assert_eq!(value["id"], "42");
        assert_eq!(value["datetime"], "2025-06-03T09:30:00Z");
        assert_eq!(value["repeat"], "weekly");
        assert_eq!(value["priority"], "urgent");
        assert_eq!(value["category"], "Work");
        assert_eq!(value["remind_before_minutes"], 15);
        assert_eq!(value["timezone"], "UTC");
        assert_eq!(value["note"], "bring slides");
    }

    #[test]
    fn payload_omits_absent_note() {
        let r = sample("1", "2025-06-03T09:30:00Z", "");
        let value = serde_json::to_value(r.payload()).unwrap();
        assert!(value.get("note").is_none());
    }

    #[test]
    fn old_records_without_optional_fields_still_parse() {
        let json = r#"{"id":"7","title":"Call","datetime":"2025-01-02T08:00:00.000Z"}"#;
        let r: Reminder = serde_json::from_str(json).unwrap();
        assert_eq!(r.repeat, Repeat::Once);
        assert_eq!(r.priority, Priority::Normal);
        assert_eq!(r.category, "");
        assert_eq!(r.remind_before_minutes, 0);
        assert_eq!(r.note, None);
    }

    #[test]
    fn notify_at_subtracts_lead() {
        let mut r = sample("1", "2025-01-01T10:05:00Z", "");
        r.remind_before_minutes = 10;
        assert_eq!(r.notify_at().to_rfc3339(), "2025-01-01T09:55:00+00:00");
    }

    #[test]
    fn priority_parses_lowercase_and_cycles() {
        let json = r#"{"id":"7","title":"Call","datetime":"2025-01-02T08:00:00Z","priority":"low"}"#;
        let r: Reminder = serde_json::from_str(json).unwrap();
        assert_eq!(r.priority, Priority::Low);
        assert_eq!(r.priority.next(), Priority::Normal);
        assert_eq!(Priority::Urgent.next(), Priority::Low);
        assert_eq!(Priority::Urgent.label(), "High priority");
    }

    #[test]
    fn repeat_cycles_through_all_variants() {
        let mut r = Repeat::default();
        for expected in [Repeat::Weekly, Repeat::Monthly, Repeat::Yearly, Repeat::Once] {
            r = r.next();
            assert_eq!(r, expected);
        }
    }
}
