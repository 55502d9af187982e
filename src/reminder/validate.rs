use chrono::{DateTime, Duration, TimeZone, Utc};
use thiserror::Error;

use super::reminder::{Priority, Reminder, Repeat};
use super::time::{self, DATE_FORMAT, TIME_FORMAT};

pub const LEAD_PRESETS: [u32; 5] = [0, 5, 15, 30, 60];

pub const DEFAULT_TITLE: &str = "Reminder";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Please choose a valid date and time.")]
    InvalidDatetime,
    #[error("Time must be in the future.")]
    PastDatetime,
    #[error("Enter custom minutes.")]
    InvalidLead,
    #[error("Lead time is too early.")]
    LeadTooEarly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadChoice {
    Preset(u32),
    Custom(String),
}

impl Default for LeadChoice {
    fn default() -> Self {
        LeadChoice::Preset(0)
    }
}

impl LeadChoice {
    pub fn from_minutes(minutes: u32) -> Self {
        if LEAD_PRESETS.contains(&minutes) {
            LeadChoice::Preset(minutes)
        } else {
            LeadChoice::Custom(minutes.to_string())
        }
    }

    pub fn next(&self) -> Self {
        match self {
            LeadChoice::Preset(m) => match LEAD_PRESETS.iter().position(|p| p == m) {
                Some(i) if i + 1 < LEAD_PRESETS.len() => LeadChoice::Preset(LEAD_PRESETS[i + 1]),
                _ => LeadChoice::Custom(String::new()),
            },
            LeadChoice::Custom(_) => LeadChoice::Preset(LEAD_PRESETS[0]),
        }
    }

    pub fn minutes(&self) -> Result<u32, Rejection> {
        match self {
            LeadChoice::Preset(m) => Ok(*m),
            LeadChoice::Custom(raw) => match raw.trim().parse::<u32>() {
                Ok(m) if m > 0 => Ok(m),
                _ => Err(Rejection::InvalidLead),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReminderForm {
    pub title: String,
    pub date: String,
    pub time: String,
    pub repeat: Repeat,
    pub priority: Priority,
    pub lead: LeadChoice,
    pub category: String,
    pub note: String,
}

impl ReminderForm {
    pub fn with_defaults<Tz: TimeZone>(now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let at = time::default_instant(now);
        Self {
            date: at.format(DATE_FORMAT).to_string(),
            time: at.format(TIME_FORMAT).to_string(),
            ..Self::default()
        }
    }

    pub fn from_reminder<Tz: TimeZone>(reminder: &Reminder, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let local = reminder.datetime.with_timezone(tz);
        Self {
            title: reminder.title.clone(),
            date: local.format(DATE_FORMAT).to_string(),
            time: local.format(TIME_FORMAT).to_string(),
            repeat: reminder.repeat,
            priority: reminder.priority,
            lead: LeadChoice::from_minutes(reminder.remind_before_minutes),
            category: reminder.category.clone(),
            note: reminder.note.clone().unwrap_or_default(),
        }
    }

    pub fn effective_title(&self) -> &str {
        match self.title.trim() {
            "" => DEFAULT_TITLE,
            t => t,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Validator {
    timezone: String,
    last_id: i64,
}

impl Validator {
    pub fn new(timezone: impl Into<String>) -> Self {
        Self {
            timezone: timezone.into(),
            last_id: 0,
        }
    }

    pub fn validate<Tz: TimeZone>(
        &mut self,
        form: &ReminderForm,
        now: &DateTime<Tz>,
        editing_id: Option<&str>,
    ) -> Result<Reminder, Rejection> {
        let title = form.effective_title().to_string();

        let at = time::compose_instant(&now.timezone(), &form.date, &form.time)
            .ok_or(Rejection::InvalidDatetime)?
            .with_timezone(&Utc);
        let now = now.with_timezone(&Utc);
        if at <= now {
            return Err(Rejection::PastDatetime);
        }

        let lead = form.lead.minutes()?;
        if at - Duration::minutes(i64::from(lead)) <= now {
            return Err(Rejection::LeadTooEarly);
        }

        let id = match editing_id {
            Some(id) => id.to_string(),
            None => self.next_id(&now),
        };
        let note = match form.note.trim() {
            "" => None,
            n => Some(n.to_string()),
        };

        Ok(Reminder {
            id,
            title,
            datetime: at,
            repeat: form.repeat,
            priority: form.priority,
            category: form.category.trim().to_string(),
            remind_before_minutes: lead,
            note,
            timezone: self.timezone.clone(),
        })
    }

    fn next_id(&mut self, now: &DateTime<Utc>) -> String {
        self.last_id = now.timestamp_millis().max(self.last_id + 1);
        self.last_id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2025-01-01T10:00:00Z".parse().unwrap()
    }

    fn form(date: &str, time: &str, lead: LeadChoice) -> ReminderForm {
        ReminderForm {
            title: "Stand-up".to_string(),
            date: date.to_string(),
            time: time.to_string(),
            lead,
            ..ReminderForm::default()
        }
    }

    #[test]
    fn valid_form_is_mirrored_into_reminder() {
        let mut v = Validator::new("Europe/Berlin");
        let f = ReminderForm {
            title: "  Dentist ".to_string(),
            date: "2025-01-02".to_string(),
            time: "08:30".to_string(),
            repeat: Repeat::Monthly,
            priority: Priority::Urgent,
            lead: LeadChoice::Preset(30),
            category: "Health".to_string(),
            note: "bring card".to_string(),
        };
        let r = v.validate(&f, &now(), None).unwrap();
        assert_eq!(r.title, "Dentist");
        assert_eq!(r.datetime, "2025-01-02T08:30:00Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(r.repeat, Repeat::Monthly);
        assert_eq!(r.priority, Priority::Urgent);
        assert_eq!(r.remind_before_minutes, 30);
        assert_eq!(r.category, "Health");
        assert_eq!(r.note.as_deref(), Some("bring card"));
        assert_eq!(r.timezone, "Europe/Berlin");
        assert_eq!(r.id, now().timestamp_millis().to_string());
    }

    #[test]
    fn blank_title_defaults() {
        let mut v = Validator::new("UTC");
        let mut f = form("2025-01-02", "08:30", LeadChoice::default());
        f.title = "   ".to_string();
        assert_eq!(v.validate(&f, &now(), None).unwrap().title, DEFAULT_TITLE);
    }

    #[test]
    fn unparsable_datetime_is_rejected_first() {
        let mut v = Validator::new("UTC");
        let f = form("not-a-date", "10:00", LeadChoice::Custom("x".into()));
        assert_eq!(v.validate(&f, &now(), None), Err(Rejection::InvalidDatetime));
        let f = form("2025-01-02", "", LeadChoice::default());
        assert_eq!(v.validate(&f, &now(), None), Err(Rejection::InvalidDatetime));
    }

    #[test]
    fn past_datetime_wins_over_bad_lead() {
        let mut v = Validator::new("UTC");
        for time in ["10:00", "09:59"] {
            let f = form("2025-01-01", time, LeadChoice::Custom("abc".into()));
            assert_eq!(v.validate(&f, &now(), None), Err(Rejection::PastDatetime));
        }
    }

    #[test]
    fn custom_lead_must_be_positive_number() {
        let mut v = Validator::new("UTC");
        for raw in ["", "0", "-5", "ten"] {
            let f = form("2025-01-02", "10:00", LeadChoice::Custom(raw.into()));
            assert_eq!(v.validate(&f, &now(), None), Err(Rejection::InvalidLead), "{raw:?}");
        }
        let f = form("2025-01-02", "10:00", LeadChoice::Custom(" 90 ".into()));
        assert_eq!(v.validate(&f, &now(), None).unwrap().remind_before_minutes, 90);
    }

    #[test]
    fn lead_reaching_into_the_past_is_too_early() {
        let mut v = Validator::new("UTC");
        let f = form("2025-01-01", "10:05", LeadChoice::Custom("10".into()));
        assert_eq!(v.validate(&f, &now(), None), Err(Rejection::LeadTooEarly));
        // Exactly now is not in the future either.
        let f = form("2025-01-01", "10:05", LeadChoice::Preset(5));
        assert_eq!(v.validate(&f, &now(), None), Err(Rejection::LeadTooEarly));
        let f = form("2025-01-01", "10:06", LeadChoice::Preset(5));
        assert!(v.validate(&f, &now(), None).is_ok());
    }

    #[test]
    fn editing_keeps_the_given_id() {
        let mut v = Validator::new("UTC");
        let f = form("2025-01-02", "10:00", LeadChoice::default());
        assert_eq!(v.validate(&f, &now(), Some("42")).unwrap().id, "42");
    }

    #[test]
    fn ids_increase_within_the_same_millisecond() {
        let mut v = Validator::new("UTC");
        let f = form("2025-01-02", "10:00", LeadChoice::default());
        let a = v.validate(&f, &now(), None).unwrap().id;
        let b = v.validate(&f, &now(), None).unwrap().id;
        assert!(b.parse::<i64>().unwrap() > a.parse::<i64>().unwrap());
    }

    #[test]
    fn lead_chips_cycle_through_custom() {
        let mut lead = LeadChoice::default();
        let mut seen = vec![lead.clone()];
        for _ in 0..LEAD_PRESETS.len() {
            lead = lead.next();
            seen.push(lead.clone());
        }
        assert_eq!(seen.last(), Some(&LeadChoice::Custom(String::new())));
        assert_eq!(lead.next(), LeadChoice::Preset(0));
        assert_eq!(LeadChoice::from_minutes(45), LeadChoice::Custom("45".into()));
        assert_eq!(LeadChoice::from_minutes(15), LeadChoice::Preset(15));
    }

    #[test]
    fn form_round_trips_through_reminder() {
        let mut v = Validator::new("UTC");
        let mut f = form("2025-01-03", "18:45", LeadChoice::Custom("45".into()));
        f.category = "Work".into();
        f.priority = Priority::Low;
        let r = v.validate(&f, &now(), None).unwrap();
        assert_eq!(ReminderForm::from_reminder(&r, &Utc), f);
    }

    #[test]
    fn defaults_are_ten_minutes_ahead() {
        let f = ReminderForm::with_defaults(&"2025-01-01T23:55:10Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(f.date, "2025-01-02");
        assert_eq!(f.time, "00:05");
        assert_eq!(f.lead, LeadChoice::Preset(0));
        assert_eq!(f.repeat, Repeat::Once);
        assert_eq!(f.priority, Priority::Normal);
    }
}
