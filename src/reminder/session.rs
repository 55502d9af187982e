use chrono::{DateTime, TimeZone};
use thiserror::Error;
use tracing::info;

use super::reminder::Reminder;
use super::store::{ReminderStore, Storage, StoreError};
use super::validate::{Rejection, ReminderForm, Validator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Create,
    Edit(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Reminder {0} no longer exists")]
    Missing(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Saved {
    Created(Reminder),
    Updated(Reminder),
}

impl Saved {
    pub fn reminder(&self) -> &Reminder {
        match self {
            Saved::Created(r) | Saved::Updated(r) => r,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormSession {
    mode: Mode,
    pub form: ReminderForm,
}

impl FormSession {
    pub fn new<Tz: TimeZone>(now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            mode: Mode::Create,
            form: ReminderForm::with_defaults(now),
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn editing_id(&self) -> Option<&str> {
        match &self.mode {
            Mode::Edit(id) => Some(id),
            Mode::Create => None,
        }
    }

    pub fn start_edit<Tz: TimeZone>(&mut self, reminder: &Reminder, tz: &Tz)
    where
        Tz::Offset: std::fmt::Display,
    {
        self.mode = Mode::Edit(reminder.id.clone());
        self.form = ReminderForm::from_reminder(reminder, tz);
    }

    pub fn cancel_edit<Tz: TimeZone>(&mut self, now: &DateTime<Tz>)
    where
        Tz::Offset: std::fmt::Display,
    {
        self.reset(now);
    }

    /// Called when the form becomes visible. A create form starts over;
    /// an edit keeps what was loaded.
    pub fn enter_form<Tz: TimeZone>(&mut self, now: &DateTime<Tz>)
    where
        Tz::Offset: std::fmt::Display,
    {
        if self.mode == Mode::Create {
            self.form = ReminderForm::with_defaults(now);
        }
    }

    pub fn save<S: Storage, Tz: TimeZone>(
        &mut self,
        store: &mut ReminderStore<S>,
        validator: &mut Validator,
        now: &DateTime<Tz>,
    ) -> Result<Saved, SaveError>
    where
        Tz::Offset: std::fmt::Display,
    {
        let reminder = validator.validate(&self.form, now, self.editing_id())?;

        let saved = match self.mode.clone() {
            Mode::Create => {
                store.add(reminder.clone())?;
                info!(id = %reminder.id, notify_at = %reminder.notify_at(), "created reminder");
                Saved::Created(reminder)
            }
            Mode::Edit(id) => match store.update(&id, reminder.clone()) {
                Ok(()) => {
                    info!(id = %id, notify_at = %reminder.notify_at(), "updated reminder");
                    Saved::Updated(reminder)
                }
                Err(StoreError::NotFound(_)) => {
                    self.reset(now);
                    return Err(SaveError::Missing(id));
                }
                Err(err) => return Err(err.into()),
            },
        };

        self.reset(now);
        Ok(saved)
    }

    fn reset<Tz: TimeZone>(&mut self, now: &DateTime<Tz>)
    where
        Tz::Offset: std::fmt::Display,
    {
        self.mode = Mode::Create;
        self.form = ReminderForm::with_defaults(now);
    }
}
