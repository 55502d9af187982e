use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate, TimeZone};

use super::category::same_category;
use super::reminder::Reminder;
use super::time::days_in_month;

pub fn matches_filter(reminder: &Reminder, filter: &str) -> bool {
    filter.is_empty() || same_category(&reminder.category, filter)
}

fn local_date<Tz: TimeZone>(reminder: &Reminder, tz: &Tz) -> NaiveDate {
    reminder.datetime.with_timezone(tz).date_naive()
}

pub fn days_with_reminders<Tz: TimeZone>(
    reminders: &[Reminder],
    year: i32,
    month: u32,
    filter: &str,
    tz: &Tz,
) -> BTreeSet<u32> {
    reminders
        .iter()
        .filter(|r| matches_filter(r, filter))
        .map(|r| local_date(r, tz))
        .filter(|d| d.year() == year && d.month() == month)
        .map(|d| d.day())
        .collect()
}

/// Reminders due on `date` that pass `filter`, in store order.
pub fn reminders_for_day<'a, Tz: TimeZone>(
    reminders: &'a [Reminder],
    date: NaiveDate,
    filter: &str,
    tz: &Tz,
) -> Vec<&'a Reminder> {
    reminders
        .iter()
        .filter(|r| matches_filter(r, filter) && local_date(r, tz) == date)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub leading_blanks: u32,
    pub days: u32,
}

impl MonthGrid {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let sunday_based = first.weekday().num_days_from_sunday();
        Some(Self {
            year,
            month,
            leading_blanks: (sunday_based + 6) % 7,
            days: days_in_month(year, month)?,
        })
    }

    pub fn weeks(&self) -> Vec<[Option<u32>; 7]> {
        let total = self.leading_blanks + self.days;
        let rows = total.div_ceil(7);
        (0..rows)
            .map(|row| {
                std::array::from_fn(|col| {
                    let idx = row * 7 + col as u32;
                    (idx >= self.leading_blanks && idx < total).then(|| idx - self.leading_blanks + 1)
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSession {
    pub selected: NaiveDate,
    pub filter: String,
}

impl CalendarSession {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            selected: today,
            filter: String::new(),
        }
    }

    pub fn year(&self) -> i32 {
        self.selected.year()
    }

    pub fn month(&self) -> u32 {
        self.selected.month()
    }

    pub fn go_to(&mut self, date: NaiveDate) {
        self.selected = date;
    }

    pub fn next_day(&mut self) {
        self.selected = self.selected.succ_opt().unwrap_or(self.selected);
    }

    pub fn prev_day(&mut self) {
        self.selected = self.selected.pred_opt().unwrap_or(self.selected);
    }

    pub fn next_week(&mut self) {
        self.selected = self
            .selected
            .checked_add_signed(Duration::weeks(1))
            .unwrap_or(self.selected);
    }

    pub fn prev_week(&mut self) {
        self.selected = self
            .selected
            .checked_sub_signed(Duration::weeks(1))
            .unwrap_or(self.selected);
    }

    pub fn next_month(&mut self) {
        let (year, month) = match self.month() {
            12 => (self.year() + 1, 1),
            m => (self.year(), m + 1),
        };
        self.shift_month(year, month);
    }

    pub fn prev_month(&mut self) {
        let (year, month) = match self.month() {
            1 => (self.year() - 1, 12),
            m => (self.year(), m - 1),
        };
        self.shift_month(year, month);
    }

    fn shift_month(&mut self, year: i32, month: u32) {
        let Some(last) = days_in_month(year, month) else {
            return;
        };
        let day = self.selected.day().min(last);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            self.selected = date;
        }
    }

    /// Advance the filter to the next entry of `options` (which starts with
    /// `""` for all categories), wrapping around.
    pub fn cycle_filter(&mut self, options: &[String]) {
        if options.is_empty() {
            self.filter.clear();
            return;
        }
        let next = options
            .iter()
            .position(|o| same_category(o, &self.filter))
            .map_or(0, |i| (i + 1) % options.len());
        self.filter = options[next].clone();
    }
}
