use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::components::reminder_form::FormField;
use crate::config::Settings;
use crate::reminder::calendar::{days_with_reminders, matches_filter, reminders_for_day};
use crate::reminder::category::same_category;
use crate::reminder::reminder::sort_by_time;
use crate::reminder::session::Saved;
use crate::reminder::{
    CalendarSession, CategoryCatalog, FormSession, Mode, Outbox, PendingDeletes, Reminder,
    ReminderStore, SaveError, Storage, Toggle, Validator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Create,
    Calendar,
    List,
}

impl Tab {
    pub fn next(&self) -> Self {
        match self {
            Tab::Create => Tab::Calendar,
            Tab::Calendar => Tab::List,
            Tab::List => Tab::Create,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Create => "Create",
            Tab::Calendar => "Calendar",
            Tab::List => "All reminders",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Form,
    CategoryPrompt,
}

pub struct App<S: Storage> {
    pub running: bool,
    pub tab: Tab,
    pub input_mode: InputMode,
    pub today: NaiveDate,
    pub calendar: CalendarSession,
    pub session: FormSession,
    pub active_field: FormField,
    pub form_error: Option<String>,
    pub category_input: String,
    pub status_message: Option<String>,
    pub show_help: bool,
    pub marked_days: BTreeSet<u32>,
    pub visible: Vec<Reminder>,
    pub selected_index: usize,
    pub pending: PendingDeletes,
    store: ReminderStore<S>,
    catalog: CategoryCatalog<S>,
    validator: Validator,
    outbox: Outbox,
}

impl<S: Storage + Clone> App<S> {
    pub fn new(storage: S, settings: &Settings, timezone: String) -> Self {
        let now = Local::now();
        let today = now.date_naive();
        let store = ReminderStore::open(storage.clone());
        let catalog = CategoryCatalog::open(storage);
        let outbox = Outbox::new(&settings.outbox);
        info!(
            reminders = store.all().len(),
            timezone = %timezone,
            outbox = %outbox.path().display(),
            "session started"
        );

        let mut app = Self {
            running: true,
            tab: Tab::Create,
            input_mode: InputMode::Form,
            today,
            calendar: CalendarSession::new(today),
            session: FormSession::new(&now),
            active_field: FormField::Title,
            form_error: None,
            category_input: String::new(),
            status_message: None,
            show_help: false,
            marked_days: BTreeSet::new(),
            visible: Vec::new(),
            selected_index: 0,
            pending: PendingDeletes::new(settings.undo_grace),
            store,
            catalog,
            validator: Validator::new(timezone),
            outbox,
        };
        app.refresh();
        app
    }
}

impl<S: Storage> App<S> {
    pub fn reminders(&self) -> &[Reminder] {
        self.store.all()
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.session.mode(), Mode::Edit(_))
    }

    pub fn refresh(&mut self) {
        let filter = self.calendar.filter.as_str();
        let all = self.store.all();
        self.marked_days = days_with_reminders(
            all,
            self.calendar.year(),
            self.calendar.month(),
            filter,
            &Local,
        );

        let mut visible: Vec<&Reminder> = match self.tab {
            Tab::List => all.iter().filter(|r| matches_filter(r, filter)).collect(),
            _ => reminders_for_day(all, self.calendar.selected, filter, &Local),
        };
        sort_by_time(&mut visible);
        self.visible = visible.into_iter().cloned().collect();

        if self.selected_index >= self.visible.len() {
            self.selected_index = self.visible.len().saturating_sub(1);
        }
    }

    /// Collect soft deletes whose grace period ran out.
    pub fn tick(&mut self) {
        let expired = self.pending.drain_expired();
        if expired.is_empty() {
            return;
        }
        for id in &expired {
            match self.store.remove(id) {
                Ok(r) => info!(id = %r.id, "deleted reminder"),
                Err(err) => tracing::warn!("expired delete: {}", err),
            }
            if self.session.editing_id() == Some(id.as_str()) {
                self.session.cancel_edit(&Local::now());
            }
        }
        self.status_message = Some(match expired.len() {
            1 => "Reminder deleted".to_string(),
            n => format!("{} reminders deleted", n),
        });
        self.refresh();
    }

    // ── Tabs ──

    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        if tab == Tab::Create {
            let now = Local::now();
            self.session.enter_form(&now);
            self.input_mode = InputMode::Form;
            if !self.is_editing() {
                self.active_field = FormField::Title;
                self.form_error = None;
            }
        } else {
            self.input_mode = InputMode::Normal;
            self.selected_index = 0;
        }
        self.refresh();
    }

    pub fn next_tab(&mut self) {
        self.switch_tab(self.tab.next());
    }

    pub fn quit(&mut self) {
        self.pending.cancel_all();
        self.running = false;
    }

    // ── Calendar navigation ──

    fn on_date_changed(&mut self) {
        self.selected_index = 0;
        self.refresh();
    }

    pub fn next_day(&mut self) {
        self.calendar.next_day();
        self.on_date_changed();
    }

    pub fn prev_day(&mut self) {
        self.calendar.prev_day();
        self.on_date_changed();
    }

    pub fn next_week(&mut self) {
        self.calendar.next_week();
        self.on_date_changed();
    }

    pub fn prev_week(&mut self) {
        self.calendar.prev_week();
        self.on_date_changed();
    }

    pub fn next_month(&mut self) {
        self.calendar.next_month();
        self.on_date_changed();
    }

    pub fn prev_month(&mut self) {
        self.calendar.prev_month();
        self.on_date_changed();
    }

    pub fn go_to_today(&mut self) {
        self.today = Local::now().date_naive();
        self.calendar.go_to(self.today);
        self.on_date_changed();
    }

    pub fn cycle_filter(&mut self) {
        let options = self.catalog.options();
        self.calendar.cycle_filter(&options);
        self.status_message = Some(match self.calendar.filter.as_str() {
            "" => "Showing all categories".to_string(),
            f => format!("Showing {}", f),
        });
        self.on_date_changed();
    }

    pub fn select_next(&mut self) {
        if self.selected_index + 1 < self.visible.len() {
            self.selected_index += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    fn selected(&self) -> Option<&Reminder> {
        self.visible.get(self.selected_index)
    }

    // ── Edit / delete ──

    pub fn edit_selected(&mut self) {
        let Some(reminder) = self.selected().cloned() else {
            return;
        };
        if self.pending.is_pending(&reminder.id) {
            self.status_message = Some("Undo the delete before editing".to_string());
            return;
        }
        self.session.start_edit(&reminder, &Local);
        self.active_field = FormField::Title;
        self.form_error = None;
        self.switch_tab(Tab::Create);
    }

    pub fn toggle_delete_selected(&mut self) {
        let Some(id) = self.selected().map(|r| r.id.clone()) else {
            return;
        };
        self.status_message = Some(match self.pending.toggle(&id) {
            Toggle::Pending => format!(
                "Deleting in {}s, press d again to undo",
                self.pending.grace().as_secs()
            ),
            Toggle::Restored => "Delete undone".to_string(),
        });
    }

    // ── Form ──

    pub fn form_next_field(&mut self) {
        self.active_field = self.active_field.next();
    }

    pub fn form_prev_field(&mut self) {
        self.active_field = self.active_field.prev();
    }

    pub fn form_input_char(&mut self, c: char) {
        if c == '+' && self.active_field == FormField::Category {
            self.category_input.clear();
            self.input_mode = InputMode::CategoryPrompt;
            return;
        }
        self.active_field.push(&mut self.session.form, c);
        self.form_error = None;
    }

    pub fn form_backspace(&mut self) {
        self.active_field.pop(&mut self.session.form);
        self.form_error = None;
    }

    /// Space on a chip field cycles its value; elsewhere it is text.
    pub fn form_space(&mut self) {
        let form = &mut self.session.form;
        match self.active_field {
            FormField::Repeat => form.repeat = form.repeat.next(),
            FormField::Priority => form.priority = form.priority.next(),
            FormField::Lead => form.lead = form.lead.next(),
            FormField::Category => {
                let options = self.catalog.options();
                let idx = options
                    .iter()
                    .position(|o| same_category(o, &form.category))
                    .map_or(0, |i| (i + 1) % options.len());
                form.category = options[idx].clone();
            }
            _ => self.active_field.push(form, ' '),
        }
        self.form_error = None;
    }

    pub fn submit_form(&mut self) {
        let now = Local::now();
        match self
            .session
            .save(&mut self.store, &mut self.validator, &now)
        {
            Ok(saved) => {
                self.outbox.submit(saved.reminder());
                let date = saved.reminder().datetime.with_timezone(&Local).date_naive();
                self.status_message = Some(match saved {
                    Saved::Created(_) => "Reminder saved".to_string(),
                    Saved::Updated(_) => "Reminder updated".to_string(),
                });
                self.form_error = None;
                self.calendar.go_to(date);
                self.switch_tab(Tab::Calendar);
            }
            Err(SaveError::Missing(id)) => {
                self.status_message = Some(format!("Reminder {} no longer exists", id));
                self.switch_tab(Tab::Calendar);
            }
            Err(err) => {
                self.form_error = Some(err.to_string());
            }
        }
    }

    /// Esc in the form: drop an edit, or leave a new draft for the calendar.
    pub fn cancel_form(&mut self) {
        if self.is_editing() {
            let now = Local::now();
            self.session.cancel_edit(&now);
            self.status_message = Some("Edit cancelled".to_string());
        }
        self.form_error = None;
        self.switch_tab(Tab::Calendar);
    }

    // ── Category prompt ──

    pub fn prompt_input_char(&mut self, c: char) {
        self.category_input.push(c);
    }

    pub fn prompt_backspace(&mut self) {
        self.category_input.pop();
    }

    pub fn prompt_cancel(&mut self) {
        self.category_input.clear();
        self.input_mode = InputMode::Form;
    }

    pub fn prompt_submit(&mut self) {
        if let Some(name) = self.catalog.add(&self.category_input) {
            self.session.form.category = name;
        }
        self.category_input.clear();
        self.input_mode = InputMode::Form;
    }
}
