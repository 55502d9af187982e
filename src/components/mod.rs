pub mod month_view;
pub mod reminder_form;
pub mod reminder_list;

pub use month_view::MonthView;
pub use reminder_form::ReminderFormView;
pub use reminder_list::ReminderList;
