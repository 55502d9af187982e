pub mod calendar;
pub mod category;
pub mod outbox;
pub mod preview;
pub mod reminder;
pub mod session;
pub mod soft_delete;
pub mod store;
pub mod time;
pub mod validate;

pub use calendar::{CalendarSession, MonthGrid};
pub use category::CategoryCatalog;
pub use outbox::Outbox;
pub use reminder::Reminder;
pub use session::{FormSession, Mode, SaveError};
pub use soft_delete::{PendingDeletes, Toggle};
pub use store::{FileStorage, ReminderStore, Storage};
pub use validate::Validator;
