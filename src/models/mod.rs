mod content;
mod summary;
mod user;

pub use content::{ContentRecord, NewContent};
pub use summary::{NewSummaryRecord, SummaryRecord};
pub use user::User;
