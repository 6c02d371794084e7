pub mod chat;
pub mod types;

pub use chat::{ChatMessage, ChatRole};
pub use types::{SubmissionStatus, UnknownCategory, UnknownStatus, WasteCategory};
