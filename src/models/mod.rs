pub mod chat;
pub mod submission;
