pub mod chat;
pub mod contact;
pub mod summarize;
pub mod waitlist;
