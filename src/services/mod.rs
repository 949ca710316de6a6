pub mod conversation_store;
pub mod extraction;
pub mod prompt_builder;
pub mod submission_store;
