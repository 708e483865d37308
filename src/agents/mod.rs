pub mod chat;

pub use chat::ChatAssistant;
