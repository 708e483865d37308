pub mod assistant;
pub mod prompt;

pub use assistant::ChatAssistant;
