pub mod command;
pub mod interface;
pub mod report;

pub use command::Command;
pub use interface::CliInterface;
