pub mod base;
pub mod chrome;
pub mod page;
