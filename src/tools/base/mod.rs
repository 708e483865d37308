pub mod pub_sub;

pub use pub_sub::{ListenerId, ScrollEvents};
