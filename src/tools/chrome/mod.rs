pub mod chrome_ctrl;
pub mod config;
pub mod types;

pub use chrome_ctrl::ChromePage;
pub use config::BrowserConfig;
pub use types::PageSnapshot;
