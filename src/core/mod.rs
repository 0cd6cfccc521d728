pub mod astronomy;
pub mod calendar;
pub mod config;
pub mod error;
pub mod types;

pub use calendar::Calendar;
pub use config::SunlightConfig;
pub use error::{Result, UmbraError};
