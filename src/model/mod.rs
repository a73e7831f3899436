mod associate;
mod config;
mod error;
mod quarter;

pub use associate::Associate;
pub use config::Config;
pub use error::{Error, Result};
pub use quarter::{quarter_dates, DateRange, Quarter};
