pub mod blueprint;
pub mod checkin;
pub mod config;
pub mod dates;
pub mod error;
pub mod io;
pub mod profile;
pub mod pulse;
pub mod store;
pub mod streak;

pub use error::{LodestarError, Result};
