//! Command-line argument parsing and handling.

pub mod ago;
pub mod check;
pub mod definition;
pub mod languages;
pub mod translate;
pub mod utils;

// Re-export commonly used items
pub use definition::{Args, Command, run};
pub use utils::determine_log_level;
