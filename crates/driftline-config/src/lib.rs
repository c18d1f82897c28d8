//! Configuration for driftline.
//!
//! Settings come from three places, lowest priority first: built-in
//! defaults, the TOML config file, and string attributes supplied by the
//! host (command line flags in the terminal app).

mod attributes;
mod error;
mod file;

pub use attributes::Attributes;
pub use error::ConfigError;
pub use file::{CONFIG_FILE_NAME, Config};
