//! Configuration management module
//!
//! Layering, lowest to highest precedence: built-in defaults, `.env` in the
//! current directory, process environment, command-line flags.

pub mod env;
pub mod parser;
pub mod validation;

pub use env::EnvManager;
pub use parser::{display_config_summary, load_config, ConfigParser};
pub use validation::{validate_config, ValidationLevel, ValidationWarning};

pub use crate::models::Config;
