#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::return_self_not_must_use)]

pub mod config;
pub mod error;
pub mod version;

pub use config::{validate_separator, Config, CONFIG_FILE_NAME};
pub use error::{Error, Result};
pub use version::VERSION;
