//! Per-user configuration for Signstar signing tools.
//!
//! Provides the [`UserConfig`], whose settings influence the defaults of command line options,
//! and [`LoadOnce`], which ensures the configuration file is read at most once per process.
//!
//! # Examples
//!
//! ```
//! use std::fs::write;
//!
//! use signstar_user_config::{FileLoader, LoadOnce, UserConfigLocation};
//!
//! # fn main() -> testresult::TestResult {
//! let path = testdir::testdir!().join("config.toml");
//! write(&path, "signatureFormat = \"cose\"\n")?;
//!
//! let config = LoadOnce::new(FileLoader::new(UserConfigLocation::Path(path)));
//! assert_eq!(config.get()?.signature_format(), "cose");
//! # Ok(())
//! # }
//! ```
mod config;
mod error;
mod load;

pub use config::{
    APP_NAME,
    CONFIG_ENV_VAR,
    CONFIG_NAME,
    UserConfig,
    UserConfigLocation,
    get_default_config_file_path,
};
pub use error::Error;
pub use load::{ConfigLoader, FileLoader, LoadOnce, user_config};
