//! Command line flags shared by Signstar signing tools.
//!
//! Signing tools expose the same set of flags across many subcommands (e.g. the signing key or
//! the signature format).
//! This crate provides
//! - a registry of [`FlagDescriptor`]s, which is the single source for the name, shorthand and
//!   help text of each flag,
//! - functions to bind the flags to a [`clap::Command`] and typed slots to read their values,
//! - and the evaluation of `--plugin-config` pairs ([`parse_plugin_config`]).
//!
//! The default of `--signature-format` is derived from the user's configuration
//! (see [`signstar_user_config`]), which is read at most once per process.
//!
//! # Examples
//!
//! ```
//! use clap::Command;
//! use signstar_flags::{
//!     KEY,
//!     SIGNATURE_FORMAT,
//!     StringSlot,
//!     bind_key,
//!     bind_plugin_config,
//!     bind_signature_format_with,
//!     get_plugin_config,
//! };
//! use signstar_user_config::{LoadOnce, UserConfig};
//!
//! # fn main() -> testresult::TestResult {
//! let config = LoadOnce::new(|| Ok(UserConfig::default()));
//! let command = bind_plugin_config(bind_signature_format_with(
//!     bind_key(Command::new("sign")),
//!     &config,
//! ));
//! let matches =
//!     command.try_get_matches_from(["sign", "-k", "release", "-c", "region=eu", "-c", "tier=2"])?;
//!
//! assert_eq!(StringSlot::new(&KEY).get(&matches), "release");
//! assert_eq!(StringSlot::new(&SIGNATURE_FORMAT).get(&matches), "jws");
//! let plugin_config = get_plugin_config(&matches)?;
//! assert_eq!(plugin_config.get("region").map(String::as_str), Some("eu"));
//! assert_eq!(plugin_config.get("tier").map(String::as_str), Some("2"));
//! # Ok(())
//! # }
//! ```
pub mod bind;
mod descriptor;
mod duration;
mod error;
mod plugin_config;

pub use bind::{
    DEFAULT_SIGNATURE_FORMAT,
    DurationSlot,
    StringListSlot,
    StringSlot,
    bind_duration,
    bind_expiry,
    bind_key,
    bind_plugin_config,
    bind_reference,
    bind_signature_format,
    bind_signature_format_with,
    bind_string,
    bind_string_list,
    bind_timestamp,
    resolve_signature_format,
};
pub use descriptor::{
    EXPIRY,
    FlagDescriptor,
    KEY,
    PLUGIN_CONFIG,
    REFERENCE,
    REGISTRY,
    RegistryError,
    SIGNATURE_FORMAT,
    TIMESTAMP,
    validate_registry,
};
pub use duration::{DurationError, parse_duration};
pub use error::Error;
pub use plugin_config::{get_plugin_config, parse_plugin_config};
