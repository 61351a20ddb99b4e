//! Binding of shared flags to commands.
//!
//! Flags are added to a [`Command`] using its builder interface and read back from the
//! [`ArgMatches`] of the parsed command line using typed slots.
//! Unless noted otherwise, a flag that is not provided on the command line yields the zero value
//! of its type.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use clap::Command;
//! use signstar_flags::{
//!     DurationSlot,
//!     EXPIRY,
//!     KEY,
//!     StringSlot,
//!     bind_expiry,
//!     bind_key,
//!     get_plugin_config,
//!     bind_plugin_config,
//! };
//!
//! # fn main() -> testresult::TestResult {
//! let command = bind_plugin_config(bind_expiry(bind_key(Command::new("sign"))));
//! let matches = command.try_get_matches_from(["sign", "-k", "release", "--expiry", "12h"])?;
//!
//! assert_eq!(StringSlot::new(&KEY).get(&matches), "release");
//! assert_eq!(DurationSlot::new(&EXPIRY).get(&matches), Duration::from_secs(12 * 3600));
//! assert!(get_plugin_config(&matches)?.is_empty());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::debug;
use signstar_user_config::{ConfigLoader, LoadOnce, user_config};

use crate::{
    EXPIRY,
    FlagDescriptor,
    KEY,
    PLUGIN_CONFIG,
    REFERENCE,
    SIGNATURE_FORMAT,
    TIMESTAMP,
    parse_duration,
};

/// The signature format used if no other default is configured.
pub const DEFAULT_SIGNATURE_FORMAT: &str = "jws";

/// Creates an [`Arg`] named after `descriptor`.
fn arg(descriptor: &FlagDescriptor) -> Arg {
    let arg = Arg::new(descriptor.name())
        .long(descriptor.name())
        .help(descriptor.usage());
    match descriptor.shorthand() {
        Some(shorthand) => arg.short(shorthand),
        None => arg,
    }
}

/// Adds a string flag described by `descriptor` to `command`.
pub fn bind_string(command: Command, descriptor: &FlagDescriptor) -> Command {
    command.arg(arg(descriptor).action(ArgAction::Set))
}

/// Adds a repeatable string flag described by `descriptor` to `command`.
///
/// Each occurrence of the flag appends one value.
pub fn bind_string_list(command: Command, descriptor: &FlagDescriptor) -> Command {
    command.arg(arg(descriptor).action(ArgAction::Append))
}

/// Adds a duration flag described by `descriptor` to `command`.
///
/// Values are parsed using [`parse_duration`].
pub fn bind_duration(command: Command, descriptor: &FlagDescriptor) -> Command {
    command.arg(
        arg(descriptor)
            .action(ArgAction::Set)
            .value_parser(parse_duration),
    )
}

/// Adds the `--key` flag to `command`.
pub fn bind_key(command: Command) -> Command {
    bind_string(command, &KEY)
}

/// Adds the `--timestamp` flag to `command`.
pub fn bind_timestamp(command: Command) -> Command {
    bind_string(command, &TIMESTAMP)
}

/// Adds the `--reference` flag to `command`.
pub fn bind_reference(command: Command) -> Command {
    bind_string(command, &REFERENCE)
}

/// Adds the `--plugin-config` flag to `command`.
///
/// The values are evaluated with [`get_plugin_config`][`crate::get_plugin_config`].
pub fn bind_plugin_config(command: Command) -> Command {
    bind_string_list(command, &PLUGIN_CONFIG)
}

/// Adds the `--expiry` flag to `command`.
///
/// A zero duration, which is the default, means that no expiry is requested.
pub fn bind_expiry(command: Command) -> Command {
    bind_duration(command, &EXPIRY)
}

/// Returns the default signature format according to the user configuration in `config`.
///
/// The signature format of the user configuration is used, if the configuration can be loaded
/// and sets one. Otherwise [`DEFAULT_SIGNATURE_FORMAT`] is returned.
/// The configuration is loaded at most once, no matter how often this function is called.
pub fn resolve_signature_format<L>(config: &LoadOnce<L>) -> String
where
    L: ConfigLoader,
{
    match config.get() {
        Ok(config) if !config.signature_format().is_empty() => {
            debug!(
                "Using signature format {} from user configuration",
                config.signature_format()
            );
            config.signature_format().to_string()
        }
        Ok(_) => DEFAULT_SIGNATURE_FORMAT.to_string(),
        Err(error) => {
            debug!(
                "Using signature format {DEFAULT_SIGNATURE_FORMAT}, as the user configuration is unavailable: {error}"
            );
            DEFAULT_SIGNATURE_FORMAT.to_string()
        }
    }
}

/// Adds the `--signature-format` flag to `command`, using the defaults of `config`.
///
/// The default value of the flag is determined using [`resolve_signature_format`].
///
/// # Examples
///
/// ```
/// use clap::Command;
/// use signstar_flags::{SIGNATURE_FORMAT, StringSlot, bind_signature_format_with};
/// use signstar_user_config::{LoadOnce, UserConfig};
///
/// # fn main() -> testresult::TestResult {
/// let config = LoadOnce::new(|| Ok(UserConfig::new("cose".to_string())));
/// let matches =
///     bind_signature_format_with(Command::new("sign"), &config).try_get_matches_from(["sign"])?;
///
/// assert_eq!(StringSlot::new(&SIGNATURE_FORMAT).get(&matches), "cose");
/// # Ok(())
/// # }
/// ```
pub fn bind_signature_format_with<L>(command: Command, config: &LoadOnce<L>) -> Command
where
    L: ConfigLoader,
{
    command.arg(
        arg(&SIGNATURE_FORMAT)
            .action(ArgAction::Set)
            .default_value(resolve_signature_format(config)),
    )
}

/// Adds the `--signature-format` flag to `command`, using the defaults of the user's
/// configuration file.
///
/// The user configuration of the process is loaded on first use (see
/// [`user_config`][`signstar_user_config::user_config`]).
/// If it can not be loaded or does not set a signature format, [`DEFAULT_SIGNATURE_FORMAT`] is
/// used.
pub fn bind_signature_format(command: Command) -> Command {
    bind_signature_format_with(command, user_config())
}

/// Reads the value of a string flag.
#[derive(Clone, Copy, Debug)]
pub struct StringSlot {
    name: &'static str,
}

impl StringSlot {
    /// Creates a new [`StringSlot`] for the flag described by `descriptor`.
    pub const fn new(descriptor: &FlagDescriptor) -> Self {
        Self {
            name: descriptor.name(),
        }
    }

    /// Returns the value of the flag in `matches`, or its default.
    ///
    /// # Panics
    ///
    /// Panics if the flag has not been bound as a string flag to the command `matches` originate
    /// from.
    pub fn get(&self, matches: &ArgMatches) -> String {
        matches
            .get_one::<String>(self.name)
            .cloned()
            .unwrap_or_default()
    }
}

/// Reads the values of a repeatable string flag.
#[derive(Clone, Copy, Debug)]
pub struct StringListSlot {
    name: &'static str,
}

impl StringListSlot {
    /// Creates a new [`StringListSlot`] for the flag described by `descriptor`.
    pub const fn new(descriptor: &FlagDescriptor) -> Self {
        Self {
            name: descriptor.name(),
        }
    }

    /// Returns the values of the flag in `matches`, in the order they have been provided.
    ///
    /// # Panics
    ///
    /// Panics if the flag has not been bound as a repeatable string flag to the command `matches`
    /// originate from.
    pub fn get(&self, matches: &ArgMatches) -> Vec<String> {
        matches
            .get_many::<String>(self.name)
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    }
}

/// Reads the value of a duration flag.
#[derive(Clone, Copy, Debug)]
pub struct DurationSlot {
    name: &'static str,
}

impl DurationSlot {
    /// Creates a new [`DurationSlot`] for the flag described by `descriptor`.
    pub const fn new(descriptor: &FlagDescriptor) -> Self {
        Self {
            name: descriptor.name(),
        }
    }

    /// Returns the value of the flag in `matches`, or [`Duration::ZERO`].
    ///
    /// # Panics
    ///
    /// Panics if the flag has not been bound as a duration flag to the command `matches`
    /// originate from.
    pub fn get(&self, matches: &ArgMatches) -> Duration {
        matches
            .get_one::<Duration>(self.name)
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::Cell,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use rstest::rstest;
    use signstar_user_config::{Error as UserConfigError, UserConfig};
    use testresult::TestResult;

    use super::*;

    fn load_error() -> Result<UserConfig, UserConfigError> {
        Err(UserConfigError::Io {
            path: "/nowhere/config.toml".into(),
            context: "testing",
            source: std::io::Error::other("unreadable"),
        })
    }

    #[rstest]
    #[case::configured("cose", "cose")]
    #[case::configured_baseline("jws", "jws")]
    #[case::unset("", DEFAULT_SIGNATURE_FORMAT)]
    fn signature_format_from_config(#[case] configured: &str, #[case] expected: &str) {
        let config = LoadOnce::new(|| Ok(UserConfig::new(configured.to_string())));
        assert_eq!(resolve_signature_format(&config), expected);
    }

    #[test]
    fn signature_format_on_load_error() {
        let config = LoadOnce::new(load_error);
        assert_eq!(resolve_signature_format(&config), DEFAULT_SIGNATURE_FORMAT);
    }

    #[test]
    fn signature_format_loads_config_once() {
        let calls = AtomicUsize::new(0);
        let config = LoadOnce::new(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(UserConfig::new("cose".to_string()))
        });

        for _ in 0..3 {
            assert_eq!(resolve_signature_format(&config), "cose");
            let _command = bind_signature_format_with(Command::new("sign"), &config);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn signature_format_caches_load_error() {
        let calls = Cell::new(0);
        let config = LoadOnce::new(|| {
            calls.set(calls.get() + 1);
            load_error()
        });

        for _ in 0..3 {
            assert_eq!(resolve_signature_format(&config), DEFAULT_SIGNATURE_FORMAT);
        }
        assert_eq!(calls.get(), 1);
    }

    #[rstest]
    #[case::default(&["sign"], "cose")]
    #[case::override_default(&["sign", "--signature-format", "jws"], "jws")]
    fn signature_format_flag(#[case] args: &[&str], #[case] expected: &str) -> TestResult {
        let config = LoadOnce::new(|| Ok(UserConfig::new("cose".to_string())));
        let matches =
            bind_signature_format_with(Command::new("sign"), &config).try_get_matches_from(args)?;

        assert_eq!(StringSlot::new(&SIGNATURE_FORMAT).get(&matches), expected);
        Ok(())
    }

    #[test]
    fn signature_format_has_no_shorthand() {
        let config = LoadOnce::new(|| Ok(UserConfig::default()));
        let command = bind_signature_format_with(Command::new("sign"), &config);
        let arg = command
            .get_arguments()
            .find(|arg| arg.get_id().as_str() == SIGNATURE_FORMAT.name())
            .expect("the signature format flag is bound");

        assert_eq!(arg.get_short(), None);
        assert_eq!(arg.get_long(), Some("signature-format"));
    }

    #[rstest]
    #[case::long(&["sign", "--key", "release"], "release")]
    #[case::short(&["sign", "-k", "release"], "release")]
    #[case::assigned(&["sign", "--key=release"], "release")]
    #[case::absent(&["sign"], "")]
    fn key_flag(#[case] args: &[&str], #[case] expected: &str) -> TestResult {
        let matches = bind_key(Command::new("sign")).try_get_matches_from(args)?;

        assert_eq!(StringSlot::new(&KEY).get(&matches), expected);
        Ok(())
    }

    #[rstest]
    #[case::absent(&["sign"], Duration::ZERO)]
    #[case::hours(&["sign", "-e", "12h"], Duration::from_secs(12 * 3600))]
    #[case::hours_and_minutes(&["sign", "--expiry", "3h20m"], Duration::from_secs(12_000))]
    fn expiry_flag(#[case] args: &[&str], #[case] expected: Duration) -> TestResult {
        let matches = bind_expiry(Command::new("sign")).try_get_matches_from(args)?;

        assert_eq!(DurationSlot::new(&EXPIRY).get(&matches), expected);
        Ok(())
    }

    #[rstest]
    #[case::no_unit(&["sign", "--expiry", "12"])]
    #[case::unknown_unit(&["sign", "--expiry", "2d"])]
    #[case::negative(&["sign", "--expiry=-1h"])]
    fn invalid_expiry_flag(#[case] args: &[&str]) {
        assert!(
            bind_expiry(Command::new("sign"))
                .try_get_matches_from(args)
                .is_err()
        );
    }

    #[rstest]
    #[case::absent(&["sign"], &[])]
    #[case::repeated(&["sign", "-c", "a=1", "--plugin-config", "b=2"], &["a=1", "b=2"])]
    fn plugin_config_flag(#[case] args: &[&str], #[case] expected: &[&str]) -> TestResult {
        let matches = bind_plugin_config(Command::new("sign")).try_get_matches_from(args)?;

        assert_eq!(StringListSlot::new(&PLUGIN_CONFIG).get(&matches), expected);
        Ok(())
    }
}
