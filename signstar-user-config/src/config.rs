//! The per-user configuration file and its location.

use std::{
    collections::BTreeMap,
    env::var_os,
    fs::read_to_string,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::Error;

/// The application name used for determining the default configuration file location.
pub const APP_NAME: &str = "signstar";

/// The name of the configuration file (without extension).
pub const CONFIG_NAME: &str = "config";

/// The environment variable which may point at a custom user configuration file.
pub const CONFIG_ENV_VAR: &str = "SIGNSTAR_USER_CONFIG";

/// Returns the default location of the user configuration file.
///
/// The location depends on the OS platform. On Linux it is `~/.config/signstar/config.toml`.
///
/// # Errors
///
/// Returns an [`Error::ConfigFileLocation`] if the platform does not provide a configuration
/// directory for the current user.
pub fn get_default_config_file_path() -> Result<PathBuf, Error> {
    confy::get_configuration_file_path(APP_NAME, Some(CONFIG_NAME))
        .map_err(Error::ConfigFileLocation)
}

/// The location of a user configuration file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum UserConfigLocation {
    /// The platform specific default location (see [`get_default_config_file_path`]).
    #[default]
    Default,

    /// A custom path.
    Path(PathBuf),
}

impl UserConfigLocation {
    /// Creates a [`UserConfigLocation`] from the process environment.
    ///
    /// If the `SIGNSTAR_USER_CONFIG` environment variable is set and not empty, its value is used
    /// as [`UserConfigLocation::Path`], otherwise [`UserConfigLocation::Default`] is returned.
    pub fn from_env() -> Self {
        match var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::Path(PathBuf::from(path)),
            _ => Self::Default,
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if `self` is [`UserConfigLocation::Default`] and the default location can
    /// not be determined.
    pub fn path(&self) -> Result<PathBuf, Error> {
        match self {
            Self::Default => get_default_config_file_path(),
            Self::Path(path) => Ok(path.clone()),
        }
    }
}

impl From<PathBuf> for UserConfigLocation {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

/// Settings of a user, that influence the defaults of signing tools.
///
/// Unknown fields in a configuration file are ignored and absent fields use their default value.
///
/// # Examples
///
/// ```
/// use signstar_user_config::UserConfig;
///
/// # fn main() -> testresult::TestResult {
/// let config: UserConfig = toml::from_str(r#"signatureFormat = "cose""#)?;
/// assert_eq!(config.signature_format(), "cose");
///
/// let config = UserConfig::default();
/// assert_eq!(config.signature_format(), "");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct UserConfig {
    #[serde(rename = "insecureRegistries")]
    insecure_registries: Vec<String>,

    #[serde(rename = "credsStore")]
    credentials_store: String,

    #[serde(rename = "credHelpers")]
    credential_helpers: BTreeMap<String, String>,

    #[serde(rename = "signatureFormat")]
    signature_format: String,
}

impl UserConfig {
    /// Creates a new [`UserConfig`] with a specific signature format.
    pub fn new(signature_format: String) -> Self {
        Self {
            signature_format,
            ..Default::default()
        }
    }

    /// Loads a [`UserConfig`] from a file at `path`.
    ///
    /// If no file exists at `path`, the default [`UserConfig`] is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if
    /// - the file exists but can not be read,
    /// - or the contents of the file are not a valid user configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::fs::write;
    ///
    /// use signstar_user_config::UserConfig;
    ///
    /// # fn main() -> testresult::TestResult {
    /// let path = testdir::testdir!().join("config.toml");
    /// assert_eq!(UserConfig::new_from_file(&path)?, UserConfig::default());
    ///
    /// write(&path, "signatureFormat = \"cose\"\n")?;
    /// assert_eq!(UserConfig::new_from_file(&path)?.signature_format(), "cose");
    /// # Ok(())
    /// # }
    /// ```
    pub fn new_from_file(path: &Path) -> Result<Self, Error> {
        let contents = match read_to_string(path) {
            Ok(contents) => contents,
            Err(source) if source.kind() == ErrorKind::NotFound => {
                debug!("No user configuration file at {path:?}, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_path_buf(),
                    context: "reading it to string",
                    source,
                });
            }
        };

        toml::from_str(&contents).map_err(|source| Error::TomlRead {
            path: path.to_path_buf(),
            context: "reading it as a user configuration",
            source: Box::new(source),
        })
    }

    /// Returns the signature envelope format, or an empty string if none is set.
    pub fn signature_format(&self) -> &str {
        &self.signature_format
    }

    /// Returns the list of registries that may be accessed without TLS.
    pub fn insecure_registries(&self) -> &[String] {
        &self.insecure_registries
    }

    /// Returns the name of the default credentials store, or an empty string if none is set.
    pub fn credentials_store(&self) -> &str {
        &self.credentials_store
    }

    /// Returns the credential helpers by registry.
    pub fn credential_helpers(&self) -> &BTreeMap<String, String> {
        &self.credential_helpers
    }
}
