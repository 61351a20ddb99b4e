//! Error handling.

use std::path::PathBuf;

/// An error that may occur when loading a user configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The default location of the configuration file can not be determined.
    #[error("Unable to determine the default user configuration file location:\n{0}")]
    ConfigFileLocation(#[source] confy::ConfyError),

    /// An I/O error occurred for a file.
    #[error("I/O error for file {path} while {context}: {source}")]
    Io {
        /// The path to the file for which the error occurred.
        path: PathBuf,
        /// The context in which the error occurs.
        ///
        /// This is meant to complete the sentence "I/O error for file {path} while ".
        context: &'static str,
        /// The error source.
        source: std::io::Error,
    },

    /// TOML error while reading a file.
    #[error("TOML read error for file {path} while {context}: {source}")]
    TomlRead {
        /// The path to a file that fails to read.
        path: PathBuf,
        /// The context in which the error occurs.
        ///
        /// This is meant to complete the sentence "TOML read error for file {path} while ".
        context: &'static str,
        /// The error source.
        source: Box<toml::de::Error>,
    },
}
