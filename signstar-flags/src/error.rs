//! Error handling.

/// An error that may occur when evaluating shared command line flags.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A pair passed to a key-value flag is malformed.
    #[error("could not parse flag {flag}: key-value pair requires \"=\" as separator")]
    MalformedPluginConfigPair {
        /// The name of the flag the pair has been passed to.
        flag: &'static str,
    },
}
