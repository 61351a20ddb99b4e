//! Descriptors of the command line flags shared by signing tools.
//!
//! Each flag is described once and bound to the commands that expose it (see [`crate::bind`]).
//! The [`REGISTRY`] tracks all descriptors and is validated at compile time, so that no two
//! flags share a name or a shorthand.

/// The name, optional shorthand and help text of a command line flag.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FlagDescriptor {
    name: &'static str,
    shorthand: Option<char>,
    usage: &'static str,
}

impl FlagDescriptor {
    /// Creates a new [`FlagDescriptor`].
    pub const fn new(name: &'static str, shorthand: Option<char>, usage: &'static str) -> Self {
        Self {
            name,
            shorthand,
            usage,
        }
    }

    /// Returns the long name of the flag (e.g. `key` for `--key`).
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the optional single character shorthand of the flag (e.g. `k` for `-k`).
    pub const fn shorthand(&self) -> Option<char> {
        self.shorthand
    }

    /// Returns the help text of the flag.
    pub const fn usage(&self) -> &'static str {
        self.usage
    }

    /// Returns the descriptor in the [`REGISTRY`] which is called `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use signstar_flags::{FlagDescriptor, KEY};
    ///
    /// assert_eq!(FlagDescriptor::find("key"), Some(&KEY));
    /// assert_eq!(FlagDescriptor::find("keys"), None);
    /// ```
    pub fn find(name: &str) -> Option<&'static FlagDescriptor> {
        REGISTRY.iter().find(|descriptor| descriptor.name == name)
    }
}

/// The name of a signing key.
pub const KEY: FlagDescriptor = FlagDescriptor::new(
    "key",
    Some('k'),
    "signing key name, for a key previously added to the key list",
);

/// The signature envelope format.
pub const SIGNATURE_FORMAT: FlagDescriptor = FlagDescriptor::new(
    "signature-format",
    None,
    "signature envelope format, options: \"jws\", \"cose\"",
);

/// The URL of a remote timestamp authority.
pub const TIMESTAMP: FlagDescriptor = FlagDescriptor::new(
    "timestamp",
    Some('t'),
    "timestamp the signed signature via the remote TSA",
);

/// The expiry of a signature.
pub const EXPIRY: FlagDescriptor = FlagDescriptor::new(
    "expiry",
    Some('e'),
    "optional expiry that provides a \"best by use\" time for the artifact. The duration is specified in minutes(m) and/or hours(h). For example: 12h, 30m, 3h20m",
);

/// The original reference of an artifact.
pub const REFERENCE: FlagDescriptor =
    FlagDescriptor::new("reference", Some('r'), "original reference");

/// Configuration forwarded to a signing plugin.
pub const PLUGIN_CONFIG: FlagDescriptor = FlagDescriptor::new(
    "plugin-config",
    Some('c'),
    "{key}={value} pairs that are passed as is to a plugin, refer to the plugin's documentation to set appropriate values",
);

/// All flag descriptors shared by signing tools.
pub const REGISTRY: &[FlagDescriptor] = &[
    KEY,
    SIGNATURE_FORMAT,
    TIMESTAMP,
    EXPIRY,
    REFERENCE,
    PLUGIN_CONFIG,
];

const _: () = match validate_registry(REGISTRY) {
    Ok(()) => (),
    Err(RegistryError::EmptyName) => panic!("A flag in the registry has an empty name"),
    Err(RegistryError::DuplicateName { .. }) => {
        panic!("A flag name is used more than once in the registry")
    }
    Err(RegistryError::DuplicateShorthand { .. }) => {
        panic!("A flag shorthand is used more than once in the registry")
    }
};

/// An error that may occur when validating a set of [`FlagDescriptor`]s.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// A flag has an empty name.
    #[error("A flag has an empty name")]
    EmptyName,

    /// A flag name is used more than once.
    #[error("The flag name {name} is used more than once")]
    DuplicateName {
        /// The duplicate name.
        name: &'static str,
    },

    /// A flag shorthand is used more than once.
    #[error("The flag shorthand {shorthand} is used more than once")]
    DuplicateShorthand {
        /// The duplicate shorthand.
        shorthand: char,
    },
}

/// Validates that `descriptors` have non-empty and unique names, as well as unique shorthands.
///
/// Being a `const fn`, this is used to reject an invalid [`REGISTRY`] at compile time.
///
/// # Errors
///
/// Returns an error if
/// - a descriptor has an empty name,
/// - two descriptors share a name,
/// - or two descriptors share a shorthand.
///
/// # Examples
///
/// ```
/// use signstar_flags::{FlagDescriptor, REGISTRY, RegistryError, validate_registry};
///
/// assert_eq!(validate_registry(REGISTRY), Ok(()));
///
/// let duplicate = [
///     FlagDescriptor::new("key", Some('k'), "a key"),
///     FlagDescriptor::new("kid", Some('k'), "a key ID"),
/// ];
/// assert_eq!(
///     validate_registry(&duplicate),
///     Err(RegistryError::DuplicateShorthand { shorthand: 'k' })
/// );
/// ```
pub const fn validate_registry(descriptors: &[FlagDescriptor]) -> Result<(), RegistryError> {
    let mut i = 0;
    while i < descriptors.len() {
        let descriptor = &descriptors[i];
        if descriptor.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        let mut j = i + 1;
        while j < descriptors.len() {
            let other = &descriptors[j];
            if str_eq(descriptor.name, other.name) {
                return Err(RegistryError::DuplicateName {
                    name: descriptor.name,
                });
            }
            if let (Some(shorthand), Some(other_shorthand)) = (descriptor.shorthand, other.shorthand)
            {
                if shorthand == other_shorthand {
                    return Err(RegistryError::DuplicateShorthand { shorthand });
                }
            }
            j += 1;
        }
        i += 1;
    }

    Ok(())
}

/// Compares two strings in a `const` context.
const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}
