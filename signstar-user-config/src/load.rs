//! Loading of the user configuration at most once.

use std::sync::OnceLock;

use log::{debug, trace};

use crate::{Error, UserConfig, UserConfigLocation};

/// A source of [`UserConfig`]s.
pub trait ConfigLoader {
    /// Loads a [`UserConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration can not be loaded.
    fn load(&self) -> Result<UserConfig, Error>;
}

impl<F> ConfigLoader for F
where
    F: Fn() -> Result<UserConfig, Error>,
{
    fn load(&self) -> Result<UserConfig, Error> {
        self()
    }
}

/// Loads a [`UserConfig`] from a file.
#[derive(Clone, Debug, Default)]
pub struct FileLoader {
    location: Option<UserConfigLocation>,
}

impl FileLoader {
    /// Creates a new [`FileLoader`] for a specific `location`.
    pub const fn new(location: UserConfigLocation) -> Self {
        Self {
            location: Some(location),
        }
    }

    /// Creates a new [`FileLoader`] that determines its location when loading.
    ///
    /// The location is derived using [`UserConfigLocation::from_env`].
    pub const fn from_env() -> Self {
        Self { location: None }
    }
}

impl ConfigLoader for FileLoader {
    fn load(&self) -> Result<UserConfig, Error> {
        let path = match &self.location {
            Some(location) => location.path()?,
            None => UserConfigLocation::from_env().path()?,
        };
        trace!("Loading user configuration from {path:?}");
        UserConfig::new_from_file(&path)
    }
}

/// A [`UserConfig`] which is loaded on first access and cached afterwards.
///
/// The wrapped [`ConfigLoader`] is called at most once, also when several threads race for the
/// first access.
/// Both a successfully loaded configuration and an error are cached.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
///
/// use signstar_user_config::{LoadOnce, UserConfig};
///
/// let calls = Cell::new(0);
/// let config = LoadOnce::new(|| {
///     calls.set(calls.get() + 1);
///     Ok(UserConfig::new("cose".to_string()))
/// });
///
/// assert_eq!(config.get().ok().map(UserConfig::signature_format), Some("cose"));
/// assert_eq!(config.get().ok().map(UserConfig::signature_format), Some("cose"));
/// assert_eq!(calls.get(), 1);
/// ```
#[derive(Debug)]
pub struct LoadOnce<L> {
    loader: L,
    result: OnceLock<Result<UserConfig, Error>>,
}

impl<L> LoadOnce<L>
where
    L: ConfigLoader,
{
    /// Creates a new [`LoadOnce`] which has not loaded anything yet.
    pub const fn new(loader: L) -> Self {
        Self {
            loader,
            result: OnceLock::new(),
        }
    }

    /// Returns the cached result of loading the configuration.
    ///
    /// Loads the configuration if this is the first call.
    ///
    /// # Errors
    ///
    /// Returns the cached error, if loading the configuration failed.
    pub fn get(&self) -> Result<&UserConfig, &Error> {
        self.result
            .get_or_init(|| {
                let result = self.loader.load();
                if let Err(error) = &result {
                    debug!("Unable to load user configuration: {error}");
                }
                result
            })
            .as_ref()
    }

    /// Returns whether the configuration has been loaded already.
    pub fn is_loaded(&self) -> bool {
        self.result.get().is_some()
    }
}

static USER_CONFIG: LoadOnce<FileLoader> = LoadOnce::new(FileLoader::from_env());

/// Returns the process-wide [`LoadOnce`] for the user configuration.
///
/// The configuration is read from the location returned by [`UserConfigLocation::from_env`] on
/// first use of [`LoadOnce::get`] and is never read again during the lifetime of the process.
pub fn user_config() -> &'static LoadOnce<FileLoader> {
    &USER_CONFIG
}

#[cfg(test)]
mod tests {
    use std::{
        fs::write,
        sync::atomic::{AtomicUsize, Ordering},
        thread,
    };

    use rstest::rstest;
    use testdir::testdir;
    use testresult::TestResult;

    use super::*;

    #[rstest]
    fn loader_called_once_on_success() {
        let calls = AtomicUsize::new(0);
        let config = LoadOnce::new(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(UserConfig::new("cose".to_string()))
        });

        assert!(!config.is_loaded());
        for _ in 0..5 {
            assert_eq!(config.get().ok().map(UserConfig::signature_format), Some("cose"));
        }
        assert!(config.is_loaded());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn loader_called_once_on_error() {
        let calls = AtomicUsize::new(0);
        let config = LoadOnce::new(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::Io {
                path: "/nowhere".into(),
                context: "testing",
                source: std::io::Error::other("broken"),
            })
        });

        for _ in 0..5 {
            assert!(config.get().is_err());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn concurrent_first_access() {
        let calls = AtomicUsize::new(0);
        let config = LoadOnce::new(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(UserConfig::new("jws".to_string()))
        });

        thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| assert!(config.get().is_ok()));
            }
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn file_loader_does_not_reread() -> TestResult {
        let path = testdir!().join("config.toml");
        write(&path, "signatureFormat = \"cose\"\n")?;
        let config = LoadOnce::new(FileLoader::new(path.clone().into()));
        assert_eq!(config.get().ok().map(UserConfig::signature_format), Some("cose"));

        write(&path, "signatureFormat = \"jws\"\n")?;
        assert_eq!(config.get().ok().map(UserConfig::signature_format), Some("cose"));
        Ok(())
    }
}
