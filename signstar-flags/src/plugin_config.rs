//! Evaluation of the `--plugin-config` flag.

use std::collections::HashMap;

use clap::ArgMatches;

use crate::{Error, PLUGIN_CONFIG, StringListSlot};

/// Parses `key=value` pairs into a map of keys and values.
///
/// Each pair is split at the first `=`, so values may contain further `=` characters.
/// If a key occurs more than once, the value of the last occurrence is used.
///
/// # Errors
///
/// Returns an [`Error::MalformedPluginConfigPair`] if a pair contains no `=`, or if its key or
/// its value is empty.
///
/// # Examples
///
/// ```
/// use signstar_flags::parse_plugin_config;
///
/// # fn main() -> testresult::TestResult {
/// let config = parse_plugin_config(["a=1", "b=2", "a=3"])?;
/// assert_eq!(config.get("a").map(String::as_str), Some("3"));
/// assert_eq!(config.get("b").map(String::as_str), Some("2"));
///
/// assert!(parse_plugin_config::<[&str; 0], _>([])?.is_empty());
/// assert!(parse_plugin_config(["novalue"]).is_err());
/// # Ok(())
/// # }
/// ```
pub fn parse_plugin_config<I, S>(pairs: I) -> Result<HashMap<String, String>, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let pairs = pairs.into_iter();
    let mut config = HashMap::with_capacity(pairs.size_hint().0);
    for pair in pairs {
        match pair.as_ref().split_once('=') {
            Some((key, value)) if !key.is_empty() && !value.is_empty() => {
                config.insert(key.to_string(), value.to_string());
            }
            _ => {
                return Err(Error::MalformedPluginConfigPair {
                    flag: PLUGIN_CONFIG.name(),
                });
            }
        }
    }

    Ok(config)
}

/// Returns the plugin configuration passed to a command.
///
/// Reads the values of the `--plugin-config` flag from `matches` and evaluates them using
/// [`parse_plugin_config`].
///
/// # Errors
///
/// Returns an error if one of the values is not a valid `key=value` pair.
///
/// # Panics
///
/// Panics if the `--plugin-config` flag has not been bound to the command `matches` originate
/// from.
pub fn get_plugin_config(matches: &ArgMatches) -> Result<HashMap<String, String>, Error> {
    parse_plugin_config(StringListSlot::new(&PLUGIN_CONFIG).get(matches))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use testresult::TestResult;

    use super::*;

    #[rstest]
    #[case::single(&["k=v"], &[("k", "v")])]
    #[case::several(&["a=1", "b=2"], &[("a", "1"), ("b", "2")])]
    #[case::duplicate_key(&["a=1", "b=2", "a=3"], &[("a", "3"), ("b", "2")])]
    #[case::separator_in_value(&["url=https://example.org/?a=b"], &[("url", "https://example.org/?a=b")])]
    #[case::whitespace_is_kept(&[" k = v "], &[(" k ", " v ")])]
    #[case::empty(&[], &[])]
    fn valid_plugin_config(#[case] pairs: &[&str], #[case] expected: &[(&str, &str)]) -> TestResult {
        let expected: HashMap<String, String> = expected
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        assert_eq!(parse_plugin_config(pairs)?, expected);
        Ok(())
    }

    #[rstest]
    #[case::no_separator(&["novalue"])]
    #[case::empty_key(&["=x"])]
    #[case::empty_value(&["x="])]
    #[case::separator_only(&["="])]
    #[case::empty_pair(&[""])]
    #[case::malformed_after_valid(&["a=1", "b"])]
    fn invalid_plugin_config(#[case] pairs: &[&str]) {
        let Err(error) = parse_plugin_config(pairs) else {
            panic!("Parsing {pairs:?} should have failed");
        };

        assert!(error.to_string().contains("plugin-config"));
        assert_eq!(
            error.to_string(),
            "could not parse flag plugin-config: key-value pair requires \"=\" as separator"
        );
    }
}
