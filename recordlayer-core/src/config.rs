//! Key/value configuration parameters consumed by persistence backends.
//!
//! Components receive their options as a flat string map with dotted section
//! prefixes (`connection.host`, `options.max_page_size`, ...). This module
//! provides the map itself plus the connection/credential views the remote
//! adapter resolves from it.

use std::collections::BTreeMap;
use std::str::FromStr;

/// A flat, ordered map of string configuration parameters.
///
/// Keys use dotted section prefixes; [`ConfigParams::get_section`] extracts a
/// sub-map with the prefix stripped.
///
/// # Example
///
/// ```ignore
/// use recordlayer::config::ConfigParams;
///
/// let config = ConfigParams::from_tuples(&[
///     ("connection.host", "localhost"),
///     ("connection.port", "27017"),
///     ("options.max_page_size", "50"),
/// ]);
///
/// assert_eq!(config.get_section("options").get_as::<usize>("max_page_size"), Some(50));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigParams {
    entries: BTreeMap<String, String>,
}

impl ConfigParams {
    /// Creates an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parameter map from key/value pairs.
    pub fn from_tuples(pairs: &[(&str, &str)]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Sets a parameter, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder-style [`ConfigParams::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Returns the raw value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns true when `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the value for `key` parsed as `F`.
    ///
    /// A missing key and an unparsable value both yield `None`.
    pub fn get_as<F: FromStr>(&self, key: &str) -> Option<F> {
        self.get(key).and_then(|value| value.parse().ok())
    }

    /// Returns the value for `key` parsed as `F`, or `default` when the key is
    /// missing or unparsable.
    pub fn get_as_or<F: FromStr>(&self, key: &str, default: F) -> F {
        self.get_as(key).unwrap_or(default)
    }

    /// Extracts the parameters under `section.` with the prefix stripped.
    pub fn get_section(&self, section: &str) -> ConfigParams {
        let prefix = format!("{section}.");

        Self {
            entries: self
                .entries
                .iter()
                .filter_map(|(k, v)| {
                    k.strip_prefix(&prefix)
                        .map(|suffix| (suffix.to_string(), v.clone()))
                })
                .collect(),
        }
    }

    /// Returns this map with every missing key filled in from `defaults`.
    /// Explicitly set values always win.
    pub fn set_defaults(mut self, defaults: &ConfigParams) -> Self {
        for (key, value) in &defaults.entries {
            self.entries
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }

        self
    }

    /// Returns true when the map holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Connection settings resolved from the `connection.*` section.
///
/// All fields are optional at resolution time; backends validate the ones they
/// require at open time so that the error can name the missing setting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionParams {
    /// Backend discriminator (`connection.type`).
    pub kind: Option<String>,
    /// Host name or address (`connection.host`).
    pub host: Option<String>,
    /// TCP port (`connection.port`).
    pub port: Option<u16>,
    /// Database name (`connection.database`).
    pub database: Option<String>,
}

impl ConnectionParams {
    /// Resolves connection settings from the `connection` section of `config`.
    pub fn from_config(config: &ConfigParams) -> Self {
        let section = config.get_section("connection");

        Self {
            kind: section.get("type").map(str::to_string),
            host: section.get("host").map(str::to_string),
            port: section.get_as("port"),
            database: section.get("database").map(str::to_string),
        }
    }
}

/// Credential settings resolved from the `credential.*` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialParams {
    /// User name (`credential.username`).
    pub username: Option<String>,
    /// Password (`credential.password`).
    pub password: Option<String>,
}

impl CredentialParams {
    /// Resolves credential settings from the `credential` section of `config`.
    pub fn from_config(config: &ConfigParams) -> Self {
        let section = config.get_section("credential");

        Self {
            username: section.get("username").map(str::to_string),
            password: section.get("password").map(str::to_string),
        }
    }
}
