//! Configuration resolution with tiered precedence
//!
//! Precedence (highest to lowest):
//! 1. Command-line flags
//! 2. Environment variables (case-insensitive, `-` and `_` interchangeable)
//! 3. Config file: `--config <path>` or `$HOME/.polygon-cli.yaml`
//! 4. Compiled defaults
//!
//! A missing, unreadable or malformed config file contributes nothing and is
//! not reported as an error.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError as FileError, File, FileFormat, Value};
use thiserror::Error;

/// Name of the config file looked up in the home directory.
pub const CONFIG_FILE_NAME: &str = ".polygon-cli.yaml";

/// Fatal configuration errors. Everything else degrades silently.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot determine home directory; pass --config <path>")]
    HomeDirUnavailable,
}

/// Source of a resolved value, ordered by increasing precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Default,
    File,
    Env,
    Flag,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tier::Default => "default",
            Tier::File => "file",
            Tier::Env => "env",
            Tier::Flag => "flag",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigValue {
    Int(i64),
    Bool(bool),
}

impl ConfigValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(v) => Some(*v),
            ConfigValue::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(v) => Some(*v),
            ConfigValue::Int(_) => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Int(v) => write!(f, "{v}"),
            ConfigValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// A recognized configuration key and where it may come from.
#[derive(Debug, PartialEq, Eq)]
pub struct ConfigKey {
    pub name: &'static str,
    pub flag: &'static str,
    pub env: &'static str,
    pub file_key: &'static str,
    pub kind: ValueKind,
    pub default: ConfigValue,
}

impl ConfigKey {
    /// Parse a raw environment or file string for this key.
    pub fn parse(&self, raw: &str) -> Option<ConfigValue> {
        match self.kind {
            ValueKind::Int => raw.trim().parse().ok().map(ConfigValue::Int),
            ValueKind::Bool => parse_bool(raw).map(ConfigValue::Bool),
        }
    }
}

pub const VERBOSITY: ConfigKey = ConfigKey {
    name: "verbosity",
    flag: "verbosity",
    env: "VERBOSITY",
    file_key: "verbosity",
    kind: ValueKind::Int,
    default: ConfigValue::Int(500),
};

pub const PRETTY_LOGS: ConfigKey = ConfigKey {
    name: "pretty-logs",
    flag: "pretty-logs",
    env: "PRETTY_LOGS",
    file_key: "pretty-logs",
    kind: ValueKind::Bool,
    default: ConfigValue::Bool(true),
};

/// Every key the resolver knows about.
pub const KEYS: &[ConfigKey] = &[VERBOSITY, PRETTY_LOGS];

/// Accepts the usual spellings: true/false, yes/no, on/off, y/n, t/f, 1/0.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Snapshot of the process environment plus the user's home directory.
#[derive(Debug, Clone, Default)]
pub struct ProcessEnv {
    vars: Vec<(String, String)>,
    home: Option<PathBuf>,
}

impl ProcessEnv {
    pub fn new<I, K, V>(vars: I, home: Option<PathBuf>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            home,
        }
    }

    /// Capture the current process environment.
    pub fn capture() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
        let home = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        Self::new(vars, home)
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Look up a variable ignoring ASCII case and treating `-` like `_`.
    ///
    /// When several variables match, the exact name wins, then the
    /// lexicographically smallest one.
    pub fn lookup(&self, name: &str) -> Option<(&str, &str)> {
        let wanted = normalize_env_name(name);
        let mut candidates: Vec<_> = self
            .vars
            .iter()
            .filter(|(k, _)| normalize_env_name(k) == wanted)
            .collect();
        candidates.sort_by(|a, b| a.0.cmp(&b.0));
        candidates
            .iter()
            .copied()
            .find(|(k, _)| k == name)
            .or_else(|| candidates.first().copied())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Expand `~` and `$VAR` in a user-supplied path against this snapshot.
    pub fn expand_path(&self, path: &Path) -> PathBuf {
        let raw = path.to_string_lossy();
        let home = || self.home.as_ref().map(|h| h.to_string_lossy().into_owned());
        let lookup = |name: &str| -> Result<Option<String>, std::convert::Infallible> {
            Ok(self.lookup_exact(name).map(str::to_string))
        };
        match shellexpand::full_with_context(&raw, home, lookup) {
            Ok(expanded) => PathBuf::from(expanded.into_owned()),
            Err(_) => path.to_path_buf(),
        }
    }

    fn lookup_exact(&self, name: &str) -> Option<&str> {
        self.vars.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

fn normalize_env_name(name: &str) -> String {
    name.to_ascii_uppercase().replace('-', "_")
}

/// Values supplied explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct FlagValues {
    values: HashMap<&'static str, ConfigValue>,
}

impl FlagValues {
    pub fn set(&mut self, key: &'static ConfigKey, value: ConfigValue) -> &mut Self {
        self.values.insert(key.name, value);
        self
    }

    pub fn get(&self, key: &ConfigKey) -> Option<ConfigValue> {
        self.values.get(key.name).copied()
    }
}

/// Inputs to [`resolve`].
#[derive(Debug)]
pub struct ConfigSources<'a> {
    pub flags: FlagValues,
    pub explicit_path: Option<PathBuf>,
    pub env: &'a ProcessEnv,
}

/// One effective value and the tier it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub key: &'static ConfigKey,
    pub value: ConfigValue,
    pub tier: Tier,
}

/// A present but unparsable value that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub key: &'static str,
    pub tier: Tier,
    pub raw: String,
}

/// The outcome of configuration resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    entries: Vec<ResolvedEntry>,
    path: Option<PathBuf>,
    file_used: Option<PathBuf>,
    rejected: Vec<Rejected>,
}

impl ResolvedConfig {
    pub fn entries(&self) -> &[ResolvedEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedEntry> {
        self.entries.iter().find(|e| e.key.name == name)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|e| e.value.as_int())
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(|e| e.value.as_bool())
    }

    /// Path the resolver looked at, whether or not it could be read.
    pub fn config_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Path of the config file that was actually read.
    pub fn file_used(&self) -> Option<&Path> {
        self.file_used.as_deref()
    }

    pub fn rejected(&self) -> &[Rejected] {
        &self.rejected
    }
}

/// Determine which config file to read.
///
/// # Errors
/// [`ConfigError::HomeDirUnavailable`] when no explicit path is given and the
/// home directory is unknown.
pub fn config_file_path(explicit: Option<&Path>, env: &ProcessEnv) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(path) => Ok(env.expand_path(path)),
        None => env
            .home()
            .map(|home| home.join(CONFIG_FILE_NAME))
            .ok_or(ConfigError::HomeDirUnavailable),
    }
}

/// Read the config file; any failure yields `None`.
fn load_file(path: &Path) -> Option<Config> {
    Config::builder()
        .add_source(File::from(path).format(FileFormat::Yaml).required(true))
        .build()
        .ok()
}

/// Resolve one effective value per key in [`KEYS`].
///
/// # Errors
/// Only [`ConfigError::HomeDirUnavailable`]; file problems degrade silently.
pub fn resolve(sources: &ConfigSources<'_>) -> Result<ResolvedConfig, ConfigError> {
    let path = config_file_path(sources.explicit_path.as_deref(), sources.env)?;
    let file = load_file(&path);

    let mut resolved = ResolvedConfig {
        entries: Vec::with_capacity(KEYS.len()),
        file_used: file.as_ref().map(|_| path.clone()),
        path: Some(path),
        rejected: Vec::new(),
    };

    for key in KEYS {
        let entry = resolve_key(key, sources, file.as_ref(), &mut resolved.rejected);
        resolved.entries.push(entry);
    }

    Ok(resolved)
}

fn resolve_key(
    key: &'static ConfigKey,
    sources: &ConfigSources<'_>,
    file: Option<&Config>,
    rejected: &mut Vec<Rejected>,
) -> ResolvedEntry {
    let entry = |value, tier| ResolvedEntry { key, value, tier };

    if let Some(value) = sources.flags.get(key) {
        return entry(value, Tier::Flag);
    }

    if let Some((_, raw)) = sources.env.lookup(key.env) {
        match key.parse(raw) {
            Some(value) => return entry(value, Tier::Env),
            None => rejected.push(Rejected {
                key: key.name,
                tier: Tier::Env,
                raw: raw.to_string(),
            }),
        }
    }

    if let Some(config) = file {
        let raw = match config.get_string(key.file_key) {
            Ok(raw) => Some(raw),
            Err(FileError::NotFound(_)) => None,
            // Lists and maps have no string form; keep their rendering for the warning.
            Err(_) => {
                let shown = config
                    .get::<Value>(key.file_key)
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                rejected.push(Rejected {
                    key: key.name,
                    tier: Tier::File,
                    raw: shown,
                });
                None
            }
        };
        if let Some(raw) = raw {
            match key.parse(&raw) {
                Some(value) => return entry(value, Tier::File),
                None => rejected.push(Rejected {
                    key: key.name,
                    tier: Tier::File,
                    raw,
                }),
            }
        }
    }

    entry(key.default, Tier::Default)
}

/// Commented template written by `config init`.
pub fn template() -> String {
    r#"# polycli configuration
#
# Precedence (highest to lowest):
#   command-line flags > environment variables > this file > defaults
#
# Environment variables match key names case-insensitively, e.g.
#   VERBOSITY=700 PRETTY_LOGS=false polycli ...

# Log verbosity:
#   0 Silent, 100 Panic, 200 Fatal, 300 Error,
#   400 Warning, 500 Info, 600 Debug, 700 Trace
# verbosity: 500

# Human-readable logs (true) or JSON lines (false)
# pretty-logs: true
"#
    .to_string()
}
