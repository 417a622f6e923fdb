//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::builder::{BoolishValueParser, OsStringValueParser, TypedValueParser};
use clap::{ArgAction, Args, ValueEnum, ValueHint};

use crate::config::{ConfigValue, FlagValues, PRETTY_LOGS, VERBOSITY};

/// Flags accepted by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// config file (default is $HOME/.polygon-cli.yaml)
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        value_parser = OsStringValueParser::new().map(PathBuf::from)
    )]
    pub config: Option<PathBuf>,

    /// 0 - Silent
    /// 100 Panic
    /// 200 Fatal
    /// 300 Error
    /// 400 Warning
    /// 500 Info
    /// 600 Debug
    /// 700 Trace
    /// [default: 500]
    #[arg(
        short,
        long,
        global = true,
        value_name = "LEVEL",
        allow_negative_numbers = true,
        verbatim_doc_comment
    )]
    pub verbosity: Option<i64>,

    /// Should logs be in pretty format or JSON [default: true]
    #[arg(
        long = "pretty-logs",
        global = true,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub pretty_logs: Option<bool>,
}

impl GlobalArgs {
    /// Explicit config file path; an empty `--config ""` means the default.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty())
            .cloned()
    }

    /// Flags the user actually typed, keyed for the config resolver.
    pub fn flag_values(&self) -> FlagValues {
        let mut flags = FlagValues::default();
        if let Some(v) = self.verbosity {
            flags.set(&VERBOSITY, ConfigValue::Int(v));
        }
        if let Some(p) = self.pretty_logs {
            flags.set(&PRETTY_LOGS, ConfigValue::Bool(p));
        }
        flags
    }
}

/// Flags local to the root command.
#[derive(Args, Debug, Clone, Default)]
pub struct RootArgs {
    /// Help message for toggle
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub toggle: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashFunction {
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

#[derive(Args, Debug, Clone)]
pub struct HashArgs {
    /// Hash function
    #[arg(value_enum)]
    pub function: HashFunction,

    /// Text to hash (default: stdin)
    #[arg(conflicts_with = "file")]
    pub input: Option<String>,

    /// Hash the contents of a file
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigInitArgs {
    /// Overwrite an existing config file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    /// Shell type
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
