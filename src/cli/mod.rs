//! CLI layer: argument definitions, leaf commands and the command tree

pub mod args;
pub mod commands;
pub mod error;
pub mod output;

pub use args::GlobalArgs;
pub use error::{CliError, CliResult};

use crate::registry::{CommandNode, CommandTree, RegistryError};
use args::{CompletionArgs, ConfigInitArgs, HashArgs, RootArgs};

pub const NAME: &str = "polycli";

const ABOUT: &str = "A Swiss Army knife of blockchain tools.";
const LONG_ABOUT: &str = "Polycli is a collection of tools that are meant to be useful while \
building, testing, and running block chain applications.";

/// Build the complete polycli command tree.
///
/// # Errors
/// [`RegistryError::DuplicateName`] if two siblings share a name.
pub fn command_tree() -> Result<CommandTree, RegistryError> {
    let root = CommandNode::new(NAME, ABOUT)
        .long_about(LONG_ABOUT)
        .args::<GlobalArgs>()
        .args::<RootArgs>()
        .with_child(config_group()?)?
        .with_child(
            CommandNode::new("hash", "Provide common crypto hashing functions.")
                .args::<HashArgs>()
                .body(commands::hash),
        )?
        .with_child(
            CommandNode::new("version", "Get the current version of this application.")
                .body(commands::version),
        )?
        .with_child(
            CommandNode::new("completion", "Generate shell completions.")
                .args::<CompletionArgs>()
                .body(commands::completion),
        )?;

    Ok(CommandTree::new(root))
}

fn config_group() -> Result<CommandNode, RegistryError> {
    CommandNode::new("config", "Inspect and initialize polycli configuration.")
        .long_about(
            "Configuration is resolved from flags, environment variables, \
             the config file and built-in defaults, in that order.",
        )
        .with_child(
            CommandNode::new("show", "Show resolved configuration and where each value came from.")
                .body(commands::config_show),
        )?
        .with_child(
            CommandNode::new("path", "Show the config file location.").body(commands::config_path),
        )?
        .with_child(
            CommandNode::new("init", "Write a config file template.")
                .args::<ConfigInitArgs>()
                .body(commands::config_init),
        )
}
