//! Command tree: nodes, attachment and argument matching
//!
//! The tree is assembled once by an explicit builder (see
//! [`crate::cli::command_tree`]) and is immutable afterwards. Sibling names are
//! checked at attach time, so a tree that exists is always well formed.

use std::fmt;
use std::io::Write;

use clap::{ArgMatches, Command};
use thiserror::Error;

use crate::config::ResolvedConfig;
use crate::logging::RuntimeSettings;

/// Errors raised while building or walking the command tree.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("command '{name}' is already registered under '{parent}'")]
    DuplicateName { parent: String, name: String },

    #[error("'{path}' requires a subcommand")]
    NotRunnable { path: String, token: Option<String> },
}

/// Everything a leaf body gets to see.
pub struct Invocation<'a> {
    /// Settings produced by the logging initializer.
    pub settings: &'a RuntimeSettings,
    /// Resolved configuration, including the tier of each value.
    pub config: &'a ResolvedConfig,
    /// The leaf's own parsed flags and positionals.
    pub matches: &'a ArgMatches,
    /// Root clap command, for leaves that introspect the CLI.
    pub command: &'a Command,
    /// Standard output of the invocation.
    pub out: &'a mut dyn Write,
}

/// Executable body of a leaf command.
pub type Body = Box<dyn Fn(&mut Invocation<'_>) -> anyhow::Result<()> + Send + Sync>;

/// A node of the command tree.
pub struct CommandNode {
    name: &'static str,
    about: &'static str,
    long_about: Option<&'static str>,
    flags: Vec<clap::Arg>,
    children: Vec<CommandNode>,
    body: Option<Body>,
}

impl CommandNode {
    /// Create a grouping node without flags, children or body.
    pub fn new(name: &'static str, about: &'static str) -> Self {
        Self {
            name,
            about,
            long_about: None,
            flags: Vec::new(),
            children: Vec::new(),
            body: None,
        }
    }

    pub fn long_about(mut self, long_about: &'static str) -> Self {
        self.long_about = Some(long_about);
        self
    }

    /// Add a single flag or positional.
    pub fn flag(mut self, arg: clap::Arg) -> Self {
        self.flags.push(arg);
        self
    }

    /// Add every argument declared by a `#[derive(clap::Args)]` struct.
    pub fn args<A: clap::Args>(mut self) -> Self {
        let scratch = A::augment_args(Command::new(self.name));
        self.flags.extend(scratch.get_arguments().cloned());
        self
    }

    /// Make this node runnable.
    pub fn body<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut Invocation<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.body = Some(Box::new(body));
        self
    }

    /// Attach `child` below this node.
    ///
    /// # Errors
    /// [`RegistryError::DuplicateName`] if a sibling already uses the name.
    pub fn attach(&mut self, child: CommandNode) -> Result<(), RegistryError> {
        if self.child(child.name).is_some() {
            return Err(RegistryError::DuplicateName {
                parent: self.name.to_string(),
                name: child.name.to_string(),
            });
        }
        self.children.push(child);
        Ok(())
    }

    /// Builder form of [`CommandNode::attach`].
    pub fn with_child(mut self, child: CommandNode) -> Result<Self, RegistryError> {
        self.attach(child)?;
        Ok(self)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn about(&self) -> &'static str {
        self.about
    }

    pub fn flags(&self) -> &[clap::Arg] {
        &self.flags
    }

    pub fn children(&self) -> &[CommandNode] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn is_runnable(&self) -> bool {
        self.body.is_some()
    }

    /// Run the body.
    ///
    /// # Errors
    /// Whatever the body returns, untouched. Grouping nodes fail with
    /// [`RegistryError::NotRunnable`].
    pub fn run(&self, invocation: &mut Invocation<'_>) -> anyhow::Result<()> {
        match &self.body {
            Some(body) => body(invocation),
            None => Err(RegistryError::NotRunnable {
                path: self.name.to_string(),
                token: None,
            }
            .into()),
        }
    }

    /// Render this node and its subtree as a clap command.
    pub fn to_clap(&self) -> Command {
        let mut cmd = Command::new(self.name)
            .about(self.about)
            .args(self.flags.iter().cloned());
        if let Some(long_about) = self.long_about {
            cmd = cmd.long_about(long_about);
        }
        for child in &self.children {
            cmd = cmd.subcommand(child.to_clap());
        }
        cmd
    }
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode")
            .field("name", &self.name)
            .field("runnable", &self.is_runnable())
            .field("flags", &self.flags.len())
            .field("children", &self.children)
            .finish()
    }
}

/// Result of [`CommandTree::match_args`].
#[derive(Debug)]
pub struct Matched<'t> {
    /// Root first, deepest matched node last.
    pub path: Vec<&'t CommandNode>,
    /// Number of leading tokens that named subcommands.
    pub consumed: usize,
}

impl<'t> Matched<'t> {
    pub fn node(&self) -> &'t CommandNode {
        self.path[self.path.len() - 1]
    }

    /// Tokens left over for the matched node.
    pub fn remainder<'a, S>(&self, argv: &'a [S]) -> &'a [S] {
        &argv[self.consumed..]
    }

    /// Space separated command path, e.g. `polycli config show`.
    pub fn display_path(&self) -> String {
        join_path(&self.path)
    }
}

/// The complete, immutable command tree.
#[derive(Debug)]
pub struct CommandTree {
    root: CommandNode,
}

impl CommandTree {
    pub fn new(root: CommandNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &CommandNode {
        &self.root
    }

    /// Walk the tree along the leading tokens of `argv`.
    ///
    /// Matching stops at the first token that does not name a child of the
    /// current node; that token and everything after it is the remainder.
    ///
    /// # Errors
    /// [`RegistryError::NotRunnable`] if the deepest matched node has no body.
    pub fn match_args<'t, S: AsRef<str>>(
        &'t self,
        argv: &[S],
    ) -> Result<Matched<'t>, RegistryError> {
        let mut path = vec![&self.root];
        let mut node = &self.root;
        let mut consumed = 0;

        for token in argv {
            match node.child(token.as_ref()) {
                Some(child) => {
                    node = child;
                    path.push(child);
                    consumed += 1;
                }
                None => break,
            }
        }

        if !node.is_runnable() {
            return Err(RegistryError::NotRunnable {
                path: join_path(&path),
                token: argv.get(consumed).map(|t| t.as_ref().to_string()),
            });
        }

        Ok(Matched { path, consumed })
    }

    pub fn to_clap(&self) -> Command {
        self.root.to_clap()
    }
}

fn join_path(path: &[&CommandNode]) -> String {
    path.iter().map(|n| n.name()).collect::<Vec<_>>().join(" ")
}
