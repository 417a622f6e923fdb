//! Dispatcher: parse, resolve configuration, initialize logging, run the leaf
//!
//! One invocation walks `Parsing -> Resolving -> Executing -> Terminal`.
//! Resolution and logging setup happen exactly once, before the leaf body.

use std::ffi::OsString;
use std::io::Write;

use clap::error::ErrorKind;
use clap::{ArgMatches, Command, FromArgMatches};
use tracing::{debug, debug_span, trace, warn};

use crate::cli::{self, output, CliError, CliResult, GlobalArgs};
use crate::config::{self, ConfigSources, ProcessEnv, ResolvedConfig};
use crate::exitcode;
use crate::logging::{self, RuntimeSettings};
use crate::registry::{CommandTree, Invocation};

/// Run one invocation and return the process exit code.
///
/// Errors are reported on `err`; command output goes to `out`.
pub fn run<I, T>(args: I, env: &ProcessEnv, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match dispatch(args, env, out, err) {
        Ok(()) => exitcode::OK,
        Err(e) => {
            if e.needs_report() {
                output::error(err, &e);
            }
            e.exit_code()
        }
    }
}

/// Like [`run`] but returns the error instead of printing it.
///
/// # Errors
/// Any [`CliError`]; clap errors are rendered to `err` and returned as
/// [`CliError::Parse`].
pub fn dispatch<I, T>(
    args: I,
    env: &ProcessEnv,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    // Parsing
    let tree = cli::command_tree()?;
    let mut command = root_command(&tree);
    let matches = match command.try_get_matches_from_mut(args) {
        Ok(matches) => matches,
        Err(e) => return handle_parse_error(&e, out, err),
    };

    let (path, leaf_matches) = subcommand_path(&matches);
    let matched = match tree.match_args(path.as_slice()) {
        Ok(matched) => matched,
        Err(e) => {
            let _ = write!(err, "{}", render_help(&mut command, &path));
            return Err(e.into());
        }
    };

    // Resolving
    let globals =
        GlobalArgs::from_arg_matches(&matches).map_err(|e| CliError::Usage(e.to_string()))?;
    let resolved = config::resolve(&ConfigSources {
        flags: globals.flag_values(),
        explicit_path: globals.config_path(),
        env,
    })?;
    if let Some(file) = resolved.file_used() {
        output::info(err, &format!("Using config file: {}", file.display()));
    }

    let settings = RuntimeSettings::from_config(&resolved);
    logging::init(&settings);
    trace_resolution(&resolved, &settings);

    // Executing
    let display_path = matched.display_path();
    let span = debug_span!("command", path = %display_path);
    let _guard = span.enter();
    debug!("running command");

    let mut invocation = Invocation {
        settings: &settings,
        config: &resolved,
        matches: leaf_matches,
        command: &command,
        out,
    };
    let result = matched.node().run(&mut invocation);
    match &result {
        Ok(()) => debug!("command finished"),
        Err(e) => debug!(error = %e, "command failed"),
    }
    result.map_err(CliError::Leaf)
}

fn root_command(tree: &CommandTree) -> Command {
    tree.to_clap()
        .name(cli::NAME)
        .bin_name(cli::NAME)
        .version(env!("CARGO_PKG_VERSION"))
}

/// Help and version requests succeed; everything else is a usage error.
fn handle_parse_error(
    e: &clap::Error,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> CliResult<()> {
    let rendered = e.render().to_string();
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = write!(out, "{rendered}");
            Ok(())
        }
        _ => {
            let _ = write!(err, "{rendered}");
            Err(CliError::Parse(e.kind()))
        }
    }
}

/// Names of the subcommands clap matched, and the deepest matches.
fn subcommand_path(matches: &ArgMatches) -> (Vec<&str>, &ArgMatches) {
    let mut path = Vec::new();
    let mut current = matches;
    while let Some((name, sub)) = current.subcommand() {
        path.push(name);
        current = sub;
    }
    (path, current)
}

fn render_help(command: &mut Command, path: &[&str]) -> String {
    command.build();
    let mut target = command.clone();
    for name in path {
        match target.find_subcommand(name) {
            Some(sub) => target = sub.clone(),
            None => break,
        }
    }
    target.render_help().to_string()
}

fn trace_resolution(resolved: &ResolvedConfig, settings: &RuntimeSettings) {
    if let Some(path) = resolved.config_path() {
        trace!(path = %path.display(), read = resolved.file_used().is_some(), "config file");
    }
    for entry in resolved.entries() {
        trace!(
            key = entry.key.name,
            value = %entry.value,
            source = %entry.tier,
            "resolved configuration value"
        );
    }
    for rejected in resolved.rejected() {
        warn!(
            key = rejected.key,
            source = %rejected.tier,
            value = %rejected.raw,
            "ignoring unparsable configuration value"
        );
    }
    trace!(
        verbosity = settings.verbosity.value(),
        format = %settings.format,
        "runtime settings"
    );
}
