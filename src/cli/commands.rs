//! Bodies of the bundled leaf commands

use std::fs;
use std::io::{Read, Write};

use anyhow::{bail, Context, Result};
use clap::FromArgMatches;
use clap_complete::generate;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use tracing::{debug, info, instrument};

use crate::cli::args::{CompletionArgs, ConfigInitArgs, HashArgs, HashFunction};
use crate::cli::output;
use crate::config;
use crate::registry::Invocation;

pub fn version(inv: &mut Invocation<'_>) -> Result<()> {
    writeln!(
        inv.out,
        "{} v{} {}/{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )?;
    Ok(())
}

pub fn hash(inv: &mut Invocation<'_>) -> Result<()> {
    let args = HashArgs::from_arg_matches(inv.matches)?;
    let data = match (&args.input, &args.file) {
        (Some(text), _) => text.clone().into_bytes(),
        (None, Some(path)) => {
            fs::read(path).with_context(|| format!("read {}", path.display()))?
        }
        (None, None) => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("read stdin")?;
            buf
        }
    };
    debug!(function = ?args.function, bytes = data.len(), "hashing input");
    writeln!(inv.out, "{}", digest_hex(args.function, &data))?;
    Ok(())
}

/// Lowercase hex digest of `data`.
pub fn digest_hex(function: HashFunction, data: &[u8]) -> String {
    match function {
        HashFunction::Sha224 => hex::encode(Sha224::digest(data)),
        HashFunction::Sha256 => hex::encode(Sha256::digest(data)),
        HashFunction::Sha384 => hex::encode(Sha384::digest(data)),
        HashFunction::Sha512 => hex::encode(Sha512::digest(data)),
    }
}

pub fn config_show(inv: &mut Invocation<'_>) -> Result<()> {
    output::header(inv.out, "Configuration")?;
    for entry in inv.config.entries() {
        output::detail(inv.out, entry.key.name, &entry.value, &entry.tier.to_string())?;
    }
    let file = match inv.config.file_used() {
        Some(path) => path.display().to_string(),
        None => "none".to_string(),
    };
    writeln!(inv.out, "  file: {file}")?;

    output::header(inv.out, "Runtime settings")?;
    writeln!(inv.out, "  verbosity: {}", inv.settings.verbosity)?;
    writeln!(inv.out, "  log format: {}", inv.settings.format)?;
    Ok(())
}

pub fn config_path(inv: &mut Invocation<'_>) -> Result<()> {
    match inv.config.config_path() {
        Some(path) => {
            let state = if path.exists() { "exists" } else { "not found" };
            writeln!(inv.out, "{} ({state})", path.display())?;
        }
        None => writeln!(inv.out, "none")?,
    }
    Ok(())
}

#[instrument(skip(inv))]
pub fn config_init(inv: &mut Invocation<'_>) -> Result<()> {
    let args = ConfigInitArgs::from_arg_matches(inv.matches)?;
    let Some(path) = inv.config.config_path() else {
        bail!("no config file location available");
    };
    if path.exists() && !args.force {
        bail!(
            "config file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
    }
    fs::write(path, config::template())
        .with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "wrote config template");
    output::info(inv.out, &format!("Created {}", path.display()));
    Ok(())
}

pub fn completion(inv: &mut Invocation<'_>) -> Result<()> {
    let args = CompletionArgs::from_arg_matches(inv.matches)?;
    let mut cmd = inv.command.clone();
    let name = cmd.get_name().to_string();
    generate(args.shell, &mut cmd, name, inv.out);
    Ok(())
}
