/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! External command description, formatting and execution.
//!
//! A [`Command`] is an argument vector plus an optional human description,
//! working directory and environment.  It is plain data: the binaries decide
//! whether to run it synchronously ([`log_command`], [`run_checked`]), hand it
//! to an async launcher, or just print it (dry run).

use std::collections::BTreeMap;
use std::env;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::process::ExitStatus;

use thiserror::Error;
use tracing::{debug, error, info};

// ── Command ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Program followed by its arguments; never empty.
    argv: Vec<OsString>,
    description: Option<String>,
    cwd: Option<PathBuf>,
    /// Variables set on top of the inherited environment.
    env: Option<BTreeMap<String, String>>,
}

impl Command {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            argv: vec![program.into()],
            description: None,
            cwd: None,
            env: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.argv.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.argv.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Sets `env` on top of the inherited environment.  Inherited variables
    /// not named in `env` (including non-UTF-8 ones) reach the child as-is.
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    pub fn argv(&self) -> &[OsString] {
        &self.argv
    }

    pub fn program(&self) -> &OsStr {
        &self.argv[0]
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn env(&self) -> Option<&BTreeMap<String, String>> {
        self.env.as_ref()
    }

    /// Converts to a `std::process::Command` with stdio inherited.
    pub fn to_std(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.argv[0]);
        cmd.args(&self.argv[1..]);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        if let Some(env) = &self.env {
            cmd.envs(env);
        }
        cmd
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to start {program}: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("{what} failed (exit code {code})")]
    Failed { what: String, code: i32 },
}

// ── Formatting ────────────────────────────────────────────────────────────────

/// Renders `command` as a shell-like line.
///
/// With a working directory the result is `(cd <dir> && <argv>)`, where
/// `<dir>` is relative to the current directory when possible.
pub fn format_command(command: &Command) -> String {
    let line = command
        .argv
        .iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");

    match &command.cwd {
        Some(cwd) => {
            let shown = match env::current_dir() {
                Ok(base) => relative_path(cwd, &base),
                Err(_) => cwd.clone(),
            };
            format!("(cd {} && {})", shown.display(), line)
        }
        None => line,
    }
}

/// Folds `.` and `..` components without touching the file system.
///
/// A `..` directly under the root is dropped; leading `..` of a relative path
/// are kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().map(|c| c.as_os_str()).collect()
}

/// `path` expressed relative to `base`, both normalised first.
///
/// Falls back to `path` unchanged when the two cannot be related (one is
/// relative and the other absolute, or they sit on different prefixes).
pub fn relative_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() != base.is_absolute() {
        return path.to_path_buf();
    }

    let (path, base) = (normalize_path(path), normalize_path(base));
    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();

    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    // Different drive / root prefix: nothing to share.
    if common == 0 && path.is_absolute() {
        return path.to_path_buf();
    }

    let mut rel = PathBuf::new();
    for _ in common..base_parts.len() {
        rel.push("..");
    }
    for part in &path_parts[common..] {
        rel.push(part.as_os_str());
    }

    if rel.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        rel
    }
}

/// Exit code of a finished child.  A signal-terminated child on Unix maps to
/// the negated signal number.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}

// ── Execution ─────────────────────────────────────────────────────────────────

/// Logs and runs `command`, returning its exit code.
///
/// The description is logged at INFO and the formatted command at DEBUG.  In
/// dry-run mode the formatted command is printed to stdout and nothing runs.
///
/// # Errors
/// Returns [`CommandError::Spawn`] if the program cannot be started.
pub fn log_command(command: &Command, dry_run: bool) -> Result<i32, CommandError> {
    if let Some(description) = command.description() {
        info!("{}", description);
    }

    let line = format_command(command);
    debug!("{}", line);

    if dry_run {
        println!("{}", line);
        return Ok(0);
    }

    let status = command
        .to_std()
        .status()
        .map_err(|source| CommandError::Spawn {
            program: command.program().to_string_lossy().into_owned(),
            source,
        })?;

    Ok(exit_code(status))
}

/// Like [`log_command`], but a non-zero exit is logged as an error and
/// returned as [`CommandError::Failed`].
pub fn run_checked(command: &Command, dry_run: bool) -> Result<(), CommandError> {
    let code = log_command(command, dry_run)?;
    if code == 0 {
        return Ok(());
    }

    let what = match command.description() {
        Some(description) => description.to_string(),
        None => format_command(command),
    };
    error!("{} failed.", what);

    Err(CommandError::Failed { what, code })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
