/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Process launchers.
//!
//! The orchestrator talks to child processes only through [`ProcessLauncher`]
//! and [`ProcessHandle`], so its ordering rules (spawn control, run
//! simulation, terminate control) can be tested without real programs.
//!
//! | Launcher | `run` | `spawn` |
//! |---|---|---|
//! | [`SystemLauncher`] | tokio child, awaited | tokio child, handle kept |
//! | [`DryRunLauncher`] | prints the command | prints the command |

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use uxas_support::command::{exit_code, format_command};
use uxas_support::Command;

// ── Exit ──────────────────────────────────────────────────────────────────────

/// How a child process finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exit {
    /// `None` when no exit code is available (e.g. killed by a signal).
    code: Option<i32>,
}

impl Exit {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn without_code() -> Self {
        Self { code: None }
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for Exit {
    fn from(status: std::process::ExitStatus) -> Self {
        match status.code() {
            Some(code) => Exit::from_code(code),
            None => {
                debug!(status = exit_code(status), "Process ended without an exit code");
                Exit::without_code()
            }
        }
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start {program}: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("failed while waiting for {program}: {source}")]
    Wait { program: String, source: io::Error },
}

fn program_name(command: &Command) -> String {
    command.program().to_string_lossy().into_owned()
}

// ── Traits ────────────────────────────────────────────────────────────────────

/// Starts external commands.
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    type Handle: ProcessHandle;

    /// Starts `command` and waits for it to finish.
    async fn run(&self, command: &Command) -> Result<Exit, LaunchError>;

    /// Starts `command` and returns without waiting.
    fn spawn(&self, command: &Command) -> Result<Self::Handle, LaunchError>;
}

/// A child started by [`ProcessLauncher::spawn`].
#[async_trait]
pub trait ProcessHandle: Send {
    /// Asks the process to stop (SIGTERM on Unix).  Does not wait.
    fn terminate(&mut self) -> io::Result<()>;

    /// Waits up to `timeout` for the process to exit; `Ok(None)` if it is
    /// still running.
    async fn wait_timeout(&mut self, timeout: Duration) -> io::Result<Option<Exit>>;

    /// Forcibly stops the process (SIGKILL on Unix).  Does not wait.
    fn kill(&mut self) -> io::Result<()>;
}

// ── SystemLauncher ────────────────────────────────────────────────────────────

/// Runs real processes with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

#[async_trait]
impl ProcessLauncher for SystemLauncher {
    type Handle = SystemProcess;

    async fn run(&self, command: &Command) -> Result<Exit, LaunchError> {
        debug!(command = %format_command(command), "Running in the foreground");

        let mut child = tokio::process::Command::from(command.to_std())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: program_name(command),
                source,
            })?;

        let status = child.wait().await.map_err(|source| LaunchError::Wait {
            program: program_name(command),
            source,
        })?;

        Ok(Exit::from(status))
    }

    fn spawn(&self, command: &Command) -> Result<SystemProcess, LaunchError> {
        debug!(command = %format_command(command), "Starting in the background");

        let child = tokio::process::Command::from(command.to_std())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: program_name(command),
                source,
            })?;

        Ok(SystemProcess {
            child,
            program: program_name(command),
        })
    }
}

/// A background child owned by the orchestrator.
///
/// Dropping it does not kill the process.
#[derive(Debug)]
pub struct SystemProcess {
    child: tokio::process::Child,
    program: String,
}

impl SystemProcess {
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }
}

#[async_trait]
impl ProcessHandle for SystemProcess {
    #[cfg(unix)]
    fn terminate(&mut self) -> io::Result<()> {
        // Already reaped: nothing left to signal.
        let Some(pid) = self.child.id() else {
            return Ok(());
        };
        let pid = libc::pid_t::try_from(pid)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
        debug!(program = %self.program, pid, "Sending SIGTERM");

        // SAFETY: `kill` has no memory-safety preconditions; `pid` belongs to
        // a child we have not reaped yet, so it cannot have been recycled.
        let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
        if rc == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    #[cfg(not(unix))]
    fn terminate(&mut self) -> io::Result<()> {
        self.child.start_kill()
    }

    async fn wait_timeout(&mut self, timeout: Duration) -> io::Result<Option<Exit>> {
        match tokio::time::timeout(timeout, self.child.wait()).await {
            Ok(status) => Ok(Some(Exit::from(status?))),
            Err(_elapsed) => Ok(None),
        }
    }

    fn kill(&mut self) -> io::Result<()> {
        debug!(program = %self.program, pid = ?self.child.id(), "Killing");
        self.child.start_kill()
    }
}

// ── DryRunLauncher ────────────────────────────────────────────────────────────

/// Prints each command instead of running it.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunLauncher;

#[async_trait]
impl ProcessLauncher for DryRunLauncher {
    type Handle = DryRunProcess;

    async fn run(&self, command: &Command) -> Result<Exit, LaunchError> {
        println!("{}", format_command(command));
        Ok(Exit::from_code(0))
    }

    fn spawn(&self, command: &Command) -> Result<DryRunProcess, LaunchError> {
        println!("{} &", format_command(command));
        Ok(DryRunProcess)
    }
}

#[derive(Debug)]
pub struct DryRunProcess;

#[async_trait]
impl ProcessHandle for DryRunProcess {
    fn terminate(&mut self) -> io::Result<()> {
        info!("Dry run: would terminate the background process");
        Ok(())
    }

    async fn wait_timeout(&mut self, _timeout: Duration) -> io::Result<Option<Exit>> {
        Ok(Some(Exit::from_code(0)))
    }

    fn kill(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
