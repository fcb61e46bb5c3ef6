/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Logging configuration.
//!
//! Every binary builds one [`LogConfig`] from its [`LoggingArgs`] at start-up
//! and installs it exactly once.  Library code never touches the subscriber;
//! it only emits `tracing` events.  Tests use [`LogConfig::subscriber`] with
//! `tracing::subscriber::with_default` to capture output in isolation.
//!
//! Two layers are attached to the registry:
//!
//! | Layer | Destination | Format | Level |
//! |---|---|---|---|
//! | console | stderr | `LEVEL message` | `-v` / `-vv` / `--loglevel` / binary default |
//! | file (optional) | `--log-file` | time, target, level, message | `DEBUG` |

use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{ArgAction, Args, ValueEnum};
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, EnvFilter, Layer};

// ── CLI arguments ─────────────────────────────────────────────────────────────

/// Console log level names accepted by `--loglevel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    /// Alias for `ERROR`; `tracing` has no level above it.
    Critical,
}

impl LogLevel {
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Critical => LevelFilter::ERROR,
        }
    }
}

/// The "logging arguments" group shared by every binary.
///
/// All arguments are global so they can follow a subcommand.
#[derive(Debug, Clone, Default, Args)]
#[command(next_help_heading = "Logging arguments")]
pub struct LoggingArgs {
    /// Make the log output on the console more verbose (-v: info, -vv: debug).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Store all the logs into the specified file.
    #[arg(long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Set the console log level.
    #[arg(long = "loglevel", value_enum, ignore_case = true, global = true)]
    pub loglevel: Option<LogLevel>,
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LogError {
    #[error("cannot open log file {}: {source}", path.display())]
    OpenLogFile { path: PathBuf, source: io::Error },

    #[error("a global logger is already installed: {0}")]
    Install(#[from] TryInitError),
}

// ── LogConfig ─────────────────────────────────────────────────────────────────

/// Explicit logging configuration, constructed once per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    console_level: LevelFilter,
    log_file: Option<PathBuf>,
    /// When set, a valid `RUST_LOG` replaces `console_level` for the console.
    env_override: bool,
    /// Colour the console level; off when stderr is not a terminal.
    ansi: bool,
}

impl LogConfig {
    pub fn new(console_level: LevelFilter) -> Self {
        Self {
            console_level,
            log_file: None,
            env_override: true,
            ansi: io::stderr().is_terminal(),
        }
    }

    /// Resolves the console level:
    /// `-v` → INFO, `-vv` (or more) → DEBUG, otherwise `--loglevel`, otherwise
    /// `default_level`.
    pub fn from_args(args: &LoggingArgs, default_level: LevelFilter) -> Self {
        let console_level = match args.verbose {
            0 => args
                .loglevel
                .map(LogLevel::filter)
                .unwrap_or(default_level),
            1 => LevelFilter::INFO,
            _ => LevelFilter::DEBUG,
        };

        Self {
            console_level,
            log_file: args.log_file.clone(),
            env_override: true,
            ansi: io::stderr().is_terminal(),
        }
    }

    pub fn with_console_level(mut self, level: LevelFilter) -> Self {
        self.console_level = level;
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Ignore `RUST_LOG`; used by tests so the environment cannot leak in.
    pub fn without_env_override(mut self) -> Self {
        self.env_override = false;
        self
    }

    pub fn console_level(&self) -> LevelFilter {
        self.console_level
    }

    fn console_filter(&self) -> EnvFilter {
        let fallback = || EnvFilter::new(self.console_level.to_string());
        if self.env_override {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
        } else {
            fallback()
        }
    }

    /// Builds the subscriber without installing it.
    ///
    /// # Errors
    /// Returns [`LogError::OpenLogFile`] if the log file cannot be opened for
    /// appending.
    pub fn subscriber(&self) -> Result<impl Subscriber + Send + Sync, LogError> {
        self.subscriber_with_console(io::stderr)
    }

    fn subscriber_with_console<W>(
        &self,
        console_writer: W,
    ) -> Result<impl Subscriber + Send + Sync, LogError>
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let console = fmt::layer()
            .with_writer(console_writer)
            .with_ansi(self.ansi)
            .without_time()
            .with_target(false)
            .with_filter(self.console_filter());

        let file = match &self.log_file {
            Some(path) => {
                let handle = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|source| LogError::OpenLogFile {
                        path: path.clone(),
                        source,
                    })?;
                Some(
                    fmt::layer()
                        .with_writer(Mutex::new(handle))
                        .with_ansi(false)
                        .with_target(true)
                        .with_filter(LevelFilter::DEBUG),
                )
            }
            None => None,
        };

        Ok(tracing_subscriber::registry().with(console).with(file))
    }

    /// Installs the subscriber as the process-wide default.
    pub fn init(&self) -> Result<(), LogError> {
        self.subscriber()?.try_init()?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
