//! Run configuration: where OpenUxAS and OpenAMASE live, which process(es) to
//! start, and how the control process is shut down.
//!
//! The default directories match the sandbox layout produced by the bootstrap
//! build (`sbx/x86_64-linux/...` under the bootstrap checkout).  The
//! environment variables [`AMASE_ENV_KEY`] and [`UXAS_ENV_KEY`] take
//! precedence over them; an explicit command-line flag takes precedence over
//! both.

use std::path::{Path, PathBuf};
use std::time::Duration;

// ── Constants ─────────────────────────────────────────────────────────────────

pub const AMASE_ENV_KEY: &str = "OPENAMASE_DIR";
pub const UXAS_ENV_KEY: &str = "OPENUXAS_DIR";

/// Seconds the control process gets to exit after the termination request.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;

const SANDBOX_PLATFORM: &str = "x86_64-linux";

pub fn default_amase_dir(root: &Path) -> PathBuf {
    root.join("sbx")
        .join(SANDBOX_PLATFORM)
        .join("amase")
        .join("src")
}

pub fn default_uxas_dir(root: &Path) -> PathBuf {
    root.join("sbx")
        .join(SANDBOX_PLATFORM)
        .join("uxas-release")
        .join("src")
}

// ── Run mode ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// OpenAMASE only (`--amase`).
    Simulation,
    /// OpenUxAS only (`--uxas`).
    Control,
    /// OpenUxAS in the background, OpenAMASE in the foreground.
    Both,
}

impl RunMode {
    /// `--amase` takes precedence when both flags are given.
    pub fn from_flags(amase: bool, uxas: bool) -> Self {
        match (amase, uxas) {
            (true, _) => RunMode::Simulation,
            (false, true) => RunMode::Control,
            (false, false) => RunMode::Both,
        }
    }
}

// ── Shutdown policy ───────────────────────────────────────────────────────────

/// What happens to the background control process once the simulation exits.
///
/// Either way exactly one termination request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownPolicy {
    /// Send the request and return immediately.
    FireAndForget,
    /// Wait up to the given duration, then kill.
    Grace(Duration),
}

impl ShutdownPolicy {
    /// `0` selects [`ShutdownPolicy::FireAndForget`].
    pub fn from_timeout_secs(secs: u64) -> Self {
        if secs == 0 {
            ShutdownPolicy::FireAndForget
        } else {
            ShutdownPolicy::Grace(Duration::from_secs(secs))
        }
    }
}

impl Default for ShutdownPolicy {
    fn default() -> Self {
        ShutdownPolicy::Grace(Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS))
    }
}

// ── RunConfig ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Example path relative to `<uxas_dir>/examples`.
    pub example: PathBuf,
    pub amase_dir: PathBuf,
    pub uxas_dir: PathBuf,
    pub mode: RunMode,
    pub shutdown: ShutdownPolicy,
    /// Print commands instead of running them; no RUNDIR is created.
    pub dry_run: bool,
}

impl RunConfig {
    pub fn new(example: impl Into<PathBuf>, amase_dir: PathBuf, uxas_dir: PathBuf) -> Self {
        Self {
            example: example.into(),
            amase_dir,
            uxas_dir,
            mode: RunMode::Both,
            shutdown: ShutdownPolicy::default(),
            dry_run: false,
        }
    }

    pub fn example_dir(&self) -> PathBuf {
        self.uxas_dir.join("examples").join(&self.example)
    }
}
