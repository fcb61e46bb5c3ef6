/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The build framework seam.
//!
//! The framework owns the action graph, the sandbox layout and the build
//! itself.  `anod` only needs four things from it:
//!
//! | Step | Method |
//! |---|---|
//! | create sandbox directories | [`BuildFramework::create_sandbox`] |
//! | add a `build` action and schedule it | [`BuildFramework::schedule`] |
//! | run the action list | [`BuildFramework::execute`] |
//! | get the build instance for a spec | [`BuildFramework::instance`] |
//!
//! A build instance may or may not be able to export its build environment.
//! That is answered explicitly by [`BuildInstance::capability`] instead of
//! being guessed from its attributes.

pub mod driver;
pub mod error;
pub mod status;

pub use driver::DriverFramework;
pub use error::FrameworkError;
pub use status::{overall_exit_code, ActionStatus};

use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use serde::Deserialize;

/// Environment snapshot handed to the framework.
pub type Env = BTreeMap<String, String>;

/// Captures the current process environment.
///
/// Variables whose name or value is not valid UTF-8 are left out of the
/// snapshot.  The driver still inherits them, since the snapshot is laid over
/// the inherited environment rather than replacing it.
pub fn env_snapshot() -> Env {
    env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

// ── Request / action ──────────────────────────────────────────────────────────

/// A `build` request for one spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// Basename of the `.anod` spec, without extension.
    pub spec_name: String,
    pub qualifier: Option<String>,
    pub sandbox_dir: PathBuf,
    pub spec_dir: PathBuf,
    pub env: Env,
}

/// One scheduled action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Action {
    /// Unique action name, e.g. `build.uxas`; keys the execution result.
    pub name: String,
}

// ── Traits ────────────────────────────────────────────────────────────────────

pub trait BuildFramework {
    fn create_sandbox(&self, request: &BuildRequest) -> Result<(), FrameworkError>;

    fn schedule(&self, request: &BuildRequest) -> Result<Vec<Action>, FrameworkError>;

    /// Runs `actions` and returns the status of each, keyed by action name.
    fn execute(
        &self,
        request: &BuildRequest,
        actions: &[Action],
        force: bool,
    ) -> Result<BTreeMap<String, ActionStatus>, FrameworkError>;

    fn instance<'a>(
        &'a self,
        request: &BuildRequest,
    ) -> Result<Box<dyn BuildInstance + 'a>, FrameworkError>;
}

pub trait BuildInstance {
    fn name(&self) -> &str;

    fn capability(&self) -> EnvCapability<'_>;
}

/// Whether a build instance can export its build environment.
pub enum EnvCapability<'a> {
    Exports(&'a dyn EnvExport),
    Unsupported,
}

pub trait EnvExport {
    /// Returns the environment the build would run in.
    fn build_setenv(&self) -> Result<Env, FrameworkError>;
}
