/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! [`BuildFramework`] backed by an external driver executable.
//!
//! Every step is one driver invocation:
//!
//! ```text
//! <driver> <verb> <spec> [--qualifier Q] --sandbox-dir D --spec-dir S
//!          [--force] [--action NAME]... [--report FILE]
//! ```
//!
//! The driver inherits stdio (build output goes straight to the terminal) and
//! runs with the request's environment snapshot laid over the inherited
//! environment.  Structured answers are written to the report file, YAML or
//! JSON:
//!
//! | Verb | Report |
//! |---|---|
//! | `create-sandbox` | – |
//! | `schedule` | `actions: [{name: build.uxas}, ...]` |
//! | `execute` | `statuses: {build.uxas: success, ...}` |
//!
//! `execute` gets one `--action` per scheduled action, in schedule order,
//! and must run exactly that list rather than planning again.
//! | `instance` | `name: uxas`, `capabilities: [build_setenv]` |
//! | `setenv` | `env: {CPLUS_INCLUDE_PATH: ..., ...}` |

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use uxas_support::{run_checked, Command};

use super::{
    Action, ActionStatus, BuildFramework, BuildInstance, BuildRequest, Env, EnvCapability,
    EnvExport, FrameworkError,
};

pub const DEFAULT_DRIVER: &str = "e3-anod-driver";
pub const DRIVER_ENV_KEY: &str = "ANOD_DRIVER";

const SETENV_CAPABILITY: &str = "build_setenv";

// ── Report formats ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ScheduleReport {
    #[serde(default)]
    actions: Vec<Action>,
}

#[derive(Debug, Deserialize)]
struct ExecuteReport {
    #[serde(default)]
    statuses: BTreeMap<String, ActionStatus>,
}

#[derive(Debug, Deserialize)]
struct InstanceReport {
    name: String,
    #[serde(default)]
    capabilities: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SetenvReport {
    #[serde(default)]
    env: Env,
}

// ── DriverFramework ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DriverFramework {
    driver: PathBuf,
}

impl DriverFramework {
    pub fn new(driver: impl Into<PathBuf>) -> Self {
        Self {
            driver: driver.into(),
        }
    }

    pub fn driver(&self) -> &Path {
        &self.driver
    }

    fn command(
        &self,
        verb: &str,
        request: &BuildRequest,
        force: bool,
        actions: &[Action],
        report: Option<&Path>,
    ) -> Command {
        let mut cmd = Command::new(&self.driver)
            .arg(verb)
            .arg(&request.spec_name);
        if let Some(qualifier) = &request.qualifier {
            cmd = cmd.arg("--qualifier").arg(qualifier);
        }
        cmd = cmd
            .arg("--sandbox-dir")
            .arg(&request.sandbox_dir)
            .arg("--spec-dir")
            .arg(&request.spec_dir);
        if force {
            cmd = cmd.arg("--force");
        }
        for action in actions {
            cmd = cmd.arg("--action").arg(&action.name);
        }
        if let Some(report) = report {
            cmd = cmd.arg("--report").arg(report);
        }

        cmd.with_env(request.env.clone())
            .with_description(format!("anod {} {}", verb, request.spec_name))
    }

    /// Report files live in the sandbox's `tmp` directory.
    fn report_path(request: &BuildRequest, verb: &str) -> PathBuf {
        request
            .sandbox_dir
            .join("tmp")
            .join(format!("anod-{verb}.yaml"))
    }

    fn run(&self, verb: &'static str, cmd: &Command) -> Result<(), FrameworkError> {
        run_checked(cmd, false).map_err(|source| FrameworkError::Driver { verb, source })
    }

    /// Runs `verb` and parses its report.  A stale report from an earlier run
    /// is removed first so it can never be mistaken for this one.
    fn invoke<T: DeserializeOwned>(
        &self,
        verb: &'static str,
        request: &BuildRequest,
        force: bool,
        actions: &[Action],
    ) -> Result<T, FrameworkError> {
        let report = Self::report_path(request, verb);
        let io_err = |source: io::Error| FrameworkError::Io {
            path: report.clone(),
            source,
        };

        if let Some(parent) = report.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        match fs::remove_file(&report) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(io_err(e)),
        }

        self.run(verb, &self.command(verb, request, force, actions, Some(&report)))?;

        let text = fs::read_to_string(&report).map_err(io_err)?;
        debug!(verb, report = %report.display(), "Parsing driver report");
        serde_yaml::from_str(&text).map_err(|source| FrameworkError::Report {
            path: report.clone(),
            source,
        })
    }
}

impl BuildFramework for DriverFramework {
    fn create_sandbox(&self, request: &BuildRequest) -> Result<(), FrameworkError> {
        fs::create_dir_all(&request.sandbox_dir).map_err(|source| FrameworkError::Io {
            path: request.sandbox_dir.clone(),
            source,
        })?;
        self.run(
            "create-sandbox",
            &self.command("create-sandbox", request, false, &[], None),
        )
    }

    fn schedule(&self, request: &BuildRequest) -> Result<Vec<Action>, FrameworkError> {
        let report: ScheduleReport = self.invoke("schedule", request, false, &[])?;
        Ok(report.actions)
    }

    fn execute(
        &self,
        request: &BuildRequest,
        actions: &[Action],
        force: bool,
    ) -> Result<BTreeMap<String, ActionStatus>, FrameworkError> {
        let report: ExecuteReport = self.invoke("execute", request, force, actions)?;
        Ok(report.statuses)
    }

    fn instance<'a>(
        &'a self,
        request: &BuildRequest,
    ) -> Result<Box<dyn BuildInstance + 'a>, FrameworkError> {
        let report: InstanceReport = self.invoke("instance", request, false, &[])?;
        let exports_env = report.capabilities.iter().any(|c| c == SETENV_CAPABILITY);

        Ok(Box::new(DriverInstance {
            framework: self,
            request: request.clone(),
            name: report.name,
            exports_env,
        }))
    }
}

// ── DriverInstance ────────────────────────────────────────────────────────────

struct DriverInstance<'a> {
    framework: &'a DriverFramework,
    request: BuildRequest,
    name: String,
    exports_env: bool,
}

impl BuildInstance for DriverInstance<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn capability(&self) -> EnvCapability<'_> {
        if self.exports_env {
            EnvCapability::Exports(self)
        } else {
            EnvCapability::Unsupported
        }
    }
}

impl EnvExport for DriverInstance<'_> {
    fn build_setenv(&self) -> Result<Env, FrameworkError> {
        let report: SetenvReport = self.framework.invoke("setenv", &self.request, false, &[])?;
        Ok(report.env)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
