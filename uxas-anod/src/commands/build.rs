/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! `anod build` – schedule and run the `build` action of one spec.

use std::path::PathBuf;

use clap::Args;
use tracing::{debug, error, info, warn};

use crate::framework::{
    overall_exit_code, ActionStatus, BuildFramework, BuildRequest, FrameworkError,
};

#[derive(Debug, Clone, Args)]
pub struct BuildArgs {
    /// Spec to build. This is the basename of an .anod file (without the
    /// extension).
    pub spec_name: String,

    /// Optional qualifier.
    #[arg(long)]
    pub qualifier: Option<String>,

    /// Directory in which build artefacts are stored [default: <cwd>/sbx].
    #[arg(long = "sandbox-dir", value_name = "DIR")]
    pub sandbox_dir: Option<PathBuf>,

    /// Force rebuild of everything.
    #[arg(long)]
    pub force: bool,
}

/// Runs the build and returns the process exit code.
///
/// Actions are reported in schedule order; the first one whose status is not
/// in the success set decides the exit code.  An action missing from the
/// execution result counts as [`ActionStatus::Unknown`].
///
/// # Errors
/// Only framework communication failures; failing actions are exit codes.
pub fn do_build(
    framework: &dyn BuildFramework,
    request: &BuildRequest,
    force: bool,
) -> Result<i32, FrameworkError> {
    framework.create_sandbox(request)?;

    let actions = framework.schedule(request)?;
    info!(
        spec = %request.spec_name,
        qualifier = ?request.qualifier,
        action_count = actions.len(),
        "Scheduled build"
    );
    for action in &actions {
        debug!("  {}", action.name);
    }
    if actions.is_empty() {
        warn!("Nothing scheduled for {}", request.spec_name);
    }

    let results = framework.execute(request, &actions, force)?;

    let statuses: Vec<ActionStatus> = actions
        .iter()
        .map(|action| {
            let status = results.get(&action.name).copied().unwrap_or_else(|| {
                warn!(action = %action.name, "No status reported for action");
                ActionStatus::Unknown
            });
            if status.is_success() {
                info!(action = %action.name, status = %status, "Action finished");
            } else {
                error!(
                    action = %action.name,
                    status = %status,
                    code = status.code(),
                    "Action failed"
                );
            }
            status
        })
        .collect();

    Ok(overall_exit_code(statuses))
}
