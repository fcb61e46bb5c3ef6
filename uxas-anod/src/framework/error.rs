/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use uxas_support::CommandError;

/// Failure to talk to the build framework.
///
/// A *failing action* is not an error: it is an
/// [`ActionStatus`](super::ActionStatus) in the execution result.
#[derive(Debug, Error)]
pub enum FrameworkError {
    /// The driver could not be started or exited non-zero.
    #[error("build driver `{verb}` step failed: {source}")]
    Driver {
        verb: &'static str,
        source: CommandError,
    },

    #[error("cannot prepare {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("cannot parse driver report {}: {source}", path.display())]
    Report {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}
