/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Errors raised while resolving an example directory.
//!
//! `ScenarioNotFound`, `ConfigNotFound` and `ExampleNotFound` are the
//! "resource not found" family: the run cannot go ahead and the user has to
//! fix the example path or its contents.  Several scenario files are *not* an
//! error – see [`resolve_example_name`](super::resolve_example_name).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExampleError {
    /// The example directory itself does not exist.
    #[error("Example directory {} does not exist", dir.display())]
    ExampleNotFound { dir: PathBuf },

    /// No `Scenario_*.xml` in the example directory.
    #[error("No scenario file found in {}", dir.display())]
    ScenarioNotFound { dir: PathBuf },

    /// Neither `cfg_<name>.xml` nor `<name>_cfg.xml` exists.
    #[error("Neither {first} nor {second} are found in {}", dir.display())]
    ConfigNotFound {
        first: String,
        second: String,
        dir: PathBuf,
    },

    #[error("Cannot read example directory {}: {source}", dir.display())]
    ReadDir { dir: PathBuf, source: io::Error },

    #[error("Cannot create working directory {}: {source}", dir.display())]
    CreateWorkingDir { dir: PathBuf, source: io::Error },
}

impl ExampleError {
    /// `true` for the variants that mean a required file or directory is
    /// missing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ExampleError::ExampleNotFound { .. }
                | ExampleError::ScenarioNotFound { .. }
                | ExampleError::ConfigNotFound { .. }
        )
    }
}
