/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! `run-example` – start OpenUxAS, OpenAMASE or both for one example.
//!
//! ```text
//! lib.rs
//! ├── config          – directories, run mode, shutdown policy
//! ├── example/        – scenario / config discovery, RUNDIR
//! ├── launch/         – command lines + process launchers
//! └── orchestrator    – the three run modes
//! ```

pub mod config;
pub mod example;
pub mod launch;
pub mod orchestrator;

pub use config::{RunConfig, RunMode, ShutdownPolicy};
pub use example::{Example, ExampleError};
pub use orchestrator::{Orchestrator, OrchestratorError};
