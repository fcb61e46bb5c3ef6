/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Helpers shared by the OpenUxAS bootstrap binaries.
//!
//! ```text
//! lib.rs
//! ├── log       – logging CLI arguments + explicit `LogConfig`
//! └── command   – command description, formatting and execution
//! ```

pub mod command;
pub mod log;

pub use command::{format_command, log_command, run_checked, Command, CommandError};
pub use log::{LogConfig, LogError, LogLevel, LoggingArgs};
