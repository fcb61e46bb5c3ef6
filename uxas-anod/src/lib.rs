/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! `anod` – OpenUxAS build entry points.
//!
//! Nothing here schedules or builds anything itself: the commands assemble a
//! [`BuildRequest`](framework::BuildRequest) and hand it to a
//! [`BuildFramework`](framework::BuildFramework).
//!
//! ```text
//! lib.rs
//! ├── framework/      – framework seam, action status, driver adapter
//! ├── commands/       – `build`, `configure-vscode`
//! ├── paths           – bootstrap root, spec and sandbox directories
//! └── vscode          – c_cpp_properties.json rendering
//! ```

pub mod commands;
pub mod framework;
pub mod paths;
pub mod vscode;
