/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Command lines for the two external programs.
//!
//! * OpenAMASE – a Java application started from `<amase_dir>/OpenAMASE`,
//!   with class path entries relative to that directory.
//! * OpenUxAS – the installed `uxas` binary in the `install/bin` directory
//!   next to `<uxas_dir>`, started from the example's RUNDIR.

pub mod process;

pub use process::{
    DryRunLauncher, Exit, LaunchError, ProcessHandle, ProcessLauncher, SystemLauncher,
};

use std::path::{Path, PathBuf};

use uxas_support::Command;

const AMASE_MAIN_CLASS: &str = "avtas.app.Application";
const AMASE_MAX_HEAP: &str = "-Xmx2048m";

pub fn amase_working_dir(amase_dir: &Path) -> PathBuf {
    amase_dir.join("OpenAMASE")
}

pub fn uxas_binary(uxas_dir: &Path) -> PathBuf {
    uxas_dir.join("..").join("install").join("bin").join("uxas")
}

/// The OpenAMASE invocation for `scenario`, with its working directory set.
pub fn build_sim_command(amase_dir: &Path, scenario: &Path) -> Command {
    let splash = Path::new("data").join("amase_splash.png");
    let classpath = format!(
        "{}:{}",
        Path::new("dist").join("*").display(),
        Path::new("lib").join("*").display()
    );

    Command::new("java")
        .arg(AMASE_MAX_HEAP)
        .arg(format!("-splash:{}", splash.display()))
        .args(["-classpath", classpath.as_str(), AMASE_MAIN_CLASS, "--config"])
        .arg(Path::new("config").join("amase"))
        .arg("--scenario")
        .arg(scenario)
        .with_description("OpenAMASE")
        .with_cwd(amase_working_dir(amase_dir))
}

/// The OpenUxAS invocation for `config`.
///
/// The working directory is left unset: it is the example's RUNDIR, which the
/// caller creates (or, in dry-run, only names).
pub fn build_control_command(uxas_dir: &Path, config: &Path) -> Command {
    Command::new(uxas_binary(uxas_dir))
        .arg("-cfgPath")
        .arg(config)
        .with_description("OpenUxAS")
}
