/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! `anod configure-vscode` – write the C/C++ extension include paths for a
//! spec's build environment.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use thiserror::Error;
use tracing::{error, info};

use crate::framework::{BuildFramework, BuildRequest, EnvCapability, FrameworkError};
use crate::paths::DEFAULT_VSCODE_OUT;
use crate::vscode::{render_c_cpp_properties, split_include_paths, INCLUDE_PATH_VAR};

#[derive(Debug, Clone, Args)]
pub struct ConfigureArgs {
    /// Spec whose build environment is used.
    #[arg(default_value = "uxas")]
    pub spec_name: String,

    /// Optional qualifier.
    #[arg(long)]
    pub qualifier: Option<String>,

    /// Directory in which build artefacts are stored [default: <cwd>/sbx].
    #[arg(long = "sandbox-dir", value_name = "DIR")]
    pub sandbox_dir: Option<PathBuf>,

    /// Print the configuration instead of writing it.
    #[arg(long, conflicts_with = "out")]
    pub stdout: bool,

    /// Output file [default: develop/OpenUxAS/.vscode/c_cpp_properties.json].
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

impl ConfigureArgs {
    pub fn output(&self) -> Output {
        if self.stdout {
            Output::Stdout
        } else {
            Output::File(
                self.out
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_VSCODE_OUT)),
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Stdout,
    File(PathBuf),
}

#[derive(Debug, Error)]
pub enum ConfigureError {
    #[error(transparent)]
    Framework(#[from] FrameworkError),

    #[error("{var} is not set in the build environment of {spec}")]
    MissingVariable { var: &'static str, spec: String },

    #[error("cannot render c_cpp_properties.json: {0}")]
    Render(#[from] serde_json::Error),

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Generates the configuration and returns the process exit code.
///
/// A spec whose instance does not export a build environment is reported
/// and yields exit code 1; that is not an error of the command itself.
pub fn do_configure(
    framework: &dyn BuildFramework,
    request: &BuildRequest,
    output: &Output,
    stdout: &mut dyn Write,
) -> Result<i32, ConfigureError> {
    let instance = framework.instance(request)?;

    let export = match instance.capability() {
        EnvCapability::Exports(export) => export,
        EnvCapability::Unsupported => {
            error!(
                "Cannot generate a VS Code configuration for {} \
                 because it does not export a build_setenv",
                request.spec_name
            );
            return Ok(1);
        }
    };

    let env = export.build_setenv()?;
    let value = env
        .get(INCLUDE_PATH_VAR)
        .ok_or_else(|| ConfigureError::MissingVariable {
            var: INCLUDE_PATH_VAR,
            spec: request.spec_name.clone(),
        })?;
    let json = render_c_cpp_properties(&split_include_paths(value))?;

    match output {
        Output::Stdout => stdout
            .write_all(json.as_bytes())
            .map_err(|source| ConfigureError::Write {
                path: PathBuf::from("<stdout>"),
                source,
            })?,
        Output::File(path) => {
            let write_err = |source| ConfigureError::Write {
                path: path.clone(),
                source,
            };
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
            fs::write(path, json).map_err(write_err)?;
            info!(
                path = %path.display(),
                instance = instance.name(),
                "Wrote VS Code configuration"
            );
        }
    }

    Ok(0)
}
