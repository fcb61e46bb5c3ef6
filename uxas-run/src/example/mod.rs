/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Example directory discovery.
//!
//! An OpenUxAS example is a directory under `<uxas_dir>/examples` holding:
//!
//! ```text
//! 02_Example_WaterwaySearch/
//! ├── Scenario_WaterwaySearch.xml   – read by OpenAMASE
//! ├── cfg_WaterwaySearch.xml        – read by OpenUxAS (or WaterwaySearch_cfg.xml)
//! └── RUNDIR_WaterwaySearch/        – created on demand, OpenUxAS cwd
//! ```
//!
//! The example *name* is taken from the scenario file once and reused for the
//! config lookup and the RUNDIR, so the two XML files must agree on it.

pub mod error;

pub use error::ExampleError;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

// ── Naming conventions ────────────────────────────────────────────────────────

const SCENARIO_PREFIX: &str = "Scenario_";
const XML_SUFFIX: &str = ".xml";
const RUNDIR_PREFIX: &str = "RUNDIR_";

/// `Scenario_<name>.xml` → `<name>`.
fn scenario_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(SCENARIO_PREFIX)?
        .strip_suffix(XML_SUFFIX)
}

pub fn scenario_file_name(name: &str) -> String {
    format!("{SCENARIO_PREFIX}{name}{XML_SUFFIX}")
}

/// The two accepted config file names, in lookup order.
pub fn config_file_names(name: &str) -> [String; 2] {
    [format!("cfg_{name}.xml"), format!("{name}_cfg.xml")]
}

pub fn working_directory_name(name: &str) -> String {
    format!("{RUNDIR_PREFIX}{name}")
}

// ── Operations ────────────────────────────────────────────────────────────────

/// Derives the example name from the `Scenario_<name>.xml` file in
/// `example_dir`.
///
/// Candidates are sorted by file name so the choice does not depend on the
/// file system's listing order.  With more than one candidate the first is
/// used and a single warning is emitted.
///
/// # Errors
/// * [`ExampleError::ExampleNotFound`] – `example_dir` does not exist.
/// * [`ExampleError::ScenarioNotFound`] – no scenario file.
/// * [`ExampleError::ReadDir`] – any other listing failure.
pub fn resolve_example_name(example_dir: &Path) -> Result<String, ExampleError> {
    let read_err = |source: io::Error| {
        if source.kind() == io::ErrorKind::NotFound {
            ExampleError::ExampleNotFound {
                dir: example_dir.to_path_buf(),
            }
        } else {
            ExampleError::ReadDir {
                dir: example_dir.to_path_buf(),
                source,
            }
        }
    };

    let mut scenarios: Vec<String> = Vec::new();
    for entry in fs::read_dir(example_dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        // Non-UTF-8 names cannot follow the naming convention.
        if let Some(file_name) = entry.file_name().to_str() {
            if scenario_name(file_name).is_some() {
                scenarios.push(file_name.to_owned());
            }
        }
    }
    scenarios.sort();

    let Some(chosen) = scenarios.first() else {
        return Err(ExampleError::ScenarioNotFound {
            dir: example_dir.to_path_buf(),
        });
    };

    if scenarios.len() > 1 {
        warn!(
            dir = %example_dir.display(),
            candidates = scenarios.len(),
            "Multiple scenario files found, using the first file: {}",
            chosen
        );
    }

    let name = scenario_name(chosen).unwrap_or_default().to_owned();
    debug!(scenario = %chosen, name = %name, "Resolved example name");
    Ok(name)
}

/// Finds the OpenUxAS config for `name`: `cfg_<name>.xml`, then
/// `<name>_cfg.xml`.
///
/// # Errors
/// [`ExampleError::ConfigNotFound`] naming both candidates.
pub fn locate_config(example_dir: &Path, name: &str) -> Result<PathBuf, ExampleError> {
    let [first, second] = config_file_names(name);

    for candidate in [&first, &second] {
        let path = example_dir.join(candidate);
        if path.exists() {
            debug!(config = %path.display(), "Found OpenUxAS config");
            return Ok(path);
        }
    }

    Err(ExampleError::ConfigNotFound {
        first,
        second,
        dir: example_dir.to_path_buf(),
    })
}

/// Creates `<example_dir>/RUNDIR_<name>` (and any missing parents) and returns
/// it.  Safe to call repeatedly.
pub fn prepare_working_directory(example_dir: &Path, name: &str) -> Result<PathBuf, ExampleError> {
    let dir = example_dir.join(working_directory_name(name));
    fs::create_dir_all(&dir).map_err(|source| ExampleError::CreateWorkingDir {
        dir: dir.clone(),
        source,
    })?;
    Ok(dir)
}

// ── Example ───────────────────────────────────────────────────────────────────

/// A resolved example: its directory and the name derived from its scenario.
///
/// Resolved fresh for every invocation; nothing is cached between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    name: String,
    directory: PathBuf,
}

impl Example {
    pub fn resolve(directory: impl Into<PathBuf>) -> Result<Self, ExampleError> {
        let directory = directory.into();
        let name = resolve_example_name(&directory)?;
        Ok(Self { name, directory })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn scenario_path(&self) -> PathBuf {
        self.directory.join(scenario_file_name(&self.name))
    }

    pub fn config_path(&self) -> Result<PathBuf, ExampleError> {
        locate_config(&self.directory, &self.name)
    }

    /// The RUNDIR path, without creating it.
    pub fn working_directory(&self) -> PathBuf {
        self.directory.join(working_directory_name(&self.name))
    }

    pub fn prepare_working_directory(&self) -> Result<PathBuf, ExampleError> {
        prepare_working_directory(&self.directory, &self.name)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
