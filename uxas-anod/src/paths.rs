//! Well-known locations inside the bootstrap checkout.
//!
//! ```text
//! <root>/               – bootstrap checkout (current directory)
//! ├── specs/            – .anod specs            (SPEC_DIR)
//! └── sbx/              – framework sandbox      (SBX_DIR)
//! <root>/..             – exported as OPENUXAS_ROOT_DIR
//! ```

use std::path::{Path, PathBuf};

use crate::framework::Env;

pub const OPENUXAS_ROOT_ENV_KEY: &str = "OPENUXAS_ROOT_DIR";

/// Default `configure-vscode` output, relative to the current directory.
pub const DEFAULT_VSCODE_OUT: &str = "develop/OpenUxAS/.vscode/c_cpp_properties.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnodPaths {
    root: PathBuf,
}

impl AnodPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn spec_dir(&self) -> PathBuf {
        self.root.join("specs")
    }

    pub fn sandbox_dir(&self) -> PathBuf {
        self.root.join("sbx")
    }

    /// Directory that holds the bootstrap checkout and the OpenUxAS sources.
    pub fn openuxas_root_dir(&self) -> &Path {
        self.root.parent().unwrap_or(&self.root)
    }

    /// Sets `OPENUXAS_ROOT_DIR` in `env`, replacing any inherited value.
    pub fn export_root(&self, env: &mut Env) {
        env.insert(
            OPENUXAS_ROOT_ENV_KEY.to_string(),
            self.openuxas_root_dir().to_string_lossy().into_owned(),
        );
    }
}
