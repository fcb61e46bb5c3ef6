//! `anod` subcommands.

pub mod build;
pub mod configure_vscode;

use std::path::PathBuf;

use crate::framework::{env_snapshot, BuildRequest};
use crate::paths::AnodPaths;

/// Builds the request shared by every subcommand: spec, qualifier, sandbox
/// (defaulting to `<root>/sbx`) and the current environment with
/// `OPENUXAS_ROOT_DIR` set.
pub fn build_request(
    paths: &AnodPaths,
    spec_dir: Option<PathBuf>,
    spec_name: &str,
    qualifier: Option<&str>,
    sandbox_dir: Option<PathBuf>,
) -> BuildRequest {
    let mut env = env_snapshot();
    paths.export_root(&mut env);

    BuildRequest {
        spec_name: spec_name.to_string(),
        qualifier: qualifier.map(str::to_string),
        sandbox_dir: sandbox_dir.unwrap_or_else(|| paths.sandbox_dir()),
        spec_dir: spec_dir.unwrap_or_else(|| paths.spec_dir()),
        env,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::OPENUXAS_ROOT_ENV_KEY;

    #[test]
    fn request_defaults_to_root_layout() {
        let paths = AnodPaths::new("/work/bootstrap");
        let req = build_request(&paths, None, "uxas", None, None);

        assert_eq!(req.spec_name, "uxas");
        assert_eq!(req.qualifier, None);
        assert_eq!(req.sandbox_dir, PathBuf::from("/work/bootstrap/sbx"));
        assert_eq!(req.spec_dir, PathBuf::from("/work/bootstrap/specs"));
        assert_eq!(req.env[OPENUXAS_ROOT_ENV_KEY], "/work");
    }

    #[test]
    fn explicit_dirs_and_qualifier_are_kept() {
        let paths = AnodPaths::new("/work/bootstrap");
        let req = build_request(
            &paths,
            Some(PathBuf::from("/specs")),
            "amase",
            Some("debug"),
            Some(PathBuf::from("/tmp/sbx")),
        );

        assert_eq!(req.qualifier.as_deref(), Some("debug"));
        assert_eq!(req.sandbox_dir, PathBuf::from("/tmp/sbx"));
        assert_eq!(req.spec_dir, PathBuf::from("/specs"));
    }
}
