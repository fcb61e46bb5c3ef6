/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing::level_filters::LevelFilter;
use tracing::{debug, warn};

use uxas_run::config::{
    default_amase_dir, default_uxas_dir, AMASE_ENV_KEY, DEFAULT_SHUTDOWN_TIMEOUT_SECS,
    UXAS_ENV_KEY,
};
use uxas_run::launch::{DryRunLauncher, Exit, ProcessLauncher, SystemLauncher};
use uxas_run::{Orchestrator, OrchestratorError, RunConfig, RunMode, ShutdownPolicy};
use uxas_support::{LogConfig, LoggingArgs};

const DESCRIPTION: &str = "\
Run OpenUxAS, OpenAMASE or both, using the configuration in the specified
example.

This is a frontend for both OpenUxAS and OpenAMASE that simplifies running
examples contained in the `examples` directory of the OpenUxAS repository. You
run an example by providing the path to its directory, under `examples`. For
example, run:

  run-example 02_Example_WaterwaySearch

to run the Waterways example from a single terminal session. Or:

  run-example --uxas 99_Tasks/AngledAreaSearchTask

to run just OpenUxAS for the angled-area example.";

// ── CLI argument definition ───────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "run-example",
    about = "Run OpenUxAS, OpenAMASE or both for an example",
    long_about = DESCRIPTION,
)]
struct Cli {
    /// The example directory, relative to `<uxas-dir>/examples`.
    example: PathBuf,

    /// Run the OpenAMASE part of the example.
    #[arg(long = "amase")]
    run_amase: bool,

    /// Run the OpenUxAS part of the example.
    #[arg(long = "uxas")]
    run_uxas: bool,

    /// Absolute path to the OpenAMASE repository containing build outputs.
    /// [default: <cwd>/sbx/x86_64-linux/amase/src]
    #[arg(long = "amase-dir", env = AMASE_ENV_KEY, value_name = "DIR")]
    amase_dir: Option<PathBuf>,

    /// Absolute path to the OpenUxAS repository containing build outputs.
    /// [default: <cwd>/sbx/x86_64-linux/uxas-release/src]
    #[arg(long = "uxas-dir", env = UXAS_ENV_KEY, value_name = "DIR")]
    uxas_dir: Option<PathBuf>,

    /// Seconds OpenUxAS gets to exit after OpenAMASE closes before it is
    /// killed; 0 sends the termination request without waiting.
    #[arg(
        long = "shutdown-timeout",
        value_name = "SECONDS",
        default_value_t = DEFAULT_SHUTDOWN_TIMEOUT_SECS
    )]
    shutdown_timeout: u64,

    /// Print out the commands to be run, but do not run them.
    #[arg(short = 'n', long = "dry-run")]
    dry_run: bool,

    #[command(flatten)]
    logging: LoggingArgs,
}

impl Cli {
    /// Resolves directories against `root`, the bootstrap checkout we are
    /// invoked from.  A flag or its environment variable wins over the
    /// sandbox default.
    fn run_config(&self, root: &Path) -> RunConfig {
        let amase_dir = self
            .amase_dir
            .clone()
            .unwrap_or_else(|| default_amase_dir(root));
        let uxas_dir = self
            .uxas_dir
            .clone()
            .unwrap_or_else(|| default_uxas_dir(root));

        let mut config = RunConfig::new(self.example.clone(), amase_dir, uxas_dir);
        config.mode = RunMode::from_flags(self.run_amase, self.run_uxas);
        config.shutdown = ShutdownPolicy::from_timeout_secs(self.shutdown_timeout);
        config.dry_run = self.dry_run;
        config
    }
}

async fn run_with<L: ProcessLauncher>(
    config: RunConfig,
    launcher: L,
) -> Result<Exit, OrchestratorError> {
    Orchestrator::new(config, launcher).run().await
}

/// Maps the run outcome to the process exit code.
///
/// A missing example, scenario or config is reported with the usage banner
/// so the user can fix the invocation; any other failure only with its
/// message.  A foreground process that ended without a code counts as 0.
fn outcome_code(
    result: Result<Exit, OrchestratorError>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<i32> {
    match result {
        Ok(exit) => {
            if !exit.success() {
                warn!(code = ?exit.code(), "Foreground process exited unsuccessfully");
            }
            Ok(exit.code().unwrap_or(0))
        }
        Err(OrchestratorError::Example(e)) if e.is_not_found() => {
            writeln!(err, "{}", e)?;
            writeln!(err, " ")?;
            writeln!(out, "{}", Cli::command().render_usage())?;
            Ok(1)
        }
        Err(e) => {
            writeln!(err, "{}", e)?;
            Ok(1)
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::from_args(&cli.logging, LevelFilter::WARN);
    if let Err(e) = log_config.init() {
        eprintln!("{}", e);
        process::exit(1);
    }

    let root = match env::current_dir().context("cannot determine the current directory") {
        Ok(root) => root,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    };
    let config = cli.run_config(&root);
    debug!(
        example    = %config.example.display(),
        amase_dir  = %config.amase_dir.display(),
        uxas_dir   = %config.uxas_dir.display(),
        mode       = ?config.mode,
        shutdown   = ?config.shutdown,
        dry_run    = config.dry_run,
        "Configuration"
    );

    let result = if config.dry_run {
        run_with(config, DryRunLauncher).await
    } else {
        run_with(config, SystemLauncher).await
    };

    let code = outcome_code(result, &mut io::stdout(), &mut io::stderr()).unwrap_or(1);
    process::exit(code);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use uxas_run::ExampleError;

    /// Serialises tests that touch the directory environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Parses with `OPENAMASE_DIR` / `OPENUXAS_DIR` set as given for the
    /// duration of the parse.
    fn parse_with_env(args: &[&str], amase: Option<&str>, uxas: Option<&str>) -> Cli {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for (key, value) in [(AMASE_ENV_KEY, amase), (UXAS_ENV_KEY, uxas)] {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }

        let mut argv = vec!["run-example"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv);

        env::remove_var(AMASE_ENV_KEY);
        env::remove_var(UXAS_ENV_KEY);
        cli.unwrap()
    }

    fn parse(args: &[&str]) -> Cli {
        parse_with_env(args, None, None)
    }

    const ROOT: &str = "/home/vagrant/bootstrap";

    #[test]
    fn defaults_come_from_the_sandbox_layout() {
        let config = parse(&["02_Example_WaterwaySearch"]).run_config(Path::new(ROOT));

        assert_eq!(config.amase_dir, default_amase_dir(Path::new(ROOT)));
        assert_eq!(config.uxas_dir, default_uxas_dir(Path::new(ROOT)));
        assert_eq!(config.mode, RunMode::Both);
        assert_eq!(config.shutdown, ShutdownPolicy::default());
        assert!(!config.dry_run);
    }

    #[test]
    fn environment_beats_the_default() {
        let cli = parse_with_env(&["ex"], Some("/env/amase"), Some("/env/uxas"));
        let config = cli.run_config(Path::new(ROOT));

        assert_eq!(config.amase_dir, PathBuf::from("/env/amase"));
        assert_eq!(config.uxas_dir, PathBuf::from("/env/uxas"));
    }

    #[test]
    fn flags_beat_the_environment() {
        let cli = parse_with_env(
            &["--amase-dir", "/flag/amase", "--uxas-dir", "/flag/uxas", "ex"],
            Some("/env/amase"),
            Some("/env/uxas"),
        );
        let config = cli.run_config(Path::new(ROOT));

        assert_eq!(config.amase_dir, PathBuf::from("/flag/amase"));
        assert_eq!(config.uxas_dir, PathBuf::from("/flag/uxas"));
    }

    #[test]
    fn both_process_flags_select_simulation_only() {
        let config = parse(&["--amase", "--uxas", "ex"]).run_config(Path::new(ROOT));
        assert_eq!(config.mode, RunMode::Simulation);

        let config = parse(&["--uxas", "ex"]).run_config(Path::new(ROOT));
        assert_eq!(config.mode, RunMode::Control);
    }

    #[test]
    fn shutdown_timeout_selects_policy() {
        let config = parse(&["--shutdown-timeout", "0", "ex"]).run_config(Path::new(ROOT));
        assert_eq!(config.shutdown, ShutdownPolicy::FireAndForget);

        let config = parse(&["--shutdown-timeout", "2", "-n", "ex"]).run_config(Path::new(ROOT));
        assert_eq!(config.shutdown, ShutdownPolicy::Grace(Duration::from_secs(2)));
        assert!(config.dry_run);
    }

    #[test]
    fn missing_example_argument_is_rejected() {
        assert!(Cli::try_parse_from(["run-example"]).is_err());
    }

    #[test]
    fn resolution_error_prints_error_blank_line_and_usage() {
        let result = Err(OrchestratorError::Example(ExampleError::ScenarioNotFound {
            dir: PathBuf::from("/uxas/examples/nope"),
        }));
        let (mut out, mut err) = (Vec::new(), Vec::new());

        let code = outcome_code(result, &mut out, &mut err).unwrap();

        assert_eq!(code, 1);
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "No scenario file found in /uxas/examples/nope\n \n"
        );
        assert!(String::from_utf8(out)
            .unwrap()
            .starts_with("Usage: run-example [OPTIONS] <EXAMPLE>"));
    }

    #[test]
    fn other_errors_exit_one_without_usage() {
        let result = Err(OrchestratorError::Example(ExampleError::CreateWorkingDir {
            dir: PathBuf::from("/ro/RUNDIR_W"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        }));
        let (mut out, mut err) = (Vec::new(), Vec::new());

        assert_eq!(outcome_code(result, &mut out, &mut err).unwrap(), 1);
        assert!(out.is_empty());
        assert!(!err.is_empty());
    }

    #[test]
    fn foreground_exit_code_is_propagated() {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let code = outcome_code(Ok(Exit::from_code(3)), &mut out, &mut err).unwrap();
        assert_eq!(code, 3);

        let code = outcome_code(Ok(Exit::without_code()), &mut out, &mut err).unwrap();
        assert_eq!(code, 0);
        assert!(out.is_empty() && err.is_empty());
    }
}
