/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::env;
use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing::{debug, error};

use uxas_anod::commands::build::{do_build, BuildArgs};
use uxas_anod::commands::build_request;
use uxas_anod::commands::configure_vscode::{do_configure, ConfigureArgs};
use uxas_anod::framework::driver::{DEFAULT_DRIVER, DRIVER_ENV_KEY};
use uxas_anod::framework::DriverFramework;
use uxas_anod::paths::AnodPaths;
use uxas_support::{LogConfig, LoggingArgs};

// ── CLI argument definition ───────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "anod", about = "Build OpenUxAS and its dependencies")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory containing the .anod specs [default: <cwd>/specs].
    #[arg(long = "spec-dir", value_name = "DIR", global = true)]
    spec_dir: Option<PathBuf>,

    /// Driver executable used to reach the build framework.
    #[arg(
        long,
        env = DRIVER_ENV_KEY,
        default_value = DEFAULT_DRIVER,
        value_name = "PATH",
        global = true
    )]
    driver: PathBuf,

    #[command(flatten)]
    logging: LoggingArgs,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build a spec and its dependencies.
    Build(BuildArgs),

    /// Generate the VS Code C/C++ configuration from a spec's build
    /// environment.
    #[command(name = "configure-vscode")]
    ConfigureVscode(ConfigureArgs),
}

fn run(cli: Cli) -> Result<i32> {
    let root = env::current_dir().context("cannot determine the current directory")?;
    let paths = AnodPaths::new(root);
    let framework = DriverFramework::new(&cli.driver);
    debug!(
        root   = %paths.root().display(),
        driver = %framework.driver().display(),
        "anod"
    );

    match &cli.command {
        Commands::Build(args) => {
            let request = build_request(
                &paths,
                cli.spec_dir.clone(),
                &args.spec_name,
                args.qualifier.as_deref(),
                args.sandbox_dir.clone(),
            );
            do_build(&framework, &request, args.force)
                .with_context(|| format!("build of {} failed", args.spec_name))
        }
        Commands::ConfigureVscode(args) => {
            let request = build_request(
                &paths,
                cli.spec_dir.clone(),
                &args.spec_name,
                args.qualifier.as_deref(),
                args.sandbox_dir.clone(),
            );
            let mut stdout = io::stdout().lock();
            do_configure(&framework, &request, &args.output(), &mut stdout).with_context(|| {
                format!("cannot generate a VS Code configuration for {}", args.spec_name)
            })
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Errors only by default; `configure-vscode` stays at errors whatever the
/// verbosity flags say, so its stdout output is not interleaved with logs.
fn log_config(cli: &Cli) -> LogConfig {
    let config = LogConfig::from_args(&cli.logging, LevelFilter::ERROR);
    match cli.command {
        Commands::ConfigureVscode(_) => config.with_console_level(LevelFilter::ERROR),
        Commands::Build(_) => config,
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = log_config(&cli).init() {
        eprintln!("{}", e);
        process::exit(1);
    }

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use uxas_anod::commands::configure_vscode::Output;
    use uxas_anod::paths::DEFAULT_VSCODE_OUT;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["anod"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn build_arguments_are_parsed() {
        let cli = parse(&["build", "uxas", "--qualifier", "debug", "--force"]);
        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.spec_name, "uxas");
                assert_eq!(args.qualifier.as_deref(), Some("debug"));
                assert!(args.force);
                assert!(args.sandbox_dir.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_options_may_follow_the_subcommand() {
        let cli = parse(&["build", "uxas", "--spec-dir", "/specs", "--driver", "/opt/drv"]);
        assert_eq!(cli.spec_dir, Some(PathBuf::from("/specs")));
        assert_eq!(cli.driver, PathBuf::from("/opt/drv"));
    }

    #[test]
    fn build_requires_a_spec_name() {
        let err = Cli::try_parse_from(["anod", "build"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn configure_vscode_defaults_to_uxas_and_checkout_file() {
        let cli = parse(&["configure-vscode"]);
        match cli.command {
            Commands::ConfigureVscode(args) => {
                assert_eq!(args.spec_name, "uxas");
                assert_eq!(args.output(), Output::File(PathBuf::from(DEFAULT_VSCODE_OUT)));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn stdout_and_out_are_mutually_exclusive() {
        let err = Cli::try_parse_from(["anod", "configure-vscode", "--stdout", "--out", "x.json"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn configure_vscode_keeps_console_at_error_despite_verbose() {
        let cli = parse(&["-vv", "configure-vscode", "--stdout"]);
        assert_eq!(log_config(&cli).console_level(), LevelFilter::ERROR);
    }

    #[test]
    fn build_honours_verbosity() {
        assert_eq!(log_config(&parse(&["build", "uxas"])).console_level(), LevelFilter::ERROR);
        assert_eq!(
            log_config(&parse(&["-v", "build", "uxas"])).console_level(),
            LevelFilter::INFO
        );
    }
}
