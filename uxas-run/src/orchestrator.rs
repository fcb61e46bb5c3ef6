/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The three run modes of `run-example`.
//!
//! # Combined mode ordering
//! ```text
//! resolve example ─► build control cmd ─► build sim cmd      (any failure: nothing started)
//!        │
//!        ▼
//! spawn OpenUxAS (background) ─► run OpenAMASE (foreground) ─► terminate OpenUxAS once
//!                                                                 │
//!                                         ShutdownPolicy::Grace ──┴─► wait ─► kill if still alive
//! ```
//!
//! The termination request is sent whether OpenAMASE exited cleanly, failed,
//! or could not be started at all.

use thiserror::Error;
use tracing::{info, warn};

use uxas_support::command::format_command;
use uxas_support::Command;

use crate::config::{RunConfig, RunMode, ShutdownPolicy};
use crate::example::{Example, ExampleError};
use crate::launch::{
    build_control_command, build_sim_command, Exit, LaunchError, ProcessHandle, ProcessLauncher,
};

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Example(#[from] ExampleError),

    #[error(transparent)]
    Launch(#[from] LaunchError),
}

pub struct Orchestrator<L> {
    config: RunConfig,
    launcher: L,
}

impl<L: ProcessLauncher> Orchestrator<L> {
    pub fn new(config: RunConfig, launcher: L) -> Self {
        Self { config, launcher }
    }

    /// Resolves the example fresh from disk.
    pub fn resolve_example(&self) -> Result<Example, ExampleError> {
        Example::resolve(self.config.example_dir())
    }

    pub fn sim_command(&self, example: &Example) -> Command {
        build_sim_command(&self.config.amase_dir, &example.scenario_path())
    }

    /// Locates the config, then prepares the RUNDIR (only names it in dry-run).
    pub fn control_command(&self, example: &Example) -> Result<Command, ExampleError> {
        let config_path = example.config_path()?;
        let working_dir = if self.config.dry_run {
            example.working_directory()
        } else {
            example.prepare_working_directory()?
        };

        Ok(build_control_command(&self.config.uxas_dir, &config_path).with_cwd(working_dir))
    }

    /// Runs the configured mode and returns the foreground process's exit.
    pub async fn run(&self) -> Result<Exit, OrchestratorError> {
        match self.config.mode {
            RunMode::Simulation => self.run_sim_only().await,
            RunMode::Control => self.run_control_only().await,
            RunMode::Both => self.run_both().await,
        }
    }

    pub async fn run_sim_only(&self) -> Result<Exit, OrchestratorError> {
        let example = self.resolve_example()?;
        let sim = self.sim_command(&example);

        println!("Running OpenAMASE for '{}'.", self.config.example.display());
        println!(" ");

        Ok(self.launcher.run(&sim).await?)
    }

    pub async fn run_control_only(&self) -> Result<Exit, OrchestratorError> {
        let example = self.resolve_example()?;
        let control = self.control_command(&example)?;

        println!("Running OpenUxAS for '{}'.", self.config.example.display());
        println!("Data and logfiles are in:");
        if let Some(dir) = control.cwd() {
            println!("{}", dir.display());
        }
        println!(" ");

        Ok(self.launcher.run(&control).await?)
    }

    pub async fn run_both(&self) -> Result<Exit, OrchestratorError> {
        // Build both first so a missing file aborts before anything starts.
        let example = self.resolve_example()?;
        let control = self.control_command(&example)?;
        let sim = self.sim_command(&example);

        info!(
            example = %example.name(),
            control = %format_command(&control),
            sim = %format_command(&sim),
            "Starting combined run"
        );

        println!("Starting OpenUxAS in a separate process.");
        let mut control_handle = self.launcher.spawn(&control)?;

        println!("Starting OpenAMASE in this process.");
        let sim_result = self.launcher.run(&sim).await;

        println!(" ");
        println!("Shutting down OpenUxAS.");
        self.shutdown(&mut control_handle).await;

        Ok(sim_result?)
    }

    /// Sends exactly one termination request, then applies the shutdown
    /// policy.  Failures are logged, never returned.
    async fn shutdown(&self, handle: &mut L::Handle) {
        if let Err(e) = handle.terminate() {
            warn!("Failed to send termination request to OpenUxAS: {}", e);
        }

        let grace = match self.config.shutdown {
            ShutdownPolicy::FireAndForget => return,
            ShutdownPolicy::Grace(grace) => grace,
        };

        match handle.wait_timeout(grace).await {
            Ok(Some(exit)) => {
                info!(code = ?exit.code(), "OpenUxAS exited");
                return;
            }
            Ok(None) => warn!(
                "OpenUxAS still running {:.1}s after termination request, killing it",
                grace.as_secs_f64()
            ),
            Err(e) => warn!("Failed waiting for OpenUxAS to exit: {}, killing it", e),
        }

        if let Err(e) = handle.kill() {
            warn!("Failed to kill OpenUxAS: {}", e);
            return;
        }

        match handle.wait_timeout(grace).await {
            Ok(Some(_)) => info!("OpenUxAS killed"),
            Ok(None) => warn!("OpenUxAS did not exit after kill, giving up"),
            Err(e) => warn!("Failed waiting for OpenUxAS after kill: {}", e),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use tempfile::TempDir;

    // ── Recording launcher ────────────────────────────────────────────────────

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Spawn(Vec<OsString>, Option<PathBuf>),
        Run(Vec<OsString>, Option<PathBuf>),
        Terminate,
        Wait,
        Kill,
    }

    #[derive(Clone, Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<Event>>>,
        /// Background process ignores SIGTERM.
        stubborn: bool,
        /// Foreground `run` fails to start.
        run_fails: bool,
    }

    impl Recorder {
        fn push(&self, e: Event) {
            self.events.lock().unwrap().push(e);
        }

        fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }
    }

    struct FakeHandle {
        recorder: Recorder,
        terminated: bool,
        killed: bool,
    }

    #[async_trait]
    impl ProcessLauncher for Recorder {
        type Handle = FakeHandle;

        async fn run(&self, command: &Command) -> Result<Exit, LaunchError> {
            self.push(Event::Run(
                command.argv().to_vec(),
                command.cwd().map(Path::to_path_buf),
            ));
            if self.run_fails {
                return Err(LaunchError::Spawn {
                    program: "java".into(),
                    source: io::Error::new(io::ErrorKind::NotFound, "java not found"),
                });
            }
            Ok(Exit::from_code(0))
        }

        fn spawn(&self, command: &Command) -> Result<FakeHandle, LaunchError> {
            self.push(Event::Spawn(
                command.argv().to_vec(),
                command.cwd().map(Path::to_path_buf),
            ));
            Ok(FakeHandle {
                recorder: self.clone(),
                terminated: false,
                killed: false,
            })
        }
    }

    #[async_trait]
    impl ProcessHandle for FakeHandle {
        fn terminate(&mut self) -> io::Result<()> {
            self.recorder.push(Event::Terminate);
            self.terminated = true;
            Ok(())
        }

        async fn wait_timeout(&mut self, _timeout: Duration) -> io::Result<Option<Exit>> {
            self.recorder.push(Event::Wait);
            let exited = self.killed || (self.terminated && !self.recorder.stubborn);
            Ok(exited.then(Exit::without_code))
        }

        fn kill(&mut self) -> io::Result<()> {
            self.recorder.push(Event::Kill);
            self.killed = true;
            Ok(())
        }
    }

    // ── Fixtures ──────────────────────────────────────────────────────────────

    /// `<tmp>/uxas/src/examples/02_Example_Waterway` with the given files.
    struct Fixture {
        _root: TempDir,
        amase_dir: PathBuf,
        uxas_dir: PathBuf,
        example_dir: PathBuf,
    }

    fn fixture(files: &[&str]) -> Fixture {
        let root = TempDir::new().unwrap();
        let amase_dir = root.path().join("amase").join("src");
        let uxas_dir = root.path().join("uxas").join("src");
        let example_dir = uxas_dir.join("examples").join("02_Example_Waterway");
        fs::create_dir_all(&example_dir).unwrap();
        for f in files {
            fs::write(example_dir.join(f), "<xml/>").unwrap();
        }
        Fixture {
            _root: root,
            amase_dir,
            uxas_dir,
            example_dir,
        }
    }

    fn orchestrator(fx: &Fixture, mode: RunMode, recorder: &Recorder) -> Orchestrator<Recorder> {
        let mut config = RunConfig::new(
            "02_Example_Waterway",
            fx.amase_dir.clone(),
            fx.uxas_dir.clone(),
        );
        config.mode = mode;
        config.shutdown = ShutdownPolicy::Grace(Duration::from_millis(100));
        Orchestrator::new(config, recorder.clone())
    }

    fn control_argv(fx: &Fixture, cfg: &str) -> Vec<OsString> {
        vec![
            fx.uxas_dir.join("../install/bin/uxas").into_os_string(),
            OsString::from("-cfgPath"),
            fx.example_dir.join(cfg).into_os_string(),
        ]
    }

    fn sim_argv(fx: &Fixture) -> Vec<OsString> {
        build_sim_command(&fx.amase_dir, &fx.example_dir.join("Scenario_Waterway.xml"))
            .argv()
            .to_vec()
    }

    fn count(events: &[Event], wanted: &Event) -> usize {
        events.iter().filter(|e| *e == wanted).count()
    }

    // ── Control only ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn control_only_runs_uxas_in_rundir() {
        let fx = fixture(&["Scenario_Waterway.xml", "cfg_Waterway.xml"]);
        let recorder = Recorder::default();

        let exit = orchestrator(&fx, RunMode::Control, &recorder)
            .run()
            .await
            .unwrap();

        let rundir = fx.example_dir.join("RUNDIR_Waterway");
        assert!(exit.success());
        assert!(rundir.is_dir());
        assert_eq!(
            recorder.events(),
            vec![Event::Run(control_argv(&fx, "cfg_Waterway.xml"), Some(rundir))]
        );
    }

    #[tokio::test]
    async fn control_only_accepts_suffix_config_form() {
        let fx = fixture(&["Scenario_Waterway.xml", "Waterway_cfg.xml"]);
        let recorder = Recorder::default();

        orchestrator(&fx, RunMode::Control, &recorder)
            .run()
            .await
            .unwrap();

        let rundir = fx.example_dir.join("RUNDIR_Waterway");
        assert_eq!(
            recorder.events(),
            vec![Event::Run(control_argv(&fx, "Waterway_cfg.xml"), Some(rundir))]
        );
    }

    #[tokio::test]
    async fn control_only_missing_config_starts_nothing() {
        let fx = fixture(&["Scenario_Waterway.xml"]);
        let recorder = Recorder::default();

        let err = orchestrator(&fx, RunMode::Control, &recorder)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            OrchestratorError::Example(ExampleError::ConfigNotFound { .. })
        ));
        assert!(recorder.events().is_empty());
        assert!(!fx.example_dir.join("RUNDIR_Waterway").exists());
    }

    #[tokio::test]
    async fn dry_run_does_not_create_rundir() {
        let fx = fixture(&["Scenario_Waterway.xml", "cfg_Waterway.xml"]);
        let recorder = Recorder::default();
        let mut orch = orchestrator(&fx, RunMode::Control, &recorder);
        orch.config.dry_run = true;

        orch.run().await.unwrap();

        let rundir = fx.example_dir.join("RUNDIR_Waterway");
        assert!(!rundir.exists());
        assert_eq!(
            recorder.events(),
            vec![Event::Run(control_argv(&fx, "cfg_Waterway.xml"), Some(rundir))]
        );
    }

    // ── Simulation only ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn sim_only_needs_no_config() {
        let fx = fixture(&["Scenario_Waterway.xml"]);
        let recorder = Recorder::default();

        orchestrator(&fx, RunMode::Simulation, &recorder)
            .run()
            .await
            .unwrap();

        assert_eq!(
            recorder.events(),
            vec![Event::Run(sim_argv(&fx), Some(fx.amase_dir.join("OpenAMASE")))]
        );
        assert!(!fx.example_dir.join("RUNDIR_Waterway").exists());
    }

    #[tokio::test]
    async fn missing_scenario_aborts() {
        let fx = fixture(&["cfg_Waterway.xml"]);
        let recorder = Recorder::default();

        let err = orchestrator(&fx, RunMode::Simulation, &recorder)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            OrchestratorError::Example(ExampleError::ScenarioNotFound { .. })
        ));
        assert!(recorder.events().is_empty());
    }

    // ── Both ──────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn both_spawns_control_then_runs_sim_then_terminates_once() {
        let fx = fixture(&["Scenario_Waterway.xml", "cfg_Waterway.xml"]);
        let recorder = Recorder::default();

        orchestrator(&fx, RunMode::Both, &recorder)
            .run()
            .await
            .unwrap();

        let rundir = fx.example_dir.join("RUNDIR_Waterway");
        let events = recorder.events();
        assert_eq!(
            events,
            vec![
                Event::Spawn(control_argv(&fx, "cfg_Waterway.xml"), Some(rundir)),
                Event::Run(sim_argv(&fx), Some(fx.amase_dir.join("OpenAMASE"))),
                Event::Terminate,
                Event::Wait,
            ]
        );
        assert_eq!(count(&events, &Event::Terminate), 1);
    }

    #[tokio::test]
    async fn both_kills_control_that_ignores_termination() {
        let fx = fixture(&["Scenario_Waterway.xml", "cfg_Waterway.xml"]);
        let recorder = Recorder {
            stubborn: true,
            ..Default::default()
        };

        orchestrator(&fx, RunMode::Both, &recorder)
            .run()
            .await
            .unwrap();

        let events = recorder.events();
        assert_eq!(
            &events[2..],
            &[Event::Terminate, Event::Wait, Event::Kill, Event::Wait]
        );
        assert_eq!(count(&events, &Event::Terminate), 1);
    }

    #[tokio::test]
    async fn fire_and_forget_does_not_wait() {
        let fx = fixture(&["Scenario_Waterway.xml", "cfg_Waterway.xml"]);
        let recorder = Recorder {
            stubborn: true,
            ..Default::default()
        };
        let mut orch = orchestrator(&fx, RunMode::Both, &recorder);
        orch.config.shutdown = ShutdownPolicy::FireAndForget;

        orch.run().await.unwrap();

        let events = recorder.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2], Event::Terminate);
    }

    #[tokio::test]
    async fn both_terminates_control_even_when_sim_fails() {
        let fx = fixture(&["Scenario_Waterway.xml", "cfg_Waterway.xml"]);
        let recorder = Recorder {
            run_fails: true,
            ..Default::default()
        };

        let err = orchestrator(&fx, RunMode::Both, &recorder)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, OrchestratorError::Launch(LaunchError::Spawn { .. })));
        let events = recorder.events();
        assert!(matches!(events[0], Event::Spawn(..)));
        assert!(matches!(events[1], Event::Run(..)));
        assert_eq!(count(&events, &Event::Terminate), 1);
    }

    #[tokio::test]
    async fn both_missing_config_starts_nothing() {
        let fx = fixture(&["Scenario_Waterway.xml"]);
        let recorder = Recorder::default();

        let err = orchestrator(&fx, RunMode::Both, &recorder)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            OrchestratorError::Example(ExampleError::ConfigNotFound { .. })
        ));
        assert!(recorder.events().is_empty());
    }
}
