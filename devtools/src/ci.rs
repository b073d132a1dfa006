//! Run every tool in sequence as a child of this executable.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::json;
use shell::core::logger::Logger;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Subcommands run by the pipeline, in order.
pub const STEPS: [&str; 5] = ["format", "lint", "smoke", "contrast", "a11y"];

/// Child invocation for `step`, forwarding the config path and `--debug`.
fn step_command(program: &Path, config: &Path, step: &str, debug: bool) -> Command {
    let mut command = Command::new(program);
    command.arg("--config").arg(config);
    if debug {
        command.arg("--debug");
    }
    command.arg(step).stdin(Stdio::null());
    command
}

/// Run one step to completion. `Ok(false)` on a non-zero exit or a timeout.
fn run_step(
    mut command: Command,
    step: &str,
    timeout: Duration,
    logger: &mut Logger,
) -> Result<bool> {
    logger.info("Step started", json!({ "step": step }));
    let mut child = command
        .spawn()
        .with_context(|| format!("spawn step {step}"))?;

    let status = match child.wait_timeout(timeout).context("wait for step")? {
        Some(status) => status,
        None => {
            warn!(step, timeout_secs = timeout.as_secs(), "step timed out, killing");
            child.kill().context("kill step")?;
            child.wait().context("wait step after kill")?;
            logger.error(
                "Step timed out",
                json!({ "step": step, "timeout_secs": timeout.as_secs() }),
            );
            return Ok(false);
        }
    };

    debug!(step, exit_code = ?status.code(), "step finished");
    if status.success() {
        logger.info("Step finished", json!({ "step": step }));
        Ok(true)
    } else {
        logger.error(
            "Step failed",
            json!({ "step": step, "code": status.code() }),
        );
        Ok(false)
    }
}

/// Run [`STEPS`] through `program`, stopping at the first failure.
pub fn run(
    program: &Path,
    config: &Path,
    debug: bool,
    timeout: Duration,
    logger: &mut Logger,
) -> Result<bool> {
    for step in STEPS {
        let command = step_command(program, config, step, debug);
        if !run_step(command, step, timeout, logger)? {
            logger.error("CI pipeline aborted", json!({ "step": step }));
            return Ok(false);
        }
    }
    logger.info("CI pipeline passed", json!({}));
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shell::test_support::capture_logger;

    #[test]
    fn step_command_forwards_config_and_debug() {
        let args = |debug| {
            let command = step_command(Path::new("devtools"), Path::new("x.toml"), "lint", debug);
            command
                .get_args()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect::<Vec<_>>()
        };
        assert_eq!(args(false), vec!["--config", "x.toml", "lint"]);
        assert_eq!(args(true), vec!["--config", "x.toml", "--debug", "lint"]);
    }

    #[test]
    fn missing_program_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (mut logger, _sink) = capture_logger("CI");
        let err = run(
            &temp.path().join("no-such-binary"),
            &temp.path().join("shell.toml"),
            false,
            Duration::from_secs(5),
            &mut logger,
        )
        .expect_err("spawn must fail");
        assert!(err.to_string().contains("spawn step format"));
    }

    #[cfg(unix)]
    #[test]
    fn first_failing_step_stops_the_pipeline() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (mut logger, _sink) = capture_logger("CI");

        let passed = run(
            Path::new("false"),
            &temp.path().join("shell.toml"),
            false,
            Duration::from_secs(5),
            &mut logger,
        )
        .expect("run");
        assert!(!passed);

        let entries = logger.export_logs().into_payload().expect("logs");
        let messages: Vec<&str> = entries.iter().map(|e| e.message()).collect();
        assert_eq!(
            messages,
            vec!["Step started", "Step failed", "CI pipeline aborted"]
        );
    }
}
