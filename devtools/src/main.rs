//! Developer tools for the site: formatting, linting, audits and CI.

mod a11y;
mod ci;
mod contrast;
mod format;
mod lint;
mod smoke;
mod walk;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use shell::core::logger::{Logger, LoggerOptions};
use shell::core::sink::{ConsoleSink, Sink};
use shell::exit_codes;
use shell::io::config::{CONFIG_FILE, ShellConfig, load_config};
use shell::logging;

#[derive(Parser)]
#[command(name = "devtools", version, about = "Site developer tools")]
struct Cli {
    /// Path to the shell configuration.
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Echo debug entries.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Rewrite JSON files as pretty JSON.
    Format,
    /// Check sources for trailing whitespace and tabs.
    Lint,
    /// Audit theme color contrast against the design manifest.
    Contrast,
    /// Check the index page for accessibility markers.
    A11y,
    /// Smoke-test the shell modules.
    Smoke,
    /// Run every tool in order, stopping at the first failure.
    Ci,
}

impl Command {
    fn namespace(self) -> &'static str {
        match self {
            Command::Format => "Format",
            Command::Lint => "Lint",
            Command::Contrast => "ContrastAudit",
            Command::A11y => "Accessibility",
            Command::Smoke => "Tests",
            Command::Ci => "CI",
        }
    }
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let config = load(&cli);
    let mut logger = tool_logger(&cli, config.as_ref().ok(), ConsoleSink);

    let code = match config.and_then(|config| run(&cli, &config, &mut logger)) {
        Ok(true) => exit_codes::OK,
        Ok(false) => exit_codes::FAILED,
        Err(err) => {
            logger.error(
                &format!("{} script error", cli.command.namespace()),
                json!({ "message": format!("{err:#}") }),
            );
            exit_codes::FAILED
        }
    };
    std::process::exit(code);
}

/// Logger for the selected tool, honoring `[logger]`. Defaults apply when
/// the config failed to load.
fn tool_logger(cli: &Cli, config: Option<&ShellConfig>, sink: impl Sink + 'static) -> Logger {
    let settings = config.map(|config| config.logger.clone()).unwrap_or_default();
    Logger::new(
        LoggerOptions::new(cli.command.namespace())
            .with_debug(cli.debug || settings.debug)
            .with_max_entries(settings.max_entries),
        sink,
    )
}

fn run(cli: &Cli, config: &ShellConfig, logger: &mut Logger) -> Result<bool> {
    let site = &config.site;
    match cli.command {
        Command::Format => format::run(site, logger),
        Command::Lint => lint::run(site, logger),
        Command::Contrast => contrast::run(&site.manifest_path(), logger),
        Command::A11y => a11y::run(&site.index_path(), logger),
        Command::Smoke => Ok(smoke::run(config, logger, &ConsoleSink)),
        Command::Ci => {
            let program = std::env::current_exe().context("locate devtools executable")?;
            let timeout = Duration::from_secs(config.ci.step_timeout_secs);
            ci::run(&program, &cli.config, cli.debug, timeout, logger)
        }
    }
}

fn load(cli: &Cli) -> Result<ShellConfig> {
    load_config(&cli.config).with_context(|| format!("load config {}", cli.config.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shell::core::sink::CaptureSink;

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["devtools", "lint", "--debug", "--config", "x.toml"]);
        assert!(cli.debug);
        assert_eq!(cli.config, PathBuf::from("x.toml"));
        assert_eq!(cli.command.namespace(), "Lint");
    }

    #[test]
    fn tool_logger_honors_configured_retention() {
        let cli = Cli::parse_from(["devtools", "contrast"]);
        let mut config = ShellConfig::default();
        config.logger.max_entries = Some(2);

        let mut logger = tool_logger(&cli, Some(&config), CaptureSink::new());
        for message in ["a", "b", "c"] {
            logger.info(message, json!({}));
        }
        assert_eq!(logger.namespace(), "ContrastAudit");
        assert_eq!(logger.export_logs().into_payload().map(|e| e.len()), Some(2));
    }

    #[test]
    fn tool_logger_debug_comes_from_flag_or_config() {
        let cli = Cli::parse_from(["devtools", "lint"]);
        assert!(!tool_logger(&cli, None, CaptureSink::new()).debug_enabled());

        let mut config = ShellConfig::default();
        config.logger.debug = true;
        assert!(tool_logger(&cli, Some(&config), CaptureSink::new()).debug_enabled());

        let cli = Cli::parse_from(["devtools", "--debug", "lint"]);
        assert!(tool_logger(&cli, None, CaptureSink::new()).debug_enabled());
    }

    #[test]
    fn ci_steps_are_real_subcommands() {
        for step in ci::STEPS {
            assert!(Cli::try_parse_from(["devtools", step]).is_ok(), "{step}");
        }
    }
}
