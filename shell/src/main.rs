//! Site shell command line.
//!
//! Boots the shell against an in-memory page built from `shell.toml` and
//! drives the same handlers the browser events would.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shell::app::{App, Page, debug_active};
use shell::core::outcome::Outcome;
use shell::core::sink::{CaptureSink, ConsoleSink};
use shell::exit_codes;
use shell::io::config::{CONFIG_FILE, ShellConfig, load_config, write_config};
use shell::logging;

#[derive(Parser)]
#[command(name = "shell", version, about = "Site application shell")]
struct Cli {
    /// Path to the shell configuration.
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default `shell.toml` if missing.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// Bootstrap the page and report what was bound.
    Boot {
        /// Switch to this theme after booting.
        #[arg(long)]
        theme: Option<String>,
        /// Turn debug output on for every module.
        #[arg(long)]
        debug: bool,
        /// Print every module's logs as JSON instead of echoing them.
        #[arg(long)]
        export: bool,
    },
    /// Apply a theme.
    Theme { name: String },
    /// Run the self-heal routine.
    Heal {
        #[arg(long)]
        scope: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Print the tips list.
    Tips,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::FAILED);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => cmd_init(&cli.config, force),
        Command::Boot {
            theme,
            debug,
            export,
        } => cmd_boot(&load(&cli.config)?, theme.as_deref(), debug, export),
        Command::Theme { name } => cmd_theme(&load(&cli.config)?, &name),
        Command::Heal { scope, notes } => {
            cmd_heal(&load(&cli.config)?, &scope, notes.as_deref())
        }
        Command::Tips => cmd_tips(&load(&cli.config)?),
    }
}

fn load(path: &Path) -> Result<ShellConfig> {
    load_config(path).with_context(|| format!("load config {}", path.display()))
}

fn cmd_init(path: &Path, force: bool) -> Result<i32> {
    if !force && path.exists() {
        println!("init: {} exists (use --force to overwrite)", path.display());
        return Ok(exit_codes::OK);
    }
    write_config(path, &ShellConfig::default())
        .with_context(|| format!("write {}", path.display()))?;
    println!("init: wrote {}", path.display());
    Ok(exit_codes::OK)
}

fn booted(config: &ShellConfig) -> (App, Page) {
    let mut app = App::new(config, ConsoleSink);
    let mut page = Page::standard();
    app.boot(&mut page);
    (app, page)
}

fn cmd_boot(config: &ShellConfig, theme: Option<&str>, debug: bool, export: bool) -> Result<i32> {
    let mut page = Page::standard();
    // Exported JSON owns stdout, so echoes are captured instead of printed.
    let mut app = if export {
        App::new(config, CaptureSink::new())
    } else {
        App::new(config, ConsoleSink)
    };

    let Outcome::Success { payload: report, .. } = app.boot(&mut page) else {
        return Ok(exit_codes::FAILED);
    };
    if debug {
        app.toggle_debug(&mut page, true);
    }
    let mut code = exit_codes::OK;
    if let Some(theme) = theme {
        if let Outcome::Failure { message } = app.change_theme(&mut page, theme) {
            eprintln!("boot: {message}");
            code = exit_codes::INVALID;
        }
    }

    if export {
        let logs = serde_json::to_string_pretty(&app.export_logs()).context("serialize logs")?;
        println!("{logs}");
    } else {
        println!(
            "boot: theme={} bound={} tips={} debug={}",
            page.theme().unwrap_or_default(),
            report.bound.join(","),
            report.tips,
            debug_active(&page)
        );
    }
    Ok(code)
}

fn cmd_theme(config: &ShellConfig, name: &str) -> Result<i32> {
    let (mut app, mut page) = booted(config);
    match app.change_theme(&mut page, name) {
        Outcome::Success { payload, .. } => {
            println!("theme: {payload}");
            Ok(exit_codes::OK)
        }
        Outcome::Failure { message } => {
            eprintln!("theme: {message}");
            Ok(exit_codes::INVALID)
        }
    }
}

fn cmd_heal(config: &ShellConfig, scope: &str, notes: Option<&str>) -> Result<i32> {
    let (mut app, mut page) = booted(config);
    let outcome = app.submit_self_heal(&mut page, scope, notes);
    let rendered = page
        .self_heal_form
        .as_ref()
        .and_then(|form| form.output("result"))
        .unwrap_or_default();
    println!("heal: {rendered}");
    Ok(if outcome.is_success() {
        exit_codes::OK
    } else {
        exit_codes::INVALID
    })
}

fn cmd_tips(config: &ShellConfig) -> Result<i32> {
    let (_app, page) = booted(config);
    for tip in page
        .suggestion_list
        .as_ref()
        .map(|list| list.items())
        .unwrap_or_default()
    {
        println!("- {tip}");
    }
    Ok(exit_codes::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_boot_flags() {
        let cli = Cli::parse_from(["shell", "boot", "--theme", "light", "--debug"]);
        assert!(matches!(
            cli.command,
            Command::Boot { theme: Some(ref t), debug: true, export: false } if t == "light"
        ));
    }

    #[test]
    fn parse_heal_with_config() {
        let cli = Cli::parse_from(["shell", "--config", "x.toml", "heal", "--scope", "global"]);
        assert_eq!(cli.config, PathBuf::from("x.toml"));
        assert!(matches!(cli.command, Command::Heal { notes: None, .. }));
    }
}
