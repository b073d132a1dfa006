//! Shell configuration stored in `shell.toml`.
//!
//! Theme names, self-heal scopes and tips are read-only configuration loaded
//! once at startup and injected into the modules that need them.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default config file name, relative to the working directory.
pub const CONFIG_FILE: &str = "shell.toml";

/// Shell configuration (TOML).
///
/// Intended to be edited by humans. Missing fields default to the values the
/// site ships with.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShellConfig {
    pub logger: LoggerConfig,
    pub theme: ThemeConfig,
    pub self_heal: SelfHealConfig,
    pub suggestions: SuggestionsConfig,
    pub site: SiteConfig,
    pub serve: ServeConfig,
    pub ci: CiConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggerConfig {
    /// Echo debug entries from the start.
    pub debug: bool,
    /// Retain at most this many entries per logger. Unset keeps everything.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ThemeConfig {
    pub allowed: Vec<String>,
    /// Theme assumed when the document carries no `data-theme`.
    pub default: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            allowed: strings(&["dark", "light", "high-contrast"]),
            default: "dark".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SelfHealConfig {
    pub scopes: Vec<String>,
    pub steps: Vec<String>,
    pub completion_message: String,
}

impl Default for SelfHealConfig {
    fn default() -> Self {
        Self {
            scopes: strings(&["global", "module", "database"]),
            steps: strings(&[
                "Check dependencies",
                "Repair integrity",
                "Restart components",
            ]),
            completion_message: "All problems fixed automatically.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SuggestionsConfig {
    pub tips: Vec<String>,
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            tips: strings(&[
                "Use self-heal before reinstalling modules.",
                "Read the tooltips; they explain technical terms in plain language.",
                "Schedule regular backups before creating new databases.",
                "Only enable debug mode when you want to investigate a problem.",
            ]),
        }
    }
}

/// Locations of the site sources the developer tools operate on.
///
/// All relative paths resolve against `root`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteConfig {
    pub root: PathBuf,
    pub lint_roots: Vec<String>,
    pub lint_extensions: Vec<String>,
    pub format_roots: Vec<String>,
    pub format_files: Vec<String>,
    pub manifest: String,
    pub index: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("site"),
            lint_roots: strings(&["src", "design"]),
            lint_extensions: strings(&["js", "html", "css", "json"]),
            format_roots: strings(&["design"]),
            format_files: strings(&["package.json"]),
            manifest: "design/manifest.json".to_string(),
            index: "src/index.html".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path(&self.manifest)
    }

    pub fn index_path(&self) -> PathBuf {
        self.path(&self.index)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServeConfig {
    pub bind: String,
    pub port: u16,
    /// Directories searched in order, relative to `site.root`.
    pub roots: Vec<String>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 4173,
            roots: strings(&["src", "."]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CiConfig {
    /// Wall-clock budget for a single pipeline step.
    pub step_timeout_secs: u64,
}

impl Default for CiConfig {
    fn default() -> Self {
        Self {
            step_timeout_secs: 10 * 60,
        }
    }
}

impl ShellConfig {
    pub fn validate(&self) -> Result<()> {
        if self.theme.allowed.is_empty() {
            return Err(anyhow!("theme.allowed must be a non-empty array"));
        }
        if !self.theme.allowed.contains(&self.theme.default) {
            return Err(anyhow!(
                "theme.default '{}' must be one of theme.allowed",
                self.theme.default
            ));
        }
        if self.self_heal.scopes.is_empty() {
            return Err(anyhow!("self_heal.scopes must be a non-empty array"));
        }
        if self.logger.max_entries == Some(0) {
            return Err(anyhow!("logger.max_entries must be > 0"));
        }
        if self.serve.roots.is_empty() {
            return Err(anyhow!("serve.roots must be a non-empty array"));
        }
        if self.ci.step_timeout_secs == 0 {
            return Err(anyhow!("ci.step_timeout_secs must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ShellConfig::default()`.
pub fn load_config(path: &Path) -> Result<ShellConfig> {
    if !path.exists() {
        let cfg = ShellConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ShellConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &ShellConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
