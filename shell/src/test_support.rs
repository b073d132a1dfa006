//! Test-only helpers for loggers and scratch sites.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::core::logger::{Logger, LoggerOptions};
use crate::core::sink::CaptureSink;
use crate::io::config::{ShellConfig, write_config};

/// Logger with debug off whose echoes land in the returned sink.
pub fn capture_logger(namespace: &str) -> (Logger, CaptureSink) {
    let sink = CaptureSink::new();
    (Logger::new(LoggerOptions::new(namespace), sink.clone()), sink)
}

pub const INDEX_HTML: &str = r##"<!doctype html>
<html lang="en" data-theme="dark">
  <body>
    <a class="skip-link" href="#main">Skip to content</a>
    <main id="main" role="main">
      <select id="theme-select"></select>
    </main>
    <footer role="contentinfo">Footer</footer>
  </body>
</html>
"##;

pub const MANIFEST_JSON: &str = r##"{
  "tokens": {
    "color": {
      "dark": { "text": "#f5f5f5", "surface": "#121212" },
      "light": { "text": "#1a1a1a", "surface": "#ffffff" },
      "highContrast": { "text": "#ffffff", "surface": "#000000" }
    }
  },
  "accessibility": {
    "minimumContrastRatio": 4.5,
    "colorContrast": [
      { "theme": "dark", "pairs": [{ "foreground": "text", "background": "surface" }] },
      { "theme": "light", "pairs": [{ "foreground": "text", "background": "surface" }] },
      {
        "theme": "high-contrast",
        "pairs": [{ "foreground": "text", "background": "surface", "minimum": 7 }]
      }
    ]
  }
}
"##;

/// A temporary project: `shell.toml` plus a minimal passing `site/`.
pub struct TestSite {
    dir: TempDir,
}

impl TestSite {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create tempdir")?;
        let site = Self { dir };
        site.write("site/src/index.html", INDEX_HTML)?;
        site.write("site/design/manifest.json", MANIFEST_JSON)?;
        site.write("site/package.json", "{\n  \"name\": \"site\"\n}\n")?;
        site.write_config(&ShellConfig::default())?;
        Ok(site)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("shell.toml")
    }

    /// Config with `site.root` pointing at this site's absolute path.
    pub fn config(&self) -> ShellConfig {
        let mut config = ShellConfig::default();
        config.site.root = self.root().join("site");
        config
    }

    pub fn write_config(&self, config: &ShellConfig) -> Result<()> {
        write_config(&self.config_path(), config)
    }

    /// Write `contents` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) -> Result<PathBuf> {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    pub fn read(&self, relative: &str) -> Result<String> {
        let path = self.root().join(relative);
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_fixture_is_a_whole_page() {
        assert!(INDEX_HTML.contains(r##"href="#main""##));
        assert!(INDEX_HTML.contains(r#"role="contentinfo""#));
        assert!(INDEX_HTML.ends_with("</html>\n"));
    }

    #[test]
    fn scratch_site_has_index_and_manifest() {
        let site = TestSite::new().expect("site");
        assert_eq!(site.read("site/src/index.html").expect("index"), INDEX_HTML);
        assert_eq!(
            site.read("site/design/manifest.json").expect("manifest"),
            MANIFEST_JSON
        );
    }
}
