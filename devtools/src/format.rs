//! Rewrite the site's JSON files as two-space pretty JSON.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use shell::core::logger::Logger;
use shell::io::config::SiteConfig;

use crate::walk::{collect_files, has_extension};

/// JSON files under `format_roots` plus the explicitly listed `format_files`.
pub fn collect_json_files(site: &SiteConfig) -> Result<Vec<PathBuf>> {
    let json = vec!["json".to_string()];
    let mut files = Vec::new();
    for root in &site.format_roots {
        files.extend(collect_files(&site.path(root), &|path| {
            has_extension(path, &json)
        })?);
    }
    files.extend(site.format_files.iter().map(|file| site.path(file)));
    Ok(files)
}

/// Render `value` the way the formatter writes it.
pub fn render(value: &Value) -> Result<String> {
    let mut pretty = serde_json::to_string_pretty(value).context("serialize json")?;
    pretty.push('\n');
    Ok(pretty)
}

pub fn run(site: &SiteConfig, logger: &mut Logger) -> Result<bool> {
    let files = collect_json_files(site)?;
    for file in &files {
        let content =
            fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;
        let parsed: Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(err) => {
                logger.error(
                    "JSON formatting failed",
                    json!({ "file": file.display().to_string(), "message": err.to_string() }),
                );
                return Err(err).with_context(|| format!("parse {}", file.display()));
            }
        };

        let formatted = render(&parsed)?;
        let changed = formatted != content;
        if changed {
            fs::write(file, &formatted).with_context(|| format!("write {}", file.display()))?;
        }
        logger.debug(
            "File formatted",
            json!({ "file": file.display().to_string(), "changed": changed }),
        );
    }
    logger.info("JSON files formatted", json!({ "count": files.len() }));
    Ok(true)
}
