//! Whitespace linter for the site sources.

use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde_json::json;
use shell::core::logger::Logger;
use shell::io::config::SiteConfig;

use crate::walk::{collect_files, has_extension};

static TRAILING_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    TrailingWhitespace,
    Tab,
}

impl Problem {
    fn message(self) -> &'static str {
        match self {
            Problem::TrailingWhitespace => "Trailing whitespace found",
            Problem::Tab => "Tab found, please use spaces",
        }
    }
}

/// Problems in `content` as `(1-based line, problem)`.
pub fn lint_text(content: &str) -> Vec<(usize, Problem)> {
    let mut problems = Vec::new();
    for (index, line) in content.split('\n').enumerate() {
        if TRAILING_WHITESPACE.is_match(line) {
            problems.push((index + 1, Problem::TrailingWhitespace));
        }
        if line.contains('\t') {
            problems.push((index + 1, Problem::Tab));
        }
    }
    problems
}

pub fn collect_lint_files(site: &SiteConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for root in &site.lint_roots {
        files.extend(collect_files(&site.path(root), &|path| {
            has_extension(path, &site.lint_extensions)
        })?);
    }
    Ok(files)
}

pub fn run(site: &SiteConfig, logger: &mut Logger) -> Result<bool> {
    let files = collect_lint_files(site)?;
    let mut clean = true;
    for file in &files {
        let content =
            fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;
        for (line, problem) in lint_text(&content) {
            logger.warn(
                problem.message(),
                json!({ "file": file.display().to_string(), "line": line }),
            );
            clean = false;
        }
    }

    if clean {
        logger.info("Lint passed", json!({ "files": files.len() }));
    } else {
        logger.error("Lint failed", json!({}));
    }
    Ok(clean)
}
