//! Static accessibility markers the site's index page must carry.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use shell::core::logger::Logger;

/// `(meta key, marker text)` for every required marker.
pub const MARKERS: [(&str, &str); 4] = [
    ("skip_link", r#"class="skip-link""#),
    ("main_landmark", r#"role="main""#),
    ("theme_select", r#"id="theme-select""#),
    ("footer_landmark", r#"role="contentinfo""#),
];

/// Which markers `html` contains, keyed like [`MARKERS`].
pub fn check(html: &str) -> Map<String, Value> {
    MARKERS
        .iter()
        .map(|(key, marker)| (key.to_string(), Value::Bool(html.contains(marker))))
        .collect()
}

pub fn run(index: &Path, logger: &mut Logger) -> Result<bool> {
    let html = fs::read_to_string(index).with_context(|| format!("read {}", index.display()))?;
    let found = check(&html);
    let passed = found.values().all(|present| present == &Value::Bool(true));
    if passed {
        logger.info("Accessibility baseline passed", Value::Object(Map::new()));
    } else {
        logger.error("Accessibility check failed", Value::Object(found));
    }
    Ok(passed)
}
