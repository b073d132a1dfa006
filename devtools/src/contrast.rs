//! WCAG contrast audit of the design manifest's color tokens.

use std::fs;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value, json};
use shell::core::logger::Logger;
use shell::core::outcome::Outcome;
use shell::core::validator::{run_guarded, validate_string};

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([0-9a-fA-F]{6})$").unwrap());

pub const DEFAULT_MINIMUM: f64 = 4.5;

/// One pair that did not reach its minimum, or could not be checked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub theme: String,
    pub pair: String,
    pub ratio: f64,
    pub minimum: f64,
}

/// Accept `#RRGGBB` (surrounding whitespace ignored); the payload is lowercase.
pub fn ensure_hex_color(value: &Value, context: &str) -> Outcome<String> {
    validate_string(value, context).and_then(|text| {
        let trimmed = text.trim();
        if HEX_COLOR.is_match(trimmed) {
            Outcome::success(format!("{context} is a color"), trimmed.to_lowercase())
        } else {
            Outcome::failure(format!("{context} must be a hex color (#RRGGBB)"))
        }
    })
}

fn srgb_to_linear(channel: u8) -> f64 {
    let normalized = f64::from(channel) / 255.0;
    if normalized <= 0.04045 {
        normalized / 12.92
    } else {
        ((normalized + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance of a validated lowercase `#rrggbb` color.
fn relative_luminance(color: &str) -> f64 {
    let channel = |range: Range<usize>| u8::from_str_radix(&color[range], 16).unwrap_or(0);
    0.2126 * srgb_to_linear(channel(1..3))
        + 0.7152 * srgb_to_linear(channel(3..5))
        + 0.0722 * srgb_to_linear(channel(5..7))
}

/// Contrast ratio between two colors, rounded to two decimals.
pub fn contrast_ratio(foreground: &Value, background: &Value) -> Outcome<f64> {
    let fg = ensure_hex_color(foreground, "Foreground color");
    let bg = ensure_hex_color(background, "Background color");
    let (Some(fg), Some(bg)) = (fg.payload(), bg.payload()) else {
        return fg.and_then(|_| bg).map(|_| 0.0);
    };

    let (l1, l2) = (relative_luminance(fg), relative_luminance(bg));
    let ratio = (l1.max(l2) + 0.05) / (l1.min(l2) + 0.05);
    Outcome::success("Contrast computed", (ratio * 100.0).round() / 100.0)
}

/// Token set key for a theme name.
pub fn map_theme_key(theme: &str) -> &str {
    match theme {
        "high-contrast" => "highContrast",
        other => other,
    }
}

pub fn load_manifest(path: &Path) -> Outcome<Value> {
    run_guarded(
        || -> Result<Value> {
            let raw =
                fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
        },
        "Manifest load",
    )
}

/// Check every configured pair. Each problem is logged and returned.
pub fn audit(manifest: &Value, logger: &mut Logger) -> Vec<Failure> {
    let Some(tokens) = manifest.pointer("/tokens/color").and_then(Value::as_object) else {
        logger.error("Color tokens missing from manifest", json!({}));
        return vec![unchecked("unknown", "unknown", DEFAULT_MINIMUM)];
    };
    let Some(themes) = manifest
        .pointer("/accessibility/colorContrast")
        .and_then(Value::as_array)
    else {
        logger.error("Contrast configuration missing or not a list", json!({}));
        return vec![unchecked("unknown", "unknown", DEFAULT_MINIMUM)];
    };
    let default_minimum = manifest
        .pointer("/accessibility/minimumContrastRatio")
        .and_then(Value::as_f64)
        .unwrap_or(DEFAULT_MINIMUM);

    let mut failures = Vec::new();
    for theme_config in themes {
        let theme_value = theme_config.get("theme").unwrap_or(&Value::Null);
        let theme = match validate_string(theme_value, "Theme name") {
            Outcome::Success { payload, .. } => payload,
            Outcome::Failure { message } => {
                logger.error(
                    "Theme name missing or invalid",
                    json!({ "detail": message, "theme": theme_config }),
                );
                failures.push(unchecked("unknown", "unknown", default_minimum));
                continue;
            }
        };
        let Some(token_set) = tokens.get(map_theme_key(&theme)).and_then(Value::as_object)
        else {
            logger.error(
                "Unknown theme in contrast configuration",
                json!({ "theme": theme }),
            );
            failures.push(unchecked(&theme, "unknown", 0.0));
            continue;
        };

        let pairs = theme_config
            .get("pairs")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for pair in pairs {
            if let Some(failure) = check_pair(&theme, token_set, pair, default_minimum, logger) {
                failures.push(failure);
            }
        }
    }

    if failures.is_empty() {
        logger.info("Contrast audit passed", json!({}));
    } else {
        logger.error("Contrast audit failed", json!({ "failures": failures }));
    }
    failures
}

fn check_pair(
    theme: &str,
    token_set: &Map<String, Value>,
    pair: &Value,
    default_minimum: f64,
    logger: &mut Logger,
) -> Option<Failure> {
    let field = |name: &str| pair.get(name).unwrap_or(&Value::Null);
    let fg_token = validate_string(field("foreground"), "Foreground token");
    let bg_token = validate_string(field("background"), "Background token");
    let (Some(fg_token), Some(bg_token)) = (fg_token.payload(), bg_token.payload()) else {
        logger.error(
            "Token names missing",
            json!({
                "theme": theme,
                "pair": pair,
                "detail": [fg_token.message(), bg_token.message()],
            }),
        );
        return Some(unchecked(theme, "incomplete tokens", default_minimum));
    };

    let label = format!("{fg_token} on {bg_token}");
    let minimum = field("minimum").as_f64().unwrap_or(default_minimum);
    let (Some(fg), Some(bg)) = (token_set.get(fg_token), token_set.get(bg_token)) else {
        logger.error(
            "Color tokens could not be resolved",
            json!({ "theme": theme, "pair": pair }),
        );
        return Some(unchecked(theme, &label, minimum));
    };

    let ratio = match contrast_ratio(fg, bg) {
        Outcome::Success { payload, .. } => payload,
        Outcome::Failure { message } => {
            logger.error(
                "Contrast could not be computed",
                json!({ "theme": theme, "pair": pair, "detail": message }),
            );
            return Some(unchecked(theme, &label, minimum));
        }
    };

    let meta = json!({ "theme": theme, "pair": label, "ratio": ratio, "minimum": minimum });
    if ratio >= minimum {
        logger.info("✓ Contrast sufficient", meta);
        None
    } else {
        logger.error("✗ Contrast too low", meta);
        Some(Failure {
            theme: theme.to_string(),
            pair: label,
            ratio,
            minimum,
        })
    }
}

fn unchecked(theme: &str, pair: &str, minimum: f64) -> Failure {
    Failure {
        theme: theme.to_string(),
        pair: pair.to_string(),
        ratio: 0.0,
        minimum,
    }
}

pub fn run(manifest_path: &Path, logger: &mut Logger) -> Result<bool> {
    let manifest = match load_manifest(manifest_path) {
        Outcome::Success { payload, .. } => payload,
        Outcome::Failure { message } => {
            logger.error("Manifest could not be loaded", json!({ "detail": message }));
            return Ok(false);
        }
    };
    Ok(audit(&manifest, logger).is_empty())
}
