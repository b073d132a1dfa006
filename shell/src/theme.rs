//! Theme switching for the document root.

use serde_json::{Value, json};

use crate::core::logger::Logger;
use crate::core::outcome::Outcome;
use crate::core::validator::{allowed_list, validate_one_of};
use crate::dom::{Attributes, Control};
use crate::io::config::ThemeConfig;

/// Attribute on the document root carrying the active theme.
pub const THEME_ATTRIBUTE: &str = "data-theme";

pub struct ThemeManager {
    logger: Logger,
    allowed: Vec<String>,
    default: String,
}

impl ThemeManager {
    pub fn new(config: &ThemeConfig, logger: Logger) -> Self {
        Self {
            logger,
            allowed: config.allowed.clone(),
            default: config.default.clone(),
        }
    }

    /// Validate `theme` and write it to the root's `data-theme`.
    ///
    /// An unknown theme leaves the root untouched.
    pub fn apply(&mut self, root: &mut dyn Attributes, theme: &str) -> Outcome<String> {
        let result = validate_one_of(&Value::from(theme), &allowed_list(&self.allowed), "Theme");
        let theme = match result {
            Outcome::Success { payload, .. } => payload,
            Outcome::Failure { message } => {
                self.logger
                    .error("Invalid theme", json!({ "theme": theme, "detail": message }));
                return Outcome::Failure { message };
            }
        };

        root.set_attribute(THEME_ATTRIBUTE, &theme);
        self.logger.info("Theme changed", json!({ "theme": theme }));
        Outcome::success("Theme activated", theme)
    }

    /// Theme currently on the root, or the configured default.
    pub fn current(&self, root: &dyn Attributes) -> String {
        root.attribute(THEME_ATTRIBUTE)
            .unwrap_or_else(|| self.default.clone())
    }

    /// Sync a `<select>` with the current theme and subscribe to its changes.
    pub fn bind_select(&mut self, select: &mut dyn Control, root: &dyn Attributes) -> Outcome<()> {
        if !select.tag_name().eq_ignore_ascii_case("select") {
            return Outcome::failure("Theme picker must be a <select> element.");
        }
        select.set_value(&self.current(root));
        select.subscribe("change");
        Outcome::success("Theme picker bound", ())
    }

    /// `change` handler for a bound select.
    pub fn on_select_change(
        &mut self,
        root: &mut dyn Attributes,
        select: &dyn Control,
    ) -> Outcome<String> {
        self.apply(root, &select.value())
    }

    pub fn allowed_themes(&self) -> Outcome<Vec<String>> {
        Outcome::success("Themes ready", self.allowed.clone())
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut Logger {
        &mut self.logger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::logger::LogLevel;
    use crate::dom::{Element, Listeners};
    use crate::test_support::capture_logger;

    fn manager() -> ThemeManager {
        let (logger, _sink) = capture_logger("ThemeManager");
        ThemeManager::new(&ThemeConfig::default(), logger)
    }

    #[test]
    fn apply_sets_root_attribute() {
        let mut manager = manager();
        let mut root = Element::new("html");

        let outcome = manager.apply(&mut root, "light");
        assert_eq!(outcome.payload().map(String::as_str), Some("light"));
        assert_eq!(root.attribute(THEME_ATTRIBUTE).as_deref(), Some("light"));
    }

    #[test]
    fn unknown_theme_leaves_root_untouched_and_logs_error() {
        let mut manager = manager();
        let mut root = Element::new("html").with_attribute(THEME_ATTRIBUTE, "dark");

        let outcome = manager.apply(&mut root, "sepia");
        assert!(!outcome.is_success());
        assert!(outcome.message().contains("high-contrast"));
        assert_eq!(root.attribute(THEME_ATTRIBUTE).as_deref(), Some("dark"));

        let entries = manager.logger().export_logs().into_payload().expect("logs");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level(), LogLevel::Error);
    }

    #[test]
    fn bind_select_requires_select_element() {
        let mut manager = manager();
        let root = Element::new("html");
        let mut input = Element::new("input");

        let outcome = manager.bind_select(&mut input, &root);
        assert!(!outcome.is_success());
        assert!(!input.is_subscribed("change"));
    }

    #[test]
    fn bind_select_syncs_value_and_handles_change() {
        let mut manager = manager();
        let mut root = Element::new("html");
        let mut select = Element::new("select");

        assert!(manager.bind_select(&mut select, &root).is_success());
        assert_eq!(select.value(), "dark");
        assert!(select.is_subscribed("change"));

        select.set_value("high-contrast");
        manager.on_select_change(&mut root, &select);
        assert_eq!(root.attribute(THEME_ATTRIBUTE).as_deref(), Some("high-contrast"));
    }

    #[test]
    fn allowed_themes_returns_configured_list() {
        let manager = manager();
        let themes = manager.allowed_themes().into_payload().expect("themes");
        assert_eq!(themes, vec!["dark", "light", "high-contrast"]);
    }
}
