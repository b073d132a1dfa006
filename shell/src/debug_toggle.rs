//! Checkbox that switches debug output on and off.

use serde_json::{Value, json};

use crate::core::logger::Logger;
use crate::core::outcome::Outcome;
use crate::core::validator::validate_boolean;
use crate::dom::{Attributes, Control};

/// Attribute on the document body mirroring the debug state.
pub const DEBUG_ATTRIBUTE: &str = "data-debug";

pub struct DebugToggle {
    logger: Logger,
}

impl DebugToggle {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Bind a checkbox input. Its checked state starts from the body's
    /// `data-debug` attribute.
    pub fn bind(&mut self, input: &mut dyn Control, body: &dyn Attributes) -> Outcome<()> {
        if !input.tag_name().eq_ignore_ascii_case("input") {
            return Outcome::failure("Debug toggle must be an input element.");
        }
        if input.attribute("type").as_deref() != Some("checkbox") {
            return Outcome::failure("Debug toggle requires type=\"checkbox\".");
        }
        input.set_checked(body.attribute(DEBUG_ATTRIBUTE).as_deref() == Some("true"));
        input.subscribe("change");
        Outcome::success("Debug toggle bound", ())
    }

    /// `change` handler: mirror the checkbox into the body and this logger.
    ///
    /// Returns the new debug state so the host can propagate it.
    pub fn on_change(&mut self, input: &dyn Control, body: &mut dyn Attributes) -> Outcome<bool> {
        let next = input.checked();
        let validated = validate_boolean(&Value::Bool(next), "Debug value");
        let Some(active) = validated.payload().copied() else {
            self.logger
                .error("Invalid debug value", json!({ "next_value": next }));
            return validated;
        };

        body.set_attribute(DEBUG_ATTRIBUTE, &active.to_string());
        self.logger.enable_debug(active);
        self.logger
            .debug("Debug mode toggled", json!({ "active": active }));
        validated
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Element, Listeners};
    use crate::test_support::capture_logger;

    fn checkbox() -> Element {
        Element::new("input").with_attribute("type", "checkbox")
    }

    #[test]
    fn bind_rejects_non_checkbox_inputs() {
        let (logger, _sink) = capture_logger("DebugToggle");
        let mut toggle = DebugToggle::new(logger);
        let body = Element::new("body");

        let mut text = Element::new("input").with_attribute("type", "text");
        assert!(!toggle.bind(&mut text, &body).is_success());

        let mut div = Element::new("div");
        assert!(!toggle.bind(&mut div, &body).is_success());
    }

    #[test]
    fn bind_reads_initial_state_from_body() {
        let (logger, _sink) = capture_logger("DebugToggle");
        let mut toggle = DebugToggle::new(logger);
        let body = Element::new("body").with_attribute(DEBUG_ATTRIBUTE, "true");
        let mut input = checkbox();

        assert!(toggle.bind(&mut input, &body).is_success());
        assert!(input.checked());
        assert!(input.is_subscribed("change"));
    }

    #[test]
    fn change_updates_body_and_logger() {
        let (logger, sink) = capture_logger("DebugToggle");
        let mut toggle = DebugToggle::new(logger);
        let mut body = Element::new("body");
        let mut input = checkbox();
        toggle.bind(&mut input, &body);

        input.set_checked(true);
        let outcome = toggle.on_change(&input, &mut body);

        assert_eq!(outcome.into_payload(), Some(true));
        assert_eq!(body.attribute(DEBUG_ATTRIBUTE).as_deref(), Some("true"));
        assert!(toggle.logger().debug_enabled());
        assert!(sink.lines()[0].line.contains("Debug mode toggled"));
    }
}
