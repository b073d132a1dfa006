//! Simulated self-repair routine and its form binding.

use anyhow::Result;
use serde::Serialize;
use serde_json::{Value, json};

use crate::core::logger::Logger;
use crate::core::outcome::Outcome;
use crate::core::validator::{allowed_list, run_guarded, validate_one_of, validate_string};
use crate::dom::FormHost;
use crate::io::config::SelfHealConfig;

/// Result of a completed self-heal run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealReport {
    pub scope: String,
    pub steps: Vec<String>,
    pub message: String,
}

pub struct SelfHeal {
    logger: Logger,
    config: SelfHealConfig,
}

impl SelfHeal {
    pub fn new(config: &SelfHealConfig, logger: Logger) -> Self {
        Self {
            logger,
            config: config.clone(),
        }
    }

    /// Run the routine for `{ "scope": string, "notes"?: string }`.
    ///
    /// Validation failures are returned unchanged; notes are only checked when
    /// present and non-empty.
    pub fn run(&mut self, payload: &Value) -> Outcome<HealReport> {
        let raw_scope = payload.get("scope").unwrap_or(&Value::Null);
        let scope = match validate_one_of(
            raw_scope,
            &allowed_list(&self.config.scopes),
            "Self-heal scope",
        ) {
            Outcome::Success { payload, .. } => payload,
            Outcome::Failure { message } => {
                self.logger.warn(
                    "Invalid scope",
                    json!({ "scope": raw_scope, "detail": message }),
                );
                return Outcome::Failure { message };
            }
        };

        if let Some(notes) = payload.get("notes").filter(|notes| is_truthy(notes)) {
            if let Outcome::Failure { message } = validate_string(notes, "Notes") {
                self.logger
                    .warn("Notes are not valid", json!({ "detail": message }));
                return Outcome::Failure { message };
            }
        }

        let steps = self.config.steps.clone();
        let completion = self.config.completion_message.clone();
        let logger = &mut self.logger;
        run_guarded(
            || -> Result<HealReport> {
                logger.info(
                    "Self-heal executed",
                    json!({ "scope": scope, "steps": steps }),
                );
                Ok(HealReport {
                    scope,
                    steps,
                    message: completion,
                })
            },
            "Self-heal",
        )
    }

    /// Check the element is a form and subscribe to its submissions.
    pub fn bind_form(&mut self, form: &mut dyn FormHost) -> Outcome<()> {
        if !form.tag_name().eq_ignore_ascii_case("form") {
            return Outcome::failure("Self-heal form is invalid.");
        }
        form.subscribe("submit");
        Outcome::success("Self-heal form bound", ())
    }

    /// `submit` handler: run with the form fields and render into `result`.
    pub fn on_submit(&mut self, form: &mut dyn FormHost) -> Outcome<HealReport> {
        let scope = form.field("scope").unwrap_or_default();
        let mut payload = json!({ "scope": scope });
        if let Some(notes) = form.field("notes").filter(|notes| !notes.is_empty()) {
            payload["notes"] = Value::String(notes);
        }

        let result = self.run(&payload);
        let text = match &result {
            Outcome::Success { payload, .. } => format!("✅ {}", payload.message),
            Outcome::Failure { message } => format!("⚠️ {message}"),
        };
        form.write_output("result", &text);
        result
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut Logger {
        &mut self.logger
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
