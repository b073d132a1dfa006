//! Plain-language tips rendered into a list.

use serde_json::{Value, json};

use crate::core::logger::Logger;
use crate::core::outcome::Outcome;
use crate::core::validator::validate_string;
use crate::dom::ItemList;
use crate::io::config::SuggestionsConfig;

pub struct Suggestions {
    logger: Logger,
    tips: Vec<String>,
}

impl Suggestions {
    pub fn new(config: &SuggestionsConfig, logger: Logger) -> Self {
        Self {
            logger,
            tips: config.tips.clone(),
        }
    }

    /// Replace the container's items with the configured tips.
    ///
    /// Returns the number of configured tips.
    pub fn render(&mut self, container: Option<&mut dyn ItemList>) -> Outcome<usize> {
        let Some(container) = container else {
            return Outcome::failure("Container for tips is missing.");
        };

        container.clear_items();
        for tip in &self.tips {
            match validate_string(&Value::String(tip.clone()), "Tip") {
                Outcome::Success { payload, .. } => container.append_item(&payload),
                Outcome::Failure { message } => {
                    self.logger
                        .warn("Tip skipped", json!({ "detail": message }));
                }
            }
        }

        self.logger
            .info("Tips loaded", json!({ "count": self.tips.len() }));
        Outcome::success("Tips rendered", self.tips.len())
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut Logger {
        &mut self.logger
    }
}
