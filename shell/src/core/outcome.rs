//! The uniform result value returned by validators, loggers and feature modules.
//!
//! An [`Outcome`] is either a success carrying a message and a typed payload, or
//! a failure carrying only a message. The failure arm has no payload field, so
//! callers must branch before they can read one.

use serde::Serialize;

/// Success/failure value used instead of errors for expected-invalid input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome<T> {
    Success { message: String, payload: T },
    Failure { message: String },
}

impl<T> Outcome<T> {
    pub fn success(message: impl Into<String>, payload: T) -> Self {
        Outcome::Success {
            message: message.into(),
            payload,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Outcome::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Human-readable description, present on both arms.
    pub fn message(&self) -> &str {
        match self {
            Outcome::Success { message, .. } | Outcome::Failure { message } => message,
        }
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            Outcome::Success { payload, .. } => Some(payload),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn into_payload(self) -> Option<T> {
        match self {
            Outcome::Success { payload, .. } => Some(payload),
            Outcome::Failure { .. } => None,
        }
    }

    /// Transform the payload, keeping the message. Failures pass through verbatim.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success { message, payload } => Outcome::Success {
                message,
                payload: f(payload),
            },
            Outcome::Failure { message } => Outcome::Failure { message },
        }
    }

    /// Chain a dependent check. A failure short-circuits with its own message.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Outcome::Success { payload, .. } => f(payload),
            Outcome::Failure { message } => Outcome::Failure { message },
        }
    }

    /// Drop the payload, keeping the message and arm.
    #[cfg(test)]
    pub(crate) fn discard(self) -> Outcome<()> {
        self.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_has_no_payload() {
        let outcome: Outcome<u32> = Outcome::failure("nope");
        assert!(!outcome.is_success());
        assert_eq!(outcome.message(), "nope");
        assert_eq!(outcome.payload(), None);
    }

    #[test]
    fn and_then_preserves_failure_message() {
        let outcome: Outcome<u32> = Outcome::failure("first check failed");
        let chained = outcome.and_then(|n| Outcome::success("never", n + 1));
        assert_eq!(chained, Outcome::failure("first check failed"));
    }

    #[test]
    fn map_keeps_success_message() {
        let outcome = Outcome::success("ok", 20).map(|n| n + 1);
        assert_eq!(outcome.message(), "ok");
        assert_eq!(outcome.into_payload(), Some(21));
    }

    #[test]
    fn serializes_with_status_tag() {
        let success = serde_json::to_value(Outcome::success("done", 3)).expect("serialize");
        assert_eq!(
            success,
            json!({ "status": "success", "message": "done", "payload": 3 })
        );

        let failure = serde_json::to_value(Outcome::<u8>::failure("bad")).expect("serialize");
        assert_eq!(failure, json!({ "status": "failure", "message": "bad" }));
    }
}
