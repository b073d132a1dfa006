//! Pure input checks returning [`Outcome`] values.
//!
//! Validators inspect raw, untyped input (`serde_json::Value`) and never fail
//! by returning `Err` or panicking. Each failure message embeds the caller's
//! context label so it reads on its own, e.g. `Theme must be a string`.

use serde_json::Value;

use crate::core::outcome::Outcome;

/// Fixed message for a malformed allowed-values argument.
pub const ALLOWED_NOT_A_LIST: &str = "allowed values must be a list";

/// Succeeds iff `value` is a string; the payload is that string.
pub fn validate_string(value: &Value, context: &str) -> Outcome<String> {
    match value {
        Value::String(text) => Outcome::success(format!("{context} ok"), text.clone()),
        _ => Outcome::failure(format!("{context} must be a string")),
    }
}

/// Succeeds iff `value` is a string contained in `allowed`.
///
/// `allowed` must be an array of strings; anything else fails with
/// [`ALLOWED_NOT_A_LIST`] regardless of `value`. A non-string `value` fails
/// first, with the unchanged [`validate_string`] outcome.
pub fn validate_one_of(value: &Value, allowed: &Value, context: &str) -> Outcome<String> {
    let text = match validate_string(value, context) {
        Outcome::Success { payload, .. } => payload,
        failure => return failure,
    };

    let Some(options) = string_list(allowed) else {
        return Outcome::failure(ALLOWED_NOT_A_LIST);
    };

    if options.iter().any(|option| *option == text) {
        return Outcome::success(format!("{context} allowed"), text);
    }
    Outcome::failure(format!(
        "{context} must be one of: {}",
        options.join(", ")
    ))
}

/// Succeeds iff `value` is a boolean.
pub fn validate_boolean(value: &Value, context: &str) -> Outcome<bool> {
    match value {
        Value::Bool(flag) => Outcome::success(format!("{context} ok"), *flag),
        _ => Outcome::failure(format!("{context} must be true or false (boolean)")),
    }
}

/// Run a fallible action and convert its result into an [`Outcome`].
///
/// This is the single place where `Err` values from collaborators become
/// failure outcomes. The failure message carries `context` and the full error
/// chain.
pub fn run_guarded<T, E>(action: impl FnOnce() -> Result<T, E>, context: &str) -> Outcome<T>
where
    E: Into<anyhow::Error>,
{
    match action() {
        Ok(payload) => Outcome::success(format!("{context} succeeded"), payload),
        Err(err) => {
            let err: anyhow::Error = err.into();
            Outcome::failure(format!("{context} failed: {err:#}"))
        }
    }
}

/// Convert a typed list into the raw form accepted by [`validate_one_of`].
pub fn allowed_list<S: AsRef<str>>(values: &[S]) -> Value {
    Value::Array(
        values
            .iter()
            .map(|value| Value::String(value.as_ref().to_string()))
            .collect(),
    )
}

fn string_list(value: &Value) -> Option<Vec<&str>> {
    value.as_array()?.iter().map(Value::as_str).collect()
}
