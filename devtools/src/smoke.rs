//! Smoke checks of the shell modules against the loaded configuration.

use anyhow::{Result, bail};
use serde_json::json;
use shell::core::logger::{Logger, LoggerOptions};
use shell::core::sink::Sink;
use shell::io::config::ShellConfig;
use shell::self_heal::SelfHeal;
use shell::theme::ThemeManager;

const EXPECTED_THEMES: usize = 3;
const EXPECTED_STEPS: usize = 3;

fn checks<S: Sink + Clone + 'static>(config: &ShellConfig, sink: &S) -> Result<()> {
    let module_logger = |namespace: &str| Logger::new(LoggerOptions::new(namespace), sink.clone());

    let mut heal = SelfHeal::new(&config.self_heal, module_logger("SelfHeal"));
    let healed = heal.run(&json!({ "scope": "global", "notes": "Routine check" }));
    if !healed.is_success() {
        bail!("self-heal should succeed: {}", healed.message());
    }
    let steps = healed.payload().map_or(0, |report| report.steps.len());
    if steps != EXPECTED_STEPS {
        bail!("self-heal should run {EXPECTED_STEPS} steps, ran {steps}");
    }

    let invalid = heal.run(&json!({ "scope": "invalid" }));
    if invalid.is_success() {
        bail!("invalid scope must fail");
    }

    let themes = ThemeManager::new(&config.theme, module_logger("ThemeManager")).allowed_themes();
    let count = themes.payload().map_or(0, Vec::len);
    if count != EXPECTED_THEMES {
        bail!("expected {EXPECTED_THEMES} themes, found {count}");
    }
    Ok(())
}

pub fn run<S: Sink + Clone + 'static>(config: &ShellConfig, logger: &mut Logger, sink: &S) -> bool {
    match checks(config, sink) {
        Ok(()) => {
            logger.info("All tests passed", json!({}));
            true
        }
        Err(err) => {
            logger.error("Tests failed", json!({ "message": format!("{err:#}") }));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shell::core::sink::CaptureSink;
    use shell::test_support::capture_logger;

    #[test]
    fn default_config_passes() {
        let (mut logger, _sink) = capture_logger("Tests");
        assert!(run(&ShellConfig::default(), &mut logger, &CaptureSink::new()));
    }

    #[test]
    fn fewer_steps_fail_with_reason() {
        let mut config = ShellConfig::default();
        config.self_heal.steps.truncate(2);
        let (mut logger, _sink) = capture_logger("Tests");

        assert!(!run(&config, &mut logger, &CaptureSink::new()));
        let entries = logger.export_logs().into_payload().expect("logs");
        assert_eq!(
            entries[0].meta()["message"],
            json!("self-heal should run 3 steps, ran 2")
        );
    }

    #[test]
    fn extra_theme_fails() {
        let mut config = ShellConfig::default();
        config.theme.allowed.push("sepia".into());
        let (mut logger, _sink) = capture_logger("Tests");
        assert!(!run(&config, &mut logger, &CaptureSink::new()));
    }
}
