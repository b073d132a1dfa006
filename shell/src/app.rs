//! Page bootstrap wiring every feature module to its element.

use serde::Serialize;
use serde_json::{Value, json};

use crate::core::logger::{LogEntry, Logger, LoggerOptions};
use crate::core::outcome::Outcome;
use crate::core::sink::Sink;
use crate::debug_toggle::{DEBUG_ATTRIBUTE, DebugToggle};
use crate::dom::{Attributes, Control, Element, ItemList};
use crate::io::config::ShellConfig;
use crate::self_heal::{HealReport, SelfHeal};
use crate::suggestions::Suggestions;
use crate::theme::{THEME_ATTRIBUTE, ThemeManager};

/// The elements the shell knows about. Any of the optional ones may be absent.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub root: Element,
    pub body: Element,
    pub theme_select: Option<Element>,
    pub debug_toggle: Option<Element>,
    pub self_heal_form: Option<Element>,
    pub suggestion_list: Option<Element>,
}

impl Page {
    /// The site's standard layout with every element present.
    pub fn standard() -> Self {
        Self {
            root: Element::new("html"),
            body: Element::new("body"),
            theme_select: Some(Element::new("select").with_attribute("id", "theme-select")),
            debug_toggle: Some(
                Element::new("input")
                    .with_attribute("id", "debug-toggle")
                    .with_attribute("type", "checkbox"),
            ),
            self_heal_form: Some(
                Element::new("form")
                    .with_attribute("data-form", "self-heal")
                    .with_field("scope", "global")
                    .with_output("result"),
            ),
            suggestion_list: Some(Element::new("ul").with_attribute("id", "suggestion-list")),
        }
    }

    pub fn theme(&self) -> Option<String> {
        self.root.attribute(THEME_ATTRIBUTE)
    }
}

/// Which components were bound during [`App::boot`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BootReport {
    pub theme: Option<String>,
    pub bound: Vec<String>,
    pub tips: usize,
}

/// Namespaced logs from one module, for export.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleLogs {
    pub namespace: String,
    pub entries: Vec<LogEntry>,
}

pub struct App {
    logger: Logger,
    theme: ThemeManager,
    debug_toggle: DebugToggle,
    self_heal: SelfHeal,
    suggestions: Suggestions,
}

impl App {
    /// Build every module with its own logger, all echoing into clones of `sink`.
    pub fn new<S: Sink + Clone + 'static>(config: &ShellConfig, sink: S) -> Self {
        let make = |namespace: &str, debug: bool| {
            Logger::new(
                LoggerOptions::new(namespace)
                    .with_debug(debug || config.logger.debug)
                    .with_max_entries(config.logger.max_entries),
                sink.clone(),
            )
        };
        Self {
            logger: make("App", true),
            theme: ThemeManager::new(&config.theme, make("ThemeManager", false)),
            debug_toggle: DebugToggle::new(make("DebugToggle", true)),
            self_heal: SelfHeal::new(&config.self_heal, make("SelfHeal", false)),
            suggestions: Suggestions::new(&config.suggestions, make("Suggestions", false)),
        }
    }

    /// Apply the current theme and bind each element that is present.
    pub fn boot(&mut self, page: &mut Page) -> Outcome<BootReport> {
        self.logger.debug("Initialization started", Value::Null);
        let mut report = BootReport::default();

        let current = self.theme.current(&page.root);
        report.theme = self
            .theme
            .apply(&mut page.root, &current)
            .into_payload();

        if let Some(select) = page.theme_select.as_mut() {
            let result = self.theme.bind_select(select, &page.root);
            self.note_binding(&mut report, "theme-select", &result);
        }
        if let Some(input) = page.debug_toggle.as_mut() {
            let result = self.debug_toggle.bind(input, &page.body);
            self.note_binding(&mut report, "debug-toggle", &result);
        }
        if let Some(form) = page.self_heal_form.as_mut() {
            let result = self.self_heal.bind_form(form);
            self.note_binding(&mut report, "self-heal", &result);
        }
        if let Some(list) = page.suggestion_list.as_mut() {
            let result = self
                .suggestions
                .render(Some(list as &mut dyn ItemList));
            self.logger.debug("Tips result", json!(result));
            if let Some(count) = result.payload() {
                report.tips = *count;
                report.bound.push("suggestion-list".to_string());
            }
        }

        Outcome::success("Shell initialized", report)
    }

    fn note_binding(&mut self, report: &mut BootReport, name: &str, result: &Outcome<()>) {
        self.logger
            .debug(&format!("Binding result: {name}"), json!(result));
        if result.is_success() {
            report.bound.push(name.to_string());
        }
    }

    /// User picked a theme in the select.
    pub fn change_theme(&mut self, page: &mut Page, theme: &str) -> Outcome<String> {
        match page.theme_select.as_mut() {
            Some(select) => {
                select.set_value(theme);
                self.theme.on_select_change(&mut page.root, &*select)
            }
            None => self.theme.apply(&mut page.root, theme),
        }
    }

    /// User flipped the debug checkbox. The new state reaches every module.
    pub fn toggle_debug(&mut self, page: &mut Page, checked: bool) -> Outcome<bool> {
        let Some(input) = page.debug_toggle.as_mut() else {
            return Outcome::failure("Debug toggle is missing.");
        };
        input.set_checked(checked);
        let outcome = self.debug_toggle.on_change(&*input, &mut page.body);
        if let Some(active) = outcome.payload().copied() {
            for logger in [
                &mut self.logger,
                self.theme.logger_mut(),
                self.self_heal.logger_mut(),
                self.suggestions.logger_mut(),
            ] {
                logger.enable_debug(active);
            }
        }
        outcome
    }

    /// User submitted the self-heal form.
    pub fn submit_self_heal(
        &mut self,
        page: &mut Page,
        scope: &str,
        notes: Option<&str>,
    ) -> Outcome<HealReport> {
        let Some(form) = page.self_heal_form.as_mut() else {
            return Outcome::failure("Self-heal form is missing.");
        };
        form.set_field("scope", scope);
        form.set_field("notes", notes.unwrap_or_default());
        self.self_heal.on_submit(form)
    }

    /// Every module's entries, grouped by namespace.
    pub fn export_logs(&self) -> Vec<ModuleLogs> {
        [
            &self.logger,
            self.theme.logger(),
            self.debug_toggle.logger(),
            self.self_heal.logger(),
            self.suggestions.logger(),
        ]
        .into_iter()
        .map(|logger| ModuleLogs {
            namespace: logger.namespace().to_string(),
            entries: logger.export_logs().into_payload().unwrap_or_default(),
        })
        .collect()
    }
}

/// Whether the body currently advertises debug mode.
pub fn debug_active(page: &Page) -> bool {
    page.body.attribute(DEBUG_ATTRIBUTE).as_deref() == Some("true")
}
