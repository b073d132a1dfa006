//! Capability traits for the page elements the feature modules touch.
//!
//! Modules never ask "is this an HTMLSelectElement?"; they ask whether a handle
//! can read and write attributes, hold a value, list items or accept event
//! subscriptions. [`Element`] implements every capability in memory and backs
//! the `shell` binary and the tests.

use std::collections::{BTreeMap, BTreeSet};

/// Attribute get/set.
pub trait Attributes {
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&mut self, name: &str, value: &str);
}

/// Event subscription. Dispatch is driven by the host calling the module's
/// handler for the subscribed event.
pub trait Listeners {
    fn subscribe(&mut self, event: &str);
    fn is_subscribed(&self, event: &str) -> bool;
}

/// Form control with a tag, a value and a checked state.
pub trait Control: Attributes + Listeners {
    fn tag_name(&self) -> &str;
    fn value(&self) -> String;
    fn set_value(&mut self, value: &str);
    fn checked(&self) -> bool;
    fn set_checked(&mut self, checked: bool);
}

/// Container that renders a list of text items.
pub trait ItemList {
    fn clear_items(&mut self);
    fn append_item(&mut self, text: &str);
}

/// Form with named fields and named output slots.
pub trait FormHost: Listeners {
    fn tag_name(&self) -> &str;
    fn field(&self, name: &str) -> Option<String>;
    /// Write `text` into the named output. Returns `false` if there is none.
    fn write_output(&mut self, name: &str, text: &str) -> bool;
}

/// In-memory element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    value: String,
    checked: bool,
    fields: BTreeMap<String, String>,
    outputs: BTreeMap<String, String>,
    items: Vec<String>,
    listeners: BTreeSet<String>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_uppercase(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    /// Declare an (initially empty) output slot.
    pub fn with_output(mut self, name: &str) -> Self {
        self.outputs.insert(name.to_string(), String::new());
        self
    }

    pub fn set_field(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_string(), value.to_string());
    }

    pub fn output(&self, name: &str) -> Option<&str> {
        self.outputs.get(name).map(String::as_str)
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }
}

impl Attributes for Element {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }
}

impl Listeners for Element {
    fn subscribe(&mut self, event: &str) {
        self.listeners.insert(event.to_string());
    }

    fn is_subscribed(&self, event: &str) -> bool {
        self.listeners.contains(event)
    }
}

impl Control for Element {
    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    fn checked(&self) -> bool {
        self.checked
    }

    fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }
}

impl ItemList for Element {
    fn clear_items(&mut self) {
        self.items.clear();
    }

    fn append_item(&mut self, text: &str) {
        self.items.push(text.to_string());
    }
}

impl FormHost for Element {
    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn field(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    fn write_output(&mut self, name: &str, text: &str) -> bool {
        match self.outputs.get_mut(name) {
            Some(slot) => {
                *slot = text.to_string();
                true
            }
            None => false,
        }
    }
}
