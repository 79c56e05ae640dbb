//! Workspace document model.
//!
//! The document is kept as a `serde_json::Value` tree (with `preserve_order`)
//! so that every field the engine does not understand survives the round trip
//! untouched. Only the three translatable regions are interpreted:
//!
//! ```text
//! intents[].examples[].text
//! entities[].values[].value / .synonyms[]
//! dialog_nodes[].output.text        (string | [string] | {"values": [string]})
//! dialog_nodes[].conditions         ("@entity:value" tokens)
//! ```

use serde_json::{Map, Value};

use crate::error::{SyncError, SyncResult};

pub const INTENTS_FIELD: &str = "intents";
pub const ENTITIES_FIELD: &str = "entities";
pub const DIALOG_NODES_FIELD: &str = "dialog_nodes";
pub const LANGUAGE_FIELD: &str = "language";
pub const NAME_FIELD: &str = "name";

#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceDocument {
    root: Map<String, Value>,
}

impl WorkspaceDocument {
    pub fn from_value(value: Value) -> SyncResult<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(SyncError::DataShape(format!(
                "expected a JSON object at the document root, found {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn from_json(text: &str) -> SyncResult<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| SyncError::DataShape(format!("invalid JSON: {}", e)))?;
        Self::from_value(value)
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    /// Source language of the workspace. Required for every run.
    pub fn language(&self) -> SyncResult<&str> {
        match self.root.get(LANGUAGE_FIELD).and_then(Value::as_str) {
            Some(language) if !language.trim().is_empty() => Ok(language),
            _ => Err(SyncError::DataShape(
                "no source language specified in the workspace".to_string(),
            )),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.root.get(NAME_FIELD).and_then(Value::as_str)
    }

    pub fn set_language(&mut self, language: &str) {
        self.root
            .insert(LANGUAGE_FIELD.to_string(), Value::String(language.to_string()));
    }

    /// Append `_<language>` to a non-empty workspace name.
    pub fn rename_for_language(&mut self, language: &str) {
        if let Some(name) = self.name().filter(|name| !name.is_empty()) {
            let renamed = format!("{}_{}", name, language);
            self.root.insert(NAME_FIELD.to_string(), Value::String(renamed));
        }
    }

    /// Objects of a region array; a missing or non-array region is empty.
    pub fn region(&self, field: &str) -> impl Iterator<Item = &Map<String, Value>> {
        self.root
            .get(field)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object)
    }

    pub fn region_mut(&mut self, field: &str) -> impl Iterator<Item = &mut Map<String, Value>> {
        self.root
            .get_mut(field)
            .and_then(Value::as_array_mut)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object_mut)
    }
}

/// The three shapes a dialog node's `output.text` can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextField {
    PlainText(String),
    TextList(Vec<String>),
    /// Object form, e.g. `{"values": [...], "selection_policy": "random"}`.
    ValuesObject(Vec<String>),
}

impl TextField {
    /// Interpret a JSON value as a text field. Non-string list items are ignored.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(TextField::PlainText(text.clone())),
            Value::Array(items) => Some(TextField::TextList(string_items(items))),
            Value::Object(map) => map
                .get("values")
                .and_then(Value::as_array)
                .map(|items| TextField::ValuesObject(string_items(items))),
            _ => None,
        }
    }

    pub fn texts(&self) -> &[String] {
        match self {
            TextField::PlainText(text) => std::slice::from_ref(text),
            TextField::TextList(items) | TextField::ValuesObject(items) => items,
        }
    }

    /// Write this field back into `slot`, keeping sibling keys of the object form.
    pub fn write_to(self, slot: &mut Value) {
        match self {
            TextField::PlainText(text) => *slot = Value::String(text),
            TextField::TextList(items) => *slot = strings_value(items),
            TextField::ValuesObject(items) => {
                if let Value::Object(map) = slot {
                    map.insert("values".to_string(), strings_value(items));
                } else {
                    let mut map = Map::new();
                    map.insert("values".to_string(), strings_value(items));
                    *slot = Value::Object(map);
                }
            }
        }
    }
}

/// Borrow the `output.text` slot of a dialog node, if present and not null.
pub fn output_text(node: &Map<String, Value>) -> Option<&Value> {
    node.get("output")?.get("text").filter(|text| !text.is_null())
}

pub fn output_text_mut(node: &mut Map<String, Value>) -> Option<&mut Value> {
    node.get_mut("output")?
        .get_mut("text")
        .filter(|text| !text.is_null())
}

pub fn str_field<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    object.get(field).and_then(Value::as_str)
}

fn string_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

fn strings_value(items: Vec<String>) -> Value {
    Value::Array(items.into_iter().map(Value::String).collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
