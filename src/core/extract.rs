//! Extraction of translatable units from a workspace document.
//!
//! Each region produces an ordered `key -> set of source strings` mapping.
//! Sets absorb hash collisions for free text and repeated entity pairs for
//! entities. Dialog conditions are not extracted: they are rewritten from the
//! entity translations during rehydration.

use std::collections::BTreeSet;

use tracing::debug;

use super::document::{
    DIALOG_NODES_FIELD, ENTITIES_FIELD, INTENTS_FIELD, TextField, WorkspaceDocument, output_text,
    str_field,
};
use super::key::{derive_key, entity_key};
use super::{Region, Units};

/// Extracted units of all three regions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub intents: Units,
    pub entities: Units,
    pub dialogs: Units,
}

impl Extraction {
    pub fn region(&self, region: Region) -> &Units {
        match region {
            Region::Intents => &self.intents,
            Region::Entities => &self.entities,
            Region::Dialogs => &self.dialogs,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty() && self.entities.is_empty() && self.dialogs.is_empty()
    }
}

pub fn extract(document: &WorkspaceDocument) -> Extraction {
    let extraction = Extraction {
        intents: extract_intents(document),
        entities: extract_entities(document),
        dialogs: extract_dialogs(document),
    };
    debug!(
        intents = extraction.intents.len(),
        entities = extraction.entities.len(),
        dialogs = extraction.dialogs.len(),
        "extracted translatable units"
    );
    extraction
}

pub fn extract_intents(document: &WorkspaceDocument) -> Units {
    let mut units = Units::new();
    for intent in document.region(INTENTS_FIELD) {
        let examples = intent
            .get("examples")
            .and_then(|examples| examples.as_array())
            .into_iter()
            .flatten()
            .filter_map(|example| example.as_object());
        for example in examples {
            if let Some(text) = str_field(example, "text") {
                insert_hashed(&mut units, text);
            }
        }
    }
    units
}

pub fn extract_entities(document: &WorkspaceDocument) -> Units {
    let mut units = Units::new();
    for entity in document.region(ENTITIES_FIELD) {
        let Some(name) = str_field(entity, "entity") else {
            continue;
        };
        let values = entity
            .get("values")
            .and_then(|values| values.as_array())
            .into_iter()
            .flatten()
            .filter_map(|value| value.as_object());
        for value in values {
            if let Some(text) = str_field(value, "value") {
                insert_composite(&mut units, name, text);
            }
            let synonyms = value
                .get("synonyms")
                .and_then(|synonyms| synonyms.as_array())
                .into_iter()
                .flatten()
                .filter_map(|synonym| synonym.as_str());
            for synonym in synonyms {
                insert_composite(&mut units, name, synonym);
            }
        }
    }
    units
}

pub fn extract_dialogs(document: &WorkspaceDocument) -> Units {
    let mut units = Units::new();
    for node in document.region(DIALOG_NODES_FIELD) {
        let Some(field) = output_text(node).and_then(TextField::from_value) else {
            continue;
        };
        for text in field.texts() {
            insert_hashed(&mut units, text);
        }
    }
    units
}

fn insert_hashed(units: &mut Units, text: &str) {
    if text.is_empty() {
        return;
    }
    units
        .entry(derive_key(text))
        .or_insert_with(BTreeSet::new)
        .insert(text.to_string());
}

fn insert_composite(units: &mut Units, entity: &str, text: &str) {
    if text.is_empty() {
        return;
    }
    units
        .entry(entity_key(entity, text))
        .or_insert_with(BTreeSet::new)
        .insert(text.to_string());
}
