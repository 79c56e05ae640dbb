//! Writing translated strings back into a workspace document.
//!
//! Every region is rewritten with filter/rebuild passes: the original list is
//! drained and a new one is built from the entries that survive. Rejected
//! units are reported as [`ChangeNote`]s and never abort the run.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use super::document::{
    DIALOG_NODES_FIELD, ENTITIES_FIELD, INTENTS_FIELD, TextField, WorkspaceDocument,
    output_text_mut, str_field,
};
use super::extract::{extract_dialogs, extract_intents};
use super::key::{entity_key, upload_keys};
use super::{Entries, Region};
use crate::changelog::{
    ChangeNote, ConditionTokenMissingNote, ConditionTokenUntranslatedNote, DuplicateDroppedNote,
    UntranslatedNote, ValueTooLongNote,
};

/// Default upper bound, in characters, of an entity value or synonym.
pub const ENTITY_VALUE_MAX_LENGTH: usize = 64;

/// Characters removed from an entity reference before it is looked up.
static REFERENCE_NOISE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9:_]").unwrap());

/// Translated entries for one target language, per region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translations {
    pub intents: Entries,
    pub entities: Entries,
    pub dialogs: Entries,
}

impl Translations {
    pub fn region(&self, region: Region) -> &Entries {
        match region {
            Region::Intents => &self.intents,
            Region::Entities => &self.entities,
            Region::Dialogs => &self.dialogs,
        }
    }

    pub fn region_mut(&mut self, region: Region) -> &mut Entries {
        match region {
            Region::Intents => &mut self.intents,
            Region::Entities => &mut self.entities,
            Region::Dialogs => &mut self.dialogs,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty() && self.entities.is_empty() && self.dialogs.is_empty()
    }
}

/// Rewrite `document` in place with `translations` for `target_language`.
///
/// A region whose translation map is empty is left untouched. Condition
/// expressions are rewritten only when entity translations are present.
pub fn rehydrate(
    document: &mut WorkspaceDocument,
    translations: &Translations,
    target_language: &str,
    max_value_length: usize,
) -> Vec<ChangeNote> {
    let mut notes = Vec::new();

    if !translations.intents.is_empty() {
        rehydrate_intents(document, &translations.intents, &mut notes);
    }
    if !translations.entities.is_empty() {
        rehydrate_entities(document, &translations.entities, max_value_length, &mut notes);
    }
    if !translations.dialogs.is_empty() {
        rehydrate_dialog_text(document, &translations.dialogs, &mut notes);
    }
    if !translations.entities.is_empty() {
        rehydrate_conditions(document, &translations.entities, &mut notes);
    }

    document.set_language(target_language);
    document.rename_for_language(target_language);
    debug!(notes = notes.len(), language = target_language, "rehydrated document");
    notes
}

// ============================================================
// Intents
// ============================================================

fn rehydrate_intents(document: &mut WorkspaceDocument, translated: &Entries, notes: &mut Vec<ChangeNote>) {
    let keys = upload_keys(&extract_intents(document));

    for intent in document.region_mut(INTENTS_FIELD) {
        let owner = str_field(intent, "intent").unwrap_or_default().to_string();
        let Some(examples) = intent.get_mut("examples").and_then(Value::as_array_mut) else {
            continue;
        };

        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut kept = Vec::with_capacity(examples.len());
        for mut example in examples.drain(..) {
            let Some(source) = example
                .get("text")
                .and_then(Value::as_str)
                .filter(|text| !text.is_empty())
                .map(str::to_string)
            else {
                kept.push(example);
                continue;
            };

            let translation = keys
                .get(&source)
                .and_then(|key| translated.get(key))
                .filter(|text| !text.is_empty());
            match translation {
                Some(translation) => {
                    if !seen.insert(translation.to_lowercase()) {
                        notes.push(
                            DuplicateDroppedNote {
                                region: Region::Intents,
                                owner: owner.clone(),
                                translation: translation.clone(),
                            }
                            .into(),
                        );
                        continue;
                    }
                    if let Some(object) = example.as_object_mut() {
                        object.insert("text".to_string(), Value::String(translation.clone()));
                    }
                }
                None => {
                    notes.push(
                        UntranslatedNote {
                            region: Region::Intents,
                            owner: owner.clone(),
                            source,
                        }
                        .into(),
                    );
                }
            }
            kept.push(example);
        }
        *examples = kept;
    }
}

// ============================================================
// Entities
// ============================================================

enum EntityLookup<'a> {
    Accepted(&'a str),
    TooLong(&'a str),
    Missing,
}

fn lookup_entity<'a>(translated: &'a Entries, entity: &str, source: &str, max_length: usize) -> EntityLookup<'a> {
    match translated
        .get(&entity_key(entity, source))
        .filter(|text| !text.is_empty())
    {
        Some(text) if text.chars().count() > max_length => EntityLookup::TooLong(text),
        Some(text) => EntityLookup::Accepted(text),
        None => EntityLookup::Missing,
    }
}

fn rehydrate_entities(
    document: &mut WorkspaceDocument,
    translated: &Entries,
    max_length: usize,
    notes: &mut Vec<ChangeNote>,
) {
    for entity in document.region_mut(ENTITIES_FIELD) {
        let Some(name) = str_field(entity, "entity").map(str::to_string) else {
            continue;
        };
        let Some(values) = entity.get_mut("values").and_then(Value::as_array_mut) else {
            continue;
        };

        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut kept = Vec::with_capacity(values.len());
        for mut value in values.drain(..) {
            let Some(object) = value.as_object_mut() else {
                kept.push(value);
                continue;
            };

            if let Some(source) = str_field(object, "value")
                .filter(|text| !text.is_empty())
                .map(str::to_string)
            {
                match lookup_entity(translated, &name, &source, max_length) {
                    EntityLookup::Accepted(translation) => {
                        if !seen.insert(translation.to_lowercase()) {
                            notes.push(
                                DuplicateDroppedNote {
                                    region: Region::Entities,
                                    owner: name.clone(),
                                    translation: translation.to_string(),
                                }
                                .into(),
                            );
                            continue;
                        }
                        object.insert("value".to_string(), Value::String(translation.to_string()));
                    }
                    EntityLookup::TooLong(translation) => {
                        notes.push(too_long(&name, &source, translation, max_length));
                    }
                    EntityLookup::Missing => notes.push(untranslated_entity(&name, source)),
                }
            }

            rebuild_synonyms(object, &name, translated, max_length, notes);
            kept.push(value);
        }
        *values = kept;
    }
}

/// Replace synonyms with their accepted, non-duplicate translations.
///
/// An empty source list removes the field. When no synonym was accepted the
/// original list stays so the value keeps its alternatives.
fn rebuild_synonyms(
    object: &mut Map<String, Value>,
    entity: &str,
    translated: &Entries,
    max_length: usize,
    notes: &mut Vec<ChangeNote>,
) {
    let sources: Vec<String> = object
        .get("synonyms")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .collect();
    if sources.is_empty() {
        object.shift_remove("synonyms");
        return;
    }

    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut rebuilt = Vec::with_capacity(sources.len());
    for source in sources {
        match lookup_entity(translated, entity, &source, max_length) {
            EntityLookup::Accepted(translation) => {
                if seen.insert(translation.to_lowercase()) {
                    rebuilt.push(Value::String(translation.to_string()));
                } else {
                    notes.push(
                        DuplicateDroppedNote {
                            region: Region::Entities,
                            owner: entity.to_string(),
                            translation: translation.to_string(),
                        }
                        .into(),
                    );
                }
            }
            EntityLookup::TooLong(translation) => {
                notes.push(too_long(entity, &source, translation, max_length));
            }
            EntityLookup::Missing => notes.push(untranslated_entity(entity, source)),
        }
    }

    if !rebuilt.is_empty() {
        object.insert("synonyms".to_string(), Value::Array(rebuilt));
    }
}

fn too_long(entity: &str, source: &str, translation: &str, limit: usize) -> ChangeNote {
    ValueTooLongNote {
        entity: entity.to_string(),
        value: source.to_string(),
        length: translation.chars().count(),
        limit,
    }
    .into()
}

fn untranslated_entity(entity: &str, source: String) -> ChangeNote {
    UntranslatedNote {
        region: Region::Entities,
        owner: entity.to_string(),
        source,
    }
    .into()
}

// ============================================================
// Dialogs
// ============================================================

fn rehydrate_dialog_text(document: &mut WorkspaceDocument, translated: &Entries, notes: &mut Vec<ChangeNote>) {
    let keys = upload_keys(&extract_dialogs(document));

    for node in document.region_mut(DIALOG_NODES_FIELD) {
        let owner = str_field(node, "dialog_node").unwrap_or_default().to_string();
        let Some(slot) = output_text_mut(node) else {
            continue;
        };
        let Some(field) = TextField::from_value(slot) else {
            continue;
        };

        let mut lookup = |source: &str| -> Option<String> {
            if source.is_empty() {
                return None;
            }
            let found = keys
                .get(source)
                .and_then(|key| translated.get(key))
                .filter(|text| !text.is_empty())
                .cloned();
            if found.is_none() {
                notes.push(
                    UntranslatedNote {
                        region: Region::Dialogs,
                        owner: owner.clone(),
                        source: source.to_string(),
                    }
                    .into(),
                );
            }
            found
        };

        let rewritten = match field {
            TextField::PlainText(text) => lookup(text.as_str()).map(TextField::PlainText),
            // Lists keep only translated items, even when that leaves them empty.
            TextField::TextList(items) => Some(TextField::TextList(
                items.iter().filter_map(|item| lookup(item.as_str())).collect(),
            )),
            TextField::ValuesObject(items) => Some(TextField::ValuesObject(
                items.iter().filter_map(|item| lookup(item.as_str())).collect(),
            )),
        };
        if let Some(field) = rewritten {
            field.write_to(slot);
        }
    }
}

fn rehydrate_conditions(document: &mut WorkspaceDocument, entities: &Entries, notes: &mut Vec<ChangeNote>) {
    for node in document.region_mut(DIALOG_NODES_FIELD) {
        let Some(condition) = str_field(node, "conditions") else {
            continue;
        };
        if !(condition.contains('@') && condition.contains(':')) {
            continue;
        }
        let rewritten = rewrite_condition(condition, entities, notes);
        node.insert("conditions".to_string(), Value::String(rewritten));
    }
}

/// Rewrite the value part of every `@entity:value` token of a condition.
///
/// Tokens are split on whitespace and rejoined with single spaces.
pub fn rewrite_condition(condition: &str, entities: &Entries, notes: &mut Vec<ChangeNote>) -> String {
    condition
        .split_whitespace()
        .map(|token| rewrite_token(token, entities, notes))
        .collect::<Vec<_>>()
        .join(" ")
}

fn rewrite_token(token: &str, entities: &Entries, notes: &mut Vec<ChangeNote>) -> String {
    if !(token.contains('@') && token.contains(':')) {
        return token.to_string();
    }
    let Some((lead, reference)) = token.split_once('@') else {
        return token.to_string();
    };

    let lookup = REFERENCE_NOISE.replace_all(reference, "");
    let translation = lookup
        .contains(':')
        .then(|| entities.get(&*lookup))
        .flatten();
    let (Some(translation), Some((entity_part, _))) = (translation, reference.split_once(':')) else {
        notes.push(
            ConditionTokenMissingNote {
                token: token.to_string(),
            }
            .into(),
        );
        return token.to_string();
    };
    if translation.is_empty() {
        notes.push(
            ConditionTokenUntranslatedNote {
                token: token.to_string(),
            }
            .into(),
        );
        return token.to_string();
    }

    // Closing punctuation such as `)` stays attached to the rewritten token.
    let trailing_len = reference
        .chars()
        .rev()
        .take_while(|c| !is_reference_char(*c))
        .map(char::len_utf8)
        .sum::<usize>();
    let trailing = &reference[reference.len() - trailing_len..];
    format!("{}@{}:{}{}", lead, entity_part, translation, trailing)
}

fn is_reference_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ':' || c == '_'
}
