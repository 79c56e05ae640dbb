//! Change log entries produced while writing translations back.
//!
//! A rejected or skipped unit never aborts a run. It becomes a [`ChangeNote`]
//! that ends up in the plain-text change log, grouped by region.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use enum_dispatch::enum_dispatch;

use crate::core::Region;
use crate::core::reconcile::BundleEffect;

// ============================================================
// Note Types
// ============================================================

/// A source string that stayed in place because no translation was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UntranslatedNote {
    pub region: Region,
    /// Intent name, entity name or dialog node id. May be empty.
    pub owner: String,
    pub source: String,
}

/// Entity value translation longer than the allowed limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueTooLongNote {
    pub entity: String,
    pub value: String,
    pub length: usize,
    pub limit: usize,
}

/// Translation dropped because an equal (ignoring case) sibling was already placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateDroppedNote {
    pub region: Region,
    pub owner: String,
    pub translation: String,
}

/// Condition token referencing an entity value the translations do not contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionTokenMissingNote {
    pub token: String,
}

/// Condition token whose entity value translation is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionTokenUntranslatedNote {
    pub token: String,
}

// ============================================================
// Report Trait
// ============================================================

#[enum_dispatch]
pub trait Report {
    /// Region whose section the note is listed under.
    fn region(&self) -> Region;

    /// One-line description.
    fn message(&self) -> String;
}

impl Report for UntranslatedNote {
    fn region(&self) -> Region {
        self.region
    }

    fn message(&self) -> String {
        let what = match self.region {
            Region::Intents => "intent example",
            Region::Entities => "entity value",
            Region::Dialogs => "dialog text",
        };
        if self.owner.is_empty() {
            format!("{} \"{}\" was not translated", what, self.source)
        } else {
            format!("{} \"{}\" in {} was not translated", what, self.source, self.owner)
        }
    }
}

impl Report for ValueTooLongNote {
    fn region(&self) -> Region {
        Region::Entities
    }

    fn message(&self) -> String {
        format!(
            "entity {} value \"{}\" translation has {} characters, exceeds limit of {}",
            self.entity, self.value, self.length, self.limit
        )
    }
}

impl Report for DuplicateDroppedNote {
    fn region(&self) -> Region {
        self.region
    }

    fn message(&self) -> String {
        format!(
            "duplicate translation \"{}\" in {} dropped",
            self.translation, self.owner
        )
    }
}

impl Report for ConditionTokenMissingNote {
    fn region(&self) -> Region {
        Region::Dialogs
    }

    fn message(&self) -> String {
        format!("condition token {} has no entity translation", self.token)
    }
}

impl Report for ConditionTokenUntranslatedNote {
    fn region(&self) -> Region {
        Region::Dialogs
    }

    fn message(&self) -> String {
        format!("condition token {} was not translated", self.token)
    }
}

// ============================================================
// ChangeNote Enum
// ============================================================

#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeNote {
    Untranslated(UntranslatedNote),
    ValueTooLong(ValueTooLongNote),
    DuplicateDropped(DuplicateDroppedNote),
    ConditionTokenMissing(ConditionTokenMissingNote),
    ConditionTokenUntranslated(ConditionTokenUntranslatedNote),
}

// ============================================================
// Rendering
// ============================================================

const BANNER_RULE: &str = "==============================";

fn push_banner(out: &mut String, title: &str) {
    out.push_str(BANNER_RULE);
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(BANNER_RULE);
    out.push('\n');
}

/// Render notes under one banner per region, in region order.
///
/// Regions without notes are omitted. Notes keep their original order.
pub fn render_notes(notes: &[ChangeNote]) -> String {
    let mut out = String::new();
    for region in Region::ALL {
        let mut section = notes.iter().filter(|note| note.region() == region).peekable();
        if section.peek().is_none() {
            continue;
        }
        push_banner(&mut out, region.banner());
        for note in section {
            out.push_str(&note.message());
            out.push('\n');
        }
    }
    out
}

/// Render bundle operations of an export run, grouped by region.
pub fn render_effects(effects: &[(Region, BundleEffect)]) -> String {
    let mut out = String::new();
    for region in Region::ALL {
        let mut section = effects.iter().filter(|(r, _)| *r == region).peekable();
        if section.peek().is_none() {
            continue;
        }
        push_banner(&mut out, region.banner());
        for (_, effect) in section {
            let line = match effect {
                BundleEffect::Created { name, entries } => {
                    format!("created {} with {} entries", name, entries)
                }
                BundleEffect::Updated { name, entries } => {
                    format!("updated {} to {} entries", name, entries)
                }
                BundleEffect::Deleted { name } => format!("deleted {}", name),
            };
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

/// Write a rendered log, replacing any previous content.
pub fn write_log(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content)
        .with_context(|| format!("Failed to write change log: {}", path.display()))
}

// ============================================================
// Tests
// ============================================================
