//! Content synchronization engine.
//!
//! Everything in this module is pure and works on in-memory data. Remote
//! services are reached only through the traits in [`crate::remote`].
//!
//! ## Module Structure
//!
//! - `key`: Resource key derivation and collision expansion
//! - `document`: Workspace document model and text field shapes
//! - `extract`: Translatable unit extraction per region
//! - `diff`: Change set between remote and local entries
//! - `partition`: Capacity-bounded bundle groups and partitions
//! - `reconcile`: Planning and applying bundle operations
//! - `rehydrate`: Writing translations back into the document

pub mod diff;
pub mod document;
pub mod extract;
pub mod key;
pub mod partition;
pub mod reconcile;
pub mod rehydrate;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Resource key -> every distinct source string observed under it.
pub type Units = BTreeMap<String, BTreeSet<String>>;

/// Resource key -> single string, as stored in a bundle.
pub type Entries = BTreeMap<String, String>;

/// Translatable region of a workspace, each synchronized as its own bundle group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    Intents,
    Entities,
    Dialogs,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Intents, Region::Entities, Region::Dialogs];

    /// Role segment used in bundle names.
    pub fn role(self) -> &'static str {
        match self {
            Region::Intents => "intents",
            Region::Entities => "entities",
            Region::Dialogs => "dialogs",
        }
    }

    pub fn banner(self) -> &'static str {
        match self {
            Region::Intents => "INTENTS",
            Region::Entities => "ENTITIES",
            Region::Dialogs => "DIALOGS",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role())
    }
}
