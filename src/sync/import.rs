//! Import: read translated strings from the bundle store and write them back
//! into a copy of the workspace.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::changelog::ChangeNote;
use crate::core::Region;
use crate::core::partition::BundleGroup;
use crate::core::rehydrate::{Translations, rehydrate};
use crate::error::{SyncError, SyncResult};
use crate::remote::{BundleStore, WorkspaceApi};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub workspace_id: String,
    pub version: String,
    pub bundle_prefix: String,
    pub target_language: String,
    /// Workspace to update. A new workspace is created when absent.
    pub target_workspace: Option<String>,
    pub max_value_length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub target_language: String,
    /// Translated entries read per region.
    pub translated: BTreeMap<Region, usize>,
    pub notes: Vec<ChangeNote>,
    pub created: bool,
}

/// Import works on exactly one target language.
pub fn single_target_language(languages: &[String]) -> SyncResult<String> {
    match languages {
        [language] => Ok(language.clone()),
        [] => Err(SyncError::config("import requires a target language")),
        _ => Err(SyncError::config(format!(
            "import accepts exactly one target language, got {}",
            languages.join(",")
        ))),
    }
}

pub fn import(
    workspace: &dyn WorkspaceApi,
    store: &dyn BundleStore,
    options: &ImportOptions,
) -> SyncResult<ImportReport> {
    let language = options.target_language.as_str();
    let mut document = workspace.fetch(&options.workspace_id, &options.version)?;
    document.language()?;

    let bundle_ids = store.list_bundle_ids()?;
    let mut translations = Translations::default();
    let mut translated = BTreeMap::new();

    for region in Region::ALL {
        let group = BundleGroup::new(&options.bundle_prefix, region);
        let entries = translations.region_mut(region);
        for (_, name) in group.members(&bundle_ids) {
            let info = store.bundle_info(&name)?;
            if !info.target_languages.contains(language) {
                return Err(SyncError::config(format!(
                    "target language '{}' is not configured on bundle {}",
                    language, name
                )));
            }
            entries.extend(store.resource_strings(&name, language)?);
        }
        translated.insert(region, entries.len());
    }

    if translations.is_empty() {
        return Err(SyncError::NothingToImport(language.to_string()));
    }

    let notes = rehydrate(&mut document, &translations, language, options.max_value_length);
    if !notes.is_empty() {
        warn!(count = notes.len(), "some units were not translated; see the change log");
    }

    workspace.store(options.target_workspace.as_deref(), &options.version, &document)?;
    info!(
        language = %language,
        created = options.target_workspace.is_none(),
        "workspace written back"
    );

    Ok(ImportReport {
        target_language: language.to_string(),
        translated,
        notes,
        created: options.target_workspace.is_none(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Entries;
    use crate::core::key::derive_key;
    use crate::core::rehydrate::ENTITY_VALUE_MAX_LENGTH;
    use crate::remote::{MemoryBundleStore, MemoryWorkspaceApi};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn options(target_workspace: Option<&str>) -> ImportOptions {
        ImportOptions {
            workspace_id: "ws".to_string(),
            version: "2018-09-20".to_string(),
            bundle_prefix: "ws".to_string(),
            target_language: "fr".to_string(),
            target_workspace: target_workspace.map(str::to_string),
            max_value_length: ENTITY_VALUE_MAX_LENGTH,
        }
    }

    fn workspace() -> MemoryWorkspaceApi {
        MemoryWorkspaceApi::with_workspace(
            "ws",
            json!({
                "name": "Bot",
                "language": "en",
                "intents": [{ "intent": "greeting", "examples": [{ "text": "Hi" }, { "text": "Hello" }] }]
            }),
        )
    }

    fn entries(pairs: &[(&str, &str)]) -> Entries {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_single_target_language() {
        assert_eq!(single_target_language(&["fr".to_string()]).unwrap(), "fr");
        assert!(single_target_language(&[]).is_err());
        let err = single_target_language(&["fr".to_string(), "de".to_string()]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: import accepts exactly one target language, got fr,de"
        );
    }

    #[test]
    fn test_import_creates_translated_workspace() {
        let api = workspace();
        let store = MemoryBundleStore::new();
        store.insert_bundle("ws-intents-1", "en", &["fr"], Entries::new());
        store.set_strings("ws-intents-1", "fr", entries(&[(derive_key("Hi").as_str(), "Bonjour")]));

        let report = import(&api, &store, &options(None)).unwrap();

        assert!(report.created);
        assert_eq!(report.translated[&Region::Intents], 1);
        assert_eq!(report.notes.len(), 1);
        let stored = api.stored();
        assert_eq!(stored[0].0, None);
        assert_eq!(stored[0].1["name"], json!("Bot_fr"));
        assert_eq!(stored[0].1["language"], json!("fr"));
        assert_eq!(
            stored[0].1["intents"][0]["examples"],
            json!([{ "text": "Bonjour" }, { "text": "Hello" }])
        );
    }

    #[test]
    fn test_import_missing_target_language_on_bundle() {
        let store = MemoryBundleStore::new();
        store.insert_bundle("ws-intents-1", "en", &["de"], Entries::new());

        let err = import(&workspace(), &store, &options(None)).unwrap_err();
        assert!(matches!(err, SyncError::Configuration(_)));
    }

    #[test]
    fn test_import_nothing_to_import() {
        let api = workspace();
        let store = MemoryBundleStore::new();
        store.insert_bundle("ws-intents-1", "en", &["fr"], Entries::new());

        let err = import(&api, &store, &options(Some("ws"))).unwrap_err();
        assert!(matches!(err, SyncError::NothingToImport(_)));
        assert!(api.stored().is_empty());
    }

    #[test]
    fn test_import_updates_existing_workspace() {
        let api = workspace();
        let store = MemoryBundleStore::new();
        store.insert_bundle("ws-intents-1", "en", &["fr"], Entries::new());
        store.set_strings(
            "ws-intents-1",
            "fr",
            entries(&[(derive_key("Hi").as_str(), "Salut"), (derive_key("Hello").as_str(), "Bonjour")]),
        );

        let report = import(&api, &store, &options(Some("ws"))).unwrap();
        assert!(!report.created);
        assert!(report.notes.is_empty());
        assert_eq!(api.stored()[0].0.as_deref(), Some("ws"));
    }
}
