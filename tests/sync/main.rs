//! End-to-end export and import runs against the in-memory collaborators.

use std::collections::BTreeSet;

use anyhow::Result;
use convoglot::cli::commands::{export::run_export, import::run_import};
use convoglot::core::Entries;
use convoglot::remote::{MemoryBundleStore, MemoryWorkspaceApi};
use convoglot::sync::{ExportOptions, ImportOptions, export, import};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;

fn bot() -> Value {
    json!({
        "name": "Bot",
        "language": "en",
        "intents": [
            { "intent": "greeting", "examples": [{ "text": "Hi" }, { "text": "Hello" }] },
            { "intent": "books", "examples": [{ "text": "Book Aa" }, { "text": "Book BB" }] }
        ],
        "entities": [
            { "entity": "city", "values": [{ "value": "Paris", "synonyms": ["City of Light"] }] }
        ],
        "dialog_nodes": [
            {
                "dialog_node": "n1",
                "conditions": "@city:Paris",
                "output": { "text": { "values": ["Goodbye"] } }
            }
        ]
    })
}

fn export_options(capacity: usize) -> ExportOptions {
    ExportOptions {
        workspace_id: "ws".to_string(),
        version: "2018-09-20".to_string(),
        bundle_prefix: "ws".to_string(),
        target_languages: BTreeSet::from(["fr".to_string()]),
        capacity,
    }
}

fn import_options() -> ImportOptions {
    ImportOptions {
        workspace_id: "ws".to_string(),
        version: "2018-09-20".to_string(),
        bundle_prefix: "ws".to_string(),
        target_language: "fr".to_string(),
        target_workspace: None,
        max_value_length: 64,
    }
}

fn entries(pairs: &[(&str, &str)]) -> Entries {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Stand-in for the translators working on the bundle store.
fn translate_all(store: &MemoryBundleStore) {
    store.set_strings(
        "ws-intents-1",
        "fr",
        entries(&[
            ("Hi_921", "Salut"),
            ("Hell_42628b2", "Bonjour"),
            ("Book_671288b7:0", "Livre A"),
            ("Book_671288b7:1", "Livre B"),
        ]),
    );
    store.set_strings(
        "ws-entities-1",
        "fr",
        entries(&[("city:Paris", "Paname"), ("city:City of Light", "Ville Lumière")]),
    );
    store.set_strings("ws-dialogs-1", "fr", entries(&[("Good_6f8f80f1", "Au revoir")]));
}

#[test]
fn test_export_uploads_every_region() -> Result<()> {
    let api = MemoryWorkspaceApi::with_workspace("ws", bot());
    let store = MemoryBundleStore::new();

    export(&api, &store, &export_options(300))?;

    assert_eq!(
        store.strings("ws-intents-1", "en"),
        entries(&[
            ("Book_671288b7:0", "Book Aa"),
            ("Book_671288b7:1", "Book BB"),
            ("Hell_42628b2", "Hello"),
            ("Hi_921", "Hi"),
        ])
    );
    assert_eq!(
        store.strings("ws-entities-1", "en"),
        entries(&[("city:City of Light", "City of Light"), ("city:Paris", "Paris")])
    );
    assert_eq!(
        store.strings("ws-dialogs-1", "en"),
        entries(&[("Good_6f8f80f1", "Goodbye")])
    );
    Ok(())
}

#[test]
fn test_round_trip_produces_translated_workspace() -> Result<()> {
    let api = MemoryWorkspaceApi::with_workspace("ws", bot());
    let store = MemoryBundleStore::new();
    export(&api, &store, &export_options(300))?;
    translate_all(&store);

    let report = import(&api, &store, &import_options())?;

    assert!(report.notes.is_empty());
    assert!(report.created);
    let stored = api.stored();
    assert_eq!(stored.len(), 1);
    let document = &stored[0].1;
    assert_eq!(document["name"], json!("Bot_fr"));
    assert_eq!(document["language"], json!("fr"));
    assert_eq!(
        document["intents"][0]["examples"],
        json!([{ "text": "Salut" }, { "text": "Bonjour" }])
    );
    assert_eq!(
        document["intents"][1]["examples"],
        json!([{ "text": "Livre A" }, { "text": "Livre B" }])
    );
    assert_eq!(
        document["entities"][0]["values"],
        json!([{ "value": "Paname", "synonyms": ["Ville Lumière"] }])
    );
    assert_eq!(document["dialog_nodes"][0]["conditions"], json!("@city:Paname"));
    assert_eq!(
        document["dialog_nodes"][0]["output"]["text"],
        json!({ "values": ["Au revoir"] })
    );
    Ok(())
}

#[test]
fn test_repeated_export_makes_no_changes() -> Result<()> {
    let api = MemoryWorkspaceApi::with_workspace("ws", bot());
    let store = MemoryBundleStore::new();
    export(&api, &store, &export_options(300))?;
    translate_all(&store);
    let before = store.mutations().len();

    let report = export(&api, &store, &export_options(300))?;

    assert!(report.is_unchanged());
    assert_eq!(store.mutations().len(), before);
    Ok(())
}

#[test]
fn test_removed_example_is_deleted_from_bundle() -> Result<()> {
    let store = MemoryBundleStore::new();
    export(
        &MemoryWorkspaceApi::with_workspace("ws", bot()),
        &store,
        &export_options(300),
    )?;

    let mut edited = bot();
    edited["intents"][0]["examples"] = json!([{ "text": "Hi" }]);
    let report = export(
        &MemoryWorkspaceApi::with_workspace("ws", edited),
        &store,
        &export_options(300),
    )?;

    assert_eq!(report.groups[0].changes, 1);
    let intents = store.strings("ws-intents-1", "en");
    assert_eq!(intents.len(), 3);
    assert!(!intents.contains_key("Hell_42628b2"));
    Ok(())
}

#[test]
fn test_small_capacity_spreads_over_partitions() -> Result<()> {
    let mut workspace = bot();
    workspace["intents"][0]["examples"] = json!([
        { "text": "Hi" }, { "text": "Hello" }, { "text": "Hey" },
        { "text": "Good morning" }, { "text": "Howdy" }
    ]);
    let api = MemoryWorkspaceApi::with_workspace("ws", workspace);
    let store = MemoryBundleStore::new();

    export(&api, &store, &export_options(2))?;

    let intent_bundles: Vec<String> = store
        .bundle_ids()
        .into_iter()
        .filter(|id| id.starts_with("ws-intents-"))
        .collect();
    assert_eq!(
        intent_bundles,
        vec!["ws-intents-1", "ws-intents-2", "ws-intents-3", "ws-intents-4"]
    );
    let mut total = 0;
    for name in &intent_bundles {
        let size = store.strings(name, "en").len();
        assert!(size <= 2, "{} holds {} entries", name, size);
        total += size;
    }
    assert_eq!(total, 7);
    Ok(())
}

#[test]
fn test_language_added_later_reaches_new_partitions() -> Result<()> {
    let greeting = |examples: Value| {
        json!({
            "name": "Bot",
            "language": "en",
            "intents": [{ "intent": "greeting", "examples": examples }]
        })
    };
    let store = MemoryBundleStore::new();
    export(
        &MemoryWorkspaceApi::with_workspace("ws", greeting(json!([{ "text": "Hi" }, { "text": "Hello" }]))),
        &store,
        &export_options(2),
    )?;

    let mut german = export_options(2);
    german.target_languages = BTreeSet::from(["de".to_string()]);
    let api = MemoryWorkspaceApi::with_workspace(
        "ws",
        greeting(json!([{ "text": "Hi" }, { "text": "Hello" }, { "text": "Hey" }])),
    );
    export(&api, &store, &german)?;

    let both = BTreeSet::from(["de".to_string(), "fr".to_string()]);
    for name in ["ws-intents-1", "ws-intents-2"] {
        let info = store.info(name).expect("bundle exists");
        assert_eq!(info.target_languages, both, "{}", name);
    }

    store.set_strings("ws-intents-1", "fr", entries(&[("Hi_921", "Salut")]));
    let report = import(&api, &store, &import_options())?;
    assert_eq!(report.target_language, "fr");
    Ok(())
}

#[test]
fn test_commands_write_change_logs() -> Result<()> {
    let dir = TempDir::new()?;
    let api = MemoryWorkspaceApi::with_workspace("ws", bot());
    let store = MemoryBundleStore::new();

    let export_log = dir.path().join("logs").join("export.log");
    let result = run_export(&api, &store, &export_options(300), &export_log, false)?;
    assert_eq!(result.rejected_count, 0);
    let log = std::fs::read_to_string(&export_log)?;
    assert!(log.contains("INTENTS"));
    assert!(log.contains("created ws-intents-1 with 4 entries"));

    store.set_strings("ws-intents-1", "fr", entries(&[("Hi_921", "Salut")]));
    let import_log = dir.path().join("import.log");
    let result = run_import(&api, &store, &import_options(), &import_log, true)?;
    assert_eq!(result.rejected_count, 3);
    let log = std::fs::read_to_string(&import_log)?;
    assert!(log.contains(r#"intent example "Hello" in greeting was not translated"#));
    Ok(())
}
