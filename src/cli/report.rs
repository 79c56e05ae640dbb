//! Report formatting and printing utilities.
//!
//! Kept apart from the synchronization engine so convoglot can be used as a
//! library without any terminal output.

use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;

use super::commands::{CommandResult, CommandSummary, InitSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::error::SyncError;
use crate::sync::{ExportReport, GroupOutcome, ImportReport};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn print(result: &CommandResult) {
    print_to(result, &mut io::stdout().lock());
}

pub fn print_to<W: Write>(result: &CommandResult, writer: &mut W) {
    match &result.summary {
        CommandSummary::Export(report) => print_export_to(report, writer),
        CommandSummary::Import(report) => {
            print_import_to(report, result.strict, writer);
        }
        CommandSummary::Init(summary) => print_init_to(summary, writer),
    }

    if let Some(log_file) = &result.log_file {
        print_log_location_to(log_file, writer);
    }
}

/// Print a fatal error to stderr.
pub fn print_error(err: &anyhow::Error) {
    print_error_to(err, &mut io::stderr().lock());
}

/// Print a fatal error, labelled with its kind when it comes from the engine.
pub fn print_error_to<W: Write>(err: &anyhow::Error, writer: &mut W) {
    match err.downcast_ref::<SyncError>() {
        Some(sync_err) => {
            let _ = writeln!(
                writer,
                "{} {}",
                format!("error[{}]:", sync_err.kind()).bold().red(),
                sync_err
            );
        }
        None => {
            let _ = writeln!(writer, "{} {:#}", "error:".bold().red(), err);
        }
    }
}

pub fn print_export_to<W: Write>(report: &ExportReport, writer: &mut W) {
    if report.is_unchanged() {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            "Bundles already up to date".green()
        );
    } else {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Exported workspace (source language {})", report.source_language).green()
        );
    }

    for group in &report.groups {
        let _ = writeln!(writer, "  {:<9} {}", group.region.role(), describe_group(group));
    }
}

pub fn print_import_to<W: Write>(report: &ImportReport, strict: bool, writer: &mut W) {
    let destination = if report.created {
        "a new workspace"
    } else {
        "the target workspace"
    };
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Imported {} translations into {}",
            report.target_language, destination
        )
        .green()
    );

    for (region, count) in &report.translated {
        let _ = writeln!(
            writer,
            "  {:<9} {} translated {}",
            region.role(),
            count,
            plural(*count, "string", "strings")
        );
    }

    let rejected = report.notes.len();
    if rejected > 0 {
        let label = format!(
            "{} {} could not be applied",
            rejected,
            plural(rejected, "unit", "units")
        );
        if strict {
            let _ = writeln!(writer, "{} {}", FAILURE_MARK.red(), label.red());
        } else {
            let _ = writeln!(writer, "{} {}", "warning:".bold().yellow(), label);
        }
    }
}

fn print_init_to<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_log_location_to<W: Write>(log_file: &Path, writer: &mut W) {
    let _ = writeln!(
        writer,
        "Change log written to {}",
        log_file.display().to_string().cyan()
    );
}

fn describe_group(group: &GroupOutcome) -> String {
    let mut parts = vec![format!(
        "{} {}",
        group.entries,
        plural(group.entries, "entry", "entries")
    )];
    if group.changes == 0 {
        parts.push("up to date".to_string());
    } else {
        parts.push(format!(
            "{} {}",
            group.changes,
            plural(group.changes, "change", "changes")
        ));
        parts.push(format!(
            "{} {} touched",
            group.effects.len(),
            plural(group.effects.len(), "bundle", "bundles")
        ));
    }
    if !group.languages_updated.is_empty() {
        parts.push(format!(
            "target languages extended on {}",
            group.languages_updated.join(", ")
        ));
    }
    parts.join(", ")
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use super::*;
    use crate::changelog::{ChangeNote, UntranslatedNote};
    use crate::core::Region;
    use crate::core::reconcile::BundleEffect;

    fn strip_ansi(s: &str) -> String {
        let mut result = String::new();
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                while let Some(&next) = chars.peek() {
                    chars.next();
                    if next == 'm' {
                        break;
                    }
                }
            } else {
                result.push(c);
            }
        }
        result
    }

    fn render<F: FnOnce(&mut Vec<u8>)>(f: F) -> String {
        let mut output = Vec::new();
        f(&mut output);
        strip_ansi(&String::from_utf8(output).unwrap())
    }

    fn import_report(notes: usize) -> ImportReport {
        let note = UntranslatedNote {
            region: Region::Intents,
            owner: "greeting".to_string(),
            source: "Hello".to_string(),
        };
        ImportReport {
            target_language: "fr".to_string(),
            translated: BTreeMap::from([(Region::Intents, 1), (Region::Entities, 0)]),
            notes: vec![ChangeNote::from(note); notes],
            created: true,
        }
    }

    #[test]
    fn test_export_summary() {
        let report = ExportReport {
            source_language: "en".to_string(),
            groups: vec![
                GroupOutcome {
                    region: Region::Intents,
                    entries: 2,
                    changes: 2,
                    languages_updated: Vec::new(),
                    effects: vec![BundleEffect::Created {
                        name: "ws-intents-1".to_string(),
                        entries: 2,
                    }],
                },
                GroupOutcome {
                    region: Region::Dialogs,
                    entries: 1,
                    changes: 0,
                    languages_updated: vec!["ws-dialogs-1".to_string()],
                    effects: Vec::new(),
                },
            ],
        };

        let output = render(|w| print_export_to(&report, w));
        insta::assert_snapshot!(output, @r"
        ✓ Exported workspace (source language en)
          intents   2 entries, 2 changes, 1 bundle touched
          dialogs   1 entry, up to date, target languages extended on ws-dialogs-1
        ");
    }

    #[test]
    fn test_export_unchanged() {
        let report = ExportReport {
            source_language: "en".to_string(),
            groups: Vec::new(),
        };
        let output = render(|w| print_export_to(&report, w));
        assert_eq!(output, "✓ Bundles already up to date\n");
    }

    #[test]
    fn test_import_summary_with_rejections() {
        let output = render(|w| print_import_to(&import_report(2), false, w));
        insta::assert_snapshot!(output, @r"
        ✓ Imported fr translations into a new workspace
          intents   1 translated string
          entities  0 translated strings
        warning: 2 units could not be applied
        ");
    }

    #[test]
    fn test_import_strict_marks_failure() {
        let output = render(|w| print_import_to(&import_report(1), true, w));
        assert!(output.contains("✘ 1 unit could not be applied"));
    }

    #[test]
    fn test_print_includes_log_location() {
        let result = CommandResult {
            summary: CommandSummary::Import(import_report(0)),
            rejected_count: 0,
            strict: false,
            log_file: Some(PathBuf::from("convoglot.log")),
        };
        let output = render(|w| print_to(&result, w));
        assert!(output.ends_with("Change log written to convoglot.log\n"));
    }

    #[test]
    fn test_print_init() {
        let output = render(|w| print_to(&CommandResult::init(), w));
        assert_eq!(output, format!("✓ Created {}\n", CONFIG_FILE_NAME));
    }

    #[test]
    fn test_error_kind_label() {
        let err = anyhow::Error::new(SyncError::NothingToImport("fr".to_string()));
        let output = render(|w| print_error_to(&err, w));
        assert_eq!(
            output,
            "error[nothing-to-import]: no translated resource strings found for language 'fr'\n"
        );
    }

    #[test]
    fn test_error_without_kind() {
        let err = anyhow::anyhow!("{} already exists", CONFIG_FILE_NAME);
        let output = render(|w| print_error_to(&err, w));
        assert_eq!(output, format!("error: {} already exists\n", CONFIG_FILE_NAME));
    }
}
