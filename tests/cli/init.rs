use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::CliTest;

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["bundleCapacity"], 300);
    assert_eq!(parsed["entityValueMaxLength"], 64);
    assert_eq!(parsed["logFile"], "convoglot.log");
    assert!(
        parsed.get("workspaceApiUrl").is_some(),
        "Config should have 'workspaceApiUrl' field"
    );
    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .convoglotrc.json

    ----- stderr -----
    ");

    assert!(test.root().join(".convoglotrc.json").exists());
    let content = test.read_file(".convoglotrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".convoglotrc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(crate::stderr(&output).contains("error: .convoglotrc.json already exists"));
    assert_eq!(test.read_file(".convoglotrc.json")?, "{}");

    Ok(())
}
