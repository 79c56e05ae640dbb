use anyhow::Result;

use crate::{CliTest, stderr};

fn write_credentials(test: &CliTest) -> Result<()> {
    test.write_file(
        "workspace.json",
        r#"{ "username": "apikey", "password": "secret" }"#,
    )?;
    test.write_file(
        "bundles.json",
        r#"{ "url": "http://127.0.0.1:9", "instanceId": "inst", "userId": "", "password": "pw" }"#,
    )
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().output()?;
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("export"));
    assert!(stdout.contains("import"));

    Ok(())
}

#[test]
fn test_import_rejects_multiple_languages() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.sync_command("import", "fr,de").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains(
        "error[configuration]: configuration error: import accepts exactly one target language, got fr,de"
    ));

    Ok(())
}

#[test]
fn test_missing_credentials_file() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.sync_command("export", "fr").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("error[configuration]"));
    assert!(stderr(&output).contains("workspace.json"));

    Ok(())
}

#[test]
fn test_empty_credential_field_is_named() -> Result<()> {
    let test = CliTest::new()?;
    write_credentials(&test)?;

    let output = test.sync_command("wcs-to-gp", "fr").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("userId"));
    assert!(!test.root().join("convoglot.log").exists());

    Ok(())
}

#[test]
fn test_invalid_config_file_aborts() -> Result<()> {
    let test = CliTest::new()?;
    write_credentials(&test)?;
    test.write_file(".convoglotrc.json", r#"{ "bundleCapacity": 0 }"#)?;

    let output = test.sync_command("export", "fr").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("bundleCapacity"));

    Ok(())
}
