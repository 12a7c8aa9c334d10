use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, stderr};

#[test]
fn test_missing_arguments_print_usage() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.run(&["hacks.pot"])?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Usage:"));

    let output = test.run(&[])?;
    assert_eq!(output.status.code(), Some(1));

    Ok(())
}

#[test]
fn test_help_succeeds() -> Result<()> {
    let test = CliTest::new()?;
    let output = test.run(&["--help"])?;
    assert_eq!(output.status.code(), Some(0));
    Ok(())
}

#[test]
fn test_bad_archive_name() -> Result<()> {
    let test = CliTest::new()?;
    test.write_release("xscreensaver", &[("a.xml", "<screensaver/>")])?;

    assert_cmd_snapshot!(test.command().args(["hacks.pot", "xscreensaver.tar.gz"]), @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    error: Archive file name 'xscreensaver.tar.gz' not in the form '*-X.Y.tar.*'.
    ");
    assert!(!test.root().join("hacks.pot").exists());
    assert!(!test.scratch_exists());

    Ok(())
}

#[test]
fn test_archive_with_several_top_level_items() -> Result<()> {
    let test = CliTest::new()?;
    test.write_archive(
        "split-1.0.tar.gz",
        &[("one/hacks/config/a.xml", "<a/>"), ("two/README", "b")],
    )?;

    assert_cmd_snapshot!(test.command().args(["hacks.pot", "split-1.0.tar.gz"]), @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    error: There should be only one top-level item in archive 'split-1.0.tar.gz'.
    ");
    assert!(!test.scratch_exists());

    Ok(())
}

#[test]
fn test_archive_with_top_level_file() -> Result<()> {
    let test = CliTest::new()?;
    test.write_archive("flat-1.0.tar.gz", &[("README", "hello")])?;

    assert_cmd_snapshot!(test.command().args(["hacks.pot", "flat-1.0.tar.gz"]), @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    error: The top-level item in archive 'flat-1.0.tar.gz' is not a directory.
    ");

    Ok(())
}

#[test]
fn test_malformed_xml_aborts_run() -> Result<()> {
    let test = CliTest::new()?;
    test.write_release(
        "hack-5.36",
        &[
            ("good.xml", r#"<screensaver _label="Good"/>"#),
            ("zbad.xml", "<screensaver _label=\"Bad\">\n  <boolean>\n</screensaver>\n"),
        ],
    )?;

    // The scratch location and the parser's wording are not part of the contract.
    insta::with_settings!({filters => vec![
        (r"file: \S*/hacks/config/", "file: [SCRATCH]/hacks/config/"),
        (r"(zbad\.xml): .*", "$1: [PARSE ERROR]"),
    ]}, {
        assert_cmd_snapshot!(test.command().args(["hacks.pot", "hack-5.36.tar.gz"]), @r"
        success: false
        exit_code: 1
        ----- stdout -----

        ----- stderr -----
        error: Failed to parse XML file: [SCRATCH]/hacks/config/zbad.xml: [PARSE ERROR]
        ");
    });
    assert!(!test.root().join("hacks.pot").exists());
    assert!(!test.scratch_exists());

    Ok(())
}

#[test]
fn test_missing_archive_file() -> Result<()> {
    let test = CliTest::new()?;

    insta::with_settings!({filters => vec![
        (r"(hack-5\.36\.tar\.gz): .*", "$1: [OS ERROR]"),
    ]}, {
        assert_cmd_snapshot!(test.command().args(["hacks.pot", "hack-5.36.tar.gz"]), @r"
        success: false
        exit_code: 1
        ----- stdout -----

        ----- stderr -----
        error: Failed to open archive: hack-5.36.tar.gz: [OS ERROR]
        ");
    });

    Ok(())
}
