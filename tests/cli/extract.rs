use anyhow::Result;
use insta::assert_snapshot;
use insta_cmd::assert_cmd_snapshot;

use crate::CliTest;

const SPIRAL: &str = r#"<?xml version="1.0" encoding="ISO-8859-1"?>

<screensaver name="spiral" _label="Spiral">
  <boolean id="spin" _label="Spin" arg-unset="-no-spin"/>
</screensaver>
"#;

#[test]
fn test_two_releases_keep_newest_sources() -> Result<()> {
    let test = CliTest::new()?;
    test.write_release("hack-5.20", &[("spiral.xml", SPIRAL)])?;
    test.write_release("hack-5.36", &[("spiral.xml", SPIRAL)])?;

    assert_cmd_snapshot!(
        test.command()
            .args(["hacks.pot", "hack-5.20.tar.gz", "hack-5.36.tar.gz"]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Wrote 2 entries to hacks.pot (4 messages from 2 archives, newest release 5.36)

    ----- stderr -----
    "
    );
    assert_snapshot!(test.read_file("hacks.pot")?, @r#"
    #: hacks/config/spiral.xml:3
    msgctxt "@item screen saver name"
    msgid "Spiral"
    msgstr ""

    #: hacks/config/spiral.xml:4
    msgctxt "@option:check"
    msgid "Spin"
    msgstr ""
    "#);
    assert!(!test.scratch_exists());

    Ok(())
}

#[test]
fn test_strings_missing_from_newest_release_are_marked() -> Result<()> {
    let test = CliTest::new()?;
    test.write_release(
        "xscreensaver-5.20",
        &[(
            "gears.xml",
            r#"<screensaver _label="Gears">
  <select id="mode" _label="Mode">
    <option id="a" _label="Planetary"/>
  </select>
  <_description>
    Interlocking gears.
  </_description>
</screensaver>"#,
        )],
    )?;
    test.write_release(
        "xscreensaver-5.36",
        &[(
            "gears.xml",
            r#"<screensaver _label="Gears">
  <number id="speed" type="slider" _label="Speed" _low-label="Slow" _high-label="Fast"/>
  <_description>
    Interlocking gears.
  </_description>
</screensaver>"#,
        )],
    )?;

    // Archive order on the command line does not matter.
    let output = test.run(&[
        "out/hacks.pot",
        "xscreensaver-5.36.tar.gz",
        "xscreensaver-5.20.tar.gz",
    ]);
    // The output directory does not exist yet.
    assert!(!output?.status.success());

    test.write_file("out/.keep", "")?;
    assert_cmd_snapshot!(
        test.command().args([
            "out/hacks.pot",
            "xscreensaver-5.36.tar.gz",
            "xscreensaver-5.20.tar.gz",
        ]),
        @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Wrote 7 entries to out/hacks.pot (9 messages from 2 archives, newest release 5.36)
    note: 2 entries are not present in 5.36

    ----- stderr -----
    "
    );
    assert_snapshot!(test.read_file("out/hacks.pot")?, @r#"
    #: hacks/config/gears.xml:1
    msgctxt "@item screen saver name"
    msgid "Gears"
    msgstr ""

    #: hacks/config/gears.xml:1
    msgctxt "@info screen saver description"
    msgid "Interlocking gears."
    msgstr ""

    #: hacks/config/gears.xml:2
    msgctxt "@label:slider"
    msgid "Speed"
    msgstr ""

    #: hacks/config/gears.xml:2
    msgctxt "@item:inrange Speed"
    msgid "Slow"
    msgstr ""

    #: hacks/config/gears.xml:2
    msgctxt "@item:inrange Speed"
    msgid "Fast"
    msgstr ""

    #. last-release: 5.20
    #: hacks/config/gears.xml:2
    msgctxt "@title:group"
    msgid "Mode"
    msgstr ""

    #. last-release: 5.20
    #: hacks/config/gears.xml:3
    msgctxt "@option:radio Mode"
    msgid "Planetary"
    msgstr ""
    "#);

    Ok(())
}

#[test]
fn test_configs_are_read_in_path_order() -> Result<()> {
    let test = CliTest::new()?;
    test.write_release(
        "xscreensaver-6.0",
        &[
            ("zoom.xml", r#"<screensaver _label="Zoom"/>"#),
            ("apple2.xml", r#"<screensaver _label="Apple ][ &quot;2&quot;"/>"#),
        ],
    )?;

    let output = test.run(&["hacks.pot", "xscreensaver-6.0.tar.gz"])?;
    assert!(output.status.success(), "{:?}", output);

    let content = test.read_file("hacks.pot")?;
    let apple = content.find("msgid \"Apple ][ \\\"2\\\"\"").expect("apple2 entry");
    let zoom = content.find("msgid \"Zoom\"").expect("zoom entry");
    assert!(apple < zoom);

    Ok(())
}

#[test]
fn test_summary_output() -> Result<()> {
    let test = CliTest::new()?;
    test.write_release("hack-5.36", &[("spiral.xml", SPIRAL)])?;

    assert_cmd_snapshot!(test.command().args(["hacks.pot", "hack-5.36.tar.gz"]), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Wrote 2 entries to hacks.pot (2 messages from 1 archive, newest release 5.36)

    ----- stderr -----
    ");

    assert_cmd_snapshot!(
        test.command()
            .args(["--format", "json", "hacks.pot", "hack-5.36.tar.gz"]),
        @r#"
    success: true
    exit_code: 0
    ----- stdout -----
    {
      "output": "hacks.pot",
      "archives": [
        {
          "archive": "hack-5.36.tar.gz",
          "release": {
            "major": 5,
            "minor": 36
          },
          "configFiles": 1,
          "messages": 2
        }
      ],
      "messages": 2,
      "entries": 2,
      "staleEntries": 0,
      "newestRelease": {
        "major": 5,
        "minor": 36
      }
    }

    ----- stderr -----
    "#
    );

    Ok(())
}

#[test]
fn test_verbose_progress_goes_to_stderr() -> Result<()> {
    let test = CliTest::new()?;
    test.write_release("hack-5.36", &[("spiral.xml", SPIRAL)])?;

    assert_cmd_snapshot!(test.command().args(["-v", "hacks.pot", "hack-5.36.tar.gz"]), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Wrote 2 entries to hacks.pot (2 messages from 1 archive, newest release 5.36)

    ----- stderr -----
    Unpacking hack-5.36.tar.gz (release 5.36)
      hacks/config/spiral.xml: 2 message(s)
    ");

    Ok(())
}

#[test]
fn test_stale_scratch_directory_is_replaced() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("xscreensaver-unpacked/leftover/file.txt", "stale")?;
    test.write_release("hack-5.36", &[("spiral.xml", SPIRAL)])?;

    let output = test.run(&["hacks.pot", "hack-5.36.tar.gz"])?;
    assert!(output.status.success(), "{:?}", output);
    assert!(!test.scratch_exists());
    assert!(test.root().join("hacks.pot").exists());

    Ok(())
}
