//! PO template output.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};

use crate::catalog::{Catalog, Entry};

/// Write `catalog` as a PO template to `path`, replacing any existing file.
pub fn write_template_file(catalog: &Catalog, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create template: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_template(catalog, &mut writer)
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write template: {}", path.display()))
}

/// Write every entry as one template block.
///
/// ```text
/// #. last-release: 5.20
/// #: hacks/config/spiral.xml:2
/// msgctxt "@item screen saver name"
/// msgid "Spiral"
/// msgstr ""
///
/// ```
pub fn write_template<W: Write>(catalog: &Catalog, writer: &mut W) -> io::Result<()> {
    for entry in &catalog.entries {
        write_entry(entry, catalog, writer)?;
    }
    Ok(())
}

pub fn render_template(catalog: &Catalog) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_template(catalog, &mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

fn write_entry<W: Write>(entry: &Entry, catalog: &Catalog, writer: &mut W) -> io::Result<()> {
    if entry.release != catalog.newest {
        writeln!(writer, "#. last-release: {}", entry.release)?;
    }
    if !entry.sources.is_empty() {
        let sources: Vec<String> = entry.sources.iter().map(ToString::to_string).collect();
        writeln!(writer, "#: {}", sources.join(" "))?;
    }
    if let Some(context) = &entry.context {
        writeln!(writer, "msgctxt \"{}\"", escape(context))?;
    }
    writeln!(writer, "msgid \"{}\"", escape(&entry.text))?;
    writeln!(writer, "msgstr \"\"")?;
    writeln!(writer)
}

/// Escape a string for a PO directive: `"`, newline and tab.
///
/// Backslashes pass through unchanged.
pub fn escape(text: &str) -> String {
    text.replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
}
