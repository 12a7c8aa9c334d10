//! Extraction of translatable strings from hack configuration XML.
//!
//! Configuration files are walked as a stream of start, end and text events.
//! Attributes prefixed with `_` carry translatable strings; which of them are
//! extracted, and with which `msgctxt`, depends on the element:
//!
//! - `screensaver`: `_label` (the hack name)
//! - `_description`: collapsed character data, placed right after the name
//! - `number`: `_label`, `_low-label`, `_high-label`
//! - `boolean`, `string`, `file`, `select`: `_label`
//! - `option`: `_label`, with the enclosing element's `_label` in the context
//!
//! Everything else is ignored.

use std::{borrow::Cow, collections::HashMap, fs, path::Path};

use anyhow::{Context, Result, anyhow, bail};
use encoding_rs::{Encoding, UTF_8};
use quick_xml::{
    Reader,
    escape::unescape_with,
    events::{BytesStart, Event},
};

use crate::{
    message::{Message, SourceRef},
    release::ReleaseId,
};


pub const CTX_SCREENSAVER_NAME: &str = "@item screen saver name";
pub const CTX_SCREENSAVER_DESCRIPTION: &str = "@info screen saver description";
pub const CTX_SLIDER: &str = "@label:slider";
pub const CTX_SPINBOX: &str = "@label:spinbox";
pub const CTX_IN_RANGE: &str = "@item:inrange";
pub const CTX_CHECKBOX: &str = "@option:check";
pub const CTX_TEXT_BOX: &str = "@label:textbox";
pub const CTX_FILE_CHOOSER: &str = "@label:chooser";
pub const CTX_GROUP_TITLE: &str = "@title:group";
pub const CTX_RADIO_OPTION: &str = "@option:radio";

const LABEL: &str = "_label";
const LOW_LABEL: &str = "_low-label";
const HIGH_LABEL: &str = "_high-label";

/// Read and extract one configuration file.
///
/// `relative_path` is what ends up in the template's source references.
pub fn extract_file(file: &Path, relative_path: &str, release: ReleaseId) -> Result<Vec<Message>> {
    let bytes =
        fs::read(file).with_context(|| format!("Failed to read XML file: {}", file.display()))?;
    let content = decode_document(&bytes)
        .with_context(|| format!("Failed to decode XML file: {}", file.display()))?;

    extract_messages(&content, relative_path, release)
        .with_context(|| format!("Failed to parse XML file: {}", file.display()))
}

/// Decode raw file content.
///
/// A byte order mark takes precedence, then the `encoding` of the XML
/// declaration; a document with neither is UTF-8.
fn decode_document(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let encoding = match declared_encoding(bytes) {
        // The declaration was readable as ASCII, so UTF-16 labels can only
        // mean an ASCII-compatible document.
        Some(label) => Encoding::for_label(label.as_bytes())
            .map(Encoding::output_encoding)
            .ok_or_else(|| anyhow!("unknown encoding '{}'", label))?,
        None => UTF_8,
    };

    let (content, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        bail!("invalid {} byte sequence", used.name());
    }
    Ok(content)
}

/// Value of `encoding="..."` in a leading `<?xml ...?>` declaration.
fn declared_encoding(bytes: &[u8]) -> Option<&str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let rest = bytes.strip_prefix(b"<?xml")?;
    let end = rest.windows(2).position(|pair| pair == b"?>")?;
    let declaration = std::str::from_utf8(&rest[..end]).ok()?;

    let (_, value) = declaration.split_once("encoding")?;
    let value = value.trim_start().strip_prefix('=')?.trim_start();
    let quote = value.chars().next().filter(|c| matches!(*c, '"' | '\''))?;
    let value = &value[1..];
    value.find(quote).map(|close| &value[..close])
}

/// Extract messages from configuration XML, in document order except for
/// descriptions, which follow the hack name they belong to.
pub fn extract_messages(content: &str, path: &str, release: ReleaseId) -> Result<Vec<Message>> {
    let line_index = build_line_index(content);
    let mut extractor = ConfigExtractor::new(path, release);
    let mut reader = Reader::from_str(content);

    loop {
        let offset = reader.buffer_position() as usize;
        let line = offset_to_line(&line_index, offset);
        let event = reader
            .read_event()
            .map_err(|e| anyhow!("{} at line {}", e, line))?;

        match event {
            Event::Start(start) => {
                let line = tag_line(content, &line_index, offset);
                extractor.start_element(&start, line)?;
            }
            Event::Empty(start) => {
                let line = tag_line(content, &line_index, offset);
                extractor.start_element(&start, line)?;
                extractor.end_element()?;
            }
            Event::End(_) => extractor.end_element()?,
            Event::Text(text) => {
                let raw: &[u8] = &text;
                let text = unescape_with(std::str::from_utf8(raw)?, resolve_entity)
                    .map_err(|e| anyhow!("{} at line {}", e, line))?;
                if !extractor.in_document() && !is_xml_whitespace(&text) {
                    bail!("text outside the document element at line {}", line);
                }
                extractor.character_data(&text);
            }
            Event::CData(cdata) => {
                if !extractor.in_document() {
                    bail!("CDATA section outside the document element at line {}", line);
                }
                extractor.character_data(std::str::from_utf8(&cdata.into_inner())?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    extractor.finish()
}

/// Predefined entities resolve to their character. Any other well-formed
/// reference may be declared in a (possibly external) DTD and is dropped.
fn resolve_entity(name: &str) -> Option<&'static str> {
    match name {
        "lt" => Some("<"),
        "gt" => Some(">"),
        "amp" => Some("&"),
        "apos" => Some("'"),
        "quot" => Some("\""),
        _ if is_xml_name(name) => Some(""),
        _ => None,
    }
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || matches!(c, '_' | ':'))
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'))
}

fn is_xml_whitespace(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
}

/// An open element and its attributes.
#[derive(Debug)]
struct Frame {
    name: String,
    attributes: HashMap<String, String>,
}

impl Frame {
    /// Non-empty value of `attribute`.
    fn label(&self, attribute: &str) -> Option<&str> {
        self.attributes
            .get(attribute)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

/// Where the description of the current hack goes.
#[derive(Debug, Clone, Copy)]
struct NameSlot {
    line: usize,
    insert_at: usize,
}

struct ConfigExtractor<'a> {
    path: &'a str,
    release: ReleaseId,
    stack: Vec<Frame>,
    messages: Vec<Message>,
    seen_root: bool,
    name_slot: Option<NameSlot>,
    /// Text of the open `_description` element and its start line.
    description: Option<(String, usize)>,
}

impl<'a> ConfigExtractor<'a> {
    fn new(path: &'a str, release: ReleaseId) -> Self {
        Self {
            path,
            release,
            stack: Vec::new(),
            messages: Vec::new(),
            seen_root: false,
            name_slot: None,
            description: None,
        }
    }

    /// Whether the document element is currently open.
    fn in_document(&self) -> bool {
        !self.stack.is_empty()
    }

    fn push(&mut self, context: Option<String>, text: &str, line: usize) {
        let message = self.message(context, text, line);
        self.messages.push(message);
    }

    fn message(&self, context: Option<String>, text: &str, line: usize) -> Message {
        Message::new(
            context,
            text,
            SourceRef::new(self.path, line),
            self.release,
        )
    }

    fn start_element(&mut self, start: &BytesStart<'_>, line: usize) -> Result<()> {
        if self.seen_root && !self.in_document() {
            bail!("junk after document element at line {}", line);
        }
        self.seen_root = true;
        self.stack.push(read_frame(start)?);
        let frame = &self.stack[self.stack.len() - 1];

        let mut found: Vec<(Option<String>, String)> = Vec::new();
        match frame.name.as_str() {
            "screensaver" => {
                if let Some(name) = frame.label(LABEL) {
                    found.push((Some(CTX_SCREENSAVER_NAME.to_string()), name.to_string()));
                }
            }
            "_description" => {
                self.description = Some((String::new(), line));
            }
            "number" => {
                let label = frame.label(LABEL);
                if let Some(label) = label {
                    let context = match frame.attributes.get("type").map(String::as_str) {
                        Some("slider") => Some(CTX_SLIDER.to_string()),
                        Some("spinbutton") => Some(CTX_SPINBOX.to_string()),
                        _ => None,
                    };
                    found.push((context, label.to_string()));
                }
                for limit in [LOW_LABEL, HIGH_LABEL] {
                    if let Some(limit_label) = frame.label(limit) {
                        let context = match label {
                            Some(label) => format!("{} {}", CTX_IN_RANGE, label),
                            None => CTX_IN_RANGE.to_string(),
                        };
                        found.push((Some(context), limit_label.to_string()));
                    }
                }
            }
            "boolean" => push_label(&mut found, frame, CTX_CHECKBOX),
            "string" => push_label(&mut found, frame, CTX_TEXT_BOX),
            "file" => push_label(&mut found, frame, CTX_FILE_CHOOSER),
            "select" => push_label(&mut found, frame, CTX_GROUP_TITLE),
            "option" => {
                if let Some(label) = frame.label(LABEL) {
                    let parent_label = self
                        .stack
                        .len()
                        .checked_sub(2)
                        .and_then(|index| self.stack[index].label(LABEL));
                    let context = match parent_label {
                        Some(parent) => format!("{} {}", CTX_RADIO_OPTION, parent),
                        None => CTX_RADIO_OPTION.to_string(),
                    };
                    found.push((Some(context), label.to_string()));
                }
            }
            _ => {}
        }

        let is_screensaver = frame.name == "screensaver";
        for (context, text) in found {
            self.push(context, &text, line);
        }
        if is_screensaver {
            self.name_slot = Some(NameSlot {
                line,
                insert_at: self.messages.len(),
            });
        }
        Ok(())
    }

    /// Close the innermost element.
    ///
    /// A finished `_description` is inserted right after the hack name, not
    /// appended, so that name and description stay adjacent in the template.
    /// It carries the line of the `screensaver` start tag.
    fn end_element(&mut self) -> Result<()> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| anyhow!("end tag without matching start tag"))?;
        if frame.name != "_description" {
            return Ok(());
        }
        let Some((raw, description_line)) = self.description.take() else {
            return Ok(());
        };

        let text = collapse_whitespace(&raw);
        if text.is_empty() {
            return Ok(());
        }
        let context = Some(CTX_SCREENSAVER_DESCRIPTION.to_string());
        match self.name_slot {
            Some(slot) => {
                let message = self.message(context, &text, slot.line);
                let at = slot.insert_at.min(self.messages.len());
                self.messages.insert(at, message);
            }
            None => self.push(context, &text, description_line),
        }
        Ok(())
    }

    fn character_data(&mut self, text: &str) {
        if let Some((buffer, _)) = self.description.as_mut() {
            buffer.push_str(text);
        }
    }

    fn finish(self) -> Result<Vec<Message>> {
        if let Some(open) = self.stack.last() {
            bail!("unclosed element <{}> at end of document", open.name);
        }
        if !self.seen_root {
            bail!("no element found");
        }
        Ok(self.messages)
    }
}

fn push_label(found: &mut Vec<(Option<String>, String)>, frame: &Frame, context: &str) {
    if let Some(label) = frame.label(LABEL) {
        found.push((Some(context.to_string()), label.to_string()));
    }
}

fn read_frame(start: &BytesStart<'_>) -> Result<Frame> {
    let name = std::str::from_utf8(start.name().as_ref())?.to_string();
    let mut attributes = HashMap::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = std::str::from_utf8(attribute.key.as_ref())?.to_string();
        let raw = std::str::from_utf8(&attribute.value)?;
        if raw.contains('<') {
            bail!("'<' not allowed in value of attribute '{}'", key);
        }
        let value = unescape_with(&normalize_attribute(raw), resolve_entity)?.into_owned();
        attributes.insert(key, value);
    }
    Ok(Frame { name, attributes })
}

/// Literal whitespace characters in attribute values read as plain spaces.
///
/// Line breaks are normalized first, so `\r\n` becomes a single space.
fn normalize_attribute(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace(['\t', '\n', '\r'], " ")
}

/// Collapse runs of whitespace into one space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Line of the tag that starts at or after `offset`.
fn tag_line(content: &str, line_index: &[usize], offset: usize) -> usize {
    let tag_start = content
        .get(offset..)
        .and_then(|rest| rest.find('<'))
        .map_or(offset, |pos| offset + pos);
    offset_to_line(line_index, tag_start)
}

/// Build an index of line start byte offsets.
///
/// Line 1 starts at offset 0, line 2 starts after the first '\n', etc.
fn build_line_index(content: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (i, b) in content.bytes().enumerate() {
        if b == b'\n' {
            offsets.push(i + 1);
        }
    }
    offsets
}

/// Find the 1-based line number for a byte offset.
fn offset_to_line(line_index: &[usize], offset: usize) -> usize {
    match line_index.binary_search(&offset) {
        Ok(line) => line + 1,
        Err(line) => line,
    }
}
