//! In-memory INI document: parsing, lookup, editing and byte-faithful rendering.
//!
//! The document keeps every line it parsed as raw bytes, so files in a legacy
//! encoding (Shift-JIS is common for game settings) survive an edit.  Keys,
//! values and section names are looked up through a lossy UTF-8 view of those
//! bytes.  Rendering an unmodified document reproduces the original bytes,
//! except that section headers are always written as `[name]\r\n`.

use std::borrow::Cow;

/// Marker that disables an entry.
const COMMENT_MARKER: char = ';';
/// Line terminator for every line this module writes.
const CRLF: &[u8] = b"\r\n";

/// One line inside a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    raw_key: String,
    value: String,
    value_bytes: Vec<u8>,
    raw_line: Vec<u8>,
    keyed: bool,
}

impl Entry {
    /// Key as written in the file, including a leading `;` if commented out.
    pub fn raw_key(&self) -> &str {
        &self.raw_key
    }

    /// Value text, without the line terminator.
    ///
    /// Bytes that are not valid UTF-8 show up as U+FFFD here; see
    /// [`Entry::value_bytes`] for the stored form.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Value exactly as stored in the file.
    pub fn value_bytes(&self) -> &[u8] {
        &self.value_bytes
    }

    /// The full line as it will be written, terminator included.
    pub fn raw_line(&self) -> &[u8] {
        &self.raw_line
    }

    /// Returns `true` if the key carries the comment marker.
    pub fn is_commented(&self) -> bool {
        self.keyed && self.raw_key.starts_with(COMMENT_MARKER)
    }

    /// Returns `false` for blank and comment lines kept only for round-tripping.
    pub fn is_key_value(&self) -> bool {
        self.keyed
    }

    fn parse(line: &[u8]) -> Self {
        let body = chomp(line);
        match body.iter().position(|b| *b == b'=') {
            Some(eq) => {
                let value_bytes = trim_start(&body[eq + 1..]).to_vec();
                Self {
                    raw_key: lossy(&body[..eq]).trim_end().to_string(),
                    value: lossy(&value_bytes).into_owned(),
                    value_bytes,
                    raw_line: line.to_vec(),
                    keyed: true,
                }
            }
            None => Self::passthrough(line),
        }
    }

    fn passthrough(line: &[u8]) -> Self {
        Self {
            raw_key: String::new(),
            value: String::new(),
            value_bytes: Vec::new(),
            raw_line: line.to_vec(),
            keyed: false,
        }
    }

    fn new_keyed(raw_key: String, value_bytes: Vec<u8>) -> Self {
        let mut entry = Self::passthrough(b"");
        entry.keyed = true;
        entry.assign(raw_key, value_bytes);
        entry
    }

    fn assign(&mut self, raw_key: String, value_bytes: Vec<u8>) {
        let mut line = Vec::with_capacity(raw_key.len() + value_bytes.len() + 3);
        line.extend_from_slice(raw_key.as_bytes());
        line.push(b'=');
        line.extend_from_slice(&value_bytes);
        line.extend_from_slice(CRLF);
        self.raw_line = line;
        self.raw_key = raw_key;
        self.value = lossy(&value_bytes).into_owned();
        self.value_bytes = value_bytes;
    }
}

/// A named group of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    header: Vec<u8>,
    entries: Vec<Entry>,
}

impl Section {
    fn new(header: &[u8]) -> Self {
        Self {
            name: lossy(header).into_owned(),
            header: header.to_vec(),
            entries: Vec::new(),
        }
    }

    /// Section name without brackets.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries in file order, pass-through lines included.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The first key/value entry whose raw key is exactly `raw_key`.
    pub fn entry(&self, raw_key: &str) -> Option<&Entry> {
        self.position(raw_key).map(|n| &self.entries[n])
    }

    fn position(&self, raw_key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.keyed && e.raw_key == raw_key)
    }

    /// Index of `key` for an edit that wants it `commented` or not.
    ///
    /// Looks for the key in the wanted marker state first, then in the
    /// opposite state, so an edit can flip a key in place.  If the key exists in
    /// both states the first match of the wanted state wins.  `None` means the
    /// key is new and must be appended.
    fn edit_position(&self, key: &str, commented: bool) -> Option<usize> {
        let marked = format!("{COMMENT_MARKER}{key}");
        let (wanted, opposite) = if commented {
            (marked.as_str(), key)
        } else {
            (key, marked.as_str())
        };
        self.position(wanted).or_else(|| self.position(opposite))
    }

    fn put(&mut self, index: Option<usize>, raw_key: String, value_bytes: Vec<u8>) -> &Entry {
        match index {
            Some(n) => {
                self.entries[n].assign(raw_key, value_bytes);
                &self.entries[n]
            }
            None => {
                self.entries.push(Entry::new_keyed(raw_key, value_bytes));
                &self.entries[self.entries.len() - 1]
            }
        }
    }
}

/// A parsed INI file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    preamble: Vec<Vec<u8>>,
    sections: Vec<Section>,
}

impl IniDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses INI text.  See [`IniDocument::parse_bytes`].
    pub fn parse(text: &str) -> Self {
        Self::parse_bytes(text.as_bytes())
    }

    /// Parses INI file contents in any ASCII-compatible encoding.
    ///
    /// - A line containing `=` is an entry, split on the first `=`.
    /// - A blank line, or a `;`/`#` comment without `=`, is kept verbatim.
    /// - Any other line is a section header; brackets are stripped.
    ///
    /// Lines before the first header are kept verbatim as a preamble.  A header
    /// naming an existing section continues that section.
    pub fn parse_bytes(bytes: &[u8]) -> Self {
        let mut doc = Self::new();
        let mut current: Option<usize> = None;

        for line in bytes.split_inclusive(|b| *b == b'\n') {
            let body = chomp(line);
            let trimmed = trim(body);
            let is_header = !body.contains(&b'=')
                && !trimmed.is_empty()
                && !trimmed.starts_with(&[COMMENT_MARKER as u8])
                && !trimmed.starts_with(b"#");

            if is_header {
                let header: Vec<u8> = body
                    .iter()
                    .copied()
                    .filter(|b| *b != b'[' && *b != b']')
                    .collect();
                current = Some(doc.section_index_or_insert(trim(&header)));
                continue;
            }

            match current {
                Some(n) => doc.sections[n].entries.push(Entry::parse(line)),
                None => doc.preamble.push(line.to_vec()),
            }
        }
        doc
    }

    /// Renders the document as file contents.
    ///
    /// Untouched lines are written byte for byte; a line that lacks a
    /// terminator (the last line of the original file) gets `\r\n`.
    pub fn render_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for line in &self.preamble {
            push_line(&mut out, line);
        }
        for section in &self.sections {
            out.push(b'[');
            out.extend_from_slice(&section.header);
            out.push(b']');
            out.extend_from_slice(CRLF);
            for entry in &section.entries {
                push_line(&mut out, &entry.raw_line);
            }
        }
        out
    }

    /// Renders the document as text, replacing bytes that are not valid UTF-8.
    pub fn render(&self) -> String {
        lossy(&self.render_bytes()).into_owned()
    }

    /// Sections in file order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Section names in file order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// The section called `name`.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Value of the active (uncommented) `key` in `section`.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.entry(key).map(Entry::value)
    }

    /// Sets `key=value`, reactivating a commented-out key in place if present.
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> &Entry {
        let n = self.section_index_or_insert(section.as_bytes());
        let target = &mut self.sections[n];
        let index = target.edit_position(key, false);
        target.put(index, key.to_string(), value.as_bytes().to_vec())
    }

    /// Disables `key` with the comment marker, keeping its value bytes.
    ///
    /// A key that does not exist yet is appended, commented out, with `default`.
    pub fn comment_out(&mut self, section: &str, key: &str, default: &str) -> &Entry {
        let n = self.section_index_or_insert(section.as_bytes());
        let target = &mut self.sections[n];
        let index = target.edit_position(key, true);
        let value_bytes = match index {
            Some(i) => target.entries[i].value_bytes.clone(),
            None => default.as_bytes().to_vec(),
        };
        target.put(index, format!("{COMMENT_MARKER}{key}"), value_bytes)
    }

    fn section_index_or_insert(&mut self, header: &[u8]) -> usize {
        let name = lossy(header);
        match self.sections.iter().position(|s| s.name == name) {
            Some(n) => n,
            None => {
                self.sections.push(Section::new(header));
                self.sections.len() - 1
            }
        }
    }
}

fn lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Strips one trailing `\r\n`, `\n` or `\r`.
fn chomp(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r\n")
        .or_else(|| line.strip_suffix(b"\n"))
        .or_else(|| line.strip_suffix(b"\r"))
        .unwrap_or(line)
}

fn trim_start(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}

fn trim(bytes: &[u8]) -> &[u8] {
    let bytes = trim_start(bytes);
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |n| n + 1);
    &bytes[..end]
}

fn push_line(out: &mut Vec<u8>, line: &[u8]) {
    out.extend_from_slice(line);
    if !line.ends_with(b"\n") {
        out.extend_from_slice(CRLF);
    }
}
