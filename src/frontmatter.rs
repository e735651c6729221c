//! YAML frontmatter parsing and targeted metadata edits.
//!
//! Edits only rewrite the lines that belong to the key being changed. Comments,
//! quoting, the order of other keys and the document body are kept byte-for-byte,
//! and every edit is re-parsed before it is accepted.

use std::{fs, ops::Range, path::Path};

use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// Indentation used for block lists when the document offers no example.
const DEFAULT_SEQUENCE_INDENT: &str = "  ";

/// Errors that can occur when parsing or editing frontmatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontmatterError {
    /// The document has no usable YAML block.
    Parse(String),
    /// The key holds a value the edit cannot be applied to.
    Shape(String),
}

impl FrontmatterError {
    /// Attach the document path and key to produce a crate error.
    pub(crate) fn into_error(self, path: &Path, key: &str) -> Error {
        match self {
            Self::Parse(message) => Error::FrontmatterParse {
                path: path.to_path_buf(),
                message,
            },
            Self::Shape(message) => Error::FrontmatterShape {
                path: path.to_path_buf(),
                key: key.to_string(),
                message,
            },
        }
    }
}

/// Result of merging a value into a list-valued key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The key was absent and now holds a one-element list.
    Inserted,
    /// A differing scalar was turned into a two-element list.
    Converted,
    /// The value was appended to an existing list.
    Appended,
    /// The value was already present.
    Unchanged,
}

impl MergeOutcome {
    /// Whether the document text changed.
    pub fn changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// A Markdown document with a leading YAML metadata block.
#[derive(Debug, Clone)]
pub struct Frontmatter {
    /// Full document text.
    contents: String,
    /// Location of the YAML payload within `contents`.
    bounds: FrontmatterBounds,
    /// Parsed metadata block.
    metadata: Mapping,
}

impl Frontmatter {
    /// Parse a document, requiring a non-empty mapping as frontmatter.
    pub fn parse(contents: impl Into<String>) -> Result<Self, FrontmatterError> {
        let contents = contents.into();
        let bounds = frontmatter_bounds(&contents)
            .ok_or_else(|| FrontmatterError::Parse("missing YAML frontmatter".to_string()))?;
        let value: Value = serde_yaml::from_str(&contents[bounds.start..bounds.end])
            .map_err(|error| FrontmatterError::Parse(error.to_string()))?;
        let metadata = match value {
            Value::Mapping(metadata) => metadata,
            Value::Null => {
                return Err(FrontmatterError::Parse("frontmatter is empty".to_string()));
            }
            _ => {
                return Err(FrontmatterError::Parse(
                    "frontmatter must be a mapping of keys to values".to_string(),
                ));
            }
        };

        Ok(Self {
            contents,
            bounds,
            metadata,
        })
    }

    /// Return the full document text.
    pub fn as_str(&self) -> &str {
        &self.contents
    }

    /// Return the parsed value for a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Return the scalar strings held by a key, whether it is a scalar or a list.
    pub fn string_values(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_text).collect(),
            Some(value) => scalar_text(value).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Set a key to a single scalar, replacing whatever it held.
    ///
    /// Returns `false` when the key already held exactly this string.
    pub fn set_scalar(&mut self, key: &str, value: &str) -> Result<bool, FrontmatterError> {
        if let Some(Value::String(current)) = self.get(key)
            && current == value
        {
            return Ok(false);
        }

        let newline = self.newline();
        let Some(entry) = self.find_entry(key) else {
            let line = format!("{}: {}{newline}", plain_scalar(key), plain_scalar(value));
            self.splice(self.bounds.end..self.bounds.end, &line)?;
            return Ok(true);
        };

        if entry.is_inline_scalar() {
            let rendered = render_scalar(value, QuoteStyle::of(&entry.value));
            let line = format!("{} {rendered}{}{newline}", entry.prefix, entry.comment);
            self.splice(entry.start..entry.key_end, &line)?;
        } else {
            let line = format!(
                "{} {}{}{newline}",
                entry.prefix,
                plain_scalar(value),
                entry.comment
            );
            self.splice(entry.start..entry.end, &line)?;
        }
        Ok(true)
    }

    /// Merge a value into a list-valued key without duplicating it.
    pub fn merge_list_value(
        &mut self,
        key: &str,
        value: &str,
    ) -> Result<MergeOutcome, FrontmatterError> {
        let newline = self.newline();
        let indent = self.sequence_indent();

        match self.get(key).cloned() {
            None => {
                let text = format!(
                    "{}:{newline}{indent}- {}{newline}",
                    plain_scalar(key),
                    plain_scalar(value)
                );
                self.splice(self.bounds.end..self.bounds.end, &text)?;
                Ok(MergeOutcome::Inserted)
            }
            Some(Value::Null) => {
                let entry = self.require_entry(key)?;
                let text = format!(
                    "{}{}{newline}{indent}- {}{newline}",
                    entry.prefix,
                    entry.comment,
                    plain_scalar(value)
                );
                self.splice(entry.start..entry.key_end, &text)?;
                Ok(MergeOutcome::Inserted)
            }
            Some(Value::Sequence(items)) => {
                if items
                    .iter()
                    .any(|item| scalar_text(item).as_deref() == Some(value))
                {
                    return Ok(MergeOutcome::Unchanged);
                }
                let entry = self.require_entry(key)?;
                self.append_item(&entry, &items, value)?;
                Ok(MergeOutcome::Appended)
            }
            Some(Value::Mapping(_)) => Err(FrontmatterError::Shape(
                "it holds a mapping, expected a scalar or a list".to_string(),
            )),
            Some(Value::Tagged(_)) => Err(FrontmatterError::Shape(
                "it holds a tagged value, expected a scalar or a list".to_string(),
            )),
            Some(current) => {
                let Some(old) = scalar_text(&current) else {
                    return Err(FrontmatterError::Shape(
                        "unsupported value type".to_string(),
                    ));
                };
                if old == value {
                    return Ok(MergeOutcome::Unchanged);
                }
                let entry = self.require_entry(key)?;
                let (old_item, style, range) = if entry.is_inline_scalar() {
                    let style = QuoteStyle::of(&entry.value);
                    (entry.value.clone(), style, entry.start..entry.key_end)
                } else {
                    (plain_scalar(&old), QuoteStyle::Plain, entry.start..entry.end)
                };
                let text = format!(
                    "{}{}{newline}{indent}- {old_item}{newline}{indent}- {}{newline}",
                    entry.prefix,
                    entry.comment,
                    render_scalar(value, style)
                );
                self.splice(range, &text)?;
                Ok(MergeOutcome::Converted)
            }
        }
    }

    /// Append an item to an existing list entry, matching its layout.
    fn append_item(
        &mut self,
        entry: &Entry,
        items: &[Value],
        value: &str,
    ) -> Result<(), FrontmatterError> {
        let newline = self.newline();

        if entry.value.starts_with('[') && entry.value.ends_with(']') {
            let inner = &entry.value[1..entry.value.len() - 1];
            let style = inner
                .split(',')
                .next()
                .map(|first| QuoteStyle::of(first.trim()))
                .unwrap_or(QuoteStyle::Plain);
            let rendered = render_scalar(value, style);
            let flow = if inner.trim().is_empty() {
                format!("[{rendered}]")
            } else {
                format!("[{}, {rendered}]", inner.trim_end())
            };
            let line = format!("{} {flow}{}{newline}", entry.prefix, entry.comment);
            return self.splice(entry.start..entry.key_end, &line);
        }

        let first_item = entry
            .continuation
            .iter()
            .find(|line| line.text.trim_start().starts_with('-'));
        let last_content = entry
            .continuation
            .iter()
            .rev()
            .find(|line| !is_trivia(&line.text));

        if let (true, Some(first_item), Some(last_content)) =
            (entry.value.is_empty(), first_item, last_content)
        {
            let indent = leading_whitespace(&first_item.text);
            let style = QuoteStyle::of(first_item.text.trim_start()[1..].trim_start());
            let line = format!("{indent}- {}{newline}", render_scalar(value, style));
            return self.splice(last_content.end..last_content.end, &line);
        }

        // Anchored or otherwise unusual lists are rewritten as a plain block list.
        let rendered = items
            .iter()
            .map(|item| scalar_text(item).map(|item| plain_scalar(&item)))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                FrontmatterError::Shape(
                    "the list holds non-scalar items and cannot be rewritten".to_string(),
                )
            })?;
        let indent = self.sequence_indent();
        let mut text = format!("{}{}{newline}", entry.prefix, entry.comment);
        for item in rendered {
            text.push_str(&format!("{indent}- {item}{newline}"));
        }
        text.push_str(&format!("{indent}- {}{newline}", plain_scalar(value)));
        self.splice(entry.start..entry.end, &text)
    }

    /// Replace a byte range and re-parse the result, leaving `self` intact on failure.
    fn splice(&mut self, range: Range<usize>, text: &str) -> Result<(), FrontmatterError> {
        let mut contents = self.contents.clone();
        contents.replace_range(range, text);
        *self = Self::parse(contents)?;
        Ok(())
    }

    /// Line ending used by the document.
    fn newline(&self) -> &'static str {
        if self.contents.contains("\r\n") {
            "\r\n"
        } else {
            "\n"
        }
    }

    /// Indentation of the first block list item in the metadata, if any.
    fn sequence_indent(&self) -> String {
        self.block_lines()
            .iter()
            .find(|line| {
                let trimmed = line.text.trim_start();
                trimmed == "-" || trimmed.starts_with("- ")
            })
            .map(|line| leading_whitespace(&line.text).to_string())
            .unwrap_or_else(|| DEFAULT_SEQUENCE_INDENT.to_string())
    }

    /// Split the metadata block into lines with absolute offsets.
    fn block_lines(&self) -> Vec<BlockLine> {
        let mut offset = self.bounds.start;
        self.contents[self.bounds.start..self.bounds.end]
            .split_inclusive('\n')
            .map(|line| {
                let start = offset;
                offset += line.len();
                BlockLine {
                    end: offset,
                    text: trim_line_endings(line).to_string(),
                    start,
                }
            })
            .collect()
    }

    /// Locate the lines that make up a top-level key.
    fn find_entry(&self, key: &str) -> Option<Entry> {
        let lines = self.block_lines();
        let (index, rest_offset) = lines.iter().enumerate().find_map(|(index, line)| {
            split_key_line(&line.text)
                .filter(|(found_key, _)| found_key == key)
                .map(|(_, rest_offset)| (index, rest_offset))
        })?;

        let key_line = &lines[index];
        let (value, comment) = split_comment(&key_line.text[rest_offset..]);

        let mut last = index;
        for (offset, line) in lines[index + 1..].iter().enumerate() {
            // Blank lines and column-0 comments may sit between list items.
            if line.text.trim().is_empty() || line.text.starts_with('#') {
                continue;
            }
            if !is_continuation(&line.text) {
                break;
            }
            last = index + 1 + offset;
        }

        Some(Entry {
            start: key_line.start,
            key_end: key_line.end,
            end: lines[last].end,
            prefix: key_line.text[..rest_offset].to_string(),
            value: value.to_string(),
            comment: comment.to_string(),
            continuation: lines[index + 1..=last].to_vec(),
        })
    }

    /// Locate a key that the parser reported as present.
    fn require_entry(&self, key: &str) -> Result<Entry, FrontmatterError> {
        self.find_entry(key).ok_or_else(|| {
            FrontmatterError::Shape("the key is not written as a top-level line".to_string())
        })
    }
}

/// Load and parse a frontmatter document from disk.
pub fn load(path: &Path) -> Result<Frontmatter> {
    let contents = fs::read_to_string(path).map_err(|error| Error::FrontmatterRead {
        path: path.to_path_buf(),
        source: error,
    })?;
    Frontmatter::parse(contents).map_err(|error| error.into_error(path, ""))
}

/// Write a frontmatter document back to disk.
pub fn store(path: &Path, document: &Frontmatter) -> Result<()> {
    fs::write(path, document.as_str()).map_err(|error| Error::FrontmatterWrite {
        path: path.to_path_buf(),
        source: error,
    })
}

/// Merge a value into a list-valued key of the document at `path`.
pub fn merge_list_value(path: &Path, key: &str, value: &str) -> Result<MergeOutcome> {
    let mut document = load(path)?;
    let outcome = document
        .merge_list_value(key, value)
        .map_err(|error| error.into_error(path, key))?;
    if outcome.changed() {
        store(path, &document)?;
    }
    Ok(outcome)
}

/// Set a scalar key in the document at `path`, returning whether it changed.
pub fn set_value(path: &Path, key: &str, value: &str) -> Result<bool> {
    let mut document = load(path)?;
    let changed = document
        .set_scalar(key, value)
        .map_err(|error| error.into_error(path, key))?;
    if changed {
        store(path, &document)?;
    }
    Ok(changed)
}

/// Byte range bounds for frontmatter in a document.
#[derive(Debug, Clone, Copy)]
struct FrontmatterBounds {
    /// Start byte index of the YAML payload.
    start: usize,
    /// End byte index of the YAML payload.
    end: usize,
}

/// A line of the metadata block.
#[derive(Debug, Clone)]
struct BlockLine {
    /// Absolute offset of the line start.
    start: usize,
    /// Absolute offset just past the line ending.
    end: usize,
    /// Line text without its ending.
    text: String,
}

/// The lines belonging to one top-level key.
#[derive(Debug)]
struct Entry {
    /// Absolute offset of the key line.
    start: usize,
    /// Absolute offset just past the key line.
    key_end: usize,
    /// Absolute offset just past the last line of the entry.
    end: usize,
    /// Key line text up to and including the colon.
    prefix: String,
    /// Value written on the key line, without comment.
    value: String,
    /// Inline comment including its leading whitespace.
    comment: String,
    /// Indented or list lines after the key line.
    continuation: Vec<BlockLine>,
}

impl Entry {
    /// Whether the value is a single-line scalar written on the key line.
    fn is_inline_scalar(&self) -> bool {
        !self.value.is_empty()
            && !self
                .value
                .starts_with(['|', '>', '[', '{', '&', '*', '!'])
            && self.continuation.iter().all(|line| is_trivia(&line.text))
    }
}

/// Quoting used for a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteStyle {
    /// Unquoted, quoted only if YAML requires it.
    Plain,
    /// 'single quoted'
    Single,
    /// "double quoted"
    Double,
}

impl QuoteStyle {
    /// Detect the style of a raw scalar.
    fn of(raw: &str) -> Self {
        match raw.chars().next() {
            Some('"') => Self::Double,
            Some('\'') => Self::Single,
            _ => Self::Plain,
        }
    }
}

/// Render a string scalar in the requested style.
fn render_scalar(value: &str, style: QuoteStyle) -> String {
    match style {
        QuoteStyle::Double => double_quoted(value),
        QuoteStyle::Single if !value.contains('\n') => {
            format!("'{}'", value.replace('\'', "''"))
        }
        _ => plain_scalar(value),
    }
}

/// Render a string without quotes unless YAML needs them.
pub(crate) fn plain_scalar(value: &str) -> String {
    if value.contains('\n') {
        return double_quoted(value);
    }
    match serde_yaml::to_string(value) {
        Ok(rendered) => rendered.trim_end_matches('\n').to_string(),
        Err(_) => double_quoted(value),
    }
}

/// Render a double-quoted scalar; JSON strings are valid YAML.
pub(crate) fn double_quoted(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}

/// Textual form of a scalar value.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Split a top-level `key: value` line, returning the key and the offset after the colon.
fn split_key_line(line: &str) -> Option<(String, usize)> {
    let first = line.chars().next()?;
    if first.is_whitespace() || matches!(first, '#' | '-' | '[' | '{' | '?' | '.') {
        return None;
    }

    if first == '"' || first == '\'' {
        let close = line[1..].find(first)? + 1;
        let after = &line[close + 1..];
        let rest = after.strip_prefix(':')?;
        if !(rest.is_empty() || rest.starts_with([' ', '\t'])) {
            return None;
        }
        return Some((line[1..close].to_string(), close + 2));
    }

    let mut search = 0;
    loop {
        let colon = search + line[search..].find(':')?;
        let rest = &line[colon + 1..];
        if rest.is_empty() || rest.starts_with([' ', '\t']) {
            return Some((line[..colon].trim_end().to_string(), colon + 1));
        }
        search = colon + 1;
    }
}

/// Split the text after a key's colon into value and inline comment.
fn split_comment(rest: &str) -> (&str, &str) {
    let track_quotes = rest.trim_start().starts_with(['"', '\'', '[', '{']);
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut previous = ' ';

    for (index, ch) in rest.char_indices() {
        match quote {
            Some('"') if escaped => escaped = false,
            Some('"') if ch == '\\' => escaped = true,
            Some(open) if ch == open => quote = None,
            Some(_) => {}
            None if track_quotes && (ch == '"' || ch == '\'') => quote = Some(ch),
            None if ch == '#' && (previous == ' ' || previous == '\t') => {
                let value = rest[..index].trim_end();
                let comment_start = value.len();
                return (value.trim_start(), &rest[comment_start..]);
            }
            None => {}
        }
        previous = ch;
    }

    (rest.trim(), "")
}

/// Whether a line continues the preceding key's value.
fn is_continuation(line: &str) -> bool {
    line.starts_with([' ', '\t']) || line == "-" || line.starts_with("- ")
}

/// Whether a line carries no content: blank or a comment.
fn is_trivia(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Leading spaces and tabs of a line.
fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Locate the byte range containing frontmatter in a document.
fn frontmatter_bounds(contents: &str) -> Option<FrontmatterBounds> {
    let mut offset = 0;
    let mut lines = contents.split_inclusive('\n');
    let first = lines.next()?;
    if trim_line_endings(first) != "---" {
        return None;
    }
    offset += first.len();
    let start = offset;

    for line in lines {
        let line_text = trim_line_endings(line);
        if line_text == "---" || line_text == "..." {
            return Some(FrontmatterBounds { start, end: offset });
        }
        offset += line.len();
    }

    None
}

/// Trim CRLF and LF suffixes from a line fragment.
fn trim_line_endings(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}
