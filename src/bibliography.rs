//! Minimal BibTeX reader for citation lookup.
//!
//! Only entry types, citation keys and titles are extracted. String macros
//! and concatenation are not expanded.

use std::{fs, io, path::Path};

/// Entry types that carry no citable record.
const NON_ENTRY_TYPES: &[&str] = &["comment", "preamble", "string"];

/// A citable bibliography record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry {
    /// Lowercased entry type, such as `article`.
    pub entry_type: String,
    /// Citation key.
    pub key: String,
    /// Title with braces removed and whitespace collapsed.
    pub title: Option<String>,
}

impl BibEntry {
    /// Whether the key or title contains `query`, ignoring case.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.key.to_lowercase().contains(&query)
            || self
                .title
                .as_deref()
                .is_some_and(|title| title.to_lowercase().contains(&query))
    }

    /// Pandoc citation syntax for this entry.
    pub fn citation(&self) -> String {
        format!("[@{}]", self.key)
    }
}

/// Read and parse a BibTeX file.
pub fn read_entries(path: &Path) -> io::Result<Vec<BibEntry>> {
    let contents = fs::read_to_string(path)?;
    Ok(parse_entries(&contents))
}

/// Parse every entry in a BibTeX document, in order of appearance.
///
/// Malformed entries are skipped. An unterminated entry ends the scan.
pub fn parse_entries(text: &str) -> Vec<BibEntry> {
    let mut entries = Vec::new();
    let mut rest = text;

    while let Some(at) = rest.find('@') {
        rest = &rest[at + 1..];
        let type_end = rest
            .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'))
            .unwrap_or(rest.len());
        let entry_type = rest[..type_end].to_ascii_lowercase();
        let after_type = rest[type_end..].trim_start();

        let close = match after_type.chars().next() {
            Some('{') => '}',
            Some('(') => ')',
            _ => continue,
        };
        let body_and_rest = &after_type[1..];
        let Some(body_len) = closing_index(body_and_rest, close) else {
            break;
        };
        let body = &body_and_rest[..body_len];
        rest = &body_and_rest[body_len + close.len_utf8()..];

        if entry_type.is_empty() || NON_ENTRY_TYPES.contains(&entry_type.as_str()) {
            continue;
        }
        if let Some(entry) = parse_body(entry_type, body) {
            entries.push(entry);
        }
    }

    entries
}

/// Parse the inside of an entry: the key followed by `name = value` fields.
fn parse_body(entry_type: String, body: &str) -> Option<BibEntry> {
    let mut parts = split_top_level(body).into_iter();
    let key = parts.next()?.trim();
    if key.is_empty() || key.contains('=') {
        return None;
    }

    let title = parts.find_map(|field| {
        let (name, value) = field.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("title")
            .then(|| clean_value(value))
    });

    Some(BibEntry {
        entry_type,
        key: key.to_string(),
        title: title.filter(|title| !title.is_empty()),
    })
}

/// Byte index of the `close` delimiter ending the current group.
fn closing_index(text: &str, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for (index, ch) in text.char_indices() {
        if ch == close && depth == 0 {
            return Some(index);
        }
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

/// Split at commas that are outside braces and quotes.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut start = 0;

    for (index, ch) in body.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '"' if depth == 0 => in_quotes = !in_quotes,
            ',' if depth == 0 && !in_quotes => {
                parts.push(&body[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts.retain(|part| !part.trim().is_empty());
    parts
}

/// Strip delimiters and braces from a field value.
fn clean_value(raw: &str) -> String {
    let raw = raw.trim();
    let inner = raw
        .strip_prefix('{')
        .and_then(|value| value.strip_suffix('}'))
        .or_else(|| {
            raw.strip_prefix('"')
                .and_then(|value| value.strip_suffix('"'))
        })
        .unwrap_or(raw);
    inner
        .replace(['{', '}'], "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::{BibEntry, parse_entries};

    const SAMPLE: &str = r#"
@comment{ignored, title = {Nope}}
@string{jcs = "Journal of Computer Science"}

@Article{knuth1984,
  author  = {Donald E. Knuth},
  title   = {Literate {P}rogramming},
  journal = jcs,
  year    = 1984,
}

@book(lamport1994,
  title = "LaTeX: A Document
           Preparation System",
  year = {1994}
)

@misc{untitled, note = {no title, here}}
"#;

    #[test]
    fn extracts_keys_types_and_titles() {
        let entries = parse_entries(SAMPLE);
        assert_eq!(
            entries,
            [
                BibEntry {
                    entry_type: "article".to_string(),
                    key: "knuth1984".to_string(),
                    title: Some("Literate Programming".to_string()),
                },
                BibEntry {
                    entry_type: "book".to_string(),
                    key: "lamport1994".to_string(),
                    title: Some("LaTeX: A Document Preparation System".to_string()),
                },
                BibEntry {
                    entry_type: "misc".to_string(),
                    key: "untitled".to_string(),
                    title: None,
                },
            ]
        );
    }

    #[test]
    fn stops_at_unterminated_entry() {
        let entries = parse_entries("@article{done, title={A}}\n@article{broken, title={B}\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "done");
    }

    #[test]
    fn ignores_stray_at_signs() {
        let entries = parse_entries("Contact me@example.org\n@book{b, title={T}}");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].citation(), "[@b]");
    }

    #[test]
    fn matches_key_or_title_case_insensitively() {
        let entries = parse_entries(SAMPLE);
        assert!(entries[0].matches("LITERATE"));
        assert!(entries[0].matches("knuth"));
        assert!(!entries[0].matches("lamport"));
        assert!(entries[2].matches("untit"));
        assert!(!entries[2].matches("here"));
    }
}
