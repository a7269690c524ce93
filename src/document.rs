//! Metadata extraction.
//!
//! An agent document starts with a `---` line, a YAML mapping, and a closing
//! `---` line; everything after that is the instruction body. [`extract`]
//! splits the text without copying and parses the block with `serde_yaml`.
//! The header slice is kept verbatim so that `header + body` reproduces the
//! original text byte for byte.

use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

/// The metadata/body delimiter line.
pub const DELIMITER: &str = "---";

/// Why a document could not be turned into metadata + body.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no valid frontmatter found: {0}")]
    MissingMetadata(&'static str),
    #[error("YAML parsing error: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
    #[error("frontmatter must be a YAML mapping")]
    NotAMapping,
}

/// Borrowed pieces of a document.
#[derive(Debug)]
pub struct Extracted<'a> {
    /// Opening delimiter through the closing delimiter line, inclusive.
    pub header: &'a str,
    /// Raw YAML between the delimiter lines.
    pub yaml: &'a str,
    pub metadata: Mapping,
    /// Everything after the closing delimiter line, verbatim.
    pub body: &'a str,
}

/// Splits `text` into metadata and body.
///
/// # Errors
///
/// - [`DocumentError::MissingMetadata`] when the first line is not `---` or
///   no closing `---` line follows.
/// - [`DocumentError::InvalidYaml`] when the block is not valid YAML.
/// - [`DocumentError::NotAMapping`] when the block is valid YAML but not a
///   mapping (including an empty block).
///
/// # Examples
///
/// ```
/// use oxidized_agents::document::extract;
///
/// let text = "---\ndescription: Reviews code\n---\n# Reviewer\n";
/// let doc = extract(text).unwrap();
/// assert_eq!(doc.body, "# Reviewer\n");
/// assert_eq!(format!("{}{}", doc.header, doc.body), text);
/// ```
pub fn extract(text: &str) -> Result<Extracted<'_>, DocumentError> {
    let mut offset = 0;
    let mut lines = text.split_inclusive('\n');

    let first = lines
        .next()
        .ok_or(DocumentError::MissingMetadata("document is empty"))?;
    if !is_delimiter(first) {
        return Err(DocumentError::MissingMetadata(
            "document must start with a '---' line",
        ));
    }
    offset += first.len();
    let yaml_start = offset;

    for line in lines {
        if is_delimiter(line) {
            let yaml = &text[yaml_start..offset];
            let header_end = offset + line.len();
            let metadata = parse_metadata(yaml)?;
            return Ok(Extracted {
                header: &text[..header_end],
                yaml,
                metadata,
                body: &text[header_end..],
            });
        }
        offset += line.len();
    }

    Err(DocumentError::MissingMetadata(
        "closing '---' line not found",
    ))
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

fn parse_metadata(yaml: &str) -> Result<Mapping, DocumentError> {
    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(map) => Ok(map),
        _ => Err(DocumentError::NotAMapping),
    }
}

/// An agent document loaded from disk.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub raw: String,
    pub metadata: Mapping,
    header_len: usize,
}

impl Document {
    /// Reads and extracts the document at `path`.
    pub fn load(path: &Path) -> Result<Document, DocumentError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Document::parse(path, raw)
    }

    /// Extracts a document from text already in memory.
    pub fn parse(path: &Path, raw: String) -> Result<Document, DocumentError> {
        let (metadata, header_len) = {
            let extracted = extract(&raw)?;
            (extracted.metadata, extracted.header.len())
        };
        tracing::debug!(path = %path.display(), fields = metadata.len(), "extracted metadata");
        Ok(Document {
            path: path.to_path_buf(),
            raw,
            metadata,
            header_len,
        })
    }

    /// The verbatim metadata block, delimiters included.
    pub fn header(&self) -> &str {
        &self.raw[..self.header_len]
    }

    pub fn body(&self) -> &str {
        &self.raw[self.header_len..]
    }

    /// Looks up a top-level metadata field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_delimiters_are_accepted() {
        let text = "---\r\ndescription: x\r\n---\r\nbody\r\n";
        let doc = extract(text).unwrap();
        assert_eq!(doc.body, "body\r\n");
        assert_eq!(doc.header.len() + doc.body.len(), text.len());
    }

    #[test]
    fn closing_delimiter_at_eof() {
        let doc = extract("---\ndescription: x\n---").unwrap();
        assert_eq!(doc.body, "");
    }

    #[test]
    fn empty_block_is_not_a_mapping() {
        assert!(matches!(
            extract("---\n---\nbody"),
            Err(DocumentError::NotAMapping)
        ));
    }
}
