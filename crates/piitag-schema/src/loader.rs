//! # Schema Loading
//!
//! Turns a schema source into a [`ClassificationDocument`] in one
//! validating pass. Retrieval and parsing are kept apart: a
//! [`SchemaSource`] only supplies text (or a load failure), and this module
//! decides whether that text is a valid classification document.
//!
//! ## Failure Semantics
//!
//! - Source unreadable → [`SchemaError::Load`].
//! - Content not valid JSON/YAML, or not shaped like a classification
//!   document → [`SchemaError::Parse`].
//!
//! Both are fatal. There is no fallback to an empty schema.

use std::path::{Path, PathBuf};

use piitag_core::SchemaError;

use crate::document::ClassificationDocument;

/// Location of the schema when none is configured.
pub const DEFAULT_SCHEMA_PATH: &str = "data_tags/tag_schema.json";

/// Serialization format of a schema source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// JSON text.
    Json,
    /// YAML text (a superset of JSON).
    Yaml,
}

impl SourceFormat {
    /// Infer the format from a file extension; anything other than
    /// `.yaml`/`.yml` is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Supplier of raw schema text.
pub trait SchemaSource {
    /// Identifier used in error messages and logs.
    fn id(&self) -> String;

    /// Format of the text returned by [`fetch`](Self::fetch).
    fn format(&self) -> SourceFormat {
        SourceFormat::Json
    }

    /// Retrieve the schema text.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Load`] if the source cannot be read.
    fn fetch(&self) -> Result<String, SchemaError>;
}

/// Schema stored on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source for the given path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SchemaSource for FileSource {
    fn id(&self) -> String {
        self.path.display().to_string()
    }

    fn format(&self) -> SourceFormat {
        SourceFormat::from_path(&self.path)
    }

    fn fetch(&self) -> Result<String, SchemaError> {
        std::fs::read_to_string(&self.path).map_err(|e| SchemaError::Load {
            source_id: self.id(),
            reason: format!("cannot read file: {e}"),
        })
    }
}

/// Schema text already held in memory.
#[derive(Debug, Clone)]
pub struct InlineSource {
    id: String,
    text: String,
    format: SourceFormat,
}

impl InlineSource {
    /// In-memory JSON text.
    pub fn json(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            format: SourceFormat::Json,
        }
    }

    /// In-memory YAML text.
    pub fn yaml(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            format: SourceFormat::Yaml,
        }
    }
}

impl SchemaSource for InlineSource {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn format(&self) -> SourceFormat {
        self.format
    }

    fn fetch(&self) -> Result<String, SchemaError> {
        Ok(self.text.clone())
    }
}

/// Fetch and parse a classification document.
///
/// # Errors
///
/// Returns [`SchemaError::Load`] when the source cannot be read and
/// [`SchemaError::Parse`] when its content is malformed.
pub fn load(source: &dyn SchemaSource) -> Result<ClassificationDocument, SchemaError> {
    let source_id = source.id();
    tracing::debug!(source = %source_id, "fetching classification schema");

    let text = source.fetch()?;
    let document = parse_str(&source_id, &text, source.format())?;

    tracing::info!(
        source = %source_id,
        services = document.services().len(),
        fields = document.field_count(),
        "loaded classification schema"
    );
    Ok(document)
}

/// Load a classification document from a file path.
///
/// # Errors
///
/// See [`load`].
pub fn load_path(path: impl AsRef<Path>) -> Result<ClassificationDocument, SchemaError> {
    load(&FileSource::new(path))
}

/// Parse schema text in the given format.
///
/// # Errors
///
/// Returns [`SchemaError::Parse`] with the parser's message (which carries
/// line and column) when the text is malformed.
pub fn parse_str(
    source_id: &str,
    text: &str,
    format: SourceFormat,
) -> Result<ClassificationDocument, SchemaError> {
    let parsed: Result<ClassificationDocument, String> = match format {
        SourceFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        SourceFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
    };
    parsed.map_err(|reason| SchemaError::Parse {
        source_id: source_id.to_string(),
        reason,
    })
}
