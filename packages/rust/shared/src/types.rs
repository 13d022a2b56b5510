//! Core domain types for a single SRS generation run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, SrsError};

/// Leading marker of a failure text produced by an extractor.
pub const ERROR_MARKER: &str = "❌";

/// Literal word an extractor embeds when it could not read its input.
pub const EXTRACTION_ERROR_TOKEN: &str = "Error";

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 identifier for one generation run (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// An uploaded file: its original name (used for type detection) and bytes.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Lower-cased extension of the file name, without the dot.
    pub fn extension(&self) -> Option<String> {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }
}

/// Up to three raw input channels collected by the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct InputSources {
    /// Free-text project description.
    pub text: Option<String>,
    /// Uploaded `.pdf` or `.txt` document.
    pub document: Option<Upload>,
    /// Uploaded `.xlsx` requirements sheet.
    pub spreadsheet: Option<Upload>,
}

/// Which input channel a run's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    Text,
    Document,
    Spreadsheet,
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Document => "document",
            Self::Spreadsheet => "spreadsheet",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// NormalizedText / Prompt
// ---------------------------------------------------------------------------

/// The single plain-text blob a run generates from.
///
/// Always trimmed, non-empty and free of extraction error markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText(String);

impl NormalizedText {
    /// Validate and wrap the selected input text.
    pub fn new(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty()
            || trimmed.contains(ERROR_MARKER)
            || trimmed.contains(EXTRACTION_ERROR_TOKEN)
        {
            return Err(SrsError::input(
                "please provide a valid description, PDF/text file, or correctly formatted Excel sheet",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The full instruction text sent to the generative service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(pub String);

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// SpreadsheetRow
// ---------------------------------------------------------------------------

/// One requirement row of the uploaded spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadsheetRow {
    /// `S.No` column.
    pub serial: String,
    /// `User Code` column.
    pub user_code: String,
    /// `Description` column.
    pub description: String,
    /// `Function` column.
    pub function: String,
    /// `Function Code` column.
    pub function_code: String,
}

impl SpreadsheetRow {
    /// Render the row as one requirement bullet.
    pub fn to_line(&self) -> String {
        format!(
            "- {} ({}): {} — {}",
            self.user_code, self.function_code, self.function, self.description
        )
    }
}

// ---------------------------------------------------------------------------
// OutputPaths
// ---------------------------------------------------------------------------

/// The two fixed, overwritten-in-place output slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Intermediate HTML markup.
    pub html: PathBuf,
    /// Rendered PDF document.
    pub pdf: PathBuf,
}
