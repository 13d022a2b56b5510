//! Input extraction: free text, uploaded documents, and requirement sheets.
//!
//! Three optional input channels are normalized into exactly one
//! [`NormalizedText`]. Free text wins over an uploaded document, which wins
//! over an uploaded spreadsheet. A lower-priority channel is only read when
//! every channel above it came up empty.

mod spreadsheet;

use tracing::{debug, info, instrument, warn};

use srsgen_shared::{InputSource, InputSources, NormalizedText, Result, SrsError, Upload};

pub use spreadsheet::{REQUIRED_COLUMNS, extract_spreadsheet, read_spreadsheet, rows_from_table};

/// Pick the winning input channel and validate its text.
///
/// Fails with [`SrsError::InputValidation`] when every channel is empty or
/// the winning text carries an extraction error marker.
#[instrument(skip_all, fields(
    has_text = sources.text.is_some(),
    has_document = sources.document.is_some(),
    has_spreadsheet = sources.spreadsheet.is_some(),
))]
pub fn select_input(sources: &InputSources) -> Result<(InputSource, NormalizedText)> {
    let (source, text) = pick_channel(sources)?;
    let normalized = NormalizedText::new(&text)?;
    info!(%source, chars = normalized.as_str().len(), "input selected");
    Ok((source, normalized))
}

fn pick_channel(sources: &InputSources) -> Result<(InputSource, String)> {
    if let Some(text) = sources.text.as_deref().filter(|t| !t.trim().is_empty()) {
        return Ok((InputSource::Text, text.to_string()));
    }

    if let Some(upload) = &sources.document {
        let text = extract_document(upload)?;
        if !text.trim().is_empty() {
            return Ok((InputSource::Document, text));
        }
        debug!(file = %upload.filename, "document yielded no text");
    }

    if let Some(upload) = &sources.spreadsheet {
        return Ok((InputSource::Spreadsheet, extract_spreadsheet(upload)));
    }

    Ok((InputSource::Text, String::new()))
}

/// Extract plain text from an uploaded `.pdf` or `.txt` document.
///
/// Other extensions yield an empty string.
#[instrument(skip(upload), fields(file = %upload.filename, bytes = upload.bytes.len()))]
pub fn extract_document(upload: &Upload) -> Result<String> {
    match upload.extension().as_deref() {
        Some("pdf") => extract_pdf(&upload.bytes),
        Some("txt") => String::from_utf8(upload.bytes.clone())
            .map_err(|e| SrsError::parse(format!("{}: not valid UTF-8: {e}", upload.filename))),
        other => {
            warn!(extension = ?other, "unsupported document type, ignoring");
            Ok(String::new())
        }
    }
}

/// Concatenate the text of every page that yields any, in page order.
fn extract_pdf(bytes: &[u8]) -> Result<String> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| SrsError::parse(format!("failed to parse PDF: {e}")))?;

    let pages = doc.get_pages();
    let mut texts = Vec::with_capacity(pages.len());

    for page_num in pages.keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(text) if !text.trim().is_empty() => texts.push(text.trim_end().to_string()),
            Ok(_) => debug!(page = page_num, "page has no extractable text"),
            Err(e) => warn!(page = page_num, error = %e, "failed to extract page text"),
        }
    }

    debug!(pages = pages.len(), with_text = texts.len(), "pdf extraction complete");
    Ok(texts.join("\n"))
}
