// Input adapter: turns a résumé file into the UTF-8 text blob the pipeline reads.
// Not part of the pipeline; the only fallible surface of the crate.

use std::path::Path;

use tracing::debug;

use crate::errors::IngestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    PlainText,
}

impl DocumentFormat {
    /// Decides the format from the file extension. A missing extension is read as plain text.
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Ok(Self::Pdf),
            Some("txt") | Some("text") | Some("md") | None => Ok(Self::PlainText),
            Some(other) => Err(IngestError::UnsupportedFormat(format!(".{other}"))),
        }
    }

    fn source(self) -> &'static dyn TextSource {
        match self {
            Self::Pdf => &PdfTextSource,
            Self::PlainText => &PlainTextSource,
        }
    }
}

pub trait TextSource: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, IngestError>;
}

pub struct PdfTextSource;

impl TextSource for PdfTextSource {
    fn extract(&self, bytes: &[u8]) -> Result<String, IngestError> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| IngestError::PdfExtraction(e.to_string()))
    }
}

/// Strict UTF-8; invalid input is rejected rather than lossily decoded.
pub struct PlainTextSource;

impl TextSource for PlainTextSource {
    fn extract(&self, bytes: &[u8]) -> Result<String, IngestError> {
        String::from_utf8(bytes.to_vec()).map_err(|e| IngestError::Encoding(e.to_string()))
    }
}

pub fn load_text(bytes: &[u8], format: DocumentFormat) -> Result<String, IngestError> {
    let text = format.source().extract(bytes)?;
    if text.trim().is_empty() {
        return Err(IngestError::EmptyDocument);
    }
    debug!("Extracted {} chars from {:?} document", text.len(), format);
    Ok(text)
}

pub fn load_document(path: &Path) -> Result<String, IngestError> {
    let format = DocumentFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    load_text(&bytes, format)
}
