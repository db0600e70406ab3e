use thiserror::Error;

/// Failures of the input collaborator adapter. The parsing pipeline itself
/// never fails; only turning a file into text can.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    PdfExtraction(String),

    #[error("Document is not valid UTF-8: {0}")]
    Encoding(String),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Document contains no extractable text")]
    EmptyDocument,
}
