//! Heuristic résumé parser.
//!
//! Turns unstructured résumé text into a [`ResumeRecord`]: contact details,
//! skills, work history, education, certifications, projects, languages and
//! a completeness-based confidence score. Parsing never fails; a stage that
//! cannot produce anything yields its empty value.
//!
//! ```no_run
//! use resume_parser::ResumeParsingPipeline;
//!
//! let pipeline = ResumeParsingPipeline::default();
//! let record = pipeline.parse("Jane Doe\njane@example.com\n\nSkills\nRust, Go");
//! assert_eq!(record.skills, vec!["Rust", "Go"]);
//! ```

pub mod config;
pub mod errors;
pub mod ingest;
pub mod models;
pub mod pipeline;

pub use config::{Config, ParserConfig};
pub use errors::IngestError;
pub use ingest::{load_document, load_text, DocumentFormat};
pub use models::ResumeRecord;
pub use pipeline::ResumeParsingPipeline;
