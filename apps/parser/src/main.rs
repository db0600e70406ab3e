use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_parser::{load_document, load_text, Config, DocumentFormat, ResumeParsingPipeline};

fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs on stderr; stdout carries the JSON record only
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting resume-parser v{}", env!("CARGO_PKG_VERSION"));

    let input = std::env::args()
        .nth(1)
        .context("Usage: resume-parser <file.pdf|file.txt|->")?;

    let text = if input == "-" {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read stdin")?;
        load_text(&bytes, DocumentFormat::PlainText).context("Failed to read résumé from stdin")?
    } else {
        load_document(Path::new(&input)).with_context(|| format!("Failed to load '{input}'"))?
    };

    let pipeline = ResumeParsingPipeline::new(config.parser.clone());
    let record = pipeline.parse(&text);

    let json = if config.pretty_output {
        serde_json::to_string_pretty(&record)?
    } else {
        serde_json::to_string(&record)?
    };
    println!("{json}");

    Ok(())
}
