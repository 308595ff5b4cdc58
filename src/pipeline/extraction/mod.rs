pub mod catalog;
pub mod classify;
pub mod external;
pub mod matcher;
pub mod medical_correction;
pub mod orchestrator;
pub mod sanitize;
pub mod scoring;

pub use catalog::*;
pub use classify::*;
pub use external::*;
pub use matcher::*;
pub use orchestrator::*;
pub use sanitize::*;
pub use scoring::*;

use thiserror::Error;

/// Problems building the parameter catalog. Never surfaced by extraction:
/// the shared catalog drops the offending entry instead.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid pattern for {key}: {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },

    #[error("Duplicate catalog key: {0}")]
    DuplicateKey(String),
}

/// Failures of an analyzer other than the deterministic pipeline.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Analyzer unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed analyzer response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing failed: {0}")]
    JsonParsing(String),

    #[error("Invalid analyzer result: {0}")]
    InvalidResult(String),
}
