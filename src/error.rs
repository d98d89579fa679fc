/// Fault taxonomy for the analysis pipeline. Faults never cross the
/// `PhishingAnalyzer` boundary; every variant is absorbed into a
/// degraded but well-formed report somewhere along the way.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Input error: {0}")]
    Input(String),
    #[error("Enrichment error: {0}")]
    Enrichment(String),
    #[error("Synthesis error: {0}")]
    Synthesis(String),
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}
