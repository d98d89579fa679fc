pub mod analyzer;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod model_client;
pub mod patterns;
pub mod recommendations;
pub mod scorer;
pub mod severity;
pub mod simulation;
pub mod synthesis;

// Re-export the types callers need for the common analyze-and-render path.
pub use analyzer::PhishingAnalyzer;
pub use config::PhishlensConfig;
pub use error::AnalysisError;
pub use model_client::{CompletionModel, ModelConfig, ModelError, OpenAiClient};
pub use patterns::{Catalog, IndicatorCategory};
pub use scorer::{MatchedCategory, PatternReport};
pub use severity::Severity;
pub use simulation::{SimulationManager, SimulationScenario, TrainingMailer};
pub use synthesis::{DetailedAnalysis, RiskReport};
