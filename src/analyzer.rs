use crate::enrichment;
use crate::error::AnalysisError;
use crate::model_client::CompletionModel;
use crate::patterns::Catalog;
use crate::scorer;
use crate::severity::Severity;
use crate::synthesis::{self, RiskReport};
use std::sync::Arc;

const EMPTY_INPUT_ADVISORY: &str = "분석할 텍스트를 입력해주세요.";
const RETRY_ADVISORY: &str = "분석 중 오류가 발생했습니다. 다시 시도해주세요.";

/// Entry point for the whole pipeline: pattern scoring, concurrent
/// enrichment, synthesis. Holds the read-only catalog and the optional
/// injected model capability; safe to share across concurrent calls.
#[derive(Clone)]
pub struct PhishingAnalyzer {
    catalog: Arc<Catalog>,
    model: Option<Arc<dyn CompletionModel>>,
}

impl PhishingAnalyzer {
    /// Build an analyzer over a custom catalog. The catalog is validated
    /// up front so scoring can trust its invariants.
    pub fn new(
        catalog: Catalog,
        model: Option<Arc<dyn CompletionModel>>,
    ) -> Result<Self, AnalysisError> {
        catalog.validate()?;
        Ok(PhishingAnalyzer {
            catalog: Arc::new(catalog),
            model,
        })
    }

    /// Analyzer over the built-in catalog with no model capability.
    pub fn with_defaults() -> Self {
        PhishingAnalyzer {
            catalog: Arc::new(Catalog::builtin()),
            model: None,
        }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Analyze a piece of text end to end. Always returns a well-formed
    /// report: blank input short-circuits to a safe report, and any
    /// fault inside the pipeline is converted to an `unknown` report at
    /// this boundary.
    pub async fn analyze(&self, text: &str) -> RiskReport {
        if text.trim().is_empty() {
            return empty_input_report(text);
        }

        let analyzer = self.clone();
        let owned = text.to_string();
        let outcome = tokio::spawn(async move { analyzer.run_pipeline(&owned).await }).await;

        match outcome {
            Ok(report) => report,
            Err(e) => {
                let fault = AnalysisError::Unexpected(e.to_string());
                log::error!("analysis pipeline aborted: {fault}");
                failure_report(text, &fault)
            }
        }
    }

    async fn run_pipeline(&self, text: &str) -> RiskReport {
        let pattern = scorer::score(&self.catalog, text);
        let model = self.model.as_deref();

        let (linguistic, security) = tokio::join!(
            enrichment::analyze_linguistic(model, text, &pattern),
            enrichment::analyze_security(model, text, &pattern),
        );

        synthesis::synthesize(model, &pattern, &linguistic, &security, text).await
    }
}

fn empty_input_report(text: &str) -> RiskReport {
    RiskReport {
        severity: Severity::Safe,
        risk_score: 0,
        matches: Vec::new(),
        recommendations: vec![EMPTY_INPUT_ADVISORY.to_string()],
        summary: "분석할 텍스트가 없습니다.".to_string(),
        error: None,
        detailed_analysis: None,
        analyzed_text: text.to_string(),
    }
}

fn failure_report(text: &str, fault: &AnalysisError) -> RiskReport {
    RiskReport {
        severity: Severity::Unknown,
        risk_score: 0,
        matches: Vec::new(),
        recommendations: vec![RETRY_ADVISORY.to_string()],
        summary: "분석을 완료하지 못했습니다.".to_string(),
        error: Some(fault.to_string()),
        detailed_analysis: None,
        analyzed_text: text.to_string(),
    }
}
