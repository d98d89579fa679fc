use crate::enrichment::{EnrichmentResult, MODEL_TEMPERATURE};
use crate::error::AnalysisError;
use crate::model_client::CompletionModel;
use crate::recommendations::recommend;
use crate::scorer::{MatchedCategory, PatternReport};
use crate::severity::{classify, Severity};
use serde::{Deserialize, Serialize};

const SYNTHESIS_MAX_TOKENS: u32 = 400;

/// The three raw sub-reports, attached to the final report when the
/// model path produced the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub pattern: PatternReport,
    pub linguistic: EnrichmentResult,
    pub security: EnrichmentResult,
}

/// Final verdict returned to the caller. A pure value: no shared state,
/// no back-references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub severity: Severity,
    pub risk_score: u8,
    pub matches: Vec<MatchedCategory>,
    pub recommendations: Vec<String>,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_analysis: Option<DetailedAnalysis>,
    pub analyzed_text: String,
}

/// Merge the pattern report and the two enrichment narratives into the
/// final report. Severity and score come purely from the local pattern
/// score; the model only ever contributes prose, so a model failure here
/// degrades the summary and never the verdict.
pub async fn synthesize(
    model: Option<&dyn CompletionModel>,
    pattern: &PatternReport,
    linguistic: &EnrichmentResult,
    security: &EnrichmentResult,
    analyzed_text: &str,
) -> RiskReport {
    let (severity, raw_percentage) = classify(pattern.total_score);
    // Round half-up exactly once, at report assembly.
    let risk_score = raw_percentage.round().min(100.0) as u8;
    let recommendations = recommend(severity, &pattern.matches);

    let Some(model) = model else {
        return RiskReport {
            severity,
            risk_score,
            matches: pattern.matches.clone(),
            recommendations,
            summary: format!(
                "{} 위험도 - {}개 패턴 감지",
                severity.as_str().to_uppercase(),
                pattern.matches.len()
            ),
            error: None,
            detailed_analysis: None,
            analyzed_text: analyzed_text.to_string(),
        };
    };

    let prompt = format!(
        "아래 세 가지 분석 결과를 종합하여 최종 판별 리포트를 작성하세요.\n\n\
         패턴 분석: {}\n\
         언어 분석: {}\n\
         보안 분석: {}\n\n\
         판정 등급: {} (위험도: {risk_score}%)\n\
         사용자가 취해야 할 행동 요령을 포함하여 간결하게 한국어로 작성하세요.",
        pattern.summary,
        linguistic.narrative,
        security.narrative,
        severity.as_str()
    );

    match model
        .complete(&prompt, SYNTHESIS_MAX_TOKENS, MODEL_TEMPERATURE)
        .await
        .map_err(|e| AnalysisError::Synthesis(e.to_string()))
    {
        Ok(summary) => RiskReport {
            severity,
            risk_score,
            matches: pattern.matches.clone(),
            recommendations,
            summary,
            error: None,
            detailed_analysis: Some(DetailedAnalysis {
                pattern: pattern.clone(),
                linguistic: linguistic.clone(),
                security: security.clone(),
            }),
            analyzed_text: analyzed_text.to_string(),
        },
        Err(e) => {
            log::warn!("synthesis summary degraded: {e}");
            RiskReport {
                severity,
                risk_score,
                matches: pattern.matches.clone(),
                recommendations,
                summary: format!(
                    "{} 위험도 - 종합 분석 완료",
                    severity.as_str().to_uppercase()
                ),
                error: Some(e.to_string()),
                detailed_analysis: None,
                analyzed_text: analyzed_text.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::{analyze_linguistic, analyze_security};
    use crate::model_client::ModelError;
    use crate::patterns::Catalog;
    use crate::scorer;
    use async_trait::async_trait;

    struct ScriptedModel {
        reply: Result<String, String>,
    }

    #[async_trait]
    impl CompletionModel for ScriptedModel {
        async fn complete(
            &self,
            _prompt: &str,
            _max_tokens: u32,
            _temperature: f32,
        ) -> Result<String, ModelError> {
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(ModelError::Network(message.clone())),
            }
        }
    }

    const SMISHING: &str = "긴급 세금 환급금을 받으려면 계좌번호를 알려주세요";

    async fn sub_reports(text: &str) -> (PatternReport, EnrichmentResult, EnrichmentResult) {
        let pattern = scorer::score(&Catalog::builtin(), text);
        let linguistic = analyze_linguistic(None, text, &pattern).await;
        let security = analyze_security(None, text, &pattern).await;
        (pattern, linguistic, security)
    }

    #[tokio::test]
    async fn test_fallback_summary_without_model() {
        let (pattern, linguistic, security) = sub_reports(SMISHING).await;
        let report = synthesize(None, &pattern, &linguistic, &security, SMISHING).await;

        assert_eq!(report.severity, Severity::Critical);
        assert_eq!(report.risk_score, 74);
        assert_eq!(report.summary, "CRITICAL 위험도 - 3개 패턴 감지");
        assert!(report.error.is_none());
        assert!(report.detailed_analysis.is_none());
        assert_eq!(report.analyzed_text, SMISHING);
    }

    #[tokio::test]
    async fn test_model_summary_attaches_detailed_analysis() {
        let (pattern, linguistic, security) = sub_reports(SMISHING).await;
        let model = ScriptedModel {
            reply: Ok("전형적인 환급금 스미싱입니다. 회신하지 마세요.".to_string()),
        };
        let report = synthesize(Some(&model), &pattern, &linguistic, &security, SMISHING).await;

        assert_eq!(report.summary, "전형적인 환급금 스미싱입니다. 회신하지 마세요.");
        assert_eq!(report.risk_score, 74);
        let detailed = report.detailed_analysis.expect("detailed analysis attached");
        assert_eq!(detailed.pattern, pattern);
        assert_eq!(detailed.linguistic, linguistic);
    }

    #[tokio::test]
    async fn test_model_failure_keeps_verdict_and_records_error() {
        let (pattern, linguistic, security) = sub_reports(SMISHING).await;
        let model = ScriptedModel {
            reply: Err("connection refused".to_string()),
        };
        let report = synthesize(Some(&model), &pattern, &linguistic, &security, SMISHING).await;

        assert_eq!(report.severity, Severity::Critical);
        assert_eq!(report.risk_score, 74);
        assert_eq!(report.summary, "CRITICAL 위험도 - 종합 분석 완료");
        assert!(report.error.as_deref().unwrap().contains("connection refused"));
        assert!(report.detailed_analysis.is_none());
    }

    #[tokio::test]
    async fn test_safe_text_synthesizes_safe_report() {
        let (pattern, linguistic, security) = sub_reports("오늘 날씨가 좋네요").await;
        let report = synthesize(None, &pattern, &linguistic, &security, "오늘 날씨가 좋네요").await;

        assert_eq!(report.severity, Severity::Safe);
        assert_eq!(report.risk_score, 0);
        assert_eq!(report.recommendations.len(), 1);
    }

    #[tokio::test]
    async fn test_risk_score_rounds_half_up() {
        // total 3.075 -> medium, 30 + 0.075 * 6.67 = 30.50025 -> 31
        let pattern = PatternReport {
            total_score: 3.075,
            matches: Vec::new(),
            summary: String::new(),
        };
        let linguistic = analyze_linguistic(None, "x", &pattern).await;
        let security = analyze_security(None, "x", &pattern).await;
        let report = synthesize(None, &pattern, &linguistic, &security, "x").await;
        assert_eq!(report.risk_score, 31);
    }
}
