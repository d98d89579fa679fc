use crate::error::AnalysisError;
use crate::model_client::CompletionModel;
use crate::scorer::PatternReport;
use serde::{Deserialize, Serialize};

/// Generation parameters shared by every model-backed analysis call.
pub const MODEL_TEMPERATURE: f32 = 0.3;
const ENRICHMENT_MAX_TOKENS: u32 = 300;

/// Confidence (linguistic) or threat level (security) attached to a
/// sub-analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisLevel {
    Low,
    Medium,
    High,
    Unknown,
}

/// Narrative produced by one enrichment sub-analysis, either by the
/// external model or by the local category heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    pub narrative: String,
    pub indicators: Vec<String>,
    pub level: AnalysisLevel,
    pub used_model: bool,
    pub failed: bool,
}

/// Social-engineering analysis of the text. Delegates to the external
/// model when one is injected, otherwise derives a short indicator list
/// from the categories the pattern scorer already matched.
pub async fn analyze_linguistic(
    model: Option<&dyn CompletionModel>,
    text: &str,
    pattern: &PatternReport,
) -> EnrichmentResult {
    let Some(model) = model else {
        return linguistic_fallback(pattern);
    };

    let prompt = format!(
        "다음 문구의 사회공학적 기만 수법을 분석해주세요:\n\n\
         텍스트: {text}\n\n\
         다음 관점에서 분석하세요:\n\
         1. 긴박함/시간 압박 사용 여부\n\
         2. 공포/불안 유도 여부\n\
         3. 권위/신뢰 사칭 여부\n\
         4. 보상/이득 제시 여부\n\n\
         간결하게 한국어로 답변하세요."
    );

    match call_model(model, &prompt, "linguistic").await {
        Ok(narrative) => EnrichmentResult {
            narrative,
            indicators: Vec::new(),
            level: AnalysisLevel::High,
            used_model: true,
            failed: false,
        },
        Err(e) => {
            log::warn!("linguistic analysis degraded: {e}");
            EnrichmentResult {
                narrative: format!("분석 중 오류 발생: {e}"),
                indicators: Vec::new(),
                level: AnalysisLevel::Low,
                used_model: true,
                failed: true,
            }
        }
    }
}

/// Technical risk analysis of links and request patterns in the text.
pub async fn analyze_security(
    model: Option<&dyn CompletionModel>,
    text: &str,
    pattern: &PatternReport,
) -> EnrichmentResult {
    let Some(model) = model else {
        return security_fallback(pattern);
    };

    let prompt = format!(
        "다음 메시지에 포함된 링크나 발신 형식의 기술적 위험성을 분석해주세요:\n\n\
         텍스트: {text}\n\n\
         다음 관점에서 분석하세요:\n\
         1. URL/링크의 의심스러운 패턴\n\
         2. 개인정보 요청 여부\n\
         3. 금전 거래 유도 여부\n\
         4. 악성 행위 가능성\n\n\
         위험도(낮음/보통/높음/매우높음)와 함께 간결하게 한국어로 답변하세요."
    );

    match call_model(model, &prompt, "security").await {
        Ok(narrative) => EnrichmentResult {
            narrative,
            indicators: Vec::new(),
            level: AnalysisLevel::High,
            used_model: true,
            failed: false,
        },
        Err(e) => {
            log::warn!("security analysis degraded: {e}");
            EnrichmentResult {
                narrative: format!("분석 중 오류 발생: {e}"),
                indicators: Vec::new(),
                level: AnalysisLevel::Unknown,
                used_model: true,
                failed: true,
            }
        }
    }
}

async fn call_model(
    model: &dyn CompletionModel,
    prompt: &str,
    stage: &str,
) -> Result<String, AnalysisError> {
    log::debug!("dispatching {stage} enrichment to external model");
    model
        .complete(prompt, ENRICHMENT_MAX_TOKENS, MODEL_TEMPERATURE)
        .await
        .map_err(|e| AnalysisError::Enrichment(e.to_string()))
}

fn linguistic_fallback(pattern: &PatternReport) -> EnrichmentResult {
    let mut indicators = Vec::new();
    if pattern.has_category("urgency") {
        indicators.push("긴박감 조성".to_string());
    }
    if pattern.has_category("threat") {
        indicators.push("공포 유도".to_string());
    }
    if pattern.has_category("authority") {
        indicators.push("권위 사칭".to_string());
    }

    EnrichmentResult {
        narrative: format!("사회공학 기법 {}개 감지", indicators.len()),
        indicators,
        level: AnalysisLevel::Medium,
        used_model: false,
        failed: false,
    }
}

fn security_fallback(pattern: &PatternReport) -> EnrichmentResult {
    let mut risks = Vec::new();
    if pattern.has_category("link") {
        risks.push("의심스러운 링크 포함".to_string());
    }
    if pattern.has_category("personal_info") {
        risks.push("개인정보 요청".to_string());
    }
    if pattern.has_category("money") {
        risks.push("금전 거래 유도".to_string());
    }

    let level = if risks.len() >= 2 {
        AnalysisLevel::High
    } else if !risks.is_empty() {
        AnalysisLevel::Medium
    } else {
        AnalysisLevel::Low
    };

    EnrichmentResult {
        narrative: format!("보안 위험 {}개 발견", risks.len()),
        indicators: risks,
        level,
        used_model: false,
        failed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
                Err(message) => Err(ModelError::Api(message.clone())),
            }
        }
    }

    fn pattern_for(text: &str) -> PatternReport {
        scorer::score(&Catalog::builtin(), text)
    }

    #[tokio::test]
    async fn test_linguistic_fallback_flags_social_engineering() {
        let pattern = pattern_for("긴급! 경찰입니다. 법적조치 예정입니다.");
        let result = analyze_linguistic(None, "텍스트", &pattern).await;
        assert_eq!(
            result.indicators,
            vec!["긴박감 조성", "공포 유도", "권위 사칭"]
        );
        assert_eq!(result.narrative, "사회공학 기법 3개 감지");
        assert_eq!(result.level, AnalysisLevel::Medium);
        assert!(!result.used_model);
        assert!(!result.failed);
    }

    #[tokio::test]
    async fn test_security_fallback_level_scales_with_risks() {
        let none = analyze_security(None, "텍스트", &pattern_for("안녕하세요")).await;
        assert_eq!(none.level, AnalysisLevel::Low);
        assert_eq!(none.narrative, "보안 위험 0개 발견");

        let one = analyze_security(None, "텍스트", &pattern_for("송금 바랍니다")).await;
        assert_eq!(one.level, AnalysisLevel::Medium);

        let two = analyze_security(None, "텍스트", &pattern_for("링크 클릭 후 송금하세요")).await;
        assert_eq!(two.level, AnalysisLevel::High);
        assert_eq!(
            two.indicators,
            vec!["의심스러운 링크 포함", "금전 거래 유도"]
        );
    }

    #[tokio::test]
    async fn test_model_path_marks_high_confidence() {
        let model = ScriptedModel {
            reply: Ok("긴박감을 조성하는 전형적인 스미싱입니다.".to_string()),
        };
        let pattern = pattern_for("긴급 송금");
        let result = analyze_linguistic(Some(&model), "긴급 송금", &pattern).await;
        assert_eq!(result.narrative, "긴박감을 조성하는 전형적인 스미싱입니다.");
        assert_eq!(result.level, AnalysisLevel::High);
        assert!(result.used_model);
        assert!(!result.failed);
    }

    #[tokio::test]
    async fn test_model_failure_degrades_linguistic_to_low() {
        let model = ScriptedModel {
            reply: Err("quota exceeded".to_string()),
        };
        let pattern = pattern_for("긴급 송금");
        let result = analyze_linguistic(Some(&model), "긴급 송금", &pattern).await;
        assert!(result.failed);
        assert_eq!(result.level, AnalysisLevel::Low);
        assert!(result.narrative.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_model_failure_degrades_security_to_unknown() {
        let model = ScriptedModel {
            reply: Err("connection reset".to_string()),
        };
        let pattern = pattern_for("긴급 송금");
        let result = analyze_security(Some(&model), "긴급 송금", &pattern).await;
        assert!(result.failed);
        assert_eq!(result.level, AnalysisLevel::Unknown);
        assert!(result.narrative.contains("connection reset"));
    }
}
