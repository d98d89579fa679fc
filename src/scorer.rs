use crate::patterns::Catalog;
use serde::{Deserialize, Serialize};

/// One catalog category that matched the analyzed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedCategory {
    pub category: String,
    pub description: String,
    pub matched_keywords: Vec<String>,
    pub score: f64,
}

/// Deterministic local scoring result, before any model enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternReport {
    pub total_score: f64,
    pub matches: Vec<MatchedCategory>,
    pub summary: String,
}

impl PatternReport {
    pub fn empty() -> Self {
        PatternReport {
            total_score: 0.0,
            matches: Vec::new(),
            summary: "분석할 텍스트가 없습니다.".to_string(),
        }
    }

    pub fn has_category(&self, id: &str) -> bool {
        self.matches.iter().any(|m| m.category == id)
    }
}

/// Scan `text` against the catalog. Keywords match as case-insensitive
/// substrings; each keyword counts once per category and contributes the
/// category weight. Categories with no matches are omitted. Pure and
/// deterministic: identical input yields an identical report.
pub fn score(catalog: &Catalog, text: &str) -> PatternReport {
    if text.trim().is_empty() {
        return PatternReport::empty();
    }

    let normalized = text.to_lowercase();
    let mut total_score = 0.0;
    let mut matches = Vec::new();

    for category in &catalog.categories {
        let matched_keywords: Vec<String> = category
            .keywords
            .iter()
            .filter(|keyword| normalized.contains(&keyword.to_lowercase()))
            .cloned()
            .collect();

        if !matched_keywords.is_empty() {
            let category_score = matched_keywords.len() as f64 * category.weight;
            total_score += category_score;

            matches.push(MatchedCategory {
                category: category.id.clone(),
                description: category.description.clone(),
                matched_keywords,
                score: category_score,
            });
        }
    }

    log::debug!(
        "pattern scan: {} categories matched, total score {total_score:.1}",
        matches.len()
    );

    let summary = format!(
        "{}개의 의심 패턴 발견 (총점: {:.1})",
        matches.len(),
        total_score
    );

    PatternReport {
        total_score,
        matches,
        summary,
    }
}
