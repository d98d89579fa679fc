use crate::error::AnalysisError;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// A named group of related warning keywords sharing one weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorCategory {
    pub id: String,
    pub keywords: Vec<String>,
    pub weight: f64,
    pub description: String,
}

/// Ordered set of indicator categories used by the pattern scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<IndicatorCategory>,
}

lazy_static! {
    static ref BUILTIN_CATALOG: Catalog = Catalog {
        categories: vec![
            IndicatorCategory {
                id: "urgency".to_string(),
                keywords: string_vec(&[
                    "긴급", "즉시", "24시간", "오늘까지", "마감", "지금", "당장", "빨리",
                ]),
                weight: 2.5,
                description: "긴급성을 강조하는 표현".to_string(),
            },
            IndicatorCategory {
                id: "money".to_string(),
                keywords: string_vec(&[
                    "송금", "입금", "환급", "세금", "과태료", "벌금", "당첨", "보상금", "수수료",
                ]),
                weight: 3.0,
                description: "금전 관련 요구".to_string(),
            },
            IndicatorCategory {
                id: "personal_info".to_string(),
                keywords: string_vec(&[
                    "주민번호", "비밀번호", "카드번호", "계좌번호", "인증번호", "OTP", "보안카드",
                    "개인정보",
                ]),
                weight: 3.5,
                description: "개인정보 요청".to_string(),
            },
            IndicatorCategory {
                id: "authority".to_string(),
                keywords: string_vec(&[
                    "경찰", "검찰", "법원", "국세청", "금융감독원", "은행", "카드사", "우체국",
                    "택배",
                ]),
                weight: 2.0,
                description: "공공기관/기업 사칭".to_string(),
            },
            IndicatorCategory {
                id: "threat".to_string(),
                keywords: string_vec(&[
                    "법적조치", "고소", "고발", "압류", "체포", "구속", "소송", "처벌", "신용불량",
                ]),
                weight: 3.0,
                description: "위협성 문구".to_string(),
            },
            IndicatorCategory {
                id: "link".to_string(),
                keywords: string_vec(&["http", "https", "bit.ly", "url", "링크", "클릭", "접속"]),
                weight: 2.0,
                description: "의심스러운 링크".to_string(),
            },
            IndicatorCategory {
                id: "contact".to_string(),
                keywords: string_vec(&[
                    "연락주세요", "회신", "답장", "전화", "문자", "카톡", "텔레그램",
                ]),
                weight: 1.5,
                description: "연락 요청".to_string(),
            },
        ],
    };
}

fn string_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Catalog {
    /// The built-in indicator catalog. Always valid.
    pub fn builtin() -> Self {
        BUILTIN_CATALOG.clone()
    }

    /// Load a custom catalog from a YAML file and validate it.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog: Catalog = serde_yaml::from_str(&content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn category(&self, id: &str) -> Option<&IndicatorCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Check catalog invariants: unique ids, non-empty keyword lists,
    /// positive weights.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.categories.is_empty() {
            return Err(AnalysisError::Input("catalog has no categories".to_string()));
        }
        let mut seen = std::collections::HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.id.as_str()) {
                return Err(AnalysisError::Input(format!(
                    "duplicate category id: {}",
                    category.id
                )));
            }
            if category.keywords.is_empty() {
                return Err(AnalysisError::Input(format!(
                    "category {} has no keywords",
                    category.id
                )));
            }
            if category.weight <= 0.0 {
                return Err(AnalysisError::Input(format!(
                    "category {} has non-positive weight {}",
                    category.id, category.weight
                )));
            }
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
