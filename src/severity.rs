use serde::{Deserialize, Serialize};

/// Discrete risk band assigned from the numeric pattern score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Safe,
    Low,
    Medium,
    High,
    Critical,
    Unknown,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Safe => "safe",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
            Severity::Unknown => "unknown",
        }
    }

    /// Parse a severity token, falling back to `Unknown` for anything
    /// unrecognized.
    pub fn from_str_lossy(value: &str) -> Self {
        match value {
            "safe" => Severity::Safe,
            "low" => Severity::Low,
            "medium" => Severity::Medium,
            "high" => Severity::High,
            "critical" => Severity::Critical,
            _ => Severity::Unknown,
        }
    }

    /// Display color for UI rendering.
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Safe => "#10b981",
            Severity::Low => "#3b82f6",
            Severity::Medium => "#f59e0b",
            Severity::High => "#ef4444",
            Severity::Critical => "#dc2626",
            Severity::Unknown => "#6b7280",
        }
    }

    /// Localized (Korean) label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Safe => "안전",
            Severity::Low => "낮음",
            Severity::Medium => "보통",
            Severity::High => "높음",
            Severity::Critical => "매우 위험",
            Severity::Unknown => "알 수 없음",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Severity::Safe => "✅",
            Severity::Low => "⚡",
            Severity::Medium => "⚠️",
            Severity::High => "🚨",
            Severity::Critical => "🔴",
            Severity::Unknown => "❓",
        }
    }
}

/// Map a total pattern score to a severity band and a raw 0..100
/// percentage. Bands are evaluated top-down; the first match wins.
/// The percentage stays unrounded here — rounding happens once, when
/// the final report is assembled.
pub fn classify(total_score: f64) -> (Severity, f64) {
    if total_score >= 10.0 {
        (Severity::Critical, (70.0 + (total_score - 10.0) * 2.0).min(100.0))
    } else if total_score >= 6.0 {
        (Severity::High, 50.0 + (total_score - 6.0) * 5.0)
    } else if total_score >= 3.0 {
        (Severity::Medium, 30.0 + (total_score - 3.0) * 6.67)
    } else if total_score > 0.0 {
        (Severity::Low, total_score * 10.0)
    } else {
        (Severity::Safe, 0.0)
    }
}
