use crate::scorer::MatchedCategory;
use crate::severity::Severity;

const SAFE_ADVISORY: &str = "의심스러운 패턴이 발견되지 않았습니다. 하지만 항상 주의하세요!";
const VERIFY_SENDER_ADVISORY: &str = "⚠️ 발신자의 신원을 반드시 확인하세요.";
const PERSONAL_INFO_ADVISORY: &str = "🚫 절대 개인정보를 제공하지 마세요.";
const MONEY_ADVISORY: &str = "💰 금전 요구는 99% 사기입니다. 송금하지 마세요.";
const AUTHORITY_ADVISORY: &str =
    "📞 공공기관은 문자로 개인정보를 요구하지 않습니다. 공식 번호로 직접 확인하세요.";
const LINK_ADVISORY: &str = "🔗 의심스러운 링크는 절대 클릭하지 마세요.";
const REPORT_ADVISORY: &str = "🚨 즉시 삭제하고, 필요시 경찰청 사이버안전국(182)에 신고하세요.";

/// Build the ordered advisory list for a report. Output is a pure
/// function of the severity band and the set of matched category ids:
/// category advisories appear in a fixed order regardless of where the
/// keywords were found in the text.
pub fn recommend(severity: Severity, matches: &[MatchedCategory]) -> Vec<String> {
    if severity == Severity::Safe {
        return vec![SAFE_ADVISORY.to_string()];
    }

    let has = |id: &str| matches.iter().any(|m| m.category == id);

    let mut recommendations = vec![VERIFY_SENDER_ADVISORY.to_string()];

    if has("personal_info") {
        recommendations.push(PERSONAL_INFO_ADVISORY.to_string());
    }
    if has("money") {
        recommendations.push(MONEY_ADVISORY.to_string());
    }
    if has("authority") {
        recommendations.push(AUTHORITY_ADVISORY.to_string());
    }
    if has("link") {
        recommendations.push(LINK_ADVISORY.to_string());
    }

    if severity == Severity::Critical || severity == Severity::High {
        recommendations.push(REPORT_ADVISORY.to_string());
    }

    recommendations
}
