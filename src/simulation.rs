use async_trait::async_trait;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// A canned phishing training scenario. The body is an HTML template
/// with a `{{link}}` placeholder for the gotcha link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationScenario {
    pub id: String,
    pub title: String,
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub body: String,
    pub explanation: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Mailer not configured: {0}")]
    NotConfigured(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Mail service error: {0}")]
    Service(String),
}

/// Outbound email-delivery capability for training messages. The
/// delivery service itself is a black box behind this trait.
#[async_trait]
pub trait TrainingMailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailerError>;
}

lazy_static! {
    static ref SCENARIOS: Vec<SimulationScenario> = vec![
        SimulationScenario {
            id: "tax_refund".to_string(),
            title: "국세청 환급금 안내".to_string(),
            sender_name: "국세청(NTS)".to_string(),
            // Deliberately wrong domain; the real one is nts.go.kr.
            sender_email: "admin@nts-go-kr.com".to_string(),
            subject: "[공지] 귀하의 미수령 환급금이 발생했습니다. 즉시 확인 바랍니다.".to_string(),
            body: r#"<div style="font-family: sans-serif; padding: 20px; line-height: 1.6;">
  <h2 style="color: #003366;">미수령 환급금 지급 안내</h2>
  <p>안녕하세요, 국세청입니다.</p>
  <p>귀하에게 지급되지 않은 <b>환급금 458,200원</b>이 발견되었습니다.</p>
  <p>아래 링크를 통해 본인 인증 후 환급 신청을 완료해 주시기 바랍니다.</p>
  <p style="margin: 30px 0;">
    <a href="{{link}}" style="background: #003366; color: white; padding: 12px 25px; text-decoration: none; border-radius: 5px; font-weight: bold;">환급금 신청하기</a>
  </p>
  <p style="color: #ff0000; font-size: 0.9em;">* 오늘 자정까지 신청하지 않을 경우 국고로 환수됩니다.</p>
</div>"#
                .to_string(),
            explanation: "발신 주소가 공식 도메인(nts.go.kr)이 아니며, \"오늘 자정까지\"라는 문구로 긴급성을 조성하여 판단을 흐리게 합니다.".to_string(),
        },
        SimulationScenario {
            id: "account_security".to_string(),
            title: "네이버 계정 보안 경고".to_string(),
            // Typo-squatted brand name and domain.
            sender_name: "네어버 보안팀".to_string(),
            sender_email: "security@navver.com".to_string(),
            subject: "[경고] 새로운 기기에서 로그인이 감지되었습니다.".to_string(),
            body: r#"<div style="font-family: sans-serif; padding: 20px;">
  <h3 style="margin-top: 20px;">비정상적인 로그인이 감지되었습니다.</h3>
  <p>최근 귀하의 계정에 새로운 기기(Windows 10, 서울)에서 접속이 시도되었습니다.</p>
  <p>본인의 시도가 아니라면 아래 버튼을 눌러 계정을 즉시 보호하세요.</p>
  <div style="margin: 25px 0;">
    <a href="{{link}}" style="background: #19ce60; color: white; padding: 10px 20px; text-decoration: none; border-radius: 3px;">계정 보호하기</a>
  </div>
  <p style="font-size: 0.8em; color: #888;">본 메일은 시스템 발신용 메일입니다.</p>
</div>"#
                .to_string(),
            explanation: "발신자 이름과 도메인에 미세한 오타가 있습니다. 실제 네이버는 로그인 알림 시 정확한 정보를 제공하며, 링크 주소를 꼼꼼히 확인해야 합니다.".to_string(),
        },
        SimulationScenario {
            id: "prize_win".to_string(),
            title: "스타벅스 이벤트 당첨".to_string(),
            sender_name: "스타벅스 코리아".to_string(),
            sender_email: "event@star-bucks.kr".to_string(),
            subject: "[축하] 스타벅스 럭키박스 당첨자로 선정되셨습니다!".to_string(),
            body: r#"<div style="font-family: sans-serif; padding: 20px; background-color: #f7f7f7;">
  <div style="background: white; border: 1px solid #ddd; padding: 30px;">
    <h2 style="color: #006241;">Congratulations!</h2>
    <p>스타벅스 개점 기념 이벤트에 당첨되신 것을 진심으로 축하드립니다!</p>
    <p><b>경품: 5만원 상당의 럭키박스 (무료배송)</b></p>
    <p>아래 신청 양식을 작성하여 경품을 수령하세요.</p>
    <p style="text-align: center; margin: 30px 0;">
      <a href="{{link}}" style="background: #006241; color: white; padding: 15px 30px; text-decoration: none; border-radius: 50px; font-size: 1.1em;">경품 수령 주소 입력</a>
    </p>
    <p style="font-size: 0.9em;">* 이벤트 기간 내 미입력 시 당첨이 자동 취소됩니다.</p>
  </div>
</div>"#
                .to_string(),
            explanation: "공식 이벤트가 아님에도 개인정보(주소, 전화번호 등)를 수집하기 위해 당첨을 빌미로 유혹합니다. 공식 앱이나 홈페이지에서 이벤트를 반드시 확인해야 합니다.".to_string(),
        },
    ];
}

pub fn scenarios() -> &'static [SimulationScenario] {
    &SCENARIOS
}

pub fn find_scenario(id: &str) -> Option<&'static SimulationScenario> {
    SCENARIOS.iter().find(|s| s.id == id)
}

/// Dispatches training scenarios through an injected mailer.
pub struct SimulationManager {
    mailer: Arc<dyn TrainingMailer>,
}

impl SimulationManager {
    pub fn new(mailer: Arc<dyn TrainingMailer>) -> Self {
        SimulationManager { mailer }
    }

    /// Send one training scenario to `target_email`. The scenario body's
    /// `{{link}}` placeholder is replaced with a gotcha link pointing at
    /// `base_url` so the recipient lands on the debrief page.
    pub async fn send_training_email(
        &self,
        target_email: &str,
        scenario_id: &str,
        base_url: &str,
    ) -> Result<(), MailerError> {
        let scenario = find_scenario(scenario_id)
            .ok_or_else(|| MailerError::UnknownScenario(scenario_id.to_string()))?;

        let mut link = Url::parse(base_url)
            .map_err(|e| MailerError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        link.set_query(Some(&format!("id={}", scenario.id)));

        let body = scenario.body.replace("{{link}}", link.as_str());

        log::info!("sending training scenario '{scenario_id}' to {target_email}");
        self.mailer.send(target_email, &scenario.subject, &body).await
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailerConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    #[serde(default = "default_mailer_api_url")]
    pub api_url: String,
}

fn default_mailer_api_url() -> String {
    "https://api.emailjs.com/api/v1.0/email/send".to_string()
}

#[derive(Serialize)]
struct EmailJsRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: EmailJsParams<'a>,
}

#[derive(Serialize)]
struct EmailJsParams<'a> {
    to_email: &'a str,
    subject: &'a str,
    message: &'a str,
}

/// EmailJS-backed mailer. One bounded HTTP call per send, no retry.
pub struct EmailJsMailer {
    client: reqwest::Client,
    config: MailerConfig,
}

impl EmailJsMailer {
    pub fn new(config: MailerConfig) -> Result<Self, MailerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("phishlens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MailerError::NotConfigured(e.to_string()))?;
        Ok(EmailJsMailer { client, config })
    }
}

#[async_trait]
impl TrainingMailer for EmailJsMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailerError> {
        let request = EmailJsRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            template_params: EmailJsParams {
                to_email: to,
                subject,
                message: html_body,
            },
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| MailerError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(MailerError::Service(format!("{status}: {body}")));
        }

        log::info!("training email delivered to {to}");
        Ok(())
    }
}
