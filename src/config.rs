use crate::model_client::ModelConfig;
use crate::simulation::MailerConfig;
use serde::{Deserialize, Serialize};

/// Top-level YAML configuration for the CLI. Everything is optional:
/// with no file at all the analyzer runs pattern-only over the built-in
/// catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhishlensConfig {
    /// External model settings. Absent or key-less means the local
    /// fallback path for the whole process lifetime.
    #[serde(default)]
    pub model: Option<ModelConfig>,
    /// Training-mail delivery settings.
    #[serde(default)]
    pub mailer: Option<MailerConfig>,
    /// Custom indicator catalog file; built-in catalog when absent.
    #[serde(default)]
    pub catalog_file: Option<String>,
}

impl PhishlensConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PhishlensConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// A sample configuration with every section present, for
    /// `--generate-config`.
    pub fn sample() -> Self {
        PhishlensConfig {
            model: Some(ModelConfig::default()),
            mailer: None,
            catalog_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parses_to_defaults() {
        let config: PhishlensConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.model.is_none());
        assert!(config.mailer.is_none());
        assert!(config.catalog_file.is_none());
    }

    #[test]
    fn test_model_section_defaults_are_filled() {
        let yaml = "model:\n  api_key: sk-test\n";
        let config: PhishlensConfig = serde_yaml::from_str(yaml).unwrap();
        let model = config.model.unwrap();
        assert_eq!(model.api_key.as_deref(), Some("sk-test"));
        assert_eq!(model.base_url, "https://api.openai.com");
        assert_eq!(model.model, "gpt-4o-mini");
        assert_eq!(model.timeout_seconds, 30);
    }

    #[test]
    fn test_mailer_section_parses() {
        let yaml = "mailer:\n  service_id: svc\n  template_id: tpl\n  public_key: key\n";
        let config: PhishlensConfig = serde_yaml::from_str(yaml).unwrap();
        let mailer = config.mailer.unwrap();
        assert_eq!(mailer.service_id, "svc");
        assert_eq!(mailer.api_url, "https://api.emailjs.com/api/v1.0/email/send");
    }

    #[test]
    fn test_sample_round_trips() {
        let sample = PhishlensConfig::sample();
        let yaml = serde_yaml::to_string(&sample).unwrap();
        let parsed: PhishlensConfig = serde_yaml::from_str(&yaml).unwrap();
        assert!(parsed.model.is_some());
    }
}
