use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub interview: InterviewConfig,
    pub timeouts: TimeoutConfig,
    pub llm: LlmConfig,
    pub stt: SttConfig,
    pub store: StoreConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
    /// Base URL used when building shareable interview links
    pub public_base_url: String,
    /// Browser origins allowed to call the API; empty disables CORS headers
    pub cors_origins: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "prashna-interviews".to_string(),
            http: HttpConfig::default(),
            public_base_url: "ws://127.0.0.1:8000".to_string(),
            cors_origins: vec![
                "http://localhost".to_string(),
                "http://127.0.0.1".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Interview rules. Both values are product configuration, not protocol constants.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InterviewConfig {
    /// Number of candidate answers collected before evaluation
    pub max_turns: usize,
    /// Minimum score (inclusive) that leads to a "proceed" notification
    pub hire_threshold: u8,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            max_turns: 5,
            hire_threshold: 70,
        }
    }
}

/// Upper bounds for every suspension point of a live session, in seconds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub answer_secs: u64,
    pub transcription_secs: u64,
    pub generation_secs: u64,
    pub store_secs: u64,
    pub send_secs: u64,
    pub decision_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            answer_secs: 300,
            transcription_secs: 120,
            generation_secs: 60,
            store_secs: 10,
            send_secs: 10,
            decision_secs: 60,
        }
    }
}

impl TimeoutConfig {
    pub fn answer(&self) -> Duration {
        Duration::from_secs(self.answer_secs)
    }

    pub fn transcription(&self) -> Duration {
        Duration::from_secs(self.transcription_secs)
    }

    pub fn generation(&self) -> Duration {
        Duration::from_secs(self.generation_secs)
    }

    pub fn store(&self) -> Duration {
        Duration::from_secs(self.store_secs)
    }

    pub fn send(&self) -> Duration {
        Duration::from_secs(self.send_secs)
    }

    pub fn decision(&self) -> Duration {
        Duration::from_secs(self.decision_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible chat completions endpoint
    pub api_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    pub nats_url: String,
    /// Request/reply subject served by the speech-to-text worker
    pub subject: String,
    /// Rate assumed for payloads that carry no WAV header
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            nats_url: "nats://localhost:4222".to_string(),
            subject: "stt.transcribe".to_string(),
            sample_rate: 16000, // Whisper expects 16kHz
            channels: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    File,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Directory for the file backend
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            path: "./data/interviews".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierBackend {
    Log,
    Nats,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub backend: NotifierBackend,
    pub nats_url: String,
    pub subject: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            backend: NotifierBackend::Log,
            nats_url: "nats://localhost:4222".to_string(),
            subject: "notifications.candidate".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file (extension optional) overlaid with
    /// `PRASHNA__SECTION__KEY` environment variables.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("PRASHNA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to load config from {}", path))?;

        settings
            .try_deserialize()
            .context("Failed to deserialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_interview_rules() {
        let cfg = Config::default();
        assert_eq!(cfg.interview.max_turns, 5);
        assert_eq!(cfg.interview.hire_threshold, 70);
        assert_eq!(cfg.store.backend, StoreBackend::Memory);
        assert_eq!(cfg.notifications.backend, NotifierBackend::Log);
        assert_eq!(cfg.timeouts.answer(), Duration::from_secs(300));
    }

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("prashna.toml");
        std::fs::write(
            &path,
            "[interview]\nmax_turns = 3\n\n[store]\nbackend = \"file\"\npath = \"/tmp/x\"\n",
        )?;

        let cfg = Config::load(path.to_str().unwrap_or_default())?;
        assert_eq!(cfg.interview.max_turns, 3);
        assert_eq!(cfg.interview.hire_threshold, 70);
        assert_eq!(cfg.store.backend, StoreBackend::File);
        assert_eq!(cfg.stt.subject, "stt.transcribe");
        Ok(())
    }
}
