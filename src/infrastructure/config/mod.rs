use crate::infrastructure::repositories::dashscope_tts_repository;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderSettings,
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub max_attempts: u32,
    pub retry_backoff: Duration,
    pub concurrency: usize,
    pub concat: ConcatKind,
    pub ffmpeg_bin: String,
    pub log_format: LogFormat,
}

/// Credentials and endpoint of the selected TTS provider
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderSettings {
    DashScope {
        api_key: String,
        base_url: String,
        model: String,
        voice: String,
    },
    OpenAi {
        api_key: String,
        model: String,
        voice: String,
    },
    Polly {
        region: String,
    },
    Mock,
}

impl ProviderSettings {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DashScope { .. } => "dashscope",
            Self::OpenAi { .. } => "openai",
            Self::Polly { .. } => "polly",
            Self::Mock => "mock",
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConcatKind {
    Ffmpeg,
    Bytes,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Read configuration from the process environment
    ///
    /// `.env` loading happens in the binary before this is called, so values
    /// already exported in the shell take precedence over the file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let var_or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let provider = match var_or("TTS_PROVIDER", "dashscope").to_lowercase().as_str() {
            "dashscope" => ProviderSettings::DashScope {
                api_key: var("DASHSCOPE_API_KEY").ok_or(ConfigError::Missing("DASHSCOPE_API_KEY"))?,
                base_url: var_or("DASHSCOPE_BASE_URL", dashscope_tts_repository::DEFAULT_BASE_URL),
                model: var_or("DASHSCOPE_MODEL", dashscope_tts_repository::DEFAULT_MODEL),
                voice: var_or("DASHSCOPE_VOICE", dashscope_tts_repository::DEFAULT_VOICE),
            },
            "openai" => ProviderSettings::OpenAi {
                api_key: var("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?,
                model: var_or("OPENAI_TTS_MODEL", "tts-1"),
                voice: var_or("OPENAI_TTS_VOICE", ""),
            },
            "polly" => ProviderSettings::Polly {
                region: var_or("AWS_REGION", "eu-west-1"),
            },
            "mock" => ProviderSettings::Mock,
            other => {
                return Err(ConfigError::Invalid {
                    key: "TTS_PROVIDER",
                    value: other.to_string(),
                })
            }
        };

        let concat = match var_or("TTS_CONCAT", "ffmpeg").to_lowercase().as_str() {
            "ffmpeg" => ConcatKind::Ffmpeg,
            "bytes" => ConcatKind::Bytes,
            other => {
                return Err(ConfigError::Invalid {
                    key: "TTS_CONCAT",
                    value: other.to_string(),
                })
            }
        };

        let max_attempts: u32 = parse_number(&var_or, "TTS_MAX_ATTEMPTS", "3")?;
        let backoff_ms: u64 = parse_number(&var_or, "TTS_RETRY_BACKOFF_MS", "1000")?;
        let concurrency: usize = parse_number(&var_or, "TTS_CONCURRENCY", "1")?;

        if max_attempts == 0 {
            return Err(ConfigError::Invalid {
                key: "TTS_MAX_ATTEMPTS",
                value: "0".to_string(),
            });
        }

        Ok(Config {
            provider,
            data_path: PathBuf::from(var_or("LESSON_DATA_PATH", "data/ai/wealth/finance-daily.json")),
            output_dir: PathBuf::from(var_or("LESSON_OUTPUT_DIR", "data/ai/wealth/tts")),
            max_attempts,
            retry_backoff: Duration::from_millis(backoff_ms),
            concurrency: concurrency.max(1),
            concat,
            ffmpeg_bin: var_or("FFMPEG_BIN", "ffmpeg"),
            log_format: match var_or("LOG_FORMAT", "pretty").to_lowercase().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        })
    }
}

fn parse_number<T, F>(var_or: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str, &str) -> String,
{
    let raw = var_or(key, default);
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value: raw })
}
