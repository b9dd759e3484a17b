//! Application configuration. Backend selection, credentials, datastore.
//!
//! Built once at startup and passed by reference / `Arc` into adapters.

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Gemini's OpenAI-compatible chat completions endpoint.
pub const DEFAULT_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Used when the primary model is rejected by the API.
pub const DEFAULT_FALLBACK_MODEL: &str = "gemini-1.5-flash";

/// Ollama-style local generation endpoint.
pub const DEFAULT_LOCAL_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_LOCAL_MODEL: &str = "mistral:7b-instruct";
pub const DEFAULT_LOCAL_MAX_TOKENS: u32 = 1000;

/// Per-resume character budget for the local backend. Hosted is unbounded unless configured.
pub const DEFAULT_LOCAL_MAX_RESUME_CHARS: usize = 3500;

/// Which `LlmPort` implementation to wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Hosted,
    Local,
    Mock,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hosted" | "gemini" | "openai" => Ok(Self::Hosted),
            "local" | "ollama" => Ok(Self::Local),
            "mock" => Ok(Self::Mock),
            other => Err(format!(
                "Invalid backend: {}. Supported: hosted, local, mock",
                other
            )),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Hosted => "hosted",
            Self::Local => "local",
            Self::Mock => "mock",
        };
        f.write_str(s)
    }
}

/// Where the scan log lives, if anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanLogTarget {
    /// Remote libSQL / Turso database.
    Remote { url: String, token: String },
    /// Local SQLite file.
    Local(PathBuf),
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    /// hosted | local | mock. Read from TALENT_ALIGN_BACKEND.
    #[serde(default)]
    pub backend: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Hosted backend
    // ─────────────────────────────────────────────────────────────────────────
    /// API key. Read from TALENT_ALIGN_API_KEY, falls back to GEMINI_API_KEY.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat completions URL. Read from TALENT_ALIGN_API_URL.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Primary model. Read from TALENT_ALIGN_MODEL.
    #[serde(default)]
    pub model: Option<String>,

    /// Model tried when the primary is rejected. Read from TALENT_ALIGN_FALLBACK_MODEL.
    #[serde(default)]
    pub fallback_model: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Local backend
    // ─────────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub local_url: Option<String>,

    #[serde(default)]
    pub local_model: Option<String>,

    /// Output token bound for local generation. Read from TALENT_ALIGN_LOCAL_MAX_TOKENS.
    #[serde(default)]
    pub local_max_tokens: Option<u32>,

    /// Per-resume character budget in the prompt. 0 disables truncation.
    #[serde(default)]
    pub max_resume_chars: Option<usize>,

    // ─────────────────────────────────────────────────────────────────────────
    // Scan log (optional)
    // ─────────────────────────────────────────────────────────────────────────
    /// Remote libSQL URL. Read from TALENT_ALIGN_DB_URL.
    #[serde(default)]
    pub db_url: Option<String>,

    /// Remote libSQL token. Read from TALENT_ALIGN_DB_TOKEN, falls back to TURSO_AUTH_TOKEN.
    #[serde(default)]
    pub db_token: Option<String>,

    /// Local SQLite file. Read from TALENT_ALIGN_DB_PATH.
    #[serde(default)]
    pub db_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("TALENT_ALIGN").try_parsing(true));
        if let Ok(path) = std::env::var("TALENT_ALIGN_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let cfg: Self = c.build()?.try_deserialize()?;
        Ok(cfg)
    }

    /// Resolve a failed load. Falls back to defaults only when no backend was asked for;
    /// with an explicit backend (env or CLI) the load error is returned instead, so the
    /// request is never swapped for the default backend.
    pub fn or_defaults(
        loaded: Result<Self, config::ConfigError>,
        requested_backend: Option<&str>,
    ) -> Result<Self, String> {
        match loaded {
            Ok(cfg) => Ok(cfg),
            Err(e) => match requested_backend.map(str::trim).filter(|b| !b.is_empty()) {
                Some(backend) => Err(format!(
                    "Invalid configuration for backend '{}': {}",
                    backend, e
                )),
                None => {
                    tracing::warn!(error = %e, "invalid configuration, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Backend kind. Unknown values are an error so a typo never silently picks another backend.
    pub fn backend_kind(&self) -> Result<BackendKind, String> {
        match self.backend.as_deref() {
            Some(s) => s.parse(),
            None => Ok(BackendKind::default()),
        }
    }

    /// API key from config or GEMINI_API_KEY. Empty strings count as unset.
    pub fn api_key(&self) -> Option<String> {
        non_empty(self.api_key.clone()).or_else(|| non_empty(std::env::var("GEMINI_API_KEY").ok()))
    }

    pub fn api_url_or_default(&self) -> String {
        non_empty(self.api_url.clone()).unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn model_or_default(&self) -> String {
        non_empty(self.model.clone()).unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    pub fn fallback_model_or_default(&self) -> String {
        non_empty(self.fallback_model.clone()).unwrap_or_else(|| DEFAULT_FALLBACK_MODEL.to_string())
    }

    pub fn local_url_or_default(&self) -> String {
        non_empty(self.local_url.clone()).unwrap_or_else(|| DEFAULT_LOCAL_URL.to_string())
    }

    pub fn local_model_or_default(&self) -> String {
        non_empty(self.local_model.clone()).unwrap_or_else(|| DEFAULT_LOCAL_MODEL.to_string())
    }

    pub fn local_max_tokens_or_default(&self) -> u32 {
        self.local_max_tokens.unwrap_or(DEFAULT_LOCAL_MAX_TOKENS)
    }

    /// Per-resume character budget for the given backend. `None` = unbounded.
    ///
    /// Truncation silently drops the tail of long resumes.
    pub fn max_resume_chars_for(&self, backend: BackendKind) -> Option<usize> {
        match self.max_resume_chars {
            Some(0) => None,
            Some(n) => Some(n),
            None if backend == BackendKind::Local => Some(DEFAULT_LOCAL_MAX_RESUME_CHARS),
            None => None,
        }
    }

    /// Scan log target. Remote wins over a local path; `None` disables persistence.
    pub fn scan_log_target(&self) -> Option<ScanLogTarget> {
        if let Some(url) = non_empty(self.db_url.clone()) {
            let token = non_empty(self.db_token.clone())
                .or_else(|| non_empty(std::env::var("TURSO_AUTH_TOKEN").ok()))
                .unwrap_or_default();
            return Some(ScanLogTarget::Remote { url, token });
        }
        non_empty(self.db_path.clone()).map(|p| ScanLogTarget::Local(PathBuf::from(p)))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_with_requested_backend_is_fatal() {
        let failed = Err(config::ConfigError::Message("invalid digit".to_string()));
        let err = AppConfig::or_defaults(failed, Some("local")).unwrap_err();
        assert!(err.contains("local"));
        assert!(err.contains("invalid digit"));
    }

    #[test]
    fn test_load_error_without_backend_uses_defaults() {
        let failed = Err(config::ConfigError::Message("missing file".to_string()));
        let cfg = AppConfig::or_defaults(failed, None).unwrap();
        assert_eq!(cfg.backend_kind(), Ok(BackendKind::Hosted));

        let failed = Err(config::ConfigError::Message("missing file".to_string()));
        assert!(AppConfig::or_defaults(failed, Some("  ")).is_ok());
    }

    #[test]
    fn test_successful_load_is_kept() {
        let loaded = AppConfig {
            backend: Some("mock".to_string()),
            ..AppConfig::default()
        };
        let cfg = AppConfig::or_defaults(Ok(loaded), Some("local")).unwrap();
        assert_eq!(cfg.backend_kind(), Ok(BackendKind::Mock));
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("hosted".parse::<BackendKind>(), Ok(BackendKind::Hosted));
        assert_eq!("Ollama".parse::<BackendKind>(), Ok(BackendKind::Local));
        assert_eq!(" mock ".parse::<BackendKind>(), Ok(BackendKind::Mock));
        assert!("gpt-5".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_backend_kind_default_is_hosted() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.backend_kind(), Ok(BackendKind::Hosted));
    }

    #[test]
    fn test_max_resume_chars_defaults_per_backend() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.max_resume_chars_for(BackendKind::Local), Some(3500));
        assert_eq!(cfg.max_resume_chars_for(BackendKind::Hosted), None);

        let cfg = AppConfig {
            max_resume_chars: Some(0),
            ..Default::default()
        };
        assert_eq!(cfg.max_resume_chars_for(BackendKind::Local), None);

        let cfg = AppConfig {
            max_resume_chars: Some(1200),
            ..Default::default()
        };
        assert_eq!(cfg.max_resume_chars_for(BackendKind::Hosted), Some(1200));
    }

    #[test]
    fn test_scan_log_target() {
        let cfg = AppConfig {
            db_path: Some("./data/scans.db".into()),
            ..Default::default()
        };
        assert_eq!(
            cfg.scan_log_target(),
            Some(ScanLogTarget::Local(PathBuf::from("./data/scans.db")))
        );

        let cfg = AppConfig {
            db_url: Some("libsql://scans.example.turso.io".into()),
            db_token: Some("tok".into()),
            db_path: Some("./ignored.db".into()),
            ..Default::default()
        };
        assert_eq!(
            cfg.scan_log_target(),
            Some(ScanLogTarget::Remote {
                url: "libsql://scans.example.turso.io".into(),
                token: "tok".into()
            })
        );

        let cfg = AppConfig {
            db_url: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(cfg.scan_log_target(), None);
    }

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.model_or_default(), DEFAULT_MODEL);
        assert_eq!(cfg.fallback_model_or_default(), DEFAULT_FALLBACK_MODEL);
        assert_eq!(cfg.local_max_tokens_or_default(), 1000);
        assert!(cfg.api_url_or_default().contains("generativelanguage"));
    }
}
