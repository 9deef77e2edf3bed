use std::{env, path::PathBuf, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

/// Placeholder left in freshly generated backend deployment URLs.
pub const BACKEND_URL_PLACEHOLDER: &str = "YOUR_DEPLOYMENT_ID";

/// What the catalog does when a user starts a quiz they already have an attempt for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateAttemptPolicy {
    Allow,
    Confirm,
    Reject,
}

impl FromStr for DuplicateAttemptPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(DuplicateAttemptPolicy::Allow),
            "confirm" => Ok(DuplicateAttemptPolicy::Confirm),
            "reject" => Ok(DuplicateAttemptPolicy::Reject),
            other => Err(format!("unknown duplicate attempt policy '{}'", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub backend_url: Option<String>,
    pub storage_dir: PathBuf,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub autosave_interval_secs: u64,
    pub time_warning_secs: i64,
    pub duplicate_attempt_policy: DuplicateAttemptPolicy,
    pub seed_sample_quizzes: bool,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            backend_url: env::var("QUIZ_BACKEND_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            storage_dir: env::var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".quiz-portal")),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            autosave_interval_secs: env::var("AUTOSAVE_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(5),
            time_warning_secs: env::var("TIME_WARNING_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(120),
            duplicate_attempt_policy: env::var("DUPLICATE_ATTEMPT_POLICY")
                .ok()
                .and_then(|p| match p.parse() {
                    Ok(policy) => Some(policy),
                    Err(err) => {
                        log::warn!("{}; falling back to 'confirm'", err);
                        None
                    }
                })
                .unwrap_or(DuplicateAttemptPolicy::Confirm),
            seed_sample_quizzes: env::var("SEED_SAMPLE_QUIZZES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN").ok(),
        }
    }

    /// True when a real backend deployment URL has been supplied.
    pub fn backend_configured(&self) -> bool {
        self.backend_url
            .as_deref()
            .is_some_and(|url| !url.contains(BACKEND_URL_PLACEHOLDER))
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }

    /// Logs what the process will run with; an unconfigured backend means local-only mode.
    pub fn log_summary(&self) {
        log::info!("Storage directory: {}", self.storage_dir.display());
        log::info!(
            "Duplicate attempt policy: {:?}",
            self.duplicate_attempt_policy
        );
        if !self.backend_configured() {
            log::warn!(
                "QUIZ_BACKEND_URL is not configured; quizzes and attempts will be saved locally only"
            );
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            backend_url: None,
            storage_dir: PathBuf::from("target/quiz-portal-test"),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            autosave_interval_secs: 5,
            time_warning_secs: 120,
            duplicate_attempt_policy: DuplicateAttemptPolicy::Confirm,
            seed_sample_quizzes: false,
            cors_allowed_origin: None,
        }
    }
}
