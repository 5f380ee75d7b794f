use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "TrialScope";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Env var overriding the reference table directory.
pub const REFERENCE_DIR_ENV: &str = "TRIALSCOPE_REFERENCE_DIR";
/// Env var overriding the registry API base URL.
pub const REGISTRY_URL_ENV: &str = "TRIALSCOPE_REGISTRY_URL";
/// Env var overriding the registry request timeout, in seconds.
pub const REGISTRY_TIMEOUT_ENV: &str = "TRIALSCOPE_REGISTRY_TIMEOUT_SECS";
/// Env var holding the tracing filter (falls back to `default_log_filter`).
pub const LOG_ENV: &str = "TRIALSCOPE_LOG";

/// ClinicalTrials.gov v2 REST API.
pub const DEFAULT_REGISTRY_URL: &str = "https://clinicaltrials.gov/api/v2";
/// Registry lookups are enrichment only, so keep the wait short.
pub const DEFAULT_REGISTRY_TIMEOUT_SECS: u64 = 10;
/// Maximum studies requested per condition.
pub const DEFAULT_REGISTRY_PAGE_SIZE: u32 = 10;

/// Get the application data directory
/// ~/TrialScope/ on all platforms. Falls back to the working directory
/// when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the reference table directory (onset ages, therapy maps, synonyms).
pub fn reference_dir() -> PathBuf {
    match std::env::var(REFERENCE_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => app_data_dir().join("reference"),
    }
}

/// Default tracing filter when `TRIALSCOPE_LOG` / `RUST_LOG` are unset.
pub fn default_log_filter() -> &'static str {
    "trialscope=info,trialscope_lib=info,reqwest=warn"
}

/// Settings for the trial-registry collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub page_size: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REGISTRY_URL.to_string(),
            timeout_secs: DEFAULT_REGISTRY_TIMEOUT_SECS,
            page_size: DEFAULT_REGISTRY_PAGE_SIZE,
        }
    }
}

impl RegistryConfig {
    /// Defaults with env overrides applied. Unparsable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(REGISTRY_URL_ENV).filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }

        match lookup(REGISTRY_TIMEOUT_ENV).map(|v| v.trim().parse::<u64>()) {
            Some(Ok(secs)) if secs > 0 => config.timeout_secs = secs,
            Some(_) => {
                tracing::warn!(
                    var = REGISTRY_TIMEOUT_ENV,
                    "Ignoring invalid registry timeout override"
                );
            }
            None => {}
        }

        config
    }
}
