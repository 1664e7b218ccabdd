//! Run configuration.
//!
//! Loaded from an optional YAML file, then overlaid with environment
//! variables. Every section has defaults that point at the public demo
//! deployments, so an empty file (or none) is a valid configuration.

use crate::result::ProbeResult;
use crate::retry::RetryPolicy;
use crate::session::SiteUrls;
use crate::wait::WaitPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default pet-store endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://petstore.swagger.io/v2";

/// Default storefront
pub const DEFAULT_SITE_BASE_URL: &str = "https://www.saucedemo.com/";

/// Password shared by every demo account
pub const DEMO_PASSWORD: &str = "secret_sauce";

/// Complete configuration for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// REST service
    pub api: ApiConfig,
    /// Storefront
    pub site: SiteConfig,
    /// Browser launch settings
    pub browser: BrowserConfig,
}

/// REST service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://petstore.swagger.io/v2`
    pub base_url: String,
    /// Value of the `api_key` header sent with pet deletes
    pub api_key: Option<String>,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Read-after-write retry for pets
    pub pet_retry: RetryPolicy,
    /// Read-after-write retry for users
    pub user_retry: RetryPolicy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            timeout_ms: 30_000,
            pet_retry: RetryPolicy::new(5, Duration::from_secs(1)),
            user_retry: RetryPolicy::new(10, Duration::from_secs(1)),
        }
    }
}

impl ApiConfig {
    /// Request timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Storefront accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Accounts {
    /// Regular shopper
    pub standard: String,
    /// Password for every account
    pub password: String,
    /// Account that is refused at login
    pub locked_out: String,
    /// Account with broken images and buttons
    pub problem: String,
    /// Account whose login is slow
    pub performance_glitch: String,
    /// Account that triggers errors during checkout
    pub error: String,
    /// Account with visual glitches
    pub visual: String,
    /// Wrong password for negative login checks
    pub invalid_password: String,
}

impl Default for Accounts {
    fn default() -> Self {
        Self {
            standard: "standard_user".to_string(),
            password: DEMO_PASSWORD.to_string(),
            locked_out: "locked_out_user".to_string(),
            problem: "problem_user".to_string(),
            performance_glitch: "performance_glitch_user".to_string(),
            error: "error_user".to_string(),
            visual: "visual_user".to_string(),
            invalid_password: "wrong_password".to_string(),
        }
    }
}

/// Storefront settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL, e.g. `https://www.saucedemo.com/`
    pub base_url: String,
    /// Login accounts
    pub accounts: Accounts,
    /// Element and URL waits
    pub wait: WaitPolicy,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SITE_BASE_URL.to_string(),
            accounts: Accounts::default(),
            wait: WaitPolicy::default(),
        }
    }
}

impl SiteConfig {
    /// URLs derived from the base URL
    #[must_use]
    pub fn urls(&self) -> SiteUrls {
        SiteUrls::new(self.base_url.as_str())
    }
}

/// Browser launch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run without a window
    pub headless: bool,
    /// Window width
    pub window_width: u32,
    /// Window height
    pub window_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            chromium_path: None,
            sandbox: false,
        }
    }
}

impl ProbeConfig {
    /// Parse a YAML document
    pub fn from_yaml(yaml: &str) -> ProbeResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Read and parse a YAML file
    pub fn from_file(path: &Path) -> ProbeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// File (when given) overlaid with the process environment
    pub fn load(path: Option<&Path>) -> ProbeResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.overlay_env())
    }

    /// Apply the process environment on top of this configuration
    #[must_use]
    pub fn overlay_env(self) -> Self {
        self.overlay_from(|key| std::env::var(key).ok())
    }

    /// Apply variables from `lookup` on top of this configuration.
    ///
    /// Unset and empty variables leave the current value alone.
    #[must_use]
    pub fn overlay_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("API_BASE_URL") {
            self.api.base_url = v;
        }
        if let Some(v) = get("API_SPECIAL_KEY") {
            self.api.api_key = Some(v);
        }
        if let Some(v) = get("SAUCE_BASE_URL") {
            self.site.base_url = v;
        }

        let accounts = &mut self.site.accounts;
        let fields: [(&str, &mut String); 8] = [
            ("SAUCE_USERNAME", &mut accounts.standard),
            ("SAUCE_PASSWORD", &mut accounts.password),
            ("SAUCE_LOCKED_USER", &mut accounts.locked_out),
            ("SAUCE_PROBLEM_USER", &mut accounts.problem),
            ("SAUCE_PERFORMANCE_GLITCH_USER", &mut accounts.performance_glitch),
            ("SAUCE_ERROR_USER", &mut accounts.error),
            ("SAUCE_VISUAL_USER", &mut accounts.visual),
            ("SAUCE_INVALID_PASSWORD", &mut accounts.invalid_password),
        ];
        for (key, field) in fields {
            if let Some(v) = get(key) {
                *field = v;
            }
        }
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    mod defaults_tests {
        use super::*;

        #[test]
        fn test_defaults_point_at_demo_sites() {
            let config = ProbeConfig::default();
            assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
            assert_eq!(config.site.base_url, DEFAULT_SITE_BASE_URL);
            assert_eq!(config.site.accounts.standard, "standard_user");
            assert!(config.api.api_key.is_none());
        }

        #[test]
        fn test_retry_defaults() {
            let config = ProbeConfig::default();
            assert_eq!(config.api.pet_retry.attempts, 5);
            assert_eq!(config.api.user_retry.attempts, 10);
            assert_eq!(config.api.user_retry.delay(), Duration::from_secs(1));
        }

        #[test]
        fn test_browser_defaults() {
            let browser = BrowserConfig::default();
            assert!(browser.headless);
            assert_eq!((browser.window_width, browser.window_height), (1920, 1080));
        }
    }

    mod yaml_tests {
        use super::*;

        #[test]
        fn test_empty_document_is_default() {
            assert_eq!(ProbeConfig::from_yaml("").unwrap(), ProbeConfig::default());
            assert_eq!(ProbeConfig::from_yaml("  \n").unwrap(), ProbeConfig::default());
        }

        #[test]
        fn test_partial_document_keeps_other_defaults() {
            let yaml = "
api:
  base_url: http://localhost:8080/v2
  pet_retry:
    attempts: 2
site:
  wait:
    timeout_ms: 3000
browser:
  headless: false
";
            let config = ProbeConfig::from_yaml(yaml).unwrap();
            assert_eq!(config.api.base_url, "http://localhost:8080/v2");
            assert_eq!(config.api.pet_retry.attempts, 2);
            assert_eq!(config.api.pet_retry.delay_ms, 1_000);
            assert_eq!(config.site.wait.timeout_ms, 3_000);
            assert_eq!(config.site.wait.poll_interval_ms, 100);
            assert_eq!(config.site.base_url, DEFAULT_SITE_BASE_URL);
            assert!(!config.browser.headless);
        }

        #[test]
        fn test_malformed_document_is_yaml_error() {
            let err = ProbeConfig::from_yaml("api: [unclosed").unwrap_err();
            assert!(matches!(err, crate::result::ProbeError::Yaml(_)));
        }
    }

    mod overlay_tests {
        use super::*;

        #[test]
        fn test_env_overrides_file_values() {
            let config = ProbeConfig::default().overlay_from(env(&[
                ("API_BASE_URL", "http://api.local"),
                ("API_SPECIAL_KEY", "special-key"),
                ("SAUCE_BASE_URL", "http://shop.local/"),
                ("SAUCE_USERNAME", "alice"),
                ("SAUCE_PASSWORD", "pw"),
                ("SAUCE_LOCKED_USER", "locked"),
                ("SAUCE_PROBLEM_USER", "problem"),
                ("SAUCE_PERFORMANCE_GLITCH_USER", "slow"),
                ("SAUCE_ERROR_USER", "err"),
                ("SAUCE_VISUAL_USER", "visual"),
                ("SAUCE_INVALID_PASSWORD", "nope"),
            ]));
            assert_eq!(config.api.base_url, "http://api.local");
            assert_eq!(config.api.api_key.as_deref(), Some("special-key"));
            assert_eq!(config.site.base_url, "http://shop.local/");
            let accounts = &config.site.accounts;
            assert_eq!(accounts.standard, "alice");
            assert_eq!(accounts.password, "pw");
            assert_eq!(accounts.locked_out, "locked");
            assert_eq!(accounts.problem, "problem");
            assert_eq!(accounts.performance_glitch, "slow");
            assert_eq!(accounts.error, "err");
            assert_eq!(accounts.visual, "visual");
            assert_eq!(accounts.invalid_password, "nope");
        }

        #[test]
        fn test_unset_and_empty_variables_are_ignored() {
            let config =
                ProbeConfig::default().overlay_from(env(&[("API_BASE_URL", ""), ("SAUCE_USERNAME", "  ")]));
            assert_eq!(config, ProbeConfig::default());
        }
    }
}
