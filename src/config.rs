use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppResult, ConfigError};

/// Program configuration.
///
/// Values come from the environment (an optional `.env` file is loaded
/// first by `main`); command-line flags override individual fields.
#[derive(Clone, Debug)]
pub struct Config {
    // --- Naver blog search ---
    pub naver_client_id: String,
    pub naver_client_secret: String,
    pub naver_search_url: String,
    // --- LLM ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- Browser / Tistory ---
    /// DevTools port of an already running, logged-in Chrome
    pub browser_debug_port: u16,
    /// Blog address such as `https://myblog.tistory.com`; when set the editor
    /// is opened directly instead of through the write link
    pub blog_url: String,
    pub tistory_home_url: String,
    pub tistory_login_url: String,
    /// Profile directory used when the tool launches its own browser
    pub browser_profile_dir: String,
    // --- Timing ---
    pub element_wait_secs: u64,
    pub alert_wait_secs: u64,
    pub settle_delay_ms: u64,
    pub login_wait_secs: u64,
    /// Upper bound for one publish step, waits included
    pub step_timeout_secs: u64,
    // --- Output ---
    pub default_save_path: String,
    pub verbose_logging: bool,
    pub output_log_file: String,
    pub failure_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            naver_client_id: String::new(),
            naver_client_secret: String::new(),
            naver_search_url: "https://openapi.naver.com/v1/search/blog".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-2.0-flash-exp".to_string(),
            browser_debug_port: 9222,
            blog_url: String::new(),
            tistory_home_url: "https://www.tistory.com/".to_string(),
            tistory_login_url: "https://www.tistory.com/auth/login".to_string(),
            browser_profile_dir: "browser_profile".to_string(),
            element_wait_secs: 10,
            alert_wait_secs: 3,
            settle_delay_ms: 2000,
            login_wait_secs: 300,
            step_timeout_secs: 60,
            default_save_path: "articles".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            failure_log_file: "publish_failures.txt".to_string(),
        }
    }
}

impl Config {
    /// Read every value from the environment, falling back to [`Config::default`].
    ///
    /// # Returns
    /// `ConfigError::ParseFailed` when a numeric or boolean variable is set but
    /// cannot be parsed
    pub fn from_env() -> AppResult<Self> {
        let default = Self::default();
        Ok(Self {
            naver_client_id: env_string("NAVER_CLIENT_ID", default.naver_client_id),
            naver_client_secret: env_string("NAVER_CLIENT_SECRET", default.naver_client_secret),
            naver_search_url: env_string("NAVER_SEARCH_URL", default.naver_search_url),
            llm_api_key: std::env::var("LLM_API_KEY")
                .or_else(|_| std::env::var("GEMINI_API_KEY"))
                .unwrap_or(default.llm_api_key),
            llm_api_base_url: env_string("LLM_API_BASE_URL", default.llm_api_base_url),
            llm_model_name: env_string("LLM_MODEL_NAME", default.llm_model_name),
            browser_debug_port: env_parse("BROWSER_DEBUG_PORT", default.browser_debug_port)?,
            blog_url: env_string("BLOG_URL", default.blog_url),
            tistory_home_url: env_string("TISTORY_HOME_URL", default.tistory_home_url),
            tistory_login_url: env_string("TISTORY_LOGIN_URL", default.tistory_login_url),
            browser_profile_dir: env_string("BROWSER_PROFILE_DIR", default.browser_profile_dir),
            element_wait_secs: env_parse("ELEMENT_WAIT_SECS", default.element_wait_secs)?,
            alert_wait_secs: env_parse("ALERT_WAIT_SECS", default.alert_wait_secs)?,
            settle_delay_ms: env_parse("SETTLE_DELAY_MS", default.settle_delay_ms)?,
            login_wait_secs: env_parse("LOGIN_WAIT_SECS", default.login_wait_secs)?,
            step_timeout_secs: env_parse("STEP_TIMEOUT_SECS", default.step_timeout_secs)?,
            default_save_path: env_string("DEFAULT_SAVE_PATH", default.default_save_path),
            verbose_logging: env_parse("VERBOSE_LOGGING", default.verbose_logging)?,
            output_log_file: env_string("OUTPUT_LOG_FILE", default.output_log_file),
            failure_log_file: env_string("FAILURE_LOG_FILE", default.failure_log_file),
        })
    }

    pub fn element_wait(&self) -> Duration {
        Duration::from_secs(self.element_wait_secs)
    }

    pub fn alert_wait(&self) -> Duration {
        Duration::from_secs(self.alert_wait_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.step_timeout_secs)
    }

    /// Blog address without a trailing slash, if configured.
    pub fn blog_base(&self) -> Option<&str> {
        let trimmed = self.blog_url.trim().trim_end_matches('/');
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

fn env_string(var_name: &str, default: String) -> String {
    std::env::var(var_name).unwrap_or(default)
}

fn env_parse<T: FromStr>(var_name: &str, default: T) -> Result<T, ConfigError> {
    parse_value(var_name, std::env::var(var_name).ok(), default)
}

/// Parse a raw variable value; unset or blank keeps `default`.
fn parse_value<T: FromStr>(var_name: &str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(value) if !value.trim().is_empty() => {
            value.trim().parse().map_err(|_| ConfigError::ParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: std::any::type_name::<T>().to_string(),
            })
        }
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blog_base_trims_trailing_slash() {
        let config = Config {
            blog_url: "https://example.tistory.com/".to_string(),
            ..Config::default()
        };
        assert_eq!(config.blog_base(), Some("https://example.tistory.com"));
    }

    #[test]
    fn blog_base_is_none_when_blank() {
        let config = Config {
            blog_url: "   ".to_string(),
            ..Config::default()
        };
        assert_eq!(config.blog_base(), None);
    }

    #[test]
    fn durations_follow_configured_values() {
        let config = Config {
            element_wait_secs: 7,
            settle_delay_ms: 150,
            ..Config::default()
        };
        assert_eq!(config.element_wait(), Duration::from_secs(7));
        assert_eq!(config.settle_delay(), Duration::from_millis(150));
    }

    #[test]
    fn unset_or_blank_value_keeps_default() {
        assert_eq!(parse_value::<u64>("ELEMENT_WAIT_SECS", None, 10).unwrap(), 10);
        assert_eq!(parse_value::<u64>("ELEMENT_WAIT_SECS", Some("  ".to_string()), 10).unwrap(), 10);
        assert_eq!(parse_value::<u16>("BROWSER_DEBUG_PORT", Some(" 9333 ".to_string()), 9222).unwrap(), 9333);
        assert!(parse_value::<bool>("VERBOSE_LOGGING", Some("true".to_string()), false).unwrap());
    }

    #[test]
    fn unparsable_value_is_reported() {
        let err = parse_value::<u16>("BROWSER_DEBUG_PORT", Some("92x2".to_string()), 9222).unwrap_err();
        assert_eq!(
            err.to_string(),
            "value '92x2' of BROWSER_DEBUG_PORT cannot be parsed as u16"
        );
    }
}
