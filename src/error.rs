use thiserror::Error;

use crate::models::PublishStep;

/// Application-wide error, one variant per layer. Most code propagates
/// `anyhow::Result`; these types are used where a caller needs to branch on
/// the kind of failure.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("file error: {0}")]
    File(#[from] FileError),
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
    #[error("publish error: {0}")]
    Publish(#[from] PublishError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Browser and page level failures.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("cannot connect to browser on port {port}: {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("failed to launch browser: {message}")]
    LaunchFailed { message: String },
    #[error("element `{selector}` not available after {waited_ms} ms")]
    ElementTimeout { selector: String, waited_ms: u64 },
    #[error("no new window opened after {waited_ms} ms")]
    WindowTimeout { waited_ms: u64 },
    #[error("login not completed within {waited_secs} s")]
    LoginTimeout { waited_secs: u64 },
    #[error("script failed: {message}")]
    ScriptFailed { message: String },
}

/// Remote API failures (blog search).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned status {status}: {body}")]
    BadStatus {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// File and manifest failures.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("directory does not exist: {path}")]
    DirectoryNotFound { path: String },
    #[error("cannot read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse manifest {path}: {source}")]
    ManifestParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Generative-text service failures.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM call failed (model: {model}): {message}")]
    ApiCallFailed { model: String, message: String },
    #[error("LLM returned empty content (model: {model})")]
    EmptyContent { model: String },
    #[error("title count {count} out of range 1..=20")]
    InvalidTitleCount { count: usize },
    #[error("no blog posts to build titles from")]
    NoSourcePosts,
}

/// Publish batch failures.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Items scheduled at or before the current time; blocks the whole batch.
    #[error("scheduled time is not in the future for: {}", .offending.join(", "))]
    ScheduleInPast { offending: Vec<String> },
    #[error("step `{step}` failed: {reason}")]
    StepFailed { step: PublishStep, reason: String },
}

/// Configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {var_name} is not set")]
    MissingValue { var_name: String },
    #[error("value '{value}' of {var_name} cannot be parsed as {expected_type}")]
    ParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

// ========== Convenience constructors ==========

impl AppError {
    pub fn browser_connection_failed(
        port: u16,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed {
            port,
            source: Box::new(source),
        })
    }

    pub fn api_request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        })
    }

    pub fn missing_config(var_name: impl Into<String>) -> Self {
        AppError::Config(ConfigError::MissingValue {
            var_name: var_name.into(),
        })
    }

    pub fn llm_api_failed(model: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            message: message.into(),
        })
    }
}

/// Application result alias
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_error_lists_every_offending_item() {
        let err = PublishError::ScheduleInPast {
            offending: vec!["a.txt".to_string(), "b.txt".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "scheduled time is not in the future for: a.txt, b.txt"
        );
    }

    #[test]
    fn layered_error_wraps_inner_message() {
        let err: AppError = BrowserError::ElementTimeout {
            selector: "#publish-btn".to_string(),
            waited_ms: 5000,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "browser error: element `#publish-btn` not available after 5000 ms"
        );
    }
}
