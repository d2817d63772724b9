pub mod article_store;
pub mod blog_search;
pub mod failure_log;
pub mod llm_service;

pub use article_store::ArticleStore;
pub use blog_search::BlogSearch;
pub use failure_log::FailureLog;
pub use llm_service::{LlmService, DEFAULT_CONTENT_PROMPT};
