//! # blog_autopublish
//!
//! Blog content automation: search posts, generate titles and articles with
//! an LLM, and schedule them on Tistory through a real browser.
//!
//! ## Architecture
//!
//! Four layers, each depending only on the ones below it:
//!
//! ### ① Infrastructure
//! - `browser/` - connect to or launch Chrome, wait for a manual login
//! - `infrastructure/` - `PageDriver`, bounded waits, clicks and dialogs on one page
//!
//! ### ② Services
//! - `services/` - one capability each, one item at a time
//! - `BlogSearch` - Naver blog search
//! - `LlmService` - title and article generation
//! - `ArticleStore` - article files on disk
//! - `FailureLog` - append failed publish items to a text file
//!
//! ### ③ Workflow
//! - `workflow/` - the full life of one scheduled post
//! - `EditorSession` - the editor steps, implemented by `TistoryEditor`
//! - `PublishFlow` - step order, per-step timeout, reset afterwards
//!
//! ### ④ Orchestration
//! - `orchestrator/publish_batch` - validates and publishes a queue
//! - `orchestrator/content_batch` - generates articles for a list of titles

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

pub use browser::{connect_to_browser_and_page, launch_browser, wait_for_login};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::PageDriver;
pub use models::{Article, BlogPost, PublishItem, PublishStatus, PublishStep, Visibility};
pub use orchestrator::{generate_articles, PublishBatch, PublishReport};
pub use workflow::{EditorSession, PublishCtx, PublishFlow, TistoryEditor};
