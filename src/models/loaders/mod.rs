pub mod article_loader;
pub mod queue_loader;

pub use article_loader::{list_article_files, load_all_articles, load_article};
pub use queue_loader::{load_queue_manifest, parse_schedule_time, queue_from_dir};
