//! Orchestration layer
//!
//! ## Responsibilities
//!
//! Batch processing and scheduling. This is the only layer that sees a whole
//! queue at once.
//!
//! ## Modules
//!
//! ### `schedule` - schedule validation
//! - every item strictly in the future, or the batch does not start
//! - default start time for generated schedules
//!
//! ### `publish_batch` - publish queue
//! - loads each article right before it is published
//! - drives one `PublishFlow` per item through the shared session
//! - records per-item status and appends failures to the failure log
//!
//! ### `content_batch` - article generation
//! - one LLM call per title, saved through the `ArticleStore`
//!
//! ## Layering
//!
//! ```text
//! publish_batch (Vec<PublishItem>)
//!     ↓
//! workflow::PublishFlow (one item)
//!     ↓
//! workflow::EditorSession (TistoryEditor)
//!     ↓
//! infrastructure (PageDriver)
//! ```

pub mod content_batch;
pub mod publish_batch;
pub mod schedule;

pub use content_batch::{generate_articles, ContentGenerator, ContentReport};
pub use publish_batch::{ProgressFn, PublishBatch, PublishReport};
pub use schedule::{default_start, validate_schedule, DEFAULT_INTERVAL_MINS};
