pub mod editor_session;
pub mod publish_ctx;
pub mod publish_flow;
pub mod tistory_editor;

#[cfg(test)]
pub(crate) mod testing;

pub use editor_session::EditorSession;
pub use publish_ctx::PublishCtx;
pub use publish_flow::PublishFlow;
pub use tistory_editor::{next_calendar_move, parse_calendar_heading, CalendarMove, TistoryEditor};
