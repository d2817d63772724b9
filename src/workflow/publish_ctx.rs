//! Publish context
//!
//! Which queued item is being published, for log prefixes.

use std::fmt::Display;

#[derive(Debug, Clone)]
pub struct PublishCtx {
    /// 1-based position in the batch
    pub item_index: usize,
    pub total: usize,
    pub label: String,
}

impl PublishCtx {
    pub fn new(item_index: usize, total: usize, label: impl Into<String>) -> Self {
        Self {
            item_index,
            total,
            label: label.into(),
        }
    }
}

impl Display for PublishCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[item {}/{} {}]", self.item_index, self.total, self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_position_and_label() {
        let ctx = PublishCtx::new(2, 5, "post.txt");
        assert_eq!(ctx.to_string(), "[item 2/5 post.txt]");
    }
}
