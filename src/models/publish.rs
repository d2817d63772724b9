use chrono::NaiveDateTime;
use std::fmt;
use std::path::PathBuf;

/// Post visibility offered by the publish panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    /// Id of the matching radio input in the publish panel.
    pub fn radio_id(self) -> &'static str {
        match self {
            Visibility::Public => "open20",
            Visibility::Protected => "open15",
            Visibility::Private => "open0",
        }
    }
}

impl std::str::FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "protected" => Ok(Visibility::Protected),
            "private" => Ok(Visibility::Private),
            other => Err(format!("unknown visibility: {}", other)),
        }
    }
}

/// One stage of publishing a single item, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublishStep {
    OpenEditor,
    SwitchToMarkdown,
    DismissAlert,
    EnterTitle,
    EnterBody,
    OpenPublishPanel,
    SetVisibility,
    SetSchedule,
    Confirm,
}

impl PublishStep {
    /// Every step in the order the editor requires them.
    pub const SEQUENCE: [PublishStep; 9] = [
        PublishStep::OpenEditor,
        PublishStep::SwitchToMarkdown,
        PublishStep::DismissAlert,
        PublishStep::EnterTitle,
        PublishStep::EnterBody,
        PublishStep::OpenPublishPanel,
        PublishStep::SetVisibility,
        PublishStep::SetSchedule,
        PublishStep::Confirm,
    ];
}

impl fmt::Display for PublishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PublishStep::OpenEditor => "open editor",
            PublishStep::SwitchToMarkdown => "switch to markdown",
            PublishStep::DismissAlert => "dismiss alert",
            PublishStep::EnterTitle => "enter title",
            PublishStep::EnterBody => "enter body",
            PublishStep::OpenPublishPanel => "open publish panel",
            PublishStep::SetVisibility => "set visibility",
            PublishStep::SetSchedule => "set schedule",
            PublishStep::Confirm => "confirm",
        };
        f.write_str(name)
    }
}

/// A queued article with its publish time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishItem {
    /// Display name, the article file name
    pub label: String,
    pub article_path: PathBuf,
    pub scheduled_at: NaiveDateTime,
}

impl PublishItem {
    pub fn new(article_path: impl Into<PathBuf>, scheduled_at: NaiveDateTime) -> Self {
        let article_path = article_path.into();
        let label = article_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Self {
            label,
            article_path,
            scheduled_at,
        }
    }
}

/// Lifecycle of a queued item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishStatus {
    Pending,
    Preparing,
    Published,
    Failed {
        /// `None` when the item failed before the browser was touched
        step: Option<PublishStep>,
        reason: String,
    },
}

impl PublishStatus {
    pub fn is_published(&self) -> bool {
        matches!(self, PublishStatus::Published)
    }
}

impl fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishStatus::Pending => f.write_str("pending"),
            PublishStatus::Preparing => f.write_str("preparing"),
            PublishStatus::Published => f.write_str("published"),
            PublishStatus::Failed {
                step: Some(step),
                reason,
            } => write!(f, "failed at {}: {}", step, reason),
            PublishStatus::Failed { step: None, reason } => write!(f, "failed: {}", reason),
        }
    }
}
