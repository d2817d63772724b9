use serde::{Deserialize, Serialize};

use crate::utils::strip_highlight;

/// One blog search hit, highlight tags removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    pub description: String,
    pub link: String,
    #[serde(rename = "bloggername")]
    pub blogger_name: String,
    #[serde(rename = "postdate")]
    pub post_date: String,
}

impl BlogPost {
    /// Build a post from the raw search item, stripping `<b>` highlights.
    pub fn from_raw(raw: RawBlogItem) -> Self {
        Self {
            title: strip_highlight(&raw.title),
            description: strip_highlight(&raw.description),
            link: raw.link,
            blogger_name: raw.bloggername,
            post_date: raw.postdate,
        }
    }

    /// Multi-line summary used when listing search results.
    pub fn summary(&self) -> String {
        format!(
            "blogger: {}\ndate: {}\nlink: {}",
            self.blogger_name, self.post_date, self.link
        )
    }
}

/// Item shape returned by the Naver blog search API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawBlogItem {
    pub title: String,
    pub description: String,
    pub link: String,
    pub bloggername: String,
    pub postdate: String,
}

/// Top-level search response; fields other than `items` are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlogSearchResponse {
    pub total: u64,
    pub items: Vec<RawBlogItem>,
}
