//! Blog search service - capability layer
//!
//! Only knows how to ask the Naver blog search API for posts.

use crate::config::Config;
use crate::error::{ApiError, AppError};
use crate::models::{BlogPost, BlogSearchResponse};
use anyhow::Result;
use tracing::{debug, info};

/// Number of posts requested per search.
const DISPLAY_COUNT: u32 = 20;

/// Blog search service
pub struct BlogSearch {
    http: reqwest::Client,
    endpoint: String,
    client_id: String,
    client_secret: String,
}

impl BlogSearch {
    /// Build the service; fails when the API credentials are missing.
    pub fn new(config: &Config) -> Result<Self> {
        if config.naver_client_id.trim().is_empty() {
            return Err(AppError::missing_config("NAVER_CLIENT_ID").into());
        }
        if config.naver_client_secret.trim().is_empty() {
            return Err(AppError::missing_config("NAVER_CLIENT_SECRET").into());
        }

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: config.naver_search_url.clone(),
            client_id: config.naver_client_id.clone(),
            client_secret: config.naver_client_secret.clone(),
        })
    }

    /// Search blog posts for `keyword`, most similar first.
    ///
    /// # Parameters
    /// - `keyword`: search term; surrounding whitespace is ignored
    ///
    /// # Returns
    /// Posts with highlight tags removed. An empty keyword, a non-success
    /// status or an unparsable body is an error
    pub async fn search(&self, keyword: &str) -> Result<Vec<BlogPost>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ApiError::InvalidInput("keyword must not be empty".to_string()).into());
        }

        info!("🔍 블로그 검색 중: '{}'...", keyword);

        let display = DISPLAY_COUNT.to_string();
        let response = self
            .http
            .get(&self.endpoint)
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .query(&[("query", keyword), ("display", display.as_str()), ("sort", "sim")])
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&self.endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::BadStatus {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let payload: BlogSearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::api_request_failed(&self.endpoint, e))?;
        debug!("search reported {} total hits", payload.total);

        let posts = parse_posts(payload);
        info!("✓ 검색 완료: {}건", posts.len());
        Ok(posts)
    }
}

fn parse_posts(payload: BlogSearchResponse) -> Vec<BlogPost> {
    payload.items.into_iter().map(BlogPost::from_raw).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Config {
        Config {
            naver_client_id: "id".to_string(),
            naver_client_secret: "secret".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn missing_credentials_are_rejected() {
        let config = Config {
            naver_client_secret: "secret".to_string(),
            ..Config::default()
        };
        let err = BlogSearch::new(&config).err().unwrap();
        assert!(err.to_string().contains("NAVER_CLIENT_ID"));
    }

    #[tokio::test]
    async fn empty_keyword_fails_before_any_request() {
        let search = BlogSearch::new(&configured()).unwrap();
        let err = search.search("   ").await.unwrap_err();
        assert!(err.to_string().contains("keyword"));
    }

    #[test]
    fn parse_posts_keeps_api_order() {
        let payload: BlogSearchResponse = serde_json::from_value(serde_json::json!({
            "total": 2,
            "items": [
                { "title": "첫 <b>글</b>", "description": "", "link": "l1", "bloggername": "a", "postdate": "20250101" },
                { "title": "둘째 글", "description": "<b>설명</b>", "link": "l2", "bloggername": "b", "postdate": "20250102" }
            ]
        }))
        .unwrap();

        let posts = parse_posts(payload);
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "첫 글");
        assert_eq!(posts[1].description, "설명");
    }

    #[tokio::test]
    #[ignore]
    async fn test_live_search() {
        let _ = tracing_subscriber::fmt::try_init();
        let config = Config::from_env().unwrap();
        let search = BlogSearch::new(&config).unwrap();
        let posts = search.search("러스트 프로그래밍").await.unwrap();
        assert!(!posts.is_empty());
    }
}
