//! LLM service - capability layer
//!
//! Title and article generation over an OpenAI-compatible chat API.
//!
//! ## Stack
//! - `async-openai` for the API calls
//! - custom endpoint and model, so Gemini's OpenAI-compatible endpoint works
//!   the same as any other provider

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, LlmError};
use crate::models::BlogPost;

/// Upper bound accepted for one title request.
pub const MAX_TITLE_COUNT: usize = 20;
/// Only the first posts feed the title prompt.
const MAX_SOURCE_POSTS: usize = 10;

/// Prompt used when the user gives none.
pub const DEFAULT_CONTENT_PROMPT: &str = "\
당신은 전문 콘텐츠 작가이자 블로거입니다. 기계적인 글이 아니라 실제 경험을 바탕으로 쓴 것처럼 친근하고 자연스러운 글을 작성하세요.

글은 2000~3000자 분량으로, SEO를 고려하고, 마크다운 형식과 소제목을 사용하며, 마지막에 요약을 넣어주세요.

다음을 꼭 반영하세요:
1. 독자가 공감할 수 있는 경험이나 비유를 자연스럽게 한두 문장씩 넣기
2. 신뢰할 수 있는 정보와 실용적인 팁 제공
3. 사람이 직접 쓴 듯한 말투 사용
4. 키워드는 본문에 자연스럽게 녹이기 (나열 금지)
5. 문장 길이에 변화를 주고 연결어를 활용하기
6. 목록, 인용문, 강조 등 마크다운 기능 적극 활용";

/// LLM service
///
/// - generates candidate titles from searched posts
/// - expands one title into a markdown article body
/// - one request at a time; batching lives in the orchestrator
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    pub fn new(config: &Config) -> Result<Self> {
        if config.llm_api_key.trim().is_empty() {
            return Err(AppError::missing_config("LLM_API_KEY").into());
        }

        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Ok(Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
        })
    }

    /// Basic chat call; every other method builds on it.
    ///
    /// # Parameters
    /// - `user_message`: user message
    /// - `system_message`: optional system message
    /// - `temperature`, `max_tokens`: sampling controls
    ///
    /// # Returns
    /// The trimmed response text
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String> {
        debug!("calling LLM, model: {}", self.model_name);
        debug!("user message length: {} chars", user_message.chars().count());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(temperature)
            .max_tokens(max_tokens)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM 호출 실패: {}", e);
            AppError::llm_api_failed(&self.model_name, e.to_string())
        })?;

        debug!("LLM call succeeded");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content)
    }

    /// Generate up to `count` titles inspired by `posts`.
    ///
    /// # Parameters
    /// - `posts`: search results used as inspiration; only the first few are sent
    /// - `count`: wanted number of titles, between 1 and [`MAX_TITLE_COUNT`]
    ///
    /// # Returns
    /// Parsed titles, possibly fewer than `count` when the reply is short
    pub async fn generate_titles(&self, posts: &[BlogPost], count: usize) -> Result<Vec<String>> {
        if !(1..=MAX_TITLE_COUNT).contains(&count) {
            return Err(LlmError::InvalidTitleCount { count }.into());
        }
        if posts.is_empty() {
            return Err(LlmError::NoSourcePosts.into());
        }

        info!("✨ 글 {1}개를 참고해 제목 {0}개 생성 중...", count, posts.len().min(MAX_SOURCE_POSTS));

        let prompt = build_title_prompt(posts, count);
        let response = self.send_to_llm(&prompt, None, 0.9, 1024).await?;
        let titles = parse_titles(&response, count);

        if titles.is_empty() {
            warn!("응답에서 제목을 찾지 못했습니다: {}", response);
        }
        info!("✓ 제목 {}개 생성 완료", titles.len());
        Ok(titles)
    }

    /// Write the markdown body for `title`.
    ///
    /// `prompt` carries the writing instructions; [`DEFAULT_CONTENT_PROMPT`]
    /// is used when it is blank.
    pub async fn generate_content(&self, title: &str, prompt: &str) -> Result<String> {
        info!("📝 글 작성 중: '{}'...", title);
        let instructions = if prompt.trim().is_empty() {
            DEFAULT_CONTENT_PROMPT
        } else {
            prompt
        };
        let full_prompt = build_content_prompt(title, instructions);
        self.send_to_llm(&full_prompt, None, 0.7, 8192).await
    }
}

/// Build the title prompt from the first posts.
fn build_title_prompt(posts: &[BlogPost], count: usize) -> String {
    let summary: String = posts
        .iter()
        .take(MAX_SOURCE_POSTS)
        .enumerate()
        .map(|(i, post)| format!("{}. {}\n{}\n\n", i + 1, post.title, post.description))
        .collect();

    format!(
        r#"다음은 특정 키워드로 검색한 상위 블로그 글들의 제목과 내용입니다:

{summary}
위 내용을 분석해서 SEO에 최적화되고 클릭률이 높은 블로그 제목을 {count}개 만들어주세요.
참고할 점:
1. 제목의 구조적 특징 (길이, 문장 구조, 문체)
2. 자주 쓰이는 핵심 키워드와 표현
3. 제목 구성 패턴 (질문형, 리스트형, 비교형 등)
4. 독자의 관심을 끄는 기법
5. SEO 최적화 특징

**중요:**
- 제목에 마크다운 문법(#, *, _, `, [, ])을 절대 쓰지 마세요
- 일반 텍스트로만 작성하세요
- 특수문자는 최소한으로 사용하세요

제목만 번호와 함께 한 줄에 하나씩 나열해주세요.

예시:
1. 효과적인 블로그 운영 방법 5가지
2. 초보자를 위한 SEO 최적화 가이드
3. 블로그 수익화 전략과 실제 사례"#
    )
}

/// Wrap the user's instructions with the title and output rules.
fn build_content_prompt(title: &str, instructions: &str) -> String {
    format!(
        r#"제목: {title}

{instructions}

위 제목으로 블로그 글을 작성해주세요.

**응답 형식:**
- 본문만 마크다운 형식으로 작성하세요 (##, ###, **강조**, - 목록 등)
- 응답에 제목을 다시 넣지 마세요
- 본문 내용으로 바로 시작하세요"#
    )
}

/// Extract numbered or bulleted titles from an LLM response.
///
/// Only lines starting with a digit or a bullet are considered; numbering,
/// bullets and stray markdown are removed and at most `count` titles are
/// returned.
pub fn parse_titles(response: &str, count: usize) -> Vec<String> {
    response
        .lines()
        .map(str::trim)
        .filter(|line| {
            line.chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '*' | '•'))
        })
        .map(strip_list_marker)
        .map(|title| {
            title
                .chars()
                .filter(|c| !matches!(c, '*' | '#' | '`' | '[' | ']'))
                .collect::<String>()
                .trim()
                .trim_matches('"')
                .trim()
                .to_string()
        })
        .filter(|title| !title.is_empty())
        .take(count)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let digits_end = line
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(line.len());

    if digits_end > 0 {
        let rest = &line[digits_end..];
        // "2025년 ..." is a title, not a numbered line
        return match rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            Some(stripped) => stripped.trim_start(),
            None => line,
        };
    }

    line.trim_start_matches(['-', '*', '•']).trim_start()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str) -> BlogPost {
        BlogPost {
            title: title.to_string(),
            description: format!("{} 설명", title),
            ..BlogPost::default()
        }
    }

    #[test]
    fn parse_titles_strips_numbering_and_markdown() {
        let response = "다음은 제목입니다:\n\
                        1. **러스트** 입문 가이드\n\
                        2) 비동기 프로그래밍 - 실전 팁\n\
                        - \"Tokio로 서버 만들기\"\n\
                        \n\
                        요약 문장";
        let titles = parse_titles(response, 10);
        assert_eq!(
            titles,
            vec![
                "러스트 입문 가이드",
                "비동기 프로그래밍 - 실전 팁",
                "Tokio로 서버 만들기",
            ]
        );
    }

    #[test]
    fn parse_titles_caps_at_count() {
        let response = "1. a\n2. b\n3. c\n4. d";
        assert_eq!(parse_titles(response, 2), vec!["a", "b"]);
    }

    #[test]
    fn parse_titles_keeps_leading_year() {
        assert_eq!(
            parse_titles("2025년 블로그 트렌드 정리", 3),
            vec!["2025년 블로그 트렌드 정리"]
        );
    }

    #[test]
    fn parse_titles_skips_empty_markers() {
        assert!(parse_titles("1.\n-\n**", 5).is_empty());
    }

    #[test]
    fn title_prompt_uses_first_ten_posts() {
        let posts: Vec<_> = (1..=12).map(|i| post(&format!("글{}", i))).collect();
        let prompt = build_title_prompt(&posts, 5);
        assert!(prompt.contains("10. 글10\n글10 설명"));
        assert!(!prompt.contains("글11"));
        assert!(prompt.contains("5개"));
    }

    #[test]
    fn content_prompt_embeds_title_and_instructions() {
        let prompt = build_content_prompt("러스트 소개", "짧게 써주세요");
        assert!(prompt.starts_with("제목: 러스트 소개"));
        assert!(prompt.contains("짧게 써주세요"));
        assert!(prompt.contains("제목을 다시 넣지 마세요"));
    }

    #[test]
    fn service_requires_api_key() {
        let err = LlmService::new(&Config::default()).err().unwrap();
        assert!(err.to_string().contains("LLM_API_KEY"));
    }

    #[tokio::test]
    async fn title_count_is_validated_before_calling_api() {
        let config = Config {
            llm_api_key: "test-key".to_string(),
            ..Config::default()
        };
        let service = LlmService::new(&config).unwrap();

        let err = service.generate_titles(&[post("a")], 0).await.unwrap_err();
        assert!(err.to_string().contains("out of range"));
        let err = service.generate_titles(&[], 3).await.unwrap_err();
        assert!(err.to_string().contains("no blog posts"));
    }

    #[tokio::test]
    #[ignore]
    async fn test_generate_titles_live() {
        let _ = tracing_subscriber::fmt::try_init();
        let service = LlmService::new(&Config::from_env().unwrap()).unwrap();
        let titles = service
            .generate_titles(&[post("러스트 입문"), post("러스트 소유권")], 3)
            .await
            .unwrap();
        println!("{:#?}", titles);
        assert!(!titles.is_empty());
    }
}
