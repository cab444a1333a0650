use std::time::Duration;

use digest_core::{parse_problem_id, Difficulty, ProblemSource};
use digest_logging::{digest_debug, digest_warn};
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, ORIGIN, REFERER, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::slug::slug_from_url;
use crate::{FailureKind, FetchError, ProblemSummary};

const QUESTION_QUERY: &str = r#"
query questionData($titleSlug: String!) {
    question(titleSlug: $titleSlug) {
        questionId, title, titleSlug, difficulty, content,
        topicTags { name, slug }, hints
    }
}
"#;

const LISTING_QUERY: &str = r#"
query problemsetQuestionList($limit: Int, $skip: Int) {
    problemsetQuestionList: questionList(limit: $limit, skip: $skip) {
        questions: data {
            title, titleSlug, difficulty, topicTags { name }
        }
    }
}
"#;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub endpoint: String,
    pub origin: String,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://leetcode.com/graphql".to_string(),
            origin: "https://leetcode.com".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Source of problem pages and listings.
#[async_trait::async_trait]
pub trait ProblemFetcher: Send + Sync {
    async fn fetch_problem(&self, problem_url: &str) -> Result<ProblemSource, FetchError>;

    async fn fetch_listing(&self, limit: u32, skip: u32)
        -> Result<Vec<ProblemSummary>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct GraphqlFetcher {
    settings: FetchSettings,
    endpoint: reqwest::Url,
    client: reqwest::Client,
}

impl GraphqlFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let endpoint = reqwest::Url::parse(&settings.endpoint)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = build_client(&settings)?;
        Ok(Self {
            settings,
            endpoint,
            client,
        })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    async fn post<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, FetchError> {
        let payload = json!({ "query": query, "variables": variables });
        let body = serde_json::to_vec(&payload)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(too_large(self.settings.max_bytes, content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(too_large(self.settings.max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        digest_debug!("graphql response: {} bytes", bytes.len());

        let envelope: GraphqlResponse<T> = serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        if !envelope.errors.is_empty() {
            let message = envelope
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            if envelope.data.is_none() {
                return Err(FetchError::new(FailureKind::Graphql, message));
            }
            digest_warn!("graphql returned partial data with errors: {message}");
        }
        envelope
            .data
            .ok_or_else(|| FetchError::new(FailureKind::Decode, "response has no data"))
    }
}

#[async_trait::async_trait]
impl ProblemFetcher for GraphqlFetcher {
    async fn fetch_problem(&self, problem_url: &str) -> Result<ProblemSource, FetchError> {
        let slug = slug_from_url(problem_url).ok_or_else(|| {
            FetchError::new(
                FailureKind::InvalidUrl,
                format!("could not extract slug from {problem_url}"),
            )
        })?;
        digest_debug!("fetching problem data for slug {slug}");

        let data: QuestionData = self
            .post(QUESTION_QUERY, json!({ "titleSlug": slug }))
            .await?;
        let question = data.question.ok_or_else(|| {
            FetchError::new(FailureKind::NotFound { slug: slug.clone() }, "question is null")
        })?;
        question.into_source(problem_url)
    }

    async fn fetch_listing(
        &self,
        limit: u32,
        skip: u32,
    ) -> Result<Vec<ProblemSummary>, FetchError> {
        let data: ListingData = self
            .post(LISTING_QUERY, json!({ "limit": limit, "skip": skip }))
            .await?;
        let questions = data.list.map(|list| list.questions).unwrap_or_default();
        Ok(questions.into_iter().map(ListingItem::into_summary).collect())
    }
}

fn build_client(settings: &FetchSettings) -> Result<reqwest::Client, FetchError> {
    let header = |value: &str| {
        HeaderValue::from_str(value)
            .map_err(|err| FetchError::new(FailureKind::InvalidSettings, err.to_string()))
    };
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, header(&settings.user_agent)?);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ORIGIN, header(&settings.origin)?);
    let referer = format!("{}/", settings.origin.trim_end_matches('/'));
    headers.insert(REFERER, header(&referer)?);

    reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .build()
        .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphqlMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct QuestionData {
    question: Option<QuestionPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionPayload {
    question_id: String,
    title: String,
    title_slug: String,
    difficulty: Option<String>,
    /// Null for locked problems.
    content: Option<String>,
    #[serde(default)]
    topic_tags: Vec<TopicTag>,
    #[serde(default)]
    hints: Vec<String>,
}

impl QuestionPayload {
    fn into_source(self, problem_url: &str) -> Result<ProblemSource, FetchError> {
        let id = parse_problem_id(&self.question_id).ok_or_else(|| {
            FetchError::new(
                FailureKind::InvalidIdentifier {
                    raw: self.question_id.clone(),
                },
                "question id is not numeric",
            )
        })?;
        Ok(ProblemSource {
            id,
            title: self.title,
            slug: self.title_slug,
            difficulty: Difficulty::from_label(self.difficulty.as_deref().unwrap_or_default()),
            topics: self.topic_tags.into_iter().map(|tag| tag.name).collect(),
            hints: self.hints,
            url: problem_url.to_string(),
            html_body: self.content.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TopicTag {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(rename = "problemsetQuestionList")]
    list: Option<QuestionList>,
}

#[derive(Debug, Deserialize)]
struct QuestionList {
    #[serde(default)]
    questions: Vec<ListingItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingItem {
    title: String,
    title_slug: String,
    difficulty: Option<String>,
    #[serde(default)]
    topic_tags: Vec<TopicTag>,
}

impl ListingItem {
    fn into_summary(self) -> ProblemSummary {
        ProblemSummary {
            title: self.title,
            slug: self.title_slug,
            difficulty: Difficulty::from_label(self.difficulty.as_deref().unwrap_or_default()),
            topics: self.topic_tags.into_iter().map(|tag| tag.name).collect(),
        }
    }
}
