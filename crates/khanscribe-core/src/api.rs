use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    error::{KhanscribeError, Result},
    source::ContentSource,
    transcript::TranscriptFragment,
};

const USER_AGENT: &str = concat!("khanscribe/", env!("CARGO_PKG_VERSION"));

/// URL templates of the three endpoints, rooted at a base URL.
#[derive(Clone, Debug)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn topic(&self, slug: &str) -> String {
        format!("{}/api/v1/topic/{}", self.base, slug)
    }

    pub fn video(&self, identifier: &str) -> String {
        format!("{}/api/v1/videos/{}", self.base, identifier)
    }

    pub fn transcript(&self, youtube_id: &str) -> String {
        format!("{}/api/internal/videos/{}/transcript", self.base, youtube_id)
    }
}

#[derive(Deserialize)]
struct TopicResponse {
    children: Vec<TopicChild>,
}

#[derive(Deserialize)]
struct TopicChild {
    node_slug: String,
}

#[derive(Deserialize)]
struct VideoResponse {
    youtube_id: String,
}

/// HTTP implementation of [`ContentSource`].
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    endpoints: Endpoints,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            endpoints: Endpoints::new(base_url),
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(KhanscribeError::UnexpectedStatus {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| KhanscribeError::MalformedResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

impl ContentSource for ApiClient {
    async fn children(&self, slug: &str) -> Result<Vec<String>> {
        let topic: TopicResponse = self.get_json(&self.endpoints.topic(slug)).await?;
        Ok(topic
            .children
            .into_iter()
            .map(|child| child.node_slug)
            .collect())
    }

    async fn youtube_id(&self, identifier: &str) -> Result<String> {
        let video: VideoResponse = self.get_json(&self.endpoints.video(identifier)).await?;
        Ok(video.youtube_id)
    }

    async fn transcript_fragments(&self, youtube_id: &str) -> Result<Vec<TranscriptFragment>> {
        self.get_json(&self.endpoints.transcript(youtube_id)).await
    }
}
