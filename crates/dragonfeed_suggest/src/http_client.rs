//! Reqwest-based implementation of the [`GenerationClient`](crate::GenerationClient) trait.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::config::Config;
use crate::{GenerationClient, SuggestError, SuggestionRequest};

/// HTTP client for the text-generation upstream. One outstanding request
/// per invocation; no internal retry, callers decide whether to retry.
#[derive(Clone, Debug)]
pub struct HttpGenerationClient {
    base_url: String,
    api_key: SecretString,
    model: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GenerationEnvelope<'a> {
    model: &'a str,
    request: &'a SuggestionRequest,
}

#[derive(Deserialize)]
struct GenerationResponse {
    output: String,
}

impl HttpGenerationClient {
    pub fn new(base_url: &str, model: impl Into<String>, api_key: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("reqwest client build should not fail");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
            client,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.base_url, config.model.clone(), config.api_key.clone())
    }

    async fn post_generation(&self, request: &SuggestionRequest) -> Result<String, SuggestError> {
        let url = format!("{}/v1/generate", self.base_url);
        debug!(%url, model = %self.model, "requesting suggestions from generation upstream");
        let resp = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&GenerationEnvelope {
                model: &self.model,
                request,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let body_snippet: String = body.chars().take(256).collect();
            return Err(SuggestError::UpstreamStatus {
                status: status.as_u16(),
                body: body_snippet,
            });
        }

        let payload = resp.json::<GenerationResponse>().await?;
        Ok(payload.output)
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn generate(
        &self,
        request: &SuggestionRequest,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<String, SuggestError> {
        let request_future = self.post_generation(request);
        tokio::pin!(request_future);

        loop {
            tokio::select! {
                result = &mut request_future => return result,
                changed = cancel.changed() => match changed {
                    Ok(()) if *cancel.borrow() => {
                        debug!("generation request cancelled by caller");
                        return Err(SuggestError::Cancelled);
                    }
                    Ok(()) => continue,
                    // Sender dropped: cancellation can no longer fire.
                    Err(_) => return request_future.await,
                },
            }
        }
    }
}
