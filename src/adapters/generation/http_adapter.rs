//! HTTP generation adapter.
//!
//! One POST per capability under a base URL:
//!
//! | capability             | path          | request body            |
//! |------------------------|---------------|-------------------------|
//! | extract requirements   | `requirements`| `{"input": "<text>"}`   |
//! | generate questions     | `questions`   | Requirements document   |
//! | generate follow-ups    | `follow-ups`  | Requirements document   |
//!
//! Response bodies are returned as raw JSON for the schema layer to judge.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::domain::survey::Requirements;
use crate::ports::{AdapterInfo, Capability, GenerationAdapter, GenerationFailure};

#[derive(Debug, Clone)]
pub struct HttpAdapterConfig {
    pub base_url: String,
    api_key: Option<Secret<String>>,
    pub timeout: Duration,
}

impl HttpAdapterConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

pub struct HttpGenerationAdapter {
    config: HttpAdapterConfig,
    client: Client,
}

impl HttpGenerationAdapter {
    pub fn new(config: HttpAdapterConfig) -> Result<Self, GenerationFailure> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationFailure::unavailable(format!("http client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn url_for(&self, capability: Capability) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            capability.endpoint()
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key.expose_secret()),
            None => request,
        }
    }

    async fn post<B: Serialize + Sync>(
        &self,
        capability: Capability,
        body: &B,
    ) -> Result<Value, GenerationFailure> {
        let request = self.authorize(self.client.post(self.url_for(capability)).json(body));
        let response = request.send().await.map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationFailure::Http {
                status: status.as_u16(),
            });
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| GenerationFailure::Malformed(e.to_string()))
    }

    fn map_transport_error(&self, error: reqwest::Error) -> GenerationFailure {
        if error.is_timeout() {
            GenerationFailure::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }
        } else {
            GenerationFailure::Network(error.to_string())
        }
    }
}

#[async_trait]
impl GenerationAdapter for HttpGenerationAdapter {
    async fn extract_requirements(&self, free_text: &str) -> Result<Value, GenerationFailure> {
        self.post(Capability::ExtractRequirements, &json!({ "input": free_text }))
            .await
    }

    async fn generate_questions(
        &self,
        requirements: &Requirements,
    ) -> Result<Value, GenerationFailure> {
        self.post(Capability::GenerateQuestions, requirements).await
    }

    async fn generate_follow_ups(
        &self,
        requirements: &Requirements,
    ) -> Result<Value, GenerationFailure> {
        self.post(Capability::GenerateFollowUps, requirements).await
    }

    fn adapter_info(&self) -> AdapterInfo {
        AdapterInfo::new(format!("http:{}", self.config.base_url), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_without_double_slash() {
        let adapter = HttpGenerationAdapter::new(HttpAdapterConfig::new("http://localhost:8080/api/"))
            .unwrap();
        assert_eq!(
            adapter.url_for(Capability::GenerateFollowUps),
            "http://localhost:8080/api/follow-ups"
        );
    }

    #[test]
    fn api_key_is_not_printed() {
        let config = HttpAdapterConfig::new("http://x").with_api_key("sk-secret");
        assert!(config.has_api_key());
        assert!(!format!("{:?}", config).contains("sk-secret"));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_failure() {
        let config = HttpAdapterConfig::new("http://127.0.0.1:9")
            .with_timeout(Duration::from_millis(500));
        let adapter = HttpGenerationAdapter::new(config).unwrap();
        let err = adapter.extract_requirements("NPS").await.unwrap_err();
        assert!(matches!(
            err,
            GenerationFailure::Network(_) | GenerationFailure::Timeout { .. }
        ));
    }
}
