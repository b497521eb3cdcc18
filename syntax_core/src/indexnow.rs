//! Search-engine change notification (IndexNow protocol).

use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::info;

use crate::config::IndexNowConfig;
use crate::error::{AppError, Result};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexNowPayload<'a> {
    host: &'a str,
    key: &'a str,
    key_location: &'a str,
    url_list: &'a [String],
}

/// What the search engine answered. A non-2xx status is not an error here;
/// the caller decides how to surface it.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexNowOutcome {
    pub status: StatusCode,
    pub body: String,
}

impl IndexNowOutcome {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[derive(Clone)]
pub struct IndexNowClient {
    endpoint: String,
    host: String,
    key: String,
    key_location: String,
    client: Client,
}

impl IndexNowClient {
    pub fn from_config(config: &IndexNowConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let key_location = config
            .key_location
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| format!("https://{}/{}.txt", config.host, config.key));

        Ok(Self {
            endpoint: config.endpoint.clone(),
            host: config.host.clone(),
            key: config.key.clone(),
            key_location,
            client,
        })
    }

    pub fn key_location(&self) -> &str {
        &self.key_location
    }

    /// Transport failures are `AppError::Upstream`.
    pub async fn submit(&self, urls: &[String]) -> Result<IndexNowOutcome> {
        let payload = IndexNowPayload {
            host: &self.host,
            key: &self.key,
            key_location: &self.key_location,
            url_list: urls,
        };

        let body = serde_json::to_vec(&payload)?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to read IndexNow response: {}", e)))?;

        info!(status = status.as_u16(), urls = urls.len(), "IndexNow submission finished");

        Ok(IndexNowOutcome { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(endpoint: String) -> IndexNowConfig {
        IndexNowConfig {
            endpoint,
            ..IndexNowConfig::default()
        }
    }

    #[test]
    fn test_key_location_defaults_to_host_and_key() {
        let client = IndexNowClient::from_config(&IndexNowConfig::default()).unwrap();
        assert_eq!(
            client.key_location(),
            "https://syntax.com.ng/f5157ccc525e40c7b6d52d34780e2c22.txt"
        );

        let mut custom = IndexNowConfig::default();
        custom.key_location = Some("https://cdn.example.com/key.txt".to_string());
        let client = IndexNowClient::from_config(&custom).unwrap();
        assert_eq!(client.key_location(), "https://cdn.example.com/key.txt");
    }

    #[tokio::test]
    async fn test_submit_posts_protocol_payload() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/indexnow"))
            .and(header("content-type", "application/json; charset=utf-8"))
            .and(body_json(json!({
                "host": "syntax.com.ng",
                "key": "f5157ccc525e40c7b6d52d34780e2c22",
                "keyLocation": "https://syntax.com.ng/f5157ccc525e40c7b6d52d34780e2c22.txt",
                "urlList": ["https://syntax.com.ng/projects/a"]
            })))
            .respond_with(ResponseTemplate::new(202).set_body_string("Accepted"))
            .expect(1)
            .mount(&server)
            .await;

        let client = IndexNowClient::from_config(&config(format!("{}/indexnow", server.uri()))).unwrap();
        let outcome = client
            .submit(&["https://syntax.com.ng/projects/a".to_string()])
            .await
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.status, StatusCode::ACCEPTED);
        assert_eq!(outcome.body, "Accepted");
    }

    #[tokio::test]
    async fn test_rejection_is_reported_not_raised() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Key not valid"))
            .mount(&server)
            .await;

        let client = IndexNowClient::from_config(&config(server.uri())).unwrap();
        let outcome = client.submit(&["https://syntax.com.ng/".to_string()]).await.unwrap();

        assert!(!outcome.is_success());
        assert_eq!(outcome.status.as_u16(), 403);
        assert_eq!(outcome.body, "Key not valid");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_upstream_error() {
        let client = IndexNowClient::from_config(&config("http://127.0.0.1:1/indexnow".to_string())).unwrap();
        let result = client.submit(&["https://syntax.com.ng/".to_string()]).await;
        assert!(matches!(result, Err(AppError::Upstream(_))));
    }
}
