//! Review API client
//!
//! Queries the homework status endpoint for changes since a unix timestamp
//! and classifies the outcome into [`BotError`] variants.

use async_trait::async_trait;
use log::debug;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use super::HomeworkSource;
use crate::error::{BotError, BotResult};
use crate::models::FetchResult;
use crate::validation::validate;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

pub struct PracticumClient {
    client: Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    /// Create a client with its own HTTP connection pool.
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>, timeout: Duration) -> BotResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("homework-bot/1.0")
            .build()
            .map_err(|e| BotError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_http_client(client, endpoint, token))
    }

    pub fn with_http_client(client: Client, endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    /// Raw decoded body for `from_date = since_timestamp`.
    pub async fn get_api_answer(&self, since_timestamp: i64) -> BotResult<Value> {
        debug!(
            "Requesting {} with from_date={}",
            self.endpoint, since_timestamp
        );

        let response = self
            .client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", since_timestamp)])
            .send()
            .await
            .map_err(|e| {
                BotError::ServerUnavailable(format!("endpoint {} unreachable: {}", self.endpoint, e))
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(BotError::ServerUnavailable(format!(
                "endpoint {} returned {}",
                self.endpoint, status
            )));
        }

        let body = response.text().await.map_err(|e| {
            BotError::ServerUnavailable(format!("failed to read body from {}: {}", self.endpoint, e))
        })?;

        serde_json::from_str(&body)
            .map_err(|e| BotError::MalformedResponse(format!("body is not valid JSON: {e}")))
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn fetch(&self, since_timestamp: i64) -> BotResult<FetchResult> {
        let raw = self.get_api_answer(since_timestamp).await?;
        let result = validate(&raw)?;
        debug!(
            "Fetched {} homework(s), current_date={}",
            result.homeworks.len(),
            result.current_date
        );
        Ok(result)
    }

    fn source_name(&self) -> &str {
        "practicum"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve exactly one HTTP response and hand back the raw request text.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{}/api/user_api/homework_statuses/", addr), handle)
    }

    fn test_client(endpoint: String) -> PracticumClient {
        let http = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        PracticumClient::with_http_client(http, endpoint, "test-token")
    }

    #[tokio::test]
    async fn test_fetch_sends_timestamp_and_oauth_header() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"homeworks":[{"homework_name":"hw1","status":"reviewing"}],"current_date":100}"#,
        )
        .await;

        let result = test_client(url).fetch(42).await.unwrap();
        assert_eq!(result.current_date, 100);
        assert_eq!(result.homeworks.len(), 1);
        assert_eq!(result.homeworks[0].name.as_deref(), Some("hw1"));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/user_api/homework_statuses/?from_date=42 "));
        assert!(request.to_lowercase().contains("authorization: oauth test-token"));
    }

    #[tokio::test]
    async fn test_non_ok_status_is_server_unavailable() {
        let (url, server) = serve_once("503 Service Unavailable", "{}").await;

        let err = test_client(url).fetch(0).await.unwrap_err();
        assert!(matches!(err, BotError::ServerUnavailable(ref m) if m.contains("503")));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_other_2xx_is_not_ok() {
        let (url, server) = serve_once("202 Accepted", r#"{"homeworks":[],"current_date":1}"#).await;

        let err = test_client(url).fetch(0).await.unwrap_err();
        assert!(matches!(err, BotError::ServerUnavailable(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_json_is_malformed() {
        let (url, server) = serve_once("200 OK", "<html>maintenance</html>").await;

        let err = test_client(url).fetch(0).await.unwrap_err();
        assert!(matches!(err, BotError::MalformedResponse(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_key_is_malformed() {
        let (url, server) = serve_once("200 OK", r#"{"current_date":100}"#).await;

        let err = test_client(url).fetch(0).await.unwrap_err();
        assert!(matches!(err, BotError::MalformedResponse(ref m) if m.contains("homeworks")));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_server_unavailable() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = test_client(format!("http://{}/", addr)).fetch(0).await.unwrap_err();
        assert!(matches!(err, BotError::ServerUnavailable(ref m) if m.contains("unreachable")));
    }
}
