//! Slack incoming-webhook notifier.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Notifier, NotifyError, Severity};

/// Slack webhook configuration. The whole section is optional; without it
/// no chat alerts are sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlackConfig {
    /// Incoming webhook URL.
    pub webhook_url: String,
    /// Sender name shown in the channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Lowest severity forwarded to Slack (default: warn).
    #[serde(default = "default_min_severity")]
    pub min_severity: Severity,
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_min_severity() -> Severity {
    Severity::Warn
}

fn default_timeout() -> u64 {
    10
}

#[derive(Debug, Serialize)]
struct SlackMessage<'a> {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
}

/// Posts notifications to a Slack channel.
pub struct SlackNotifier {
    client: Client,
    config: SlackConfig,
}

impl SlackNotifier {
    pub fn new(config: SlackConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NotifyError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Lowest severity this sink should receive.
    pub fn min_severity(&self) -> Severity {
        self.config.min_severity
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    fn name(&self) -> &str {
        "slack"
    }

    async fn emit(&self, severity: Severity, message: &str) -> Result<(), NotifyError> {
        let payload = SlackMessage {
            text: format!("[{}] {}", severity, message),
            username: self.config.username.as_deref(),
        };

        let response = self
            .client
            .post(&self.config.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Http(e.to_string()))?;

        let status = response.status().as_u16();

        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status,
                body: body.chars().take(200).collect(),
            });
        }

        debug!(severity = %severity, "Slack notification delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Accept one request, answer with `status_line`, and hand back the request body.
    async fn webhook_server(status_line: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + content_length {
                        let body = String::from_utf8_lossy(&request[header_end + 4..]).to_string();
                        let _ = tx.send(body);
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
                status_line
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        (format!("http://{}/services/T000/B000/XXXX", addr), rx)
    }

    fn config(webhook_url: String, username: Option<&str>) -> SlackConfig {
        SlackConfig {
            webhook_url,
            username: username.map(str::to_string),
            min_severity: Severity::Warn,
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_deserialize_defaults() {
        let toml = r#"
            webhook_url = "https://hooks.slack.com/services/T/B/X"
        "#;
        let config: SlackConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.min_severity, Severity::Warn);
        assert_eq!(config.timeout_secs, 10);
        assert!(config.username.is_none());
    }

    #[tokio::test]
    async fn test_emit_posts_payload() {
        let (url, body_rx) = webhook_server("200 OK").await;
        let notifier = SlackNotifier::new(config(url, Some("watcher"))).unwrap();

        notifier
            .emit(Severity::Warn, "Summer Live https://example.com/ticket/55")
            .await
            .unwrap();

        let body = body_rx.await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            json["text"],
            "[WARN] Summer Live https://example.com/ticket/55"
        );
        assert_eq!(json["username"], "watcher");
    }

    #[tokio::test]
    async fn test_emit_without_username_omits_field() {
        let (url, body_rx) = webhook_server("200 OK").await;
        let notifier = SlackNotifier::new(config(url, None)).unwrap();

        notifier.emit(Severity::Error, "boom").await.unwrap();

        let body = body_rx.await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json.get("username").is_none());
    }

    #[tokio::test]
    async fn test_emit_rejected() {
        let (url, _body_rx) = webhook_server("403 Forbidden").await;
        let notifier = SlackNotifier::new(config(url, None)).unwrap();

        let result = notifier.emit(Severity::Warn, "x").await;
        assert!(matches!(result, Err(NotifyError::Rejected { status: 403, .. })));
    }
}
