use crate::error::{ForkifyError, Result};
use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

/// HTTP helper that races every request against a fixed deadline
#[derive(Debug, Clone)]
pub struct Ajax {
    client: Client,
    timeout: Duration,
}

impl Ajax {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    /// GET `url`, or POST `payload` as JSON when one is given.
    ///
    /// Returns the parsed JSON body. Non-success statuses become `ForkifyError::Api`
    /// carrying the server's `message`.
    pub async fn request(&self, url: &str, payload: Option<&Value>) -> Result<Value> {
        let call = async {
            let builder = match payload {
                Some(body) => {
                    debug!("POST {}", url);
                    self.client
                        .post(url)
                        .header(CONTENT_TYPE, "application/json")
                        .json(body)
                }
                None => {
                    debug!("GET {}", url);
                    self.client.get(url)
                }
            };

            let response = builder.send().await?;
            let status = response.status();
            let text = response.text().await?;

            if !status.is_success() {
                let message = serde_json::from_str::<Value>(&text)
                    .ok()
                    .and_then(|body| body["message"].as_str().map(String::from))
                    .unwrap_or_else(|| {
                        status
                            .canonical_reason()
                            .unwrap_or("Request failed")
                            .to_string()
                    });
                return Err(ForkifyError::Api {
                    message,
                    status: status.as_u16(),
                });
            }

            Ok(serde_json::from_str(&text)?)
        };

        race_timeout(call, self.timeout).await
    }
}

/// Resolve `fut`, or fail with `ForkifyError::Timeout` once `limit` elapses first.
pub async fn race_timeout<T, F>(fut: F, limit: Duration) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(ForkifyError::Timeout {
            seconds: limit.as_secs(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn test_race_timeout_fires_on_pending_future() {
        let result: Result<()> =
            race_timeout(std::future::pending::<Result<()>>(), Duration::from_secs(10)).await;

        let err = result.unwrap_err();
        assert!(matches!(err, ForkifyError::Timeout { seconds: 10 }));
        assert!(err.to_string().contains("10"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_race_timeout_passes_through_ready_value() {
        let result = race_timeout(async { Ok(42) }, Duration::from_secs(1)).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_get_returns_parsed_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/recipes/abc")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status": "success", "data": {"recipe": {"id": "abc"}}}"#)
            .create_async()
            .await;

        let ajax = Ajax::new(Duration::from_secs(5));
        let body = ajax
            .request(&format!("{}/recipes/abc", server.url()), None)
            .await
            .unwrap();

        assert_eq!(body["data"]["recipe"]["id"], "abc");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/recipes")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"title": "Soup"})))
            .with_status(201)
            .with_body(r#"{"status": "success"}"#)
            .create_async()
            .await;

        let ajax = Ajax::new(Duration::from_secs(5));
        let body = ajax
            .request(
                &format!("{}/recipes", server.url()),
                Some(&json!({"title": "Soup"})),
            )
            .await
            .unwrap();

        assert_eq!(body["status"], "success");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_carries_message_and_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/recipes/missing")
            .with_status(400)
            .with_body(r#"{"status": "fail", "message": "Invalid _id: missing"}"#)
            .create_async()
            .await;

        let ajax = Ajax::new(Duration::from_secs(5));
        let err = ajax
            .request(&format!("{}/recipes/missing", server.url()), None)
            .await
            .unwrap_err();

        match err {
            ForkifyError::Api { message, status } => {
                assert_eq!(message, "Invalid _id: missing");
                assert_eq!(status, 400);
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_api_error_without_message_uses_reason() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/recipes")
            .with_status(500)
            .with_body("oops")
            .create_async()
            .await;

        let ajax = Ajax::new(Duration::from_secs(5));
        let err = ajax
            .request(&format!("{}/recipes", server.url()), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ForkifyError::Api { status: 500, .. }));
        assert!(err.to_string().contains("Internal Server Error"));
    }
}
