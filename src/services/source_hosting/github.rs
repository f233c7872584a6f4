use super::{ApiError, Event, RepoPayload, SourceHostingApi, WeekBucket};
use crate::utils::config::Config;
use crate::utils::http_client::create_http_client;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;

const JSON_MEDIA_TYPE: &str = "application/vnd.github.v3+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

/// Metadata, README and events requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Commit statistics are computed on demand server-side and can be slow
const STATS_TIMEOUT: Duration = Duration::from_secs(30);

pub struct GitHubClient {
    client: Client,
    api_base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(api_base_url: &str, token: Option<String>) -> reqwest::Result<Self> {
        Ok(Self {
            client: create_http_client()?,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        if config.github_token.is_none() {
            log::warn!("GITHUB_TOKEN not set, using unauthenticated requests (lower rate limit)");
        }
        Self::new(&config.github_api_base, config.github_token.clone())
    }

    fn get(&self, path: &str, accept: &str, timeout: Duration) -> RequestBuilder {
        let request = self
            .client
            .get(format!("{}{}", self.api_base_url, path))
            .header(ACCEPT, accept)
            .timeout(timeout);

        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("token {}", token)),
            None => request,
        }
    }
}

fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status(status))
    }
}

#[async_trait]
impl SourceHostingApi for GitHubClient {
    async fn fetch_repo(&self, full_name: &str) -> Result<RepoPayload, ApiError> {
        let response = self
            .get(&format!("/repos/{}", full_name), JSON_MEDIA_TYPE, DEFAULT_TIMEOUT)
            .send()
            .await?;

        let payload = ensure_success(response)?.json().await?;
        Ok(payload)
    }

    async fn fetch_readme(&self, full_name: &str) -> Result<String, ApiError> {
        let response = self
            .get(&format!("/repos/{}/readme", full_name), RAW_MEDIA_TYPE, DEFAULT_TIMEOUT)
            .send()
            .await?;

        let readme = ensure_success(response)?.text().await?;
        Ok(readme)
    }

    async fn fetch_commit_activity(&self, full_name: &str) -> Result<Vec<WeekBucket>, ApiError> {
        let response = self
            .get(
                &format!("/repos/{}/stats/commit_activity", full_name),
                JSON_MEDIA_TYPE,
                STATS_TIMEOUT,
            )
            .send()
            .await?;

        match response.status() {
            StatusCode::ACCEPTED => Err(ApiError::Pending),
            // Empty repositories have no statistics at all
            StatusCode::NO_CONTENT => Ok(Vec::new()),
            _ => {
                let weeks = ensure_success(response)?.json().await?;
                Ok(weeks)
            }
        }
    }

    async fn fetch_user_events(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Event>, ApiError> {
        let response = self
            .get(
                &format!("/users/{}/events/public", username),
                JSON_MEDIA_TYPE,
                DEFAULT_TIMEOUT,
            )
            .query(&[("page", page), ("per_page", per_page)])
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(ApiError::Status(response.status()));
        }

        let events: Vec<Event> = response.json().await?;
        log::debug!("📥 Fetched {} events for {} (page {})", events.len(), username, page);
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer every connection with the same status and body; returns the base URL
    async fn serve_canned(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                let mut read = 0;
                while read < buf.len() {
                    let n = socket.read(&mut buf[read..]).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    read += n;
                    if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}", addr)
    }

    fn local_client(base: &str) -> GitHubClient {
        GitHubClient {
            client: Client::builder().no_proxy().build().unwrap(),
            api_base_url: base.to_string(),
            token: None,
        }
    }

    #[tokio::test]
    async fn test_commit_activity_accepted_is_pending() {
        let base = serve_canned("202 Accepted", "{}").await;
        let client = local_client(&base);

        let result = client.fetch_commit_activity("octocat/site").await;
        assert!(matches!(result, Err(ApiError::Pending)));
    }

    #[tokio::test]
    async fn test_commit_activity_no_content_is_empty() {
        let base = serve_canned("204 No Content", "").await;
        let client = local_client(&base);

        let weeks = client.fetch_commit_activity("octocat/empty").await.unwrap();
        assert!(weeks.is_empty());
    }

    #[tokio::test]
    async fn test_commit_activity_ok_is_decoded() {
        let base =
            serve_canned("200 OK", r#"[{"week": 1735430400, "total": 1, "days": [0,1,0,0,0,0,0]}]"#)
                .await;
        let client = local_client(&base);

        let weeks = client.fetch_commit_activity("octocat/site").await.unwrap();
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].days[1], 1);
    }

    #[tokio::test]
    async fn test_commit_activity_server_error_is_status() {
        let base = serve_canned("500 Internal Server Error", "{}").await;
        let client = local_client(&base);

        let result = client.fetch_commit_activity("octocat/site").await;
        assert!(matches!(
            result,
            Err(ApiError::Status(status)) if status == StatusCode::INTERNAL_SERVER_ERROR
        ));
    }

    #[tokio::test]
    async fn test_events_forbidden_is_status() {
        let base = serve_canned("403 Forbidden", r#"{"message": "rate limited"}"#).await;
        let client = local_client(&base);

        let result = client.fetch_user_events("octocat", 1, 100).await;
        assert!(matches!(
            result,
            Err(ApiError::Status(status)) if status == StatusCode::FORBIDDEN
        ));
    }

    #[tokio::test]
    async fn test_events_ok_is_decoded() {
        let base = serve_canned(
            "200 OK",
            r#"[{"type": "PushEvent", "created_at": "2025-06-01T10:00:00Z"}]"#,
        )
        .await;
        let client = local_client(&base);

        let events = client.fetch_user_events("octocat", 1, 100).await.unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_contribution());
    }

    #[tokio::test]
    async fn test_repo_not_found_is_status() {
        let base = serve_canned("404 Not Found", r#"{"message": "Not Found"}"#).await;
        let client = local_client(&base);

        let result = client.fetch_repo("octocat/missing").await;
        assert!(matches!(
            result,
            Err(ApiError::Status(status)) if status == StatusCode::NOT_FOUND
        ));
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = GitHubClient::new("https://api.github.com/", None).unwrap();
        assert_eq!(client.api_base_url, "https://api.github.com");
    }

    #[test]
    fn test_requests_carry_headers() {
        let client =
            GitHubClient::new("https://api.github.com", Some("secret".to_string())).unwrap();
        let request = client
            .get("/repos/octocat/hello-world", JSON_MEDIA_TYPE, DEFAULT_TIMEOUT)
            .build()
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://api.github.com/repos/octocat/hello-world"
        );
        assert_eq!(request.headers()[ACCEPT], JSON_MEDIA_TYPE);
        assert_eq!(request.headers()[AUTHORIZATION], "token secret");
        assert_eq!(request.timeout(), Some(&DEFAULT_TIMEOUT));
    }

    #[test]
    fn test_anonymous_requests_have_no_authorization() {
        let client = GitHubClient::new("https://api.github.com", None).unwrap();
        let request = client
            .get("/repos/octocat/hello-world/stats/commit_activity", JSON_MEDIA_TYPE, STATS_TIMEOUT)
            .build()
            .unwrap();

        assert!(request.headers().get(AUTHORIZATION).is_none());
        assert_eq!(request.timeout(), Some(&STATS_TIMEOUT));
    }
}
