use reqwest::{Client, ClientBuilder};
use std::time::Duration;

pub const USER_AGENT: &str = concat!("portfolio/", env!("CARGO_PKG_VERSION"));

/// Upper bound for any request; individual calls set tighter timeouts.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(60);

/// Create a configured HTTP client for making requests to the source-hosting API
pub fn create_http_client() -> reqwest::Result<Client> {
    ClientBuilder::new()
        .timeout(CLIENT_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_http_client() {
        assert!(create_http_client().is_ok());
        assert!(USER_AGENT.starts_with("portfolio/"));
    }
}
