//! # HTTP Transport
//!
//! `HttpTransport` over a shared `reqwest` client.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;

use crate::domain::traits::HttpTransport;

/// HTTP client reused across requests
fn http_client() -> &'static Client {
    use std::sync::OnceLock;
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client")
    })
}

#[derive(Default, Clone)]
pub struct ReqwestTransport;

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, accept: Option<&str>) -> Result<String> {
        let mut request = http_client().get(url);
        if let Some(accept) = accept {
            request = request.header(reqwest::header::ACCEPT, accept);
        }

        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(anyhow!("{}: {}", status, text.trim()));
        }

        response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response body: {}", e.without_url()))
    }
}
