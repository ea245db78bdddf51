use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, info};

use crate::error::FetchError;

pub fn build_client() -> Result<Client, FetchError> {
    Ok(Client::builder()
        .user_agent(concat!("floorplan-sheets/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Fetch the published sheet. Anything but a non-empty CSV-ish 2xx body is an error.
pub async fn fetch_csv(client: &Client, url: &str, timeout_secs: u64) -> Result<String, FetchError> {
    if url.trim().is_empty() {
        return Err(FetchError::NotConfigured("sheet_url"));
    }
    info!("Fetching sheet: {}", url);
    fetch_text(client, url, timeout_secs, is_csv_content_type).await
}

/// Fetch one overlay SVG document.
pub async fn fetch_svg(
    client: &Client,
    name: &'static str,
    url: &str,
    timeout_secs: u64,
) -> Result<String, FetchError> {
    if url.trim().is_empty() {
        return Err(FetchError::NotConfigured(name));
    }
    info!("Fetching {}: {}", name, url);
    fetch_text(client, url, timeout_secs, |ct| ct.contains("svg") || ct.contains("xml")).await
}

pub fn is_csv_content_type(content_type: &str) -> bool {
    let ct = content_type.to_lowercase();
    ct.contains("csv") || ct.starts_with("text/plain")
}

async fn fetch_text(
    client: &Client,
    url: &str,
    timeout_secs: u64,
    accept: impl Fn(&str) -> bool,
) -> Result<String, FetchError> {
    let request = async {
        let res = client.get(url).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !accept(&content_type) {
            return Err(FetchError::ContentType(content_type));
        }

        let body = res.text().await?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }
        debug!(bytes = body.len(), content_type = %content_type, "Fetched document");
        Ok::<String, FetchError>(body)
    };

    tokio::time::timeout(Duration::from_secs(timeout_secs), request)
        .await
        .map_err(|_| FetchError::Timeout(timeout_secs))?
}
