use std::time::Duration;

use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use tracing::debug;

use crate::config::settings::ClientSettings;
use crate::error::{NfieldError, Result};
use crate::transport::{parse_body, RequestDescriptor, Transport, TransportResponse};

/// Transport over a pooled reqwest client, rooted at the configured base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let base_url = parse_base_url(&settings.base_url)?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in &settings.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| NfieldError::configuration(format!("header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| NfieldError::configuration(format!("header '{name}': {e}")))?;
            default_headers.insert(name, value);
        }

        let mut builder = Client::builder().default_headers(default_headers);
        if let Some(timeout_ms) = settings.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| NfieldError::configuration(format!("invalid request path '{path}': {e}")))
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: RequestDescriptor) -> Result<TransportResponse> {
        let url = self.url_for(&request.path)?;
        debug!("{} {}", request.method, url.path());

        let mut builder = self
            .client
            .request(request.method, url)
            .headers(request.headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;

        Ok(TransportResponse {
            status,
            headers,
            body: parse_body(&text),
        })
    }
}

/// Base URLs are joined against, so they must end with a slash to keep their last segment.
fn parse_base_url(raw: &str) -> Result<Url> {
    let normalized = if raw.ends_with('/') {
        raw.to_owned()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized)
        .map_err(|e| NfieldError::configuration(format!("invalid base_url '{raw}': {e}")))
}
