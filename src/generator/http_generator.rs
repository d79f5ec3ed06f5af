use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::traits::DocumentGenerator;
use crate::config::PreviewConfig;

/// Error payload returned by the generation service on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct HttpGenerator {
    client: Client,
    preview_endpoint: String,
    document_endpoint: String,
}

impl HttpGenerator {
    pub fn new(config: &PreviewConfig) -> Self {
        Self {
            client: Client::new(),
            preview_endpoint: config.preview_endpoint.clone(),
            document_endpoint: config.document_endpoint.clone(),
        }
    }

    /// POST `{ formType, data }` to `endpoint` and return the binary payload.
    async fn post_generation(
        &self,
        endpoint: &str,
        document_type_key: &str,
        form: &Value,
    ) -> Result<Bytes> {
        let body = serde_json::json!({
            "formType": document_type_key,
            "data": form,
        });

        let resp = self.client.post(endpoint).json(&body).send().await?;

        let status = resp.status();
        debug!(
            "generation response endpoint={} form_type={} status={}",
            endpoint,
            document_type_key,
            status.as_u16()
        );

        if !status.is_success() {
            // The service reports failures as { "error": "..." }; fall back
            // to the bare status when the body isn't that shape.
            let message = match resp.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => format!("HTTP {}", status.as_u16()),
            };
            warn!(
                "generation failed form_type={} status={} error={}",
                document_type_key,
                status.as_u16(),
                message
            );
            return Err(anyhow!("{} (HTTP {})", message, status.as_u16()));
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        if !content_type.contains("pdf") && !content_type.contains("octet-stream") {
            warn!(
                "generation returned unexpected content type form_type={} content_type={}",
                document_type_key, content_type
            );
        }

        let bytes = resp.bytes().await?;
        Ok(bytes)
    }
}

#[async_trait]
impl DocumentGenerator for HttpGenerator {
    async fn generate_preview(&self, document_type_key: &str, form: &Value) -> Result<Bytes> {
        self.post_generation(&self.preview_endpoint, document_type_key, form)
            .await
    }

    async fn generate_final(&self, document_type_key: &str, form: &Value) -> Result<Bytes> {
        self.post_generation(&self.document_endpoint, document_type_key, form)
            .await
    }
}
