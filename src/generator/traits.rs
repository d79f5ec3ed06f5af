use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

/// Remote generation service boundary. Both calls post the same
/// `{ formType, data }` shape; the preview call renders at reduced quality,
/// the final call at full fidelity.
#[async_trait]
pub trait DocumentGenerator: Send + Sync {
    async fn generate_preview(&self, document_type_key: &str, form: &Value) -> Result<Bytes>;
    async fn generate_final(&self, document_type_key: &str, form: &Value) -> Result<Bytes>;
}
