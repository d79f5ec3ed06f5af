// Rendering engine boundary: page count on load, rendered page per request.

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// A single rendered page, ready for the host to blit. Text and annotation
/// layers are disabled; this is a pure visual render.
pub struct RenderedPage {
    /// 1-indexed page number that was rendered.
    pub page: u32,
    pub width: u32,
    pub height: u32,
    pub pixels: Bytes,
}

#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Load a binary document and return its page count.
    async fn load(&self, document: Bytes) -> Result<u32>;

    /// Render a 1-indexed page at the given magnification factor.
    /// `load` must have succeeded for the current document first.
    async fn render_page(&self, page: u32, zoom: f64) -> Result<RenderedPage>;
}
