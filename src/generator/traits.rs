use crate::{
    error::Result,
    models::{GenerationRequest, ImagePayload},
};
use async_trait::async_trait;

/// Something that turns a compiled request into exactly one image.
///
/// Implementations make a single attempt; failures are returned as-is.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<ImagePayload>;

    /// Fails when the generator cannot serve any request, e.g. a missing
    /// credential. Checked before a request body is even looked at.
    fn ensure_configured(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
