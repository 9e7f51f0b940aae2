use async_trait::async_trait;

use crate::errors::CoreError;

/// Sampling knobs passed with every generation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_output_tokens: 2048,
        }
    }
}

/// Trait abstraction for generative text services.
///
/// The trend analysis only needs "prompt in, text out". Swapping the vendor
/// means adding one implementation; services share an `Arc<dyn TextGenerator>`.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait TextGenerator: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Generate a completion for `prompt`.
    async fn generate_text(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, CoreError>;
}
