use crate::{
    config::GeminiConfig,
    error::{Result, StudioError},
    logger,
    models::{
        gemini::{
            ApiErrorResponse, Content, GenerateContentRequest, GenerateContentResponse,
            GenerationConfig, Part, ResponseModality,
        },
        GenerationRequest, ImagePayload,
    },
};
use async_trait::async_trait;

use super::ImageGenerator;

pub const MISSING_API_KEY_MESSAGE: &str = "API_KEY is not configured on the server.";
pub const NO_IMAGE_MESSAGE: &str = "API response did not contain a valid image.";

/// Calls the Gemini `generateContent` endpoint directly. Used by the proxy server.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| StudioError::ConfigError(MISSING_API_KEY_MESSAGE.into()))
    }

    /// Primary image, optional secondary image, then the prompt text.
    pub fn build_payload(request: &GenerationRequest) -> GenerateContentRequest {
        let mut parts = vec![Part::image(&request.primary_image)];
        if let Some(secondary) = &request.secondary_image {
            parts.push(Part::image(secondary));
        }
        parts.push(Part::text(request.prompt.as_str()));

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: GenerationConfig {
                response_modalities: vec![ResponseModality::Image, ResponseModality::Text],
            },
        }
    }

    /// First inline image across candidates, in order.
    pub fn extract_image(response: &GenerateContentResponse) -> Option<ImagePayload> {
        response
            .candidates
            .iter()
            .filter_map(|candidate| candidate.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.inline_data.as_ref())
            .find(|inline| !inline.data.is_empty())
            .map(|inline| ImagePayload::new(inline.mime_type.clone(), inline.data.clone()))
    }

    fn api_error(status: u16, body: &str) -> StudioError {
        let detail = serde_json::from_str::<ApiErrorResponse>(body)
            .map(|envelope| envelope.error.message)
            .ok()
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| body.chars().take(300).collect());
        StudioError::ResponseError(format!(
            "Gemini API error (status {}): {}",
            status, detail
        ))
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<ImagePayload> {
        let api_key = self.api_key()?;
        let endpoint = self.config.endpoint();
        let payload = Self::build_payload(request);

        log::info!("Generating image with model: {}", self.config.model);
        log::debug!(
            "Request parts: primary={} secondary={} prompt_chars={}",
            request.primary_image.mime_type(),
            request
                .secondary_image
                .as_ref()
                .map(ImagePayload::mime_type)
                .unwrap_or("none"),
            request.prompt.chars().count()
        );

        let _timer = logger::timer("gemini generateContent");
        let response = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini transport error: {:?}", e);
                StudioError::from(e)
            })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            log::error!("Gemini returned {}: {}", status, body);
            return Err(Self::api_error(status.as_u16(), &body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| StudioError::ResponseError(format!("Unreadable Gemini response: {}", e)))?;

        for text in parsed
            .candidates
            .iter()
            .filter_map(|candidate| candidate.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
        {
            log::debug!("Model commentary: {}", text);
        }

        match Self::extract_image(&parsed) {
            Some(image) => Ok(image),
            None => {
                log::error!("No image part in Gemini response: {}", body);
                Err(StudioError::ResponseError(NO_IMAGE_MESSAGE.into()))
            }
        }
    }

    fn ensure_configured(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(secondary: Option<ImagePayload>) -> GenerationRequest {
        GenerationRequest::new(ImagePayload::new("image/png", "PRIMARY"), "do it", secondary)
    }

    #[test]
    fn payload_orders_primary_secondary_text() {
        let payload = GeminiClient::build_payload(&request(Some(ImagePayload::new(
            "image/jpeg",
            "SECOND",
        ))));
        let value = serde_json::to_value(&payload).unwrap();
        let parts = value["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["inlineData"]["mimeType"], json!("image/png"));
        assert_eq!(parts[0]["inlineData"]["data"], json!("PRIMARY"));
        assert_eq!(parts[1]["inlineData"]["mimeType"], json!("image/jpeg"));
        assert_eq!(parts[2]["text"], json!("do it"));
        assert_eq!(
            value["generationConfig"]["responseModalities"],
            json!(["IMAGE", "TEXT"])
        );
    }

    #[test]
    fn payload_without_secondary_has_two_parts() {
        let value = serde_json::to_value(GeminiClient::build_payload(&request(None))).unwrap();
        let parts = value["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert!(parts[1].get("inlineData").is_none());
    }

    #[test]
    fn extracts_first_inline_image() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "here you go"}]}},
                {"content": {"parts": [
                    {"text": "and"},
                    {"inlineData": {"mimeType": "image/png", "data": "FIRST"}},
                    {"inline_data": {"mime_type": "image/png", "data": "SECOND"}}
                ]}}
            ]
        }))
        .unwrap();
        let image = GeminiClient::extract_image(&response).unwrap();
        assert_eq!(image.to_data_uri(), "data:image/png;base64,FIRST");
    }

    #[test]
    fn text_only_response_has_no_image() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "I cannot do that"}]}, "finishReason": "STOP"}]
        }))
        .unwrap();
        assert!(GeminiClient::extract_image(&response).is_none());
        assert!(GeminiClient::extract_image(&GenerateContentResponse::default()).is_none());
    }

    #[test]
    fn api_errors_use_the_envelope_message() {
        let err = GeminiClient::api_error(
            403,
            r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#,
        );
        assert_eq!(err.to_string(), "Gemini API error (status 403): API key not valid");
        let err = GeminiClient::api_error(502, "bad gateway");
        assert_eq!(err.to_string(), "Gemini API error (status 502): bad gateway");
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let client = GeminiClient::new(GeminiConfig::new());
        assert!(client.ensure_configured().is_err());
        let err = client.generate(&request(None)).await.unwrap_err();
        assert!(matches!(err, StudioError::ConfigError(_)));
        assert_eq!(err.to_string(), MISSING_API_KEY_MESSAGE);
    }
}
