use crate::{
    error::{Result, StudioError},
    models::{ErrorBody, GenerateBody, GenerateResponse, GenerationRequest, ImagePayload},
};
use async_trait::async_trait;

use super::ImageGenerator;

const MISSING_KEY_HINT: &str = "API_KEY is not configured";

/// Talks to a running `roomgen serve` instance over `POST /generate`.
#[derive(Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ProxyClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/generate", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Maps a proxy response (status + raw body) onto an image or a user-facing error.
    pub fn interpret_response(status: u16, body: &str) -> Result<ImagePayload> {
        if !(200..300).contains(&status) {
            let message = serde_json::from_str::<ErrorBody>(body)
                .map(|parsed| parsed.error)
                .ok()
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| {
                    format!(
                        "An unknown error occurred on the server (status: {}).",
                        status
                    )
                });

            if message.contains(MISSING_KEY_HINT) {
                return Err(StudioError::ConfigError(
                    "API_KEY environment variable is not set. Please configure it in your deployment environment.".into(),
                ));
            }
            return Err(StudioError::ResponseError(message));
        }

        let parsed: GenerateResponse = serde_json::from_str(body).map_err(|_| {
            StudioError::ResponseError("API response did not contain the expected image data.".into())
        })?;
        if parsed.generated_image.is_empty() {
            return Err(StudioError::ResponseError(
                "API response did not contain the expected image data.".into(),
            ));
        }
        ImagePayload::from_data_uri(&parsed.generated_image)
            .map_err(|_| StudioError::ResponseError("API response did not contain a valid image.".into()))
    }
}

#[async_trait]
impl ImageGenerator for ProxyClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<ImagePayload> {
        log::debug!("POST {}", self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .json(&GenerateBody::from_request(request))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Self::interpret_response(status, &body)
    }

    fn name(&self) -> &str {
        "proxy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_yields_image() {
        let image = ProxyClient::interpret_response(
            200,
            r#"{"generatedImage":"data:image/png;base64,AAAA"}"#,
        )
        .unwrap();
        assert_eq!(image.data(), "AAAA");
    }

    #[test]
    fn success_without_image_is_an_error() {
        let err = ProxyClient::interpret_response(200, r#"{"other":1}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "API response did not contain the expected image data."
        );
    }

    #[test]
    fn server_error_message_is_passed_through() {
        let err = ProxyClient::interpret_response(
            500,
            r#"{"error":"API response did not contain a valid image."}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "API response did not contain a valid image.");
    }

    #[test]
    fn missing_key_message_is_rewritten() {
        let err = ProxyClient::interpret_response(
            500,
            r#"{"error":"API_KEY is not configured on the server."}"#,
        )
        .unwrap_err();
        assert!(matches!(err, StudioError::ConfigError(_)));
        assert!(err.to_string().starts_with("API_KEY environment variable is not set."));
    }

    #[test]
    fn non_json_failure_reports_status() {
        let err = ProxyClient::interpret_response(502, "<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(
            err.to_string(),
            "An unknown error occurred on the server (status: 502)."
        );
    }

    #[test]
    fn endpoint_is_normalized() {
        assert_eq!(
            ProxyClient::new("http://localhost:8080/").endpoint(),
            "http://localhost:8080/generate"
        );
    }
}
