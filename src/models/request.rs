use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{GenerationMethod, ImagePayload};
use crate::error::{Result, StudioError};

/// One call to the image model. Built fresh per generation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub primary_image: ImagePayload,
    pub prompt: String,
    pub secondary_image: Option<ImagePayload>,
}

impl GenerationRequest {
    pub fn new(
        primary_image: ImagePayload,
        prompt: impl Into<String>,
        secondary_image: Option<ImagePayload>,
    ) -> Self {
        Self {
            primary_image,
            prompt: prompt.into(),
            secondary_image,
        }
    }
}

/// A generated image kept in the session history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub id: Uuid,
    pub image: ImagePayload,
    pub method: GenerationMethod,
    pub created_at: DateTime<Utc>,
}

impl GenerationResult {
    pub fn new(image: ImagePayload, method: GenerationMethod) -> Self {
        Self {
            id: Uuid::new_v4(),
            image,
            method,
            created_at: Utc::now(),
        }
    }
}

/// Body of `POST /generate`.
///
/// Every field is optional at the serde level so that a missing field is
/// reported with the endpoint's own 400 message instead of a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    #[serde(default, alias = "base64FurnitureImage")]
    pub primary_image: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default, alias = "base64ReferenceImage")]
    pub secondary_image: Option<String>,
}

impl GenerateBody {
    pub fn from_request(request: &GenerationRequest) -> Self {
        Self {
            primary_image: Some(request.primary_image.to_data_uri()),
            prompt: Some(request.prompt.clone()),
            secondary_image: request.secondary_image.as_ref().map(ImagePayload::to_data_uri),
        }
    }

    pub fn into_request(self) -> Result<GenerationRequest> {
        let primary = self.primary_image.filter(|value| !value.is_empty());
        let prompt = self.prompt.filter(|value| !value.is_empty());
        let (Some(primary), Some(prompt)) = (primary, prompt) else {
            return Err(StudioError::RequestError(
                "Missing required parameters: primaryImage and prompt.".into(),
            ));
        };

        let secondary_image = match self.secondary_image.filter(|value| !value.is_empty()) {
            Some(uri) => Some(ImagePayload::from_data_uri(&uri)?),
            None => None,
        };

        Ok(GenerationRequest {
            primary_image: ImagePayload::from_data_uri(&primary)?,
            prompt,
            secondary_image,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub generated_image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub configured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_round_trips_through_request() {
        let request = GenerationRequest::new(
            ImagePayload::new("image/png", "AAAA"),
            "make it cozy",
            None,
        );
        let value = serde_json::to_value(GenerateBody::from_request(&request)).unwrap();
        assert_eq!(
            value,
            json!({
                "primaryImage": "data:image/png;base64,AAAA",
                "prompt": "make it cozy",
                "secondaryImage": null,
            })
        );

        let parsed: GenerateBody = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.into_request().unwrap(), request);
    }

    #[test]
    fn accepts_legacy_field_names() {
        let body: GenerateBody = serde_json::from_value(json!({
            "base64FurnitureImage": "data:image/jpeg;base64,/9j/",
            "prompt": "p",
            "base64ReferenceImage": "data:image/png;base64,AAAA",
        }))
        .unwrap();
        let request = body.into_request().unwrap();
        assert_eq!(request.primary_image.mime_type(), "image/jpeg");
        assert_eq!(request.secondary_image.unwrap().mime_type(), "image/png");
    }

    #[test]
    fn missing_fields_are_request_errors() {
        let body = GenerateBody {
            primary_image: Some("data:image/png;base64,AAAA".into()),
            prompt: Some(String::new()),
            secondary_image: None,
        };
        let err = body.into_request().unwrap_err();
        assert!(matches!(err, StudioError::RequestError(_)));
        assert!(err.to_string().starts_with("Missing required parameters"));
    }

    #[test]
    fn malformed_secondary_image_is_rejected() {
        let body = GenerateBody {
            primary_image: Some("data:image/png;base64,AAAA".into()),
            prompt: Some("p".into()),
            secondary_image: Some("nonsense".into()),
        };
        assert_eq!(
            body.into_request().unwrap_err().to_string(),
            "Invalid base64 data URL"
        );
    }
}
