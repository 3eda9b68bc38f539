use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorBody;

/// Shown when a failure carries no usable message.
pub const UNKNOWN_ERROR_MESSAGE: &str = "發生未知錯誤。";

/// Input problems caught before any request leaves the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("請先上傳主要圖片。")]
    MissingPrimaryImage,
    #[error("請輸入您想如何修改空間的指令。")]
    MissingInstruction,
    #[error("此生成方式請上傳參考圖片。")]
    MissingReferenceImage,
    #[error("此生成方式請上傳裝飾品圖片。")]
    MissingDecorationImage,
    #[error("請描述要移除的物件，或上傳一張遮罩圖片。")]
    MissingRemovalTarget,
}

// Messages are surfaced to the user verbatim, so Display carries no prefix.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error(transparent)]
    ValidationError(#[from] ValidationError),
    #[error("{0}")]
    ConfigError(String),
    #[error("{0}")]
    RequestError(String),
    #[error("{0}")]
    ResponseError(String),
    #[error("{0}")]
    HttpError(String),
    #[error("{0}")]
    SerializationError(String),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("{0}")]
    InternalError(String),
}

impl StudioError {
    /// The message a user should see; never empty.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(e: serde_json::Error) -> Self {
        StudioError::SerializationError(e.to_string())
    }
}

impl From<reqwest::Error> for StudioError {
    fn from(e: reqwest::Error) -> Self {
        StudioError::HttpError(format!("Request to generation service failed: {}", e))
    }
}

impl ResponseError for StudioError {
    fn status_code(&self) -> StatusCode {
        match self {
            StudioError::ValidationError(_) | StudioError::RequestError(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.user_message(),
        })
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;
