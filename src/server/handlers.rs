use actix_web::{http::header, web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::{
    error::{Result, StudioError},
    logger,
    models::{ErrorBody, GenerateBody, GenerateResponse, HealthResponse},
};

use super::AppState;

/// `POST /generate`: forwards one request to the image model.
pub async fn generate(
    state: web::Data<AppState>,
    body: web::Json<GenerateBody>,
) -> Result<HttpResponse> {
    let request_id = Uuid::new_v4();

    if let Err(e) = state.generator.ensure_configured() {
        log::error!("[req:{}] {}", request_id, e);
        return Err(e);
    }

    let request = body.into_inner().into_request().map_err(|e| {
        log::warn!("[req:{}] rejected: {}", request_id, e);
        e
    })?;

    log::info!(
        "[req:{}] generate via {} (secondary image: {}, prompt {} chars)",
        request_id,
        state.generator.name(),
        request.secondary_image.is_some(),
        request.prompt.chars().count()
    );

    let _timer = logger::timer(&format!("request {}", request_id));
    let image = state.generator.generate(&request).await.map_err(|e| {
        log::error!("[req:{}] Error in generate handler: {}", request_id, e);
        e
    })?;

    Ok(HttpResponse::Ok().json(GenerateResponse {
        generated_image: image.to_data_uri(),
    }))
}

pub async fn method_not_allowed(req: HttpRequest) -> HttpResponse {
    log::warn!("{} {} not allowed", req.method(), req.path());
    HttpResponse::MethodNotAllowed()
        .insert_header((header::ALLOW, "POST"))
        .json(ErrorBody {
            error: "Method Not Allowed".to_string(),
        })
}

pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        configured: state.generator.ensure_configured().is_ok(),
    })
}

pub fn json_error(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected request body: {}", err);
    StudioError::RequestError(format!("Invalid request body: {}", err)).into()
}
