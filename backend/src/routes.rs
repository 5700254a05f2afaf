use std::path::{Path, PathBuf};
use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use log::{error, info, warn};
use serde_json::Value;

use crate::error::{PredictError, PredictResult};
use crate::inference::{ModelInfo, SalesModel};
use crate::models::{AdBudget, ErrorResponse, PredictionResponse, StatusMessage};

const JSON_LIMIT_BYTES: usize = 64 * 1024;

/// Shared, read-only state handed to every worker.
pub struct AppState {
    model: Option<Arc<dyn SalesModel>>,
    model_path: PathBuf,
}

impl AppState {
    pub fn new(model: Option<Arc<dyn SalesModel>>, model_path: impl AsRef<Path>) -> Self {
        AppState {
            model,
            model_path: model_path.as_ref().to_path_buf(),
        }
    }

    pub fn model(&self) -> Option<Arc<dyn SalesModel>> {
        self.model.clone()
    }
}

pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(StatusMessage::running())
}

pub async fn model_info(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(ModelInfo::new(state.model.as_deref(), &state.model_path))
}

pub async fn predict(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> PredictResult<HttpResponse> {
    let model = state.model().ok_or_else(|| {
        error!("Prediction requested but no model is loaded");
        PredictError::ModelNotLoaded
    })?;

    let budget = AdBudget::from_json(&body).map_err(|e| {
        warn!("Rejected prediction request: {}", e);
        e
    })?;

    let features = budget.to_array();
    let prediction = web::block(move || model.predict(&features))
        .await
        .map_err(|e| {
            error!("Blocking inference task failed: {}", e);
            PredictError::inference(e.to_string())
        })?
        .map_err(|e| {
            error!("Model inference error: {:#}", e);
            PredictError::inference(e.to_string())
        })?;

    if !prediction.is_finite() {
        error!("Model returned a non-finite prediction for {:?}", features);
        return Err(PredictError::inference("model returned a non-finite value"));
    }

    let response = PredictionResponse::new(prediction, budget);
    info!(
        "Prediction ok: TV={} Radio={} Newspaper={} -> {:.2}",
        budget.tv, budget.radio, budget.newspaper, response.prediction
    );
    Ok(HttpResponse::Ok().json(response))
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("Endpoint not found"))
}

/// JSON extractor settings: body errors come back in the standard error shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(|err, _req| {
            warn!("Unreadable JSON body: {}", err);
            PredictError::MalformedBody(err.to_string()).into()
        })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", web::get().to(index))
        .route("/model-info", web::get().to(model_info))
        .route("/predict", web::post().to(predict));
}
