//! HTTP API server implementation

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};
use utoipa::{OpenApi, ToSchema};

use crate::core::config::ServiceConfig;
use crate::core::errors::TranslationError;
use crate::core::languages;
use crate::core::model::ModelLoader;
use crate::core::models::{Direction, TranslationRequest, TranslationResponse};
use crate::core::pipeline::{check_languages, TranslationPipeline};
use crate::core::registry::ModelRegistry;

/// Welcome message served at `/`
pub const WELCOME: &str = "Welcome to Bhashini Translation Service";

/// Where request handlers get their pipelines from
#[derive(Clone)]
enum PipelineProvider {
    /// Load a fresh model on every request
    Stateless {
        loader: Arc<dyn ModelLoader>,
        config: Arc<ServiceConfig>,
    },
    /// Look up pipelines built at startup
    Cached(Arc<ModelRegistry>),
}

/// Application state
#[derive(Clone)]
pub struct AppState {
    provider: PipelineProvider,
}

impl AppState {
    /// Per-request model loading
    pub fn stateless(loader: Arc<dyn ModelLoader>, config: Arc<ServiceConfig>) -> Self {
        Self {
            provider: PipelineProvider::Stateless { loader, config },
        }
    }

    /// Startup-built registry
    pub fn cached(registry: Arc<ModelRegistry>) -> Self {
        Self {
            provider: PipelineProvider::Cached(registry),
        }
    }

    async fn pipeline_for(
        &self,
        request: &TranslationRequest,
    ) -> Result<Arc<TranslationPipeline>, TranslationError> {
        let direction = request.direction.as_str();
        match &self.provider {
            PipelineProvider::Cached(registry) => registry.get(direction),
            PipelineProvider::Stateless { loader, config } => {
                // An unknown direction names a model that does not exist
                let parsed: Direction = direction.parse().map_err(|_| {
                    TranslationError::model_unavailable(
                        config.model_name(direction),
                        format!("no pretrained model for direction '{}'", direction),
                    )
                })?;
                // Bad tags are rejected before paying for a model load
                check_languages(parsed, &request.source_lang, &request.target_lang)?;
                debug!("Loading fresh {} pipeline", parsed);
                let pipeline =
                    TranslationPipeline::load(loader.as_ref(), parsed, config.generation.clone()).await?;
                Ok(Arc::new(pipeline))
            }
        }
    }
}

/// Language table response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct LanguagesResponse {
    /// Language name to script-tagged code
    pub language_codes: BTreeMap<String, String>,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable failure description
    pub detail: String,
}

/// Error wrapper mapping each failure kind onto an HTTP status
pub struct ApiError(TranslationError);

impl From<TranslationError> for ApiError {
    fn from(err: TranslationError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = if self.0.is_client_error() {
            (StatusCode::BAD_REQUEST, self.0.to_string())
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Translation failed: {}", self.0),
            )
        };

        warn!("Request failed with {}: {}", status.as_u16(), detail);

        (status, axum::Json(ErrorResponse { detail })).into_response()
    }
}

/// Welcome handler
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Welcome message", body = String))
)]
async fn application() -> axum::Json<&'static str> {
    axum::Json(WELCOME)
}

/// Language table handler
#[utoipa::path(
    get,
    path = "/languages",
    responses((status = 200, description = "Supported languages", body = LanguagesResponse))
)]
async fn language_codes() -> axum::Json<LanguagesResponse> {
    let language_codes = languages::language_table()
        .into_iter()
        .map(|(name, code)| (name.to_string(), code.to_string()))
        .collect();

    axum::Json(LanguagesResponse { language_codes })
}

/// Translation handler
#[utoipa::path(
    post,
    path = "/translate/",
    request_body = TranslationRequest,
    responses(
        (status = 200, description = "Translated strings in input order", body = TranslationResponse),
        (status = 400, description = "Invalid direction or language", body = ErrorResponse),
        (status = 500, description = "Model or inference failure", body = ErrorResponse)
    )
)]
async fn translate_strings(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TranslationRequest>,
) -> Result<axum::Json<TranslationResponse>, ApiError> {
    info!(
        "Translating {} strings {} -> {} ({})",
        payload.strings.len(),
        payload.source_lang,
        payload.target_lang,
        payload.direction
    );

    let pipeline = state.pipeline_for(&payload).await?;
    let translated_strings = pipeline
        .translate(&payload.strings, &payload.source_lang, &payload.target_lang)
        .await?;

    Ok(axum::Json(TranslationResponse { translated_strings }))
}

#[derive(OpenApi)]
#[openapi(
    paths(application, language_codes, translate_strings),
    components(schemas(TranslationRequest, TranslationResponse, LanguagesResponse, ErrorResponse))
)]
struct ApiDoc;

/// OpenAPI document handler
async fn openapi() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}

/// Build the router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(application))
        .route("/languages", get(language_codes))
        .route("/translate/", post(translate_strings))
        .route("/translate", post(translate_strings))
        .route("/openapi.json", get(openapi))
        .with_state(Arc::new(state))
}

/// Run the HTTP server
pub async fn run_server(host: String, port: u16, state: AppState) -> anyhow::Result<()> {
    let app = router(state);

    // Bind address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Starting server on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
