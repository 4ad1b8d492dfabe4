use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Query, Request, State};
use axum::http::{header, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use ctrltk_core::{
    ImageFormat, InfoResponse, InputCommand, KeyboardRequest, MouseClickRequest, MouseMoveRequest,
    MouseScrollRequest, ValidationError, RESOLUTION_HEADER,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::auth::{Authenticated, CHALLENGE};
use crate::state::AppState;

const VERSION: &str = concat!("ctrltk/", env!("CARGO_PKG_VERSION"));

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/info", get(info))
        .route("/image", get(image))
        .route("/keyboard", post(keyboard))
        .route("/mouse/move", post(mouse_move))
        .route("/mouse/click", post(mouse_click))
        .route("/mouse/scroll", post(mouse_scroll))
        .with_state(state);

    Router::new()
        .route("/healthz", get(health_check))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "ok"
}

/// Externally observable failures. Auth failures render without stage detail
/// and validation failures without field detail.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    BadRequest,
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, CHALLENGE)],
            )
                .into_response(),
            ApiError::BadRequest => StatusCode::BAD_REQUEST.into_response(),
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

/// Json extractor that renders every body-shape rejection as a bare 400,
/// so malformed JSON, missing fields, and mistyped fields are
/// indistinguishable on the wire.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => {
                debug!(error = %rejection, "rejected request body");
                Err(ApiError::BadRequest)
            }
        }
    }
}

async fn info(Authenticated(identity): Authenticated) -> Json<InfoResponse> {
    Json(InfoResponse {
        version: VERSION.to_owned(),
        user: identity,
    })
}

#[derive(Debug, Deserialize)]
struct ImageQuery {
    format: Option<String>,
}

/// One fresh capture per request. The resolution descriptor rides a sidecar
/// header next to the bytes, and `no-store` keeps pollers from ever reusing
/// a frame.
async fn image(
    Authenticated(_): Authenticated,
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, ApiError> {
    let format = ImageFormat::from_query(query.format.as_deref());
    let frame = state.capturer().capture(format).await.map_err(|err| {
        error!(error = %err, "screen capture failed");
        ApiError::Internal
    })?;
    let headers = [
        (header::CONTENT_TYPE, format.content_type().to_owned()),
        (header::CACHE_CONTROL, "no-store".to_owned()),
        (
            HeaderName::from_static(RESOLUTION_HEADER),
            frame.resolution.to_string(),
        ),
    ];
    Ok((headers, frame.bytes).into_response())
}

async fn keyboard(
    Authenticated(_): Authenticated,
    State(state): State<AppState>,
    ValidJson(request): ValidJson<KeyboardRequest>,
) -> Result<StatusCode, ApiError> {
    dispatch(&state, request.normalize()).await
}

async fn mouse_move(
    Authenticated(_): Authenticated,
    State(state): State<AppState>,
    ValidJson(request): ValidJson<MouseMoveRequest>,
) -> Result<StatusCode, ApiError> {
    dispatch(&state, request.normalize()).await
}

async fn mouse_click(
    Authenticated(_): Authenticated,
    State(state): State<AppState>,
    ValidJson(request): ValidJson<MouseClickRequest>,
) -> Result<StatusCode, ApiError> {
    dispatch(&state, request.normalize()).await
}

async fn mouse_scroll(
    Authenticated(_): Authenticated,
    State(state): State<AppState>,
    ValidJson(request): ValidJson<MouseScrollRequest>,
) -> Result<StatusCode, ApiError> {
    dispatch(&state, request.normalize()).await
}

/// Forward one normalized command to the injection collaborator. A failed
/// normalization dispatches nothing.
async fn dispatch(
    state: &AppState,
    normalized: Result<InputCommand, ValidationError>,
) -> Result<StatusCode, ApiError> {
    let command = normalized.map_err(|err| {
        debug!(field = err.field, "rejected input payload");
        ApiError::BadRequest
    })?;
    state.injector().inject(command).await.map_err(|err| {
        error!(error = %err, "input injection failed");
        ApiError::Internal
    })?;
    Ok(StatusCode::OK)
}
