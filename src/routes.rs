use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};

use crate::error::TranslationError;
use crate::form::{render_page, FormInput};
use crate::state::AppState;
use crate::translate::{ErrorResponse, HealthResponse, TranslateRequest, TranslateResponse};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Request form
        .route("/", get(form_page))
        .route("/ui/translate", post(form_submit))

        // API
        .route("/translate", post(translate))
        .route("/health", get(health_check))
}

async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Response {
    // Unavailability wins over everything else, body included.
    let chain = match state.chain.chain() {
        Ok(chain) => chain,
        Err(e) => return e.into_response(),
    };

    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse {
                    detail: rejection.body_text(),
                }),
            )
                .into_response();
        }
    };

    if let Err(e) = validate_request(&request) {
        return e.into_response();
    }

    match chain.invoke(&request.language, &request.text).await {
        Ok(translation) => Json(TranslateResponse { translation }).into_response(),
        Err(e) => e.into_response(),
    }
}

fn validate_request(request: &TranslateRequest) -> Result<(), TranslationError> {
    if request.language.trim().is_empty() {
        return Err(TranslationError::InvalidRequest(
            "language must not be empty".to_string(),
        ));
    }
    if request.text.trim().is_empty() {
        return Err(TranslationError::InvalidRequest(
            "text must not be empty".to_string(),
        ));
    }
    Ok(())
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let chain_initialized = state.chain.is_ready();
    Json(HealthResponse {
        status: if chain_initialized { "healthy" } else { "degraded" }.to_string(),
        model: state.settings.model.clone(),
        chain_initialized,
        api_key_configured: state.settings.api_key_configured(),
    })
}

async fn form_page() -> Html<String> {
    Html(render_page(&FormInput::default(), None))
}

async fn form_submit(State(state): State<AppState>, Form(input): Form<FormInput>) -> Html<String> {
    let outcome = state.form_client.submit(&input.language, &input.text).await;
    Html(render_page(&input, Some(&outcome)))
}
