use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        DefaultBodyLimit, Multipart, Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{debug, instrument};

use super::{
    dto::{DeletedGram, GramDetails, GramForm, GramView, Pagination, UpdateGramRequest},
    services,
    validation::{GramInput, PictureUpload},
    GRAMS_PATH,
};
use crate::{
    auth::{require_user, CurrentUser},
    error::{AppError, AppResult},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/grams", get(index))
        .route("/grams/:id", get(show))
}

pub fn write_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/grams",
            post(create).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/grams/new", get(new_form))
        .route("/grams/:id/edit", get(edit_form))
        .route(
            "/grams/:id",
            patch(update).put(update).delete(destroy),
        )
}

/// "Redirect to the list" with the affected entity attached.
pub(crate) fn redirect_to_grams<T: Serialize>(body: T) -> Response {
    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, GRAMS_PATH)],
        Json(body),
    )
        .into_response()
}

#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<GramView>>> {
    Ok(Json(services::list_grams(&state, &page).await?))
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<GramDetails>> {
    Ok(Json(services::show_gram(&state, &id).await?))
}

#[instrument(skip_all)]
pub async fn new_form(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> AppResult<Json<GramForm>> {
    Ok(Json(services::new_gram_form(&state, caller.as_ref())?))
}

/// POST /grams (multipart)
/// Fields: `message`, optional `picture` file. Rails-style `gram[...]` names are accepted too.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    body: Result<Multipart, MultipartRejection>,
) -> AppResult<Response> {
    require_user(caller.as_ref())?;
    let input = match body {
        Ok(mp) => read_gram_form(mp).await?,
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "gram form is not multipart");
            GramInput::default()
        }
    };
    let gram = services::create_gram(&state, caller.as_ref(), input).await?;
    Ok(redirect_to_grams(services::to_view(&state, gram).await))
}

#[instrument(skip(state, caller))]
pub async fn edit_form(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<GramForm>> {
    Ok(Json(services::edit_gram_form(&state, caller.as_ref(), &id).await?))
}

#[instrument(skip(state, caller, body))]
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<String>,
    body: Result<Json<UpdateGramRequest>, JsonRejection>,
) -> AppResult<Response> {
    let message = submitted_message(body.map(|Json(b)| b.message));
    let gram = services::update_gram(&state, caller.as_ref(), &id, &message).await?;
    Ok(redirect_to_grams(services::to_view(&state, gram).await))
}

#[instrument(skip(state, caller))]
pub async fn destroy(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let deleted = services::destroy_gram(&state, caller.as_ref(), &id).await?;
    Ok(redirect_to_grams(DeletedGram { deleted }))
}

/// The `message` of a JSON body, or blank when the body cannot be decoded.
///
/// Decoding never fails the request by itself: the services look the gram up
/// and check ownership first, and only then report a blank message.
pub(crate) fn submitted_message(body: Result<String, JsonRejection>) -> String {
    body.unwrap_or_else(|rejection| {
        debug!(error = %rejection.body_text(), "undecodable message body");
        String::new()
    })
}

async fn read_gram_form(mut mp: Multipart) -> AppResult<GramInput> {
    let mut input = GramInput::default();
    while let Some(field) = mp.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "message" | "gram[message]" => {
                input.message = field.text().await.map_err(bad_multipart)?;
            }
            "picture" | "gram[picture]" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".into());
                let body = field.bytes().await.map_err(bad_multipart)?;
                input.picture = Some(PictureUpload { body, content_type });
            }
            _ => {}
        }
    }
    Ok(input)
}

fn bad_multipart(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge;
    }
    AppError::BadRequest(e.body_text())
}
