use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{AnalysisSummary, CreateAnalysisRequest},
    repo_types::Analysis,
    services,
};
use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analyses", get(list_analyses).post(create_analysis))
        .route("/analyses/:id", get(get_analysis).delete(delete_analysis))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_analysis(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<CreateAnalysisRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Analysis>)> {
    let Json(payload) = payload?;
    let analysis = services::create(state.store.as_ref(), user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(analysis)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_analyses(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<Vec<AnalysisSummary>>> {
    let items = services::list_for(state.store.as_ref(), user.id)
        .await?
        .into_iter()
        .map(AnalysisSummary::from)
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state, user, path), fields(user_id = %user.id))]
pub async fn get_analysis(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Analysis>> {
    let id = analysis_id(path)?;
    let analysis = services::get_owned(state.store.as_ref(), id, user.id).await?;
    Ok(Json(analysis))
}

#[instrument(skip(state, user, path), fields(user_id = %user.id))]
pub async fn delete_analysis(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = analysis_id(path)?;
    services::delete(state.store.as_ref(), id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// An id that is not a UUID cannot name a stored analysis.
fn analysis_id(path: Result<Path<Uuid>, PathRejection>) -> ApiResult<Uuid> {
    path.map(|Path(id)| id).map_err(|rej| {
        tracing::debug!(error = %rej.body_text(), "unparseable analysis id");
        ApiError::NotFound
    })
}
