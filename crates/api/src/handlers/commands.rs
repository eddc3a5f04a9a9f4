use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use commands::Command;

use crate::views::ClusterView;
use crate::{ApiError, AppState};

/// Issue one interactive command, e.g. `{"type":"pause_node","node":"2"}`.
pub async fn execute(
    State(state): State<AppState>,
    body: Result<Json<Command>, JsonRejection>,
) -> Result<Json<ClusterView>, ApiError> {
    let Json(command) = body?;
    let mut session = state.session.lock().await;
    let snapshot = session.execute(command).await?;
    Ok(Json(ClusterView::from(snapshot)))
}
