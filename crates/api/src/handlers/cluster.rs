use axum::extract::State;
use axum::Json;

use crate::views::ClusterView;
use crate::{ApiError, AppState};

/// The latest snapshot, as last refreshed by a command, advance, or poll.
pub async fn show(State(state): State<AppState>) -> Json<ClusterView> {
    let session = state.session.lock().await;
    Json(ClusterView::from(session.snapshot()))
}

pub async fn refresh(State(state): State<AppState>) -> Result<Json<ClusterView>, ApiError> {
    let mut session = state.session.lock().await;
    let snapshot = session.refresh().await?;
    Ok(Json(ClusterView::from(snapshot)))
}
