use axum::extract::State;
use axum::Json;
use engine::StepView;

use crate::views::{outline, AdvanceView, ClusterView, StepSummary};
use crate::{ApiError, AppState};

pub async fn show(State(state): State<AppState>) -> Json<StepView> {
    Json(state.session.lock().await.view())
}

pub async fn steps(State(state): State<AppState>) -> Json<Vec<StepSummary>> {
    let session = state.session.lock().await;
    Json(outline(session.tutorial(), session.state().step()))
}

/// Run the active step's action and move on.
///
/// A blocked step answers 409 with the validation failures in the body.
pub async fn advance(State(state): State<AppState>) -> Result<Json<AdvanceView>, ApiError> {
    let mut session = state.session.lock().await;
    let issued = session.advance().await?;
    Ok(Json(AdvanceView {
        issued,
        step: session.view(),
        cluster: ClusterView::from(session.snapshot()),
    }))
}
