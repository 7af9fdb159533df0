use axum::{extract::State, response::IntoResponse};

use crate::web::server::AppState;

use super::templates::ViewTemplate;

pub async fn view(State(state): State<AppState>) -> impl IntoResponse {
    ViewTemplate {
        session: state.session.id().to_string(),
        refresh_ms: state.refresh_ms,
    }
}
