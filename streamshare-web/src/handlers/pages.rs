//! Page handlers

use axum::extract::State;
use axum::response::Html;

use crate::server::AppState;
use crate::templates;

/// Renders the landing page with every currently shared file.
pub async fn landing_page(State(state): State<AppState>) -> Html<String> {
    let files = state.registry.snapshot();
    Html(templates::landing_page(&files, &state.server_config))
}
