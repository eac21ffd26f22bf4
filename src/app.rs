use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/static/*path", get(handlers::static_asset))
        .route("/ui/panels/:panel/toggle", post(handlers::toggle_panel))
        .route("/ui/excuse", post(handlers::excuse))
        .route("/ui/apology", post(handlers::apology))
        .route("/ui/adjust-tone", post(handlers::adjust_tone))
        .route("/ui/complete-apology", post(handlers::complete_apology))
        .route("/ui/guilt-score", post(handlers::guilt_score))
        .route("/ui/screenshot", get(handlers::download_screenshot))
        .route("/ui/screenshot/:kind", post(handlers::screenshot))
        .route("/ui/favorite/:kind", post(handlers::save_favorite))
        .route("/ui/clear-rankings/:kind", post(handlers::clear_rankings))
        .route("/ui/memory", get(handlers::memory))
        .route("/ui/emergency", post(handlers::emergency))
        .route("/ui/schedule", post(handlers::schedule))
        .route("/ui/theme", post(handlers::theme))
        .with_state(state)
}
