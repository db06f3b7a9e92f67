use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

const DASHBOARD_HTML: &str = include_str!("../../static/dashboard.html");

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
}

/// Static page; its script polls `/api/predict`.
async fn dashboard(State(state): State<AppState>) -> Html<String> {
    Html(render(&state.config.instrument_name))
}

fn render(instrument_name: &str) -> String {
    DASHBOARD_HTML.replace("{{instrument}}", &escape_html(instrument_name))
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
