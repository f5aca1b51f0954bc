use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// The single-page UI; it drives the JSON API from the browser
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
